//! Tunables for the pager core.
//!
//! Defaults are always available. With the `config` feature the values can also
//! be read from `<config_dir>/rlpager/config.toml`, for example:
//!
//! ```toml
//! search_width = 8
//! scan_chunk_size = 4096
//! ```

use crate::error::{PagerError, Result};
use crate::file_handler::DEFAULT_SCAN_CHUNK;
use crate::search::{DEFAULT_ERROR_BUDGET, DEFAULT_SEARCH_WIDTH};

/// Bytes requested per displayed line when no width is given
pub const DEFAULT_LINE_BUFFER: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize), serde(default))]
pub struct PagerConfig {
    /// Number of line searches kept in flight
    pub search_width: usize,
    /// Bytes read per step while scanning for newlines
    pub scan_chunk_size: usize,
    /// Per-line read failures tolerated before a search stops dispatching
    pub error_budget: usize,
    /// Bytes read per line for display
    pub line_buffer: usize,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            search_width: DEFAULT_SEARCH_WIDTH,
            scan_chunk_size: DEFAULT_SCAN_CHUNK,
            error_budget: DEFAULT_ERROR_BUDGET,
            line_buffer: DEFAULT_LINE_BUFFER,
        }
    }
}

impl PagerConfig {
    /// Reject zero-sized settings
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("search_width", self.search_width),
            ("scan_chunk_size", self.scan_chunk_size),
            ("error_budget", self.error_budget),
            ("line_buffer", self.line_buffer),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(PagerError::config(format!("{name} must be greater than 0")));
            }
        }
        Ok(())
    }
}

#[cfg(feature = "config")]
impl PagerConfig {
    /// Location of the user configuration file, if a config directory exists
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rlpager").join("config.toml"))
    }

    /// Load the user configuration, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PagerError::file_error(format!("Failed to read config: {}", path.display()), e)
        })?;
        log::debug!("loading configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Parse and validate TOML; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| PagerError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
