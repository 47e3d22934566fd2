//! rlpager - print lines or search hits from a large file by line number.

use anyhow::{Context, Result};
use bstr::ByteSlice;
use clap::{Arg, ArgAction, Command};
use rlpager::{Pager, PagerConfig, PagerCore, SearchOptions};
use std::io::Write;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging, controlled by RUST_LOG
    env_logger::init();

    let matches = Command::new("rlpager")
        .version(rlpager::VERSION)
        .about("Print lines or search hits from a large file without loading it")
        .arg(
            Arg::new("file")
                .help("Path to the file to read")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("from")
                .long("from")
                .help("First line to print or search (1-based)")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("1"),
        )
        .arg(
            Arg::new("lines")
                .long("lines")
                .short('n')
                .help("Number of lines to print")
                .value_parser(clap::value_parser!(u64))
                .default_value("20"),
        )
        .arg(
            Arg::new("search")
                .long("search")
                .short('s')
                .help("Regular expression to search for"),
        )
        .arg(
            Arg::new("ignore-case")
                .long("ignore-case")
                .short('i')
                .help("Match case-insensitively")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("word")
                .long("word")
                .short('w')
                .help("Only match whole words")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .help("Number of line searches kept in flight")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("columns")
                .long("columns")
                .help("Maximum bytes printed per line")
                .value_parser(clap::value_parser!(usize)),
        )
        .get_matches();

    let file_path = PathBuf::from(
        matches
            .get_one::<String>("file")
            .context("file argument is required")?,
    );

    let mut config = load_config()?;
    if let Some(&width) = matches.get_one::<usize>("width") {
        config.search_width = width;
    }
    if let Some(&columns) = matches.get_one::<usize>("columns") {
        config.line_buffer = columns;
    }

    let options = SearchOptions {
        case_insensitive: matches.get_flag("ignore-case"),
        whole_word: matches.get_flag("word"),
    };
    let pager = Pager::open(&file_path, &config)
        .with_context(|| format!("Failed to open {}", file_path.display()))?
        .with_search_options(options);

    let from = matches.get_one::<u64>("from").copied().unwrap_or(1);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match matches.get_one::<String>("search") {
        Some(pattern) => print_matches(&pager, pattern, from, &mut out).await?,
        None => {
            let count = matches.get_one::<u64>("lines").copied().unwrap_or(20);
            print_lines(&pager, from, count, config.line_buffer, &mut out).await?
        }
    }

    out.flush()?;
    Ok(())
}

#[cfg(feature = "config")]
fn load_config() -> Result<PagerConfig> {
    Ok(PagerConfig::load()?)
}

#[cfg(not(feature = "config"))]
fn load_config() -> Result<PagerConfig> {
    Ok(PagerConfig::default())
}

/// Print `count` lines starting at `from`, each cut to `columns` bytes
async fn print_lines(
    pager: &Pager,
    from: u64,
    count: u64,
    columns: usize,
    out: &mut impl Write,
) -> Result<()> {
    let mut buf = vec![0u8; columns];
    for line in from..from.saturating_add(count) {
        if !pager.line_exists(line).await {
            break;
        }
        let read = pager.read_line(&mut buf, line).await?;
        writeln!(out, "{}", buf[..read.len].to_str_lossy())?;
    }
    Ok(())
}

/// Print `line:content` for every line matching `pattern` from `from` onwards
async fn print_matches(
    pager: &Pager,
    pattern: &str,
    from: u64,
    out: &mut impl Write,
) -> Result<()> {
    let results = pager.search(pattern, from).await?;
    for line in results.matched_lines() {
        let content = pager.reader().read_full_line(line)?;
        writeln!(out, "{}:{}", line, content.to_str_lossy())?;
    }

    let failed = results.read_error_count();
    if failed > 0 {
        log::warn!("{failed} lines could not be read while searching");
    }
    if results.is_truncated() {
        log::warn!("search stopped after repeated read errors; later lines were not searched");
    }
    Ok(())
}
