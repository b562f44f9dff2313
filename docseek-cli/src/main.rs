mod report;

use anyhow::{Context, Result};
use clap::Parser;
use docseek::search::{discover_files, search_files};
use docseek::{CliOverrides, SearchConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::{fs, num::NonZeroUsize, path::PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Search for terms inside Word and PDF documents
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to search in
    directory: PathBuf,

    /// Terms to search for (replaces `terms` from the config file)
    terms: Vec<String>,

    /// File extensions to search (default: doc docx pdf)
    #[arg(short = 'e', long, num_args = 1..)]
    extensions: Option<Vec<String>>,

    /// Case sensitive search
    #[arg(short = 'c', long)]
    case_sensitive: bool,

    /// Match whole words only
    #[arg(short = 'w', long)]
    whole_word: bool,

    /// Interpret search terms as regular expressions
    #[arg(short = 'r', long)]
    regex: bool,

    /// Save results to output file
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Number of parallel jobs (default: number of CPU cores)
    #[arg(short = 'j', long)]
    jobs: Option<NonZeroUsize>,

    /// Patterns to ignore (glob format)
    #[arg(short = 'i', long)]
    ignore: Vec<String>,

    /// Configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level for diagnostics on stderr (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Do not show a progress bar
    #[arg(long)]
    no_progress: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            terms: self.terms.clone(),
            root_path: Some(self.directory.clone()),
            extensions: self.extensions.clone(),
            ignore_patterns: self.ignore.clone(),
            case_sensitive: self.case_sensitive,
            whole_word: self.whole_word,
            use_regex: self.regex,
            thread_count: self.jobs,
            log_level: self.log_level.clone(),
            output: self.output.clone(),
        }
    }
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = SearchConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .merge_with_cli(cli.overrides());
    init_logging(&config.log_level)?;
    debug!("Effective configuration: {:?}", config);

    config.validate()?;
    let files = discover_files(&config)?;
    if files.is_empty() {
        println!(
            "No files with extensions {:?} found in {}",
            config.normalized_extensions(),
            config.root_path.display()
        );
        return Ok(());
    }

    println!(
        "Searching {} files for {} terms...",
        files.len(),
        config.terms.len()
    );

    let progress = progress_bar(files.len() as u64, cli.no_progress)?;
    let output = search_files(
        &files,
        &config.terms,
        config.options(),
        config.thread_count,
        |_| progress.inc(1),
    )?;
    progress.finish_and_clear();

    if output.is_empty() {
        println!("{}", report::render(&output, false));
        return Ok(());
    }

    match &config.output {
        Some(path) => {
            fs::write(path, report::render(&output, false))
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Results saved to {}", path.display());
        }
        None => {
            let color = std::io::stdout().is_terminal();
            println!("{}", report::render(&output, color));
        }
    }
    Ok(())
}

/// Diagnostics go to stderr so they never mix with the report.
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level '{}'", level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn progress_bar(len: u64, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}",
        )?
        .progress_chars("#>-"),
    );
    Ok(pb)
}
