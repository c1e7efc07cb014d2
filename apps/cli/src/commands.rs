//! CLI definition, tracing setup, progress rendering, and output wiring.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use reposheet_core::{ProgressReporter, ResultCache};
use reposheet_shared::{CancelToken, ScrapeConfig, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// RepoSheet — turn a profile's repository listing into a dataset.
#[derive(Parser)]
#[command(
    name = "reposheet",
    version,
    about = "Scrape a GitHub user or organization profile into a CSV/XLSX dataset.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Profile URL to scrape (e.g. https://github.com/rust-lang).
    pub url: String,

    /// CSV output path (defaults to <profile>_projects.csv).
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// XLSX output path (defaults to <profile>_projects.xlsx).
    #[arg(long)]
    pub xlsx: Option<PathBuf>,

    /// Print CSV to stdout instead of writing files.
    #[arg(long, conflicts_with_all = ["csv", "xlsx"])]
    pub stdout: bool,

    /// Concurrent README fetches (1 preserves the sequential baseline).
    #[arg(long)]
    pub concurrency: Option<u32>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Delay between listing-page fetches, in milliseconds.
    #[arg(long)]
    pub page_delay_ms: Option<u64>,

    /// Delay between README fetches, in milliseconds.
    #[arg(long)]
    pub readme_delay_ms: Option<u64>,

    /// Maximum listing pages to follow (0 = unbounded).
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "reposheet=warn",
        1 => "reposheet=info",
        2 => "reposheet=debug",
        _ => "reposheet=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command execution
// ---------------------------------------------------------------------------

/// Run the scrape and write the requested outputs.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = load_config()?;
    let scrape = merge_config(&cli, &ScrapeConfig::from(&config));

    // First Ctrl-C requests a cooperative stop; the partial table is
    // still exported.
    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Stopping after the current fetch...");
                cancel.cancel();
            }
        });
    }

    info!(url = %cli.url, concurrency = scrape.concurrency, "starting scrape");

    let reporter = CliProgress::new();
    let cache = ResultCache::new();
    let start = std::time::Instant::now();

    let table = cache
        .get_or_run(&cli.url, &scrape, &cancel, &reporter)
        .await?;

    if table.is_empty() {
        println!("No repositories found for {}", cli.url);
        return Ok(());
    }

    if cli.stdout {
        print!("{}", reposheet_export::csv_string(&table)?);
        return Ok(());
    }

    let stem = profile_stem(&cli.url);
    let csv_path = cli
        .csv
        .unwrap_or_else(|| PathBuf::from(format!("{stem}_projects.csv")));
    let xlsx_path = cli
        .xlsx
        .unwrap_or_else(|| PathBuf::from(format!("{stem}_projects.xlsx")));

    let csv_file = std::fs::File::create(&csv_path)
        .map_err(|e| reposheet_shared::RepoSheetError::io(&csv_path, e))?;
    reposheet_export::write_csv(&table, csv_file)?;
    reposheet_export::write_xlsx(&table, &xlsx_path)?;

    println!();
    println!("  Scrape complete!");
    println!("  Repositories: {}", table.len());
    println!("  CSV:          {}", csv_path.display());
    println!("  XLSX:         {}", xlsx_path.display());
    println!("  Time:         {:.1}s", start.elapsed().as_secs_f64());
    println!();

    Ok(())
}

/// Apply CLI flag overrides on top of the loaded config.
fn merge_config(cli: &Cli, base: &ScrapeConfig) -> ScrapeConfig {
    let mut scrape = base.clone();
    if let Some(concurrency) = cli.concurrency {
        scrape.concurrency = concurrency.max(1);
    }
    if let Some(secs) = cli.timeout_secs {
        scrape.timeout = Duration::from_secs(secs);
    }
    if let Some(ms) = cli.page_delay_ms {
        scrape.page_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = cli.readme_delay_ms {
        scrape.readme_delay = Duration::from_millis(ms);
    }
    if let Some(max_pages) = cli.max_pages {
        scrape.max_pages = max_pages;
    }
    scrape
}

/// Last path segment of the profile URL, for default output file names.
fn profile_stem(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or("profile")
        .to_string()
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn repo_scraped(&self, completed: usize, total: usize, name: &str) {
        self.spinner
            .set_message(format!("Scraping {completed}/{total}: {name}"));
    }

    fn done(&self, _total: usize) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_stem_takes_last_segment() {
        assert_eq!(profile_stem("https://github.com/krasper"), "krasper");
        assert_eq!(profile_stem("https://github.com/krasper/"), "krasper");
        assert_eq!(profile_stem(""), "profile");
    }

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::parse_from([
            "reposheet",
            "https://github.com/krasper",
            "--concurrency",
            "4",
            "--timeout-secs",
            "3",
            "--max-pages",
            "7",
        ]);
        let merged = merge_config(&cli, &ScrapeConfig::default());
        assert_eq!(merged.concurrency, 4);
        assert_eq!(merged.timeout, Duration::from_secs(3));
        assert_eq!(merged.max_pages, 7);
        // Untouched values keep their defaults.
        assert_eq!(merged.page_delay, Duration::from_millis(500));
    }

    #[test]
    fn verify_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
