use amicable_chain::{ChainExplorer, ChainReport};
use amicable_core::{check_limit, AmicableConfig, ConfigManager, LoggingConfig, TableStrategy};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "amicable")]
#[command(about = "Smallest member of the longest amicable chain below a limit", long_about = None)]
#[command(version)]
struct Cli {
    /// Upper bound (inclusive) for chain members
    #[arg(short, long)]
    limit: Option<u64>,

    /// Build the divisor-sum table on the rayon thread pool
    #[arg(long)]
    parallel_table: bool,

    /// Output format (plain, pretty, json)
    #[arg(short, long, default_value = "plain")]
    output: OutputFormat,

    /// Explicit config file instead of .amicable.toml discovery
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Plain,
    Pretty,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let mut config = manager.config().clone();
    apply_cli_overrides(&mut config, &cli);

    init_tracing(&config.logging);

    let limit = check_limit(config.search.limit)?;
    let report = ChainExplorer::with_strategy(limit, config.search.table_strategy).explore();

    match cli.output {
        OutputFormat::Plain => print_plain(&report),
        OutputFormat::Pretty => print_pretty(&report),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        ),
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> amicable_core::Result<ConfigManager> {
    let manager = match path {
        Some(path) => ConfigManager::load_from_path(path)?,
        None => ConfigManager::load()?,
    };
    Ok(manager)
}

fn apply_cli_overrides(config: &mut AmicableConfig, cli: &Cli) {
    if let Some(limit) = cli.limit {
        config.search.limit = limit;
    }
    if cli.parallel_table {
        config.search.table_strategy = TableStrategy::Parallel;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("amicable_core={0},amicable_chain={0}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "compact" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_plain(report: &ChainReport) {
    match report.smallest_member() {
        Some(smallest) => println!("{}", smallest),
        None => println!("none"),
    }
}

fn print_pretty(report: &ChainReport) {
    println!("{}", "Amicable chain search".bold());
    println!("  {:<14} {}", "limit:", report.limit);
    println!("  {:<14} {}", "trajectories:", report.trajectories);
    println!("  {:<14} {}", "cycles found:", report.cycles_found);

    match report.longest {
        Some(ref chain) => {
            println!("  {:<14} {}", "length:", chain.len());
            println!(
                "  {:<14} {}",
                "smallest:",
                chain.smallest().to_string().green().bold()
            );
            println!("  {:<14} {}", "chain:", chain.to_string().dimmed());
        }
        None => println!("  {}", "no amicable chain in range".yellow()),
    }
}
