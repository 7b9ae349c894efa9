use anyhow::Context;
use bidtree::Catalog;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

mod config;
mod display;
mod loader;
mod menu;

use config::Settings;
use loader::{BidColumns, LoaderOptions};

#[derive(Parser)]
#[command(name = "bidx-cli")]
#[command(about = "Bid catalog CLI - load an auction export, then search and prune it")]
struct Cli {
    /// Bid export to load
    #[arg(short, long, default_value = "eBid_Monthly_Sales_Dec_2016.csv")]
    file: PathBuf,
    /// Currency symbol stripped from amounts
    #[arg(long, default_value_t = '$')]
    currency: char,
    #[arg(long, default_value_t = 1)]
    id_col: usize,
    #[arg(long, default_value_t = 0)]
    title_col: usize,
    #[arg(long, default_value_t = 4)]
    amount_col: usize,
    #[arg(long, default_value_t = 8)]
    fund_col: usize,
    /// Print records as JSON
    #[arg(long)]
    json: bool,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Menu,
    /// Load and list every bid
    List {
        #[arg(long)]
        by_amount: bool,
    },
    /// Load and look up one bid
    Find { id: String },
    /// Load and list bids with LOW <= amount <= HIGH
    Range {
        #[arg(allow_negative_numbers = true)]
        low: f64,
        #[arg(allow_negative_numbers = true)]
        high: f64,
    },
    /// Load, remove the given ids, list what is left
    Remove {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Load and report record count and tree heights
    Stats,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            file: self.file.clone(),
            loader: LoaderOptions {
                columns: BidColumns {
                    title: self.title_col,
                    id: self.id_col,
                    amount: self.amount_col,
                    fund: self.fund_col,
                },
                currency: self.currency,
            },
            json: self.json,
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn load(settings: &Settings) -> anyhow::Result<Catalog> {
    let mut catalog = Catalog::new();
    let summary = loader::load_file(&settings.file, &settings.loader, &mut catalog)?;
    eprintln!(
        "Loaded {} of {} bids from {} in {:.6} seconds",
        summary.loaded,
        summary.read,
        settings.file.display(),
        summary.elapsed.as_secs_f64()
    );
    Ok(catalog)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let settings = cli.settings();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let mut catalog = Catalog::new();
            let stdin = io::stdin();
            menu::Menu::new(stdin.lock(), &mut out, &settings).run(&mut catalog)?;
        }

        Commands::List { by_amount } => {
            let catalog = load(&settings)?;
            if by_amount {
                display::write_bids(&mut out, catalog.list_by_amount(), settings.json)?;
            } else {
                display::write_bids(&mut out, catalog.list_by_key(), settings.json)?;
            }
        }

        Commands::Find { id } => {
            let catalog = load(&settings)?;
            let start = Instant::now();
            let found = catalog.lookup(&id);
            let elapsed = start.elapsed();
            display::write_lookup(&mut out, &id, found, settings.json)?;
            display::write_elapsed(&mut out, elapsed)?;
        }

        Commands::Range { low, high } => {
            let catalog = load(&settings)?;
            let hits = catalog
                .range_by_amount(low, high)
                .with_context(|| format!("querying amounts {low}..={high}"))?;
            display::write_bids(&mut out, hits, settings.json)?;
        }

        Commands::Remove { ids } => {
            let mut catalog = load(&settings)?;
            for id in &ids {
                match catalog.remove(id) {
                    Ok(bid) => eprintln!("Removed {}", display::format_bid(&bid)),
                    Err(e) => eprintln!("{e}"),
                }
            }
            display::write_bids(&mut out, catalog.list_by_key(), settings.json)?;
        }

        Commands::Stats => {
            let catalog = load(&settings)?;
            let stats = catalog.stats();
            if settings.json {
                serde_json::to_writer_pretty(&mut out, &stats)?;
                writeln!(out)?;
            } else {
                writeln!(out, "Records: {}", stats.records)?;
                writeln!(out, "Id tree height: {}", stats.key_height)?;
                writeln!(out, "Amount tree height: {}", stats.amount_height)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}
