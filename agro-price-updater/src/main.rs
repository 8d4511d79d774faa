use agro_price_lib::{
    dto::{Category, Listing},
    price_list::{PriceList, PriceListError},
    stats::PriceStats,
};
use agroserver_loader::{config::Config, consts, Session};
use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

mod report;

const DEFAULT_PRICE_LIST: &str = "ingredients_v2.csv";

#[derive(Parser)]
#[command(
    name = "agropriced",
    version,
    about = "Collects Moscow region ingredient prices from agroserver.ru"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape one category and print price statistics
    Parse {
        /// Ingredient name used in the report
        ingredient: String,
        /// Category path such as /sakhar/ or a known category name
        category: String,
        /// Maximum number of listing pages to load
        #[arg(short, long, default_value_t = consts::DEFAULT_MAX_PAGES)]
        pages: u32,
        /// Print statistics and offers as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace ingredient prices in the price list with recommended prices
    Update {
        #[arg(default_value = DEFAULT_PRICE_LIST)]
        price_list: PathBuf,
        /// Maximum number of listing pages to load per ingredient
        #[arg(short, long, default_value_t = consts::DEFAULT_MAX_PAGES)]
        pages: u32,
    },
    /// List known categories and the price list mapping
    Categories,
}

#[tokio::main()]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::init();
    let args = Args::parse();

    // keep stdout clean for JSON output
    if !matches!(args.command, Command::Parse { json: true, .. }) {
        println!(
            "Starting Agroserver price updater (agropriced) v{}",
            env!("CARGO_PKG_VERSION")
        );
    }

    match args.command {
        Command::Categories => {
            print_categories();
            Ok(())
        }
        Command::Parse {
            ingredient,
            category,
            pages,
            json,
        } => {
            let category = resolve_category(&category)?;
            let session = new_session()?;
            match parse_ingredient(&session, &ingredient, &category, pages, !json).await {
                Some((stats, listings)) if json => {
                    let report = report::Report {
                        stats: &stats,
                        listings: &listings,
                    };
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&report).context("Failed to encode report")?
                    );
                }
                Some((_, listings)) => {
                    println!("\nOffers:");
                    println!("{}", report::format_listings(&listings));
                }
                None => {}
            }
            Ok(())
        }
        Command::Update { price_list, pages } => {
            let session = new_session()?;
            let mapping = consts::ingredient_categories();
            update_price_list(&session, &price_list, &mapping, pages).await
        }
    }
}

fn new_session() -> Result<Session, anyhow::Error> {
    let config = Config::new().context("Failed to load configuration")?;
    Session::new(config).context("Failed to create agroserver session")
}

fn print_categories() {
    println!("Categories:");
    for category in consts::categories() {
        println!("  {:<20} {}", category.name, category.path);
    }
    println!("Price list mapping:");
    for category in consts::ingredient_categories() {
        println!("  {:<24} {}", category.name, category.path);
    }
}

/// Accepts a site path ("/sakhar/", "sakhar") or a known category name ("сахар")
fn resolve_category(arg: &str) -> Result<String, anyhow::Error> {
    let arg = arg.trim();
    if let Some(category) = consts::categories()
        .into_iter()
        .find(|c| c.name == arg.to_lowercase())
    {
        return Ok(category.path);
    }
    let path = arg.trim_matches('/');
    let valid = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/');
    if path.is_empty() || !path.chars().all(valid) {
        return Err(anyhow!("Unknown category {arg:?}"));
    }
    Ok(format!("/{path}/"))
}

/// Scrapes the offers of one ingredient and prints the statistics
async fn parse_ingredient(
    session: &Session,
    ingredient: &str,
    category: &str,
    pages: u32,
    verbose: bool,
) -> Option<(PriceStats, Vec<Listing>)> {
    if verbose {
        println!("{}", report::banner(&format!("Parsing: {ingredient}")));
    }

    let listings = session.fetch_category(category, pages).await;
    let prices: Vec<f64> = listings.iter().map(|l| l.price_per_kg).collect();
    let today = chrono::Local::now().date_naive();

    match PriceStats::new(ingredient, &prices, today) {
        Some(stats) => {
            info!(
                "{ingredient}: {} offers, recommended {:.2}",
                stats.offers, stats.recommended
            );
            if verbose {
                println!("\n{}", report::format_stats(&stats));
            }
            Some((stats, listings))
        }
        None => {
            if verbose {
                println!("No prices found for {ingredient}");
            } else {
                warn!("No prices found for {ingredient}");
            }
            None
        }
    }
}

/// Sets the recommended price of every mapped ingredient present in the price list,
/// the file is only rewritten when at least one price changed
async fn update_price_list(
    session: &Session,
    path: &Path,
    mapping: &[Category],
    pages: u32,
) -> Result<(), anyhow::Error> {
    println!("{}", report::banner("Updating price list"));

    let mut price_list = match PriceList::load(path) {
        Ok(price_list) => price_list,
        Err(PriceListError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            error!("Price list {} not found", path.display());
            println!("Price list {} not found", path.display());
            return Ok(());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to load {}", path.display()));
        }
    };
    println!("Loaded {} ingredients", price_list.len());

    let mut updated = 0;

    for (i, category) in mapping.iter().enumerate() {
        if !price_list.contains(&category.name) {
            warn!("Ingredient {:?} not found in price list", category.name);
            println!("Ingredient {:?} not found in price list", category.name);
            continue;
        }

        if let Some((stats, _)) =
            parse_ingredient(session, &category.name, &category.path, pages, true).await
        {
            match price_list.set_price(&category.name, stats.recommended) {
                Ok(old) => {
                    println!("{}", report::format_price_change(old, stats.recommended));
                    updated += 1;
                }
                Err(e) => error!("Failed to update {}: {e}", category.name),
            }
        }

        if i + 1 < mapping.len() {
            tokio::time::sleep(session.config().ingredient_delay).await;
        }
    }

    if updated > 0 {
        price_list
            .save(path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        println!("\nUpdated prices: {updated}");
        println!("Price list saved: {}", path.display());
    } else {
        println!("\nNo prices were updated");
    }
    Ok(())
}
