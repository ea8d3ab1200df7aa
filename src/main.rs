use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commander_library::{
    config::{Config, StorageConfig, defaults::{APP_NAME, DEFAULT_CONFIG_FILE}},
    library::CardLibrary,
    models::{CacheInfo, Card, ColorIdentity, LibraryStats},
    synergy::{SynergyClient, SynergyLookup},
    utils::{StandardHttpClient, time::format_age},
};
use host_storage::{HostStorage, SandboxedStorage, resolve_app_data_dir};

#[derive(Parser)]
#[command(name = "commander-library")]
#[command(version)]
#[command(about = "Commander card library: cached corpus, search and partner lookup")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Application data directory (overrides config file)
    #[arg(short = 'd', long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Run memory-only, without reading or writing the cache
    #[arg(long)]
    no_cache: bool,

    /// Log level
    #[arg(short = 'v', long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the corpus and print its statistics
    Load,
    /// Search cards by name and rules text
    Search {
        query: String,
        /// Rank by weighted term score instead of corpus order
        #[arg(long)]
        semantic: bool,
        #[arg(short, long)]
        limit: Option<usize>,
        /// Restrict to a color identity, e.g. WUG
        #[arg(long, value_name = "WUBRG")]
        colors: Option<String>,
    },
    /// Search cards that can lead a deck
    Commanders {
        query: String,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List eligible co-commanders for a commander
    Partners {
        commander: String,
        /// Only backgrounds within the commander's color identity
        #[arg(long)]
        match_colors: bool,
        /// Try historically paired partners from synergy data first
        #[arg(long)]
        hints: bool,
    },
    /// Print corpus statistics
    Stats,
    /// Inspect or clear the card library cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show the newest cache entry
    Info,
    /// Remove the newest cache entry
    Clear,
    /// Remove every cache entry
    ClearAll,
}

async fn open_storage(config: &StorageConfig) -> Option<Arc<dyn HostStorage>> {
    if !config.enabled {
        return None;
    }
    let base = match &config.data_dir {
        Some(dir) => dir.clone(),
        None => match resolve_app_data_dir(APP_NAME) {
            Ok(dir) => dir,
            Err(e) => {
                warn!("No application data directory, running memory-only: {}", e);
                return None;
            }
        },
    };
    match SandboxedStorage::builder().base_directory(&base).build().await {
        Ok(storage) => {
            info!("Using data directory: {}", base.display());
            Some(Arc::new(storage))
        }
        Err(e) => {
            warn!("Host storage unavailable at {}, running memory-only: {}", base.display(), e);
            None
        }
    }
}

fn print_cards(cards: &[Card]) {
    for card in cards {
        println!("{}  [{}]  {}", card.name, card.color_identity, card.type_line());
    }
    println!("({} cards)", cards.len());
}

fn print_stats(stats: &LibraryStats) {
    println!("Total cards: {}", stats.total_cards);
    println!("Legendary creatures: {}", stats.commanders);
    let colors: Vec<String> = stats
        .color_counts
        .iter()
        .map(|(color, count)| format!("{color}={count}"))
        .collect();
    println!("By color: {}", colors.join(" "));
}

fn describe_cache(info: Option<&CacheInfo>) -> String {
    match info {
        Some(info) if info.exists => format!(
            "{}: {} cards, {} old",
            info.file_name,
            info.card_count,
            format_age(info.age_ms)
        ),
        _ => "No cached card library".to_string(),
    }
}

async fn partner_hints(config: &Config, commander: &str) -> Result<Vec<String>> {
    let http = Arc::new(StandardHttpClient::new(
        &config.sources.user_agent,
        config.sources.connect_timeout,
    )?);
    let client = SynergyClient::new(http, &config.synergy);
    let lookup = client.commander_page(commander, None).await;
    if let SynergyLookup::Unavailable { reason } = &lookup {
        println!("No synergy data for {commander} ({reason}), scanning the corpus");
    }
    Ok(lookup.partner_hints())
}

async fn run(cli: Cli, config: Config, library: CardLibrary) -> Result<()> {
    let search = library.search_config().clone();

    match cli.command {
        Command::Cache { action } => {
            match action {
                CacheAction::Info => {
                    println!("{}", describe_cache(library.cache_info().await.as_ref()));
                }
                CacheAction::Clear => {
                    library.clear_cache().await;
                    println!("Removed the newest cache entry");
                }
                CacheAction::ClearAll => {
                    library.clear_all_cache().await;
                    println!("Removed all cache entries");
                }
            }
            return Ok(());
        }
        Command::Load | Command::Stats => {
            library.load_library().await?;
            if let Some(stats) = library.stats() {
                print_stats(&stats);
            }
        }
        Command::Search {
            query,
            semantic,
            limit,
            colors,
        } => {
            library.load_library().await?;
            let limit = limit.unwrap_or(search.default_limit);
            let identity = colors.as_deref().map(ColorIdentity::parse);
            let cards = if semantic {
                library.semantic_search(&query, limit, identity)
            } else {
                library.lexical_search(&query, limit, identity)
            };
            print_cards(&cards);
        }
        Command::Commanders { query, limit } => {
            library.load_library().await?;
            let cards = library.search_commanders(&query, limit.unwrap_or(search.default_limit));
            print_cards(&cards);
        }
        Command::Partners {
            commander,
            match_colors,
            hints,
        } => {
            library.load_library().await?;
            let card = library
                .find_card(&commander)
                .ok_or_else(|| anyhow!("Commander not found in library: {commander}"))?;

            let mut options = library.partner_options();
            options.match_colors = match_colors;
            if hints {
                options.hints = partner_hints(&config, &card.name).await?;
            }

            let (mechanic, cards) = library.partner_candidates(&card, &options);
            match mechanic {
                Some(mechanic) => {
                    println!("{}: {}", card.name, mechanic);
                    print_cards(&cards);
                }
                None => println!("{} has no partner mechanic", card.name),
            }
        }
    }

    library.flush().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!(
        "commander_library={level},host_storage={level}",
        level = cli.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting commander-library v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    if let Some(data_dir) = cli.data_dir.clone() {
        config.storage.data_dir = Some(data_dir);
    }
    if cli.no_cache {
        config.storage.enabled = false;
    }

    let storage = open_storage(&config.storage).await;
    let library = CardLibrary::from_config(&config, storage)?;
    run(cli, config, library).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_cache() {
        assert_eq!(describe_cache(None), "No cached card library");

        let mut info = CacheInfo {
            exists: false,
            age_ms: 0,
            card_count: 0,
            file_name: String::new(),
        };
        assert_eq!(describe_cache(Some(&info)), "No cached card library");

        info.exists = true;
        info.card_count = 3;
        info.file_name = "cardlibrary_1.json".to_string();
        let line = describe_cache(Some(&info));
        assert!(line.starts_with("cardlibrary_1.json: 3 cards, "));
    }
}
