//! Commander card library
//!
//! Loads a full card corpus once (cache first, remote bulk data otherwise),
//! backfills it from a bundled commander dataset, and answers lexical,
//! semantic, commander and partner queries over it.
//!
//! ```rust,no_run
//! use commander_library::config::Config;
//! use commander_library::library::CardLibrary;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let library = CardLibrary::from_config(&config, None)?;
//! library.load_library().await?;
//! let hits = library.lexical_search("counter spell", 10, None);
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod cache;
pub mod config;
pub mod errors;
pub mod library;
pub mod models;
pub mod partners;
pub mod search;
pub mod sources;
pub mod synergy;
pub mod utils;

pub use errors::{AppError, AppResult};
pub use library::{CardLibrary, LoadResult, LoadState};
