//! Card sources
//!
//! - [`ScryfallSource`]: the remote bulk-data corpus
//! - [`ReferenceCommanders`]: the bundled supplementary commander dataset

pub mod scryfall;
pub mod supplementary;
pub mod traits;

pub use scryfall::ScryfallSource;
pub use supplementary::ReferenceCommanders;
pub use traits::{CardSource, SupplementarySource};

#[cfg(test)]
pub use traits::{MockCardSource, MockSupplementarySource};
