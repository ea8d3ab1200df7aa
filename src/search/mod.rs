//! Search & filter engine
//!
//! Index-free scans over a loaded corpus. Every operation is a pure function
//! of the card slice; [`crate::library::CardLibrary`] supplies the slice once
//! loading has finished.
//!
//! - [`lexical_search`]: substring match, corpus order
//! - [`semantic_search`]: weighted term scoring, best first
//! - [`search_commanders`]: broad match narrowed to commander candidates
//! - [`library_stats`]: aggregate counts

pub mod color_identity;
pub mod commanders;
pub mod legality;
pub mod lexical;
pub mod semantic;
pub mod stats;

pub use color_identity::{effective_identity, is_color_compatible, text_inferred_colors};
pub use commanders::{CommanderSignals, is_commander_candidate, is_legendary, search_commanders};
pub use legality::{is_commander_legal, is_digital_only};
pub use lexical::lexical_search;
pub use semantic::semantic_search;
pub use stats::library_stats;

use crate::config::defaults::DEFAULT_FORMAT;
use crate::models::{Card, ColorIdentity};

/// Legality plus optional color-identity restriction shared by the searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFilter {
    format: String,
    identity: Option<ColorIdentity>,
}

impl CardFilter {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            identity: None,
        }
    }

    /// Commander format, no color restriction.
    pub fn commander() -> Self {
        Self::new(DEFAULT_FORMAT)
    }

    #[must_use]
    pub fn with_identity(mut self, identity: Option<ColorIdentity>) -> Self {
        self.identity = identity;
        self
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn accepts(&self, card: &Card) -> bool {
        is_commander_legal(card, &self.format) && is_color_compatible(card, self.identity)
    }
}
