//! Effective color identity and the deck-compatibility predicate.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{Card, Color, ColorIdentity};

fn land_word_regex() -> &'static Regex {
    static LAND_WORDS: OnceLock<Regex> = OnceLock::new();
    LAND_WORDS.get_or_init(|| {
        Regex::new(r"(?i)\b(forest|island|mountain|swamp|plains|wastes)\b")
            .expect("land word pattern is valid")
    })
}

/// Colors implied by whole-word basic land type references. `wastes`
/// matches but contributes no color.
pub fn text_inferred_colors(text: &str) -> ColorIdentity {
    land_word_regex()
        .find_iter(text)
        .filter_map(|m| {
            let word = m.as_str().to_ascii_lowercase();
            Color::ALL
                .into_iter()
                .find(|color| color.basic_land_type() == word)
        })
        .collect()
}

/// Declared identity unioned with colors inferred from rules text.
pub fn effective_identity(card: &Card) -> ColorIdentity {
    card.color_identity
        .union(text_inferred_colors(&card.all_rules_text()))
}

/// True when the card fits a deck of the given identity. `None` means no
/// restriction; colorless cards fit everywhere.
pub fn is_color_compatible(card: &Card, reference: Option<ColorIdentity>) -> bool {
    let Some(reference) = reference else {
        return true;
    };
    effective_identity(card).is_subset_of(reference)
}
