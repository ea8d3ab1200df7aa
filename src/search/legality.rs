//! Commander-format legality, including digital-only exclusion.

use crate::models::{Card, Legality};

/// Set codes of digital-only products.
const DIGITAL_SET_CODES: &[&str] = &[
    "alchemy", "arena", "arenasup", "yneo", "ydmu", "ysnc", "yone", "ymid", "yafr", "ykhm",
    "yznr", "yeld", "yikr", "yiko", "ythb", "ylci", "ymkm", "yotj",
];

const DIGITAL_SET_TYPE: &str = "alchemy";

/// Heuristic: digital rebalanced sets use four-letter codes starting with `y`.
/// This is a naming convention, not an authoritative flag, and a paper set
/// coded that way would be misclassified.
fn matches_digital_set_convention(set_code: &str) -> bool {
    set_code.len() == 4 && set_code.starts_with('y')
}

/// Digital-only by explicit flag, set type, known set code or set-code convention.
pub fn is_digital_only(card: &Card) -> bool {
    if card.digital {
        return true;
    }
    if card
        .set_type
        .as_deref()
        .is_some_and(|t| t.eq_ignore_ascii_case(DIGITAL_SET_TYPE))
    {
        return true;
    }
    let set_code = card.set.as_deref().unwrap_or_default().to_ascii_lowercase();
    DIGITAL_SET_CODES.contains(&set_code.as_str()) || matches_digital_set_convention(&set_code)
}

/// Legality entry for `format` is exactly `legal` and the card is not digital-only.
pub fn is_commander_legal(card: &Card, format: &str) -> bool {
    matches!(card.legality(format), Some(Legality::Legal)) && !is_digital_only(card)
}
