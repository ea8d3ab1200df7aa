use std::collections::HashSet;
use tracing::info;

use crate::models::Card;

/// Primary cards (deduplicated by case-insensitive name, first wins) followed
/// by supplementary cards whose names are not already present.
pub fn merge_cards(primary: Vec<Card>, supplementary: Vec<Card>) -> Vec<Card> {
    let mut seen: HashSet<String> = HashSet::with_capacity(primary.len() + supplementary.len());
    let mut merged = Vec::with_capacity(primary.len() + supplementary.len());

    for card in primary {
        if seen.insert(card.name.to_lowercase()) {
            merged.push(card);
        }
    }

    let mut added = 0usize;
    for card in supplementary {
        if seen.insert(card.name.to_lowercase()) {
            merged.push(card);
            added += 1;
        }
    }

    if added > 0 {
        info!("Added {} new commanders from reference dataset", added);
    }
    merged
}
