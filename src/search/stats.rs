use std::collections::BTreeMap;

use crate::models::{Card, Color, LibraryStats};

/// Card count, legendary-creature count and per-color tallies. Colors come
/// from the declared `colors` field; cards without one count as colorless.
pub fn library_stats(cards: &[Card]) -> LibraryStats {
    let mut color_counts: BTreeMap<char, usize> = Color::ALL
        .iter()
        .map(|c| (c.symbol(), 0))
        .chain(std::iter::once(('C', 0)))
        .collect();
    let mut commanders = 0;

    for card in cards {
        let type_line = card.type_line.as_deref().unwrap_or_default().to_lowercase();
        if type_line.contains("legendary") && type_line.contains("creature") {
            commanders += 1;
        }

        match card.colors {
            Some(colors) if !colors.is_colorless() => {
                for color in colors.iter() {
                    *color_counts.entry(color.symbol()).or_default() += 1;
                }
            }
            _ => *color_counts.entry('C').or_default() += 1,
        }
    }

    LibraryStats {
        total_cards: cards.len(),
        commanders,
        color_counts,
    }
}
