//! Additive term scoring across card attributes.

use crate::models::{Card, ColorIdentity};
use crate::search::CardFilter;

const NAME_WEIGHT: u32 = 10;
const TEXT_WEIGHT: u32 = 5;
const TYPE_WEIGHT: u32 = 7;
const KEYWORD_WEIGHT: u32 = 8;
const COLOR_WEIGHT: u32 = 3;
const MANA_VALUE_WEIGHT: u32 = 5;

fn color_symbols(identity: ColorIdentity) -> String {
    identity
        .iter()
        .map(|c| c.symbol().to_ascii_lowercase())
        .collect()
}

/// Score of one card against already-lowercased terms.
pub fn score_card(card: &Card, terms: &[String]) -> u32 {
    let name = card.name.to_lowercase();
    let text = card.all_rules_text().to_lowercase();
    let type_line = card.type_line().to_lowercase();
    let colors = card.colors.map(color_symbols).unwrap_or_default();
    let identity = color_symbols(card.color_identity);
    let keywords: Vec<String> = card.keywords.iter().map(|k| k.to_lowercase()).collect();
    let mana_value = card.cmc.unwrap_or(0.0);

    terms
        .iter()
        .map(|term| {
            let mut score = 0;
            if name.contains(term.as_str()) {
                score += NAME_WEIGHT;
            }
            if text.contains(term.as_str()) {
                score += TEXT_WEIGHT;
            }
            if type_line.contains(term.as_str()) {
                score += TYPE_WEIGHT;
            }
            if keywords.iter().any(|k| k.contains(term.as_str())) {
                score += KEYWORD_WEIGHT;
            }
            if colors.contains(term.as_str()) || identity.contains(term.as_str()) {
                score += COLOR_WEIGHT;
            }
            if term.bytes().all(|b| b.is_ascii_digit())
                && term.parse::<u32>().is_ok_and(|n| f64::from(n) == mana_value)
            {
                score += MANA_VALUE_WEIGHT;
            }
            score
        })
        .sum()
}

/// Filtered cards with a positive score, best first; ties keep corpus order.
pub fn semantic_search<'a>(
    cards: &'a [Card],
    query: &str,
    limit: usize,
    filter: &CardFilter,
) -> Vec<&'a Card> {
    let terms: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if terms.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(u32, &Card)> = cards
        .iter()
        .filter(|card| filter.accepts(card))
        .filter_map(|card| {
            let score = score_card(card, &terms);
            (score > 0).then_some((score, card))
        })
        .collect();
    // stable: equal scores stay in corpus order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, card)| card).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Legality;
    use std::collections::BTreeMap;

    fn card(name: &str, type_line: &str, text: &str, keywords: &[&str], cmc: f64) -> Card {
        Card {
            name: name.to_string(),
            type_line: Some(type_line.to_string()),
            oracle_text: Some(text.to_string()),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            cmc: Some(cmc),
            legalities: BTreeMap::from([("commander".to_string(), Legality::Legal)]),
            ..Card::default()
        }
    }

    fn terms(query: &str) -> Vec<String> {
        query.split_whitespace().map(str::to_lowercase).collect()
    }

    #[test]
    fn test_weights() {
        let dragon = card("Shivan Dragon", "Creature — Dragon", "Flying", &["Flying"], 6.0);
        // name 10 + type 7
        assert_eq!(score_card(&dragon, &terms("dragon")), 17);
        // text 5 + keyword 8
        assert_eq!(score_card(&dragon, &terms("flying")), 13);
        // mana value
        assert_eq!(score_card(&dragon, &terms("6")), 5);
        assert_eq!(score_card(&dragon, &terms("7")), 0);
    }

    #[test]
    fn test_color_weight_uses_symbols() {
        let mut bolt = card("Lightning Bolt", "Instant", "Deal 3 damage.", &[], 1.0);
        bolt.colors = Some(ColorIdentity::parse("R"));
        bolt.color_identity = ColorIdentity::parse("R");
        assert_eq!(score_card(&bolt, &terms("r")), 3);

        let colorless = card("Sol Ring", "Land", "Add two.", &[], 1.0);
        assert_eq!(score_card(&colorless, &terms("c")), 0);
    }

    #[test]
    fn test_ranking_is_stable() {
        let cards = vec![
            card("Goblin Guide", "Creature — Goblin", "Haste", &["Haste"], 1.0),
            card("Dragon Whelp", "Creature — Dragon", "Flying", &["Flying"], 4.0),
            card("Goblin Lackey", "Creature — Goblin", "Put a Goblin onto the battlefield.", &[], 1.0),
            card("Island", "Basic Land — Island", "", &[], 0.0),
        ];
        let filter = CardFilter::commander();
        let hits = semantic_search(&cards, "goblin", 10, &filter);
        let names: Vec<&str> = hits.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Goblin Lackey", "Goblin Guide"]);

        let tied = semantic_search(&cards, "creature", 10, &filter);
        let names: Vec<&str> = tied.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Goblin Guide", "Dragon Whelp", "Goblin Lackey"]);

        assert!(semantic_search(&cards, "   ", 10, &filter).is_empty());
        assert_eq!(semantic_search(&cards, "creature", 1, &filter).len(), 1);
    }
}
