//! Substring search over names and rules text.

use crate::models::Card;
use crate::search::CardFilter;

/// Lowercased query plus its whitespace-free form.
#[derive(Debug, Clone)]
pub(crate) struct NormalizedQuery {
    pub lower: String,
    pub compact: String,
}

impl NormalizedQuery {
    pub fn new(query: &str) -> Self {
        let lower = query.trim().to_lowercase();
        let compact = strip_whitespace(&lower);
        Self { lower, compact }
    }

    /// Case-insensitive match on a name, with or without its spaces.
    pub fn matches_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        name.contains(&self.lower) || strip_whitespace(&name).contains(&self.compact)
    }

    pub fn matches_text(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.lower)
    }
}

pub(crate) fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Filtered cards whose name (spaced or not) or rules text contains the
/// query, in corpus order.
pub fn lexical_search<'a>(
    cards: &'a [Card],
    query: &str,
    limit: usize,
    filter: &CardFilter,
) -> Vec<&'a Card> {
    let query = NormalizedQuery::new(query);
    cards
        .iter()
        .filter(|card| filter.accepts(card))
        .filter(|card| query.matches_name(&card.name) || query.matches_text(&card.all_rules_text()))
        .take(limit)
        .collect()
}
