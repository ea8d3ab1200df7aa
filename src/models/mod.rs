//! Data model shared by the loader, the cache store and the search engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod card;
pub mod color;

pub use card::{Card, CardFace, FaceView, Legality, front_face_name};
pub use color::{Color, ColorIdentity};

/// Case-insensitive lookup on the full name, then on the front-face name.
pub fn find_by_name<'a>(cards: &'a [Card], name: &str) -> Option<&'a Card> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    cards
        .iter()
        .find(|card| card.name.to_lowercase() == wanted)
        .or_else(|| {
            cards
                .iter()
                .find(|card| card.front_face_name().to_lowercase() == wanted)
        })
}

/// The full in-memory card dataset for one load.
///
/// Never mutated after it is published; readers share it behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    cards: Vec<Card>,
}

impl Corpus {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    /// Case-insensitive lookup on the full name, then on the front-face name.
    pub fn find_by_name(&self, name: &str) -> Option<&Card> {
        find_by_name(&self.cards, name)
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

/// One dataset variant listed by the bulk-data index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkDataDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    pub download_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressed_size: Option<u64>,
}

/// The bulk-data index response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkDataList {
    #[serde(default)]
    pub data: Vec<BulkDataDescriptor>,
}

impl BulkDataList {
    pub fn find(&self, kind: &str) -> Option<&BulkDataDescriptor> {
        self.data.iter().find(|d| d.kind == kind)
    }
}

/// Aggregate counts over a loaded corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryStats {
    pub total_cards: usize,
    /// Cards typed both legendary and creature
    pub commanders: usize,
    /// Per color symbol (`W`..`G`) plus `C` for cards without a declared color
    pub color_counts: BTreeMap<char, usize>,
}

/// Snapshot of the newest cache entry, read without touching the live corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheInfo {
    pub exists: bool,
    pub age_ms: i64,
    pub card_count: usize,
    pub file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Card {
        Card {
            name: name.to_string(),
            ..Card::default()
        }
    }

    #[test]
    fn test_find_by_name() {
        let corpus = Corpus::new(vec![
            named("Sol Ring"),
            named("Bala Ged Recovery // Bala Ged Sanctuary"),
        ]);
        assert_eq!(corpus.find_by_name("sol ring").map(|c| c.name.as_str()), Some("Sol Ring"));
        assert!(corpus.find_by_name("Bala Ged Recovery").is_some());
        assert!(corpus.find_by_name("Bala Ged Recovery // Bala Ged Sanctuary").is_some());
        assert!(corpus.find_by_name("").is_none());
        assert!(corpus.find_by_name("Mana Crypt").is_none());
    }

    #[test]
    fn test_bulk_data_index() {
        let list: BulkDataList = serde_json::from_str(
            r#"{"object":"list","data":[
                {"type":"default_cards","name":"Default Cards","download_uri":"https://x/default.json"},
                {"type":"oracle_cards","name":"Oracle Cards","download_uri":"https://x/oracle.json","compressed_size":1}
            ]}"#,
        )
        .unwrap();
        let oracle = list.find("oracle_cards").unwrap();
        assert_eq!(oracle.download_uri, "https://x/oracle.json");
        assert!(list.find("rulings").is_none());
    }
}
