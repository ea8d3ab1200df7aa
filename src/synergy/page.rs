//! The subset of a commander synergy page the library reads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommanderPage {
    #[serde(default)]
    pub container: PageContainer,
    #[serde(default)]
    pub panels: PagePanels,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContainer {
    #[serde(default)]
    pub json_dict: JsonDict,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonDict {
    #[serde(default)]
    pub cardlists: Vec<CardList>,
}

/// One category of recommended cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardList {
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub cardviews: Vec<CardView>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synergy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclusion: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_decks: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_decks: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagePanels {
    #[serde(default)]
    pub tribelinks: TribeLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TribeLinks {
    #[serde(default)]
    pub partnercounts: Vec<PartnerCount>,
}

/// A historically paired partner. Either field may carry the name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartnerCount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// A recommended card with the category it was listed under.
#[derive(Debug, Clone, PartialEq)]
pub struct SynergyCard {
    pub name: String,
    pub synergy: f64,
    pub inclusion: Option<u64>,
    pub num_decks: Option<u64>,
    pub category: String,
}

/// A category a given card appears in, with its numbers there.
#[derive(Debug, Clone, PartialEq)]
pub struct CardCategory {
    pub category: String,
    pub synergy: Option<f64>,
    pub inclusion: Option<u64>,
    pub num_decks: Option<u64>,
    pub potential_decks: Option<u64>,
}

impl CommanderPage {
    fn cardlists(&self) -> &[CardList] {
        &self.container.json_dict.cardlists
    }

    /// Names of historically paired partners, in page order.
    pub fn partner_hints(&self) -> Vec<String> {
        self.panels
            .tribelinks
            .partnercounts
            .iter()
            .filter_map(|p| {
                p.value
                    .as_deref()
                    .filter(|v| !v.trim().is_empty())
                    .or(p.alt.as_deref())
            })
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Every listed card with a synergy score of at least `min_synergy`,
    /// highest first; equal scores keep page order.
    pub fn synergy_cards(&self, min_synergy: f64, limit: Option<usize>) -> Vec<SynergyCard> {
        let mut cards: Vec<SynergyCard> = self
            .cardlists()
            .iter()
            .flat_map(|list| {
                list.cardviews.iter().filter_map(|view| {
                    let synergy = view.synergy.filter(|s| *s >= min_synergy)?;
                    Some(SynergyCard {
                        name: view.name.clone(),
                        synergy,
                        inclusion: view.inclusion,
                        num_decks: view.num_decks,
                        category: list.header.clone(),
                    })
                })
            })
            .collect();
        cards.sort_by(|a, b| b.synergy.total_cmp(&a.synergy));
        if let Some(limit) = limit {
            cards.truncate(limit);
        }
        cards
    }

    /// Categories listing `card_name` (case-insensitive).
    pub fn card_categories(&self, card_name: &str) -> Vec<CardCategory> {
        let wanted = card_name.trim().to_lowercase();
        self.cardlists()
            .iter()
            .filter_map(|list| {
                let view = list
                    .cardviews
                    .iter()
                    .find(|view| view.name.trim().to_lowercase() == wanted)?;
                Some(CardCategory {
                    category: list.header.clone(),
                    synergy: view.synergy,
                    inclusion: view.inclusion,
                    num_decks: view.num_decks,
                    potential_decks: view.potential_decks,
                })
            })
            .collect()
    }
}
