//! Card records in the Scryfall card JSON shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::color::ColorIdentity;

/// Format legality status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Legality {
    Legal,
    NotLegal,
    Restricted,
    Banned,
    Other(String),
}

impl From<String> for Legality {
    fn from(value: String) -> Self {
        match value.as_str() {
            "legal" => Legality::Legal,
            "not_legal" => Legality::NotLegal,
            "restricted" => Legality::Restricted,
            "banned" => Legality::Banned,
            _ => Legality::Other(value),
        }
    }
}

impl From<Legality> for String {
    fn from(value: Legality) -> Self {
        match value {
            Legality::Legal => "legal".to_string(),
            Legality::NotLegal => "not_legal".to_string(),
            Legality::Restricted => "restricted".to_string(),
            Legality::Banned => "banned".to_string(),
            Legality::Other(other) => other,
        }
    }
}

/// One face of a multi-faced card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardFace {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana_cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toughness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana_cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmc: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorIdentity>,
    #[serde(default)]
    pub color_identity: ColorIdentity,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toughness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub card_faces: Vec<CardFace>,
    #[serde(default)]
    pub legalities: BTreeMap<String, Legality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_type: Option<String>,
    #[serde(default)]
    pub digital: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edhrec_rank: Option<u32>,
    #[serde(default)]
    pub game_changer: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub prices: BTreeMap<String, Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<BTreeMap<String, String>>,
}

/// The fields a consumer reads as "the card", resolved across the
/// single-face and multi-face shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceView<'a> {
    pub name: &'a str,
    pub type_line: Option<&'a str>,
    pub oracle_text: Option<&'a str>,
    pub mana_cost: Option<&'a str>,
    pub power: Option<&'a str>,
    pub toughness: Option<&'a str>,
    pub loyalty: Option<&'a str>,
}

impl Card {
    /// Top-level fields, each falling back to the first face.
    pub fn primary_face(&self) -> FaceView<'_> {
        let first = self.card_faces.first();
        FaceView {
            name: &self.name,
            type_line: pick(&self.type_line, first, |f| &f.type_line),
            oracle_text: pick(&self.oracle_text, first, |f| &f.oracle_text),
            mana_cost: pick(&self.mana_cost, first, |f| &f.mana_cost),
            power: pick(&self.power, first, |f| &f.power),
            toughness: pick(&self.toughness, first, |f| &f.toughness),
            loyalty: pick(&self.loyalty, first, |f| &f.loyalty),
        }
    }

    /// Type line of the card, or of its first face.
    pub fn type_line(&self) -> &str {
        self.primary_face().type_line.unwrap_or_default()
    }

    /// Top-level rules text followed by every face's rules text.
    pub fn all_rules_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(1 + self.card_faces.len());
        if let Some(text) = self.oracle_text.as_deref() {
            parts.push(text);
        }
        parts.extend(
            self.card_faces
                .iter()
                .filter_map(|face| face.oracle_text.as_deref()),
        );
        parts.join("\n")
    }

    /// Name before any ` // ` separator.
    pub fn front_face_name(&self) -> &str {
        front_face_name(&self.name)
    }

    pub fn face_names(&self) -> Vec<&str> {
        self.card_faces.iter().map(|face| face.name.as_str()).collect()
    }

    /// Status for a format; absent entries read as `None`.
    pub fn legality(&self, format: &str) -> Option<&Legality> {
        self.legalities.get(format)
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword))
    }
}

fn pick<'a>(
    top: &'a Option<String>,
    first: Option<&'a CardFace>,
    field: fn(&CardFace) -> &Option<String>,
) -> Option<&'a str> {
    top.as_deref()
        .or_else(|| first.and_then(|face| field(face).as_deref()))
}

/// Text before the first ` // ` in a card name.
pub fn front_face_name(name: &str) -> &str {
    name.split(" // ").next().unwrap_or(name).trim()
}
