//! Commander search: broad text match, then eligibility.

use crate::models::Card;
use crate::search::legality::is_commander_legal;
use crate::search::lexical::NormalizedQuery;

/// Why a legendary card can lead a deck. Any one signal is enough.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommanderSignals {
    pub power_toughness: bool,
    pub loyalty: bool,
    pub partner: bool,
    pub partner_with: bool,
    pub choose_background: bool,
    pub friends_forever: bool,
    pub doctors_companion: bool,
    pub can_be_commander: bool,
}

impl CommanderSignals {
    pub fn detect(card: &Card) -> Self {
        let text = card.all_rules_text().to_lowercase();
        let face = card.primary_face();
        let keyword = |pred: &dyn Fn(&str) -> bool| {
            card.keywords.iter().any(|k| pred(&k.to_lowercase()))
        };

        Self {
            power_toughness: face.power.is_some() && face.toughness.is_some(),
            loyalty: face.loyalty.is_some(),
            partner: keyword(&|k| k == "partner")
                || (text.contains("partner") && !text.contains("partner with")),
            partner_with: keyword(&|k| k.contains("partner with")) || text.contains("partner with"),
            choose_background: text.contains("choose a background"),
            friends_forever: keyword(&|k| k.contains("friends forever"))
                || text.contains("friends forever"),
            doctors_companion: text.contains("doctor's companion") || text.contains("the doctor"),
            can_be_commander: text.contains("can be your commander"),
        }
    }

    pub fn any(&self) -> bool {
        self.power_toughness
            || self.loyalty
            || self.partner
            || self.partner_with
            || self.choose_background
            || self.friends_forever
            || self.doctors_companion
            || self.can_be_commander
    }
}

pub fn is_legendary(card: &Card) -> bool {
    card.type_line().to_lowercase().contains("legendary")
}

/// Legal, legendary, and showing at least one commander signal.
pub fn is_commander_candidate(card: &Card, format: &str) -> bool {
    is_commander_legal(card, format) && is_legendary(card) && CommanderSignals::detect(card).any()
}

fn matches_query(card: &Card, query: &NormalizedQuery) -> bool {
    query.matches_name(&card.name)
        || card.face_names().into_iter().any(|n| query.matches_name(n))
        || query.matches_text(&card.all_rules_text())
}

/// Name, face-name or rules-text matches over the whole corpus, narrowed to
/// commander candidates, in corpus order.
pub fn search_commanders<'a>(
    cards: &'a [Card],
    query: &str,
    limit: usize,
    format: &str,
) -> Vec<&'a Card> {
    let query = NormalizedQuery::new(query);
    cards
        .iter()
        .filter(|card| matches_query(card, &query))
        .filter(|card| {
            let eligible = is_commander_candidate(card, format);
            if !eligible {
                tracing::trace!("Filtered out non-commander match: {}", card.name);
            }
            eligible
        })
        .take(limit)
        .collect()
}
