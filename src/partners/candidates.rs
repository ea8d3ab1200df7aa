//! Enumerating eligible second commanders for a primary commander.

use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::config::defaults::{DEFAULT_FORMAT, DEFAULT_PARTNER_SCAN_LIMIT};
use crate::models::{Card, find_by_name};
use crate::partners::{
    PartnerMechanic, PartnerVariant, classify, extract_partner_variant, has_background_marker,
    has_companion_marker, has_friends_marker, has_partner_marker, is_background_card,
    is_legendary_creature, same_card,
};
use crate::search::is_commander_legal;

/// Knobs for [`partner_candidates`].
#[derive(Debug, Clone)]
pub struct PartnerOptions {
    pub format: String,
    /// Restrict backgrounds to the commander's color identity.
    pub match_colors: bool,
    /// Historically paired partner names, tried before the corpus scan.
    pub hints: Vec<String>,
    pub scan_limit: usize,
}

impl Default for PartnerOptions {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            match_colors: false,
            hints: Vec::new(),
            scan_limit: DEFAULT_PARTNER_SCAN_LIMIT,
        }
    }
}

/// The commander's mechanic and the cards eligible under it.
#[derive(Debug, Clone, PartialEq)]
pub struct PartnerCandidates<'a> {
    pub mechanic: Option<PartnerMechanic>,
    pub cards: Vec<&'a Card>,
}

fn by_name(a: &Card, b: &Card) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

fn color_key(card: &Card) -> String {
    card.color_identity.iter().map(|c| c.symbol()).collect()
}

/// Legal backgrounds, colorless first, then by color string, then by name.
pub fn backgrounds<'a>(
    cards: &'a [Card],
    commander: &Card,
    match_colors: bool,
    format: &str,
) -> Vec<&'a Card> {
    let mut found: Vec<&Card> = cards
        .iter()
        .filter(|card| is_background_card(card) && is_commander_legal(card, format))
        .filter(|card| {
            !match_colors || card.color_identity.is_subset_of(commander.color_identity)
        })
        .collect();
    found.sort_by(|a, b| {
        b.color_identity
            .is_colorless()
            .cmp(&a.color_identity.is_colorless())
            .then_with(|| color_key(a).cmp(&color_key(b)))
            .then_with(|| by_name(a, b))
    });
    found
}

/// Legal cards carrying a companion ability, by name.
pub fn companions<'a>(cards: &'a [Card], commander: &Card, format: &str) -> Vec<&'a Card> {
    let mut found: Vec<&Card> = cards
        .iter()
        .filter(|card| !same_card(card, commander))
        .filter(|card| has_companion_marker(card) && is_commander_legal(card, format))
        .collect();
    found.sort_by(|a, b| by_name(a, b));
    found
}

/// Other legal legendary creatures with friends forever, by name.
pub fn friends_forever<'a>(cards: &'a [Card], commander: &Card, format: &str) -> Vec<&'a Card> {
    let mut found: Vec<&Card> = cards
        .iter()
        .filter(|card| !same_card(card, commander))
        .filter(|card| {
            is_legendary_creature(card) && has_friends_marker(card) && is_commander_legal(card, format)
        })
        .collect();
    found.sort_by(|a, b| by_name(a, b));
    found
}

fn partner_pairs(commander: &Card, variant: &PartnerVariant, card: &Card) -> bool {
    !same_card(card, commander)
        && extract_partner_variant(card)
            .is_some_and(|other| variant.pairs_with(&commander.name, &other, &card.name))
}

/// Compatible partners. Hint names resolve first, in hint order; only when
/// none resolve is the corpus scanned for legendary creatures with a partner
/// ability, sorted by name. Both paths stop at `limit`.
pub fn partners<'a>(
    cards: &'a [Card],
    commander: &Card,
    hints: &[String],
    format: &str,
    limit: usize,
) -> Vec<&'a Card> {
    let Some(variant) = extract_partner_variant(commander) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let hinted: Vec<&Card> = hints
        .iter()
        .filter_map(|name| {
            let found = find_by_name(cards, name);
            if found.is_none() {
                debug!("Partner hint not in corpus: {}", name);
            }
            found
        })
        .filter(|card| partner_pairs(commander, &variant, card))
        .filter(|card| seen.insert(card.name.to_lowercase()))
        .take(limit)
        .collect();
    if !hinted.is_empty() {
        info!("Resolved {} partners from hints for {}", hinted.len(), commander.name);
        return hinted;
    }

    let mut scanned: Vec<&Card> = cards
        .iter()
        .filter(|card| is_legendary_creature(card) && has_partner_marker(card))
        .filter(|card| !has_background_marker(card) && !has_friends_marker(card))
        .filter(|card| is_commander_legal(card, format))
        .filter(|card| partner_pairs(commander, &variant, card))
        .collect();
    scanned.sort_by(|a, b| by_name(a, b));
    scanned.truncate(limit);
    debug!("Corpus scan found {} partners for {}", scanned.len(), commander.name);
    scanned
}

/// Classify `commander` and enumerate candidates for its mechanic.
pub fn partner_candidates<'a>(
    cards: &'a [Card],
    commander: &Card,
    options: &PartnerOptions,
) -> PartnerCandidates<'a> {
    let mechanic = classify(commander);
    let format = options.format.as_str();
    let cards = match &mechanic {
        Some(PartnerMechanic::Background) => {
            backgrounds(cards, commander, options.match_colors, format)
        }
        Some(PartnerMechanic::Companion) => companions(cards, commander, format),
        Some(PartnerMechanic::FriendsForever) => friends_forever(cards, commander, format),
        Some(PartnerMechanic::Partner(_)) => {
            partners(cards, commander, &options.hints, format, options.scan_limit)
        }
        None => Vec::new(),
    };
    PartnerCandidates { mechanic, cards }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColorIdentity, Legality};
    use std::collections::BTreeMap;

    fn card(name: &str, type_line: &str, text: &str, identity: &str) -> Card {
        Card {
            id: name.to_lowercase(),
            name: name.to_string(),
            type_line: Some(type_line.to_string()),
            oracle_text: Some(text.to_string()),
            color_identity: ColorIdentity::parse(identity),
            legalities: BTreeMap::from([("commander".to_string(), Legality::Legal)]),
            set: Some("cmr".to_string()),
            ..Card::default()
        }
    }

    fn legend(name: &str, text: &str) -> Card {
        card(name, "Legendary Creature — Human", text, "W")
    }

    fn background(name: &str, identity: &str) -> Card {
        card(name, "Legendary Enchantment — Background", "", identity)
    }

    fn names(cards: &[&Card]) -> Vec<String> {
        cards.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_backgrounds_sorted_and_filtered() {
        let commander = card("Wilson", "Legendary Creature — Bear", "Choose a Background", "G");
        let cards = vec![
            background("Raised by Giants", "G"),
            background("Cultist of the Absolute", "B"),
            background("Acolyte of Bahamut", ""),
            background("Agent of the Iron Throne", "B"),
            Card {
                legalities: BTreeMap::from([("commander".to_string(), Legality::Banned)]),
                ..background("Banned Upbringing", "G")
            },
        ];

        let all = backgrounds(&cards, &commander, false, "commander");
        assert_eq!(
            names(&all),
            vec!["Acolyte of Bahamut", "Agent of the Iron Throne", "Cultist of the Absolute", "Raised by Giants"]
        );

        let narrowed = backgrounds(&cards, &commander, true, "commander");
        assert_eq!(names(&narrowed), vec!["Acolyte of Bahamut", "Raised by Giants"]);
    }

    #[test]
    fn test_partner_scan() {
        let commander = legend("Tymna the Weaver", "Partner");
        let cards = vec![
            commander.clone(),
            legend("Thrasios, Triton Hero", "Partner (You can have two commanders if both have partner.)"),
            legend("Akiri, Line-Slinger", "First strike\nPartner"),
            legend("Heroic Lead", "Partner—Heroes"),
            card("Not Legendary", "Creature — Elf", "Partner", "G"),
            legend("Background Lover", "Choose a Background\nPartner"),
        ];

        let found = partners(&cards, &commander, &[], "commander", 50);
        assert_eq!(names(&found), vec!["Akiri, Line-Slinger", "Thrasios, Triton Hero"]);

        let capped = partners(&cards, &commander, &[], "commander", 1);
        assert_eq!(names(&capped), vec!["Akiri, Line-Slinger"]);
    }

    #[test]
    fn test_partner_hints_take_precedence() {
        let commander = legend("Tymna the Weaver", "Partner");
        let cards = vec![
            legend("Akiri, Line-Slinger", "Partner"),
            legend("Thrasios, Triton Hero", "Partner"),
            legend("Heroic Lead", "Partner—Heroes"),
        ];
        let hints = vec![
            "thrasios, triton hero".to_string(),
            "Heroic Lead".to_string(),
            "Missing Card".to_string(),
            "Thrasios, Triton Hero".to_string(),
        ];

        let found = partners(&cards, &commander, &hints, "commander", 50);
        assert_eq!(names(&found), vec!["Thrasios, Triton Hero"]);

        let unresolved = vec!["Heroic Lead".to_string()];
        let found = partners(&cards, &commander, &unresolved, "commander", 50);
        assert_eq!(names(&found), vec!["Akiri, Line-Slinger", "Thrasios, Triton Hero"]);
    }

    #[test]
    fn test_partner_candidates_dispatch() {
        let will = legend("Will the Wise", "Friends forever");
        let lurrus = legend("Lurrus of the Dream-Den", "Companion — Each permanent card in your starting deck has mana value 2 or less.");
        let cards = vec![
            will.clone(),
            legend("Lucas the Sharpshooter", "Friends forever"),
            lurrus.clone(),
            legend("Jegantha, the Wellspring", "Companion — No card in your starting deck has more than one of the same mana symbol in its mana cost."),
            background("Raised by Giants", "G"),
        ];

        let friends = partner_candidates(&cards, &will, &PartnerOptions::default());
        assert_eq!(friends.mechanic, Some(PartnerMechanic::FriendsForever));
        assert_eq!(names(&friends.cards), vec!["Lucas the Sharpshooter"]);

        let companions = partner_candidates(&cards, &lurrus, &PartnerOptions::default());
        assert_eq!(companions.mechanic, Some(PartnerMechanic::Companion));
        assert_eq!(names(&companions.cards), vec!["Jegantha, the Wellspring"]);

        let plain = legend("Plain Legend", "Vigilance");
        let none = partner_candidates(&cards, &plain, &PartnerOptions::default());
        assert_eq!(none.mechanic, None);
        assert!(none.cards.is_empty());
    }
}
