//! Partner-compatibility resolver
//!
//! [`classify`] is the single decision table mapping a commander's rules
//! text to one of the co-commander mechanics. [`compatible`] answers the
//! pairwise question and [`candidates`] enumerates eligible second
//! commanders from a corpus.

pub mod candidates;

pub use candidates::{
    PartnerCandidates, PartnerOptions, backgrounds, companions, friends_forever, partner_candidates,
    partners,
};

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::models::Card;

/// Shape of a partner ability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartnerVariant {
    /// "Partner with <name>"
    Named(String),
    /// "Partner—<label>"
    Scoped(String),
    /// Bare "Partner"
    Generic,
}

impl PartnerVariant {
    /// Pairing rule between two partner abilities. Mixed shapes never pair.
    pub fn pairs_with(&self, own_name: &str, other: &PartnerVariant, other_name: &str) -> bool {
        match (self, other) {
            (PartnerVariant::Named(wanted), PartnerVariant::Named(their_wanted)) => {
                references(wanted, other_name) && references(their_wanted, own_name)
            }
            (PartnerVariant::Scoped(label), PartnerVariant::Scoped(their_label)) => {
                label.to_lowercase() == their_label.to_lowercase()
            }
            (PartnerVariant::Generic, PartnerVariant::Generic) => true,
            _ => false,
        }
    }
}

fn references(named_partner: &str, name: &str) -> bool {
    let name = name.trim().to_lowercase();
    !name.is_empty() && named_partner.to_lowercase().contains(&name)
}

/// Co-commander mechanic of a card, in detection precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartnerMechanic {
    Background,
    Companion,
    FriendsForever,
    Partner(PartnerVariant),
}

impl fmt::Display for PartnerMechanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartnerMechanic::Background => write!(f, "Choose a Background"),
            PartnerMechanic::Companion => write!(f, "Companion"),
            PartnerMechanic::FriendsForever => write!(f, "Friends forever"),
            PartnerMechanic::Partner(PartnerVariant::Named(name)) => {
                write!(f, "Partner with {name}")
            }
            PartnerMechanic::Partner(PartnerVariant::Scoped(label)) => write!(f, "Partner—{label}"),
            PartnerMechanic::Partner(PartnerVariant::Generic) => write!(f, "Partner"),
        }
    }
}

fn partner_with_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)partner with ([^\n(]+)").expect("partner-with pattern is valid")
    })
}

fn scoped_partner_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)partner[—-]\s*([^\n(]+)").expect("scoped partner pattern is valid")
    })
}

fn generic_partner_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\bpartner(?:[\s(]|$)").expect("generic partner pattern is valid")
    })
}

/// Rules text consulted for mechanics: the card's own, else its first face's.
pub(crate) fn mechanic_text(card: &Card) -> &str {
    card.primary_face().oracle_text.unwrap_or_default()
}

/// Partner ability parsed from rules text, falling back to a bare
/// `Partner` keyword.
pub fn extract_partner_variant(card: &Card) -> Option<PartnerVariant> {
    let text = mechanic_text(card);
    if let Some(captures) = partner_with_regex().captures(text) {
        return Some(PartnerVariant::Named(captures[1].trim().to_string()));
    }
    if let Some(captures) = scoped_partner_regex().captures(text) {
        return Some(PartnerVariant::Scoped(captures[1].trim().to_string()));
    }
    if generic_partner_regex().is_match(text) || card.has_keyword("partner") {
        return Some(PartnerVariant::Generic);
    }
    None
}

pub(crate) fn has_background_marker(card: &Card) -> bool {
    mechanic_text(card).to_lowercase().contains("choose a background")
}

pub(crate) fn has_friends_marker(card: &Card) -> bool {
    card.keywords
        .iter()
        .any(|k| k.to_lowercase().contains("friends forever"))
        || mechanic_text(card).to_lowercase().contains("friends forever")
}

pub(crate) fn has_companion_marker(card: &Card) -> bool {
    let text = mechanic_text(card).to_lowercase();
    card.has_keyword("companion") || text.contains("companion —") || text.contains("companion—")
}

pub(crate) fn has_partner_marker(card: &Card) -> bool {
    card.keywords
        .iter()
        .any(|k| k.to_lowercase().contains("partner"))
        || mechanic_text(card).to_lowercase().contains("partner")
}

pub(crate) fn is_legendary_creature(card: &Card) -> bool {
    let type_line = card.type_line().to_lowercase();
    type_line.contains("legendary") && type_line.contains("creature")
}

pub(crate) fn is_background_card(card: &Card) -> bool {
    let type_line = card.type_line().to_lowercase();
    type_line.contains("legendary")
        && type_line.contains("enchantment")
        && type_line.contains("background")
}

/// First matching mechanic: Background, Companion, Friends forever, Partner.
pub fn classify(card: &Card) -> Option<PartnerMechanic> {
    if has_background_marker(card) {
        return Some(PartnerMechanic::Background);
    }
    if has_companion_marker(card) {
        return Some(PartnerMechanic::Companion);
    }
    if has_friends_marker(card) {
        return Some(PartnerMechanic::FriendsForever);
    }
    extract_partner_variant(card).map(PartnerMechanic::Partner)
}

pub(crate) fn same_card(a: &Card, b: &Card) -> bool {
    if !a.id.is_empty() && !b.id.is_empty() {
        return a.id == b.id;
    }
    a.name.eq_ignore_ascii_case(&b.name)
}

/// Whether `second` is an eligible co-commander for `primary` under the
/// mechanic `primary` carries.
fn leads(primary: &Card, second: &Card) -> bool {
    match classify(primary) {
        Some(PartnerMechanic::Background) => is_background_card(second),
        Some(PartnerMechanic::Companion) => has_companion_marker(second),
        Some(PartnerMechanic::FriendsForever) => {
            classify(second) == Some(PartnerMechanic::FriendsForever)
                && is_legendary_creature(primary)
                && is_legendary_creature(second)
        }
        Some(PartnerMechanic::Partner(variant)) => match classify(second) {
            Some(PartnerMechanic::Partner(other)) => {
                variant.pairs_with(&primary.name, &other, &second.name)
            }
            _ => false,
        },
        None => false,
    }
}

/// Symmetric pairing test. A card never pairs with itself.
pub fn compatible(a: &Card, b: &Card) -> bool {
    if same_card(a, b) {
        return false;
    }
    leads(a, b) || leads(b, a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn card(name: &str, type_line: &str, text: &str) -> Card {
        Card {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            type_line: Some(type_line.to_string()),
            oracle_text: Some(text.to_string()),
            ..Card::default()
        }
    }

    fn creature(name: &str, text: &str) -> Card {
        card(name, "Legendary Creature — Human", text)
    }

    #[rstest]
    #[case("Choose a Background (You can have a Background as a second commander.)", Some(PartnerMechanic::Background))]
    #[case("Companion — Each permanent card in your starting deck has mana value 2 or less.", Some(PartnerMechanic::Companion))]
    #[case("Friends forever (You can have two commanders if both have friends forever.)", Some(PartnerMechanic::FriendsForever))]
    #[case("Partner with Toothy, Imaginary Friend (When this creature enters, target player may put Toothy into their hand.)", Some(PartnerMechanic::Partner(PartnerVariant::Named("Toothy, Imaginary Friend".to_string()))))]
    #[case("Partner—Survivors (You can have two commanders if both have this ability.)", Some(PartnerMechanic::Partner(PartnerVariant::Scoped("Survivors".to_string()))))]
    #[case("Partner-Father & son", Some(PartnerMechanic::Partner(PartnerVariant::Scoped("Father & son".to_string()))))]
    #[case("Partner (You can have two commanders if both have partner.)", Some(PartnerMechanic::Partner(PartnerVariant::Generic)))]
    #[case("Flying\nPartner", Some(PartnerMechanic::Partner(PartnerVariant::Generic)))]
    #[case("Doctor's companion (You can have two commanders if the other is the Doctor.)", None)]
    #[case("Flying", None)]
    fn test_classify(#[case] text: &str, #[case] expected: Option<PartnerMechanic>) {
        assert_eq!(classify(&creature("Someone", text)), expected);
    }

    #[test]
    fn test_classify_precedence() {
        let both = creature("Overlap", "Choose a Background\nPartner");
        assert_eq!(classify(&both), Some(PartnerMechanic::Background));
    }

    #[test]
    fn test_variant_from_first_face() {
        let mut mdfc = Card {
            name: "Front // Back".to_string(),
            ..Card::default()
        };
        mdfc.card_faces = vec![crate::models::CardFace {
            name: "Front".to_string(),
            oracle_text: Some("Partner—Heroes".to_string()),
            ..Default::default()
        }];
        assert_eq!(
            extract_partner_variant(&mdfc),
            Some(PartnerVariant::Scoped("Heroes".to_string()))
        );
    }

    #[test]
    fn test_heroes_scenario() {
        let first = creature("First Hero", "Partner—Heroes");
        let second = creature("Second Hero", "Partner—heroes");
        let plain = creature("Plain Partner", "Partner");

        assert!(compatible(&first, &second));
        assert!(!compatible(&first, &plain));
        assert!(!compatible(&second, &plain));
        assert!(!compatible(&plain, &first));
    }

    #[test]
    fn test_named_partners_must_reference_each_other() {
        let pir = creature("Pir, Imaginative Rascal", "Partner with Toothy, Imaginary Friend");
        let toothy = creature("Toothy, Imaginary Friend", "Partner with Pir, Imaginative Rascal");
        let stranger = creature("Stranger", "Partner with Pir, Imaginative Rascal");

        assert!(compatible(&pir, &toothy));
        assert!(!compatible(&pir, &stranger));
        assert!(!compatible(&toothy, &stranger));
    }

    #[test]
    fn test_background_and_companion_pairs() {
        let commander = creature("Wilson, Refined Grizzly", "Choose a Background");
        let background = card("Raised by Giants", "Legendary Enchantment — Background", "Commander creatures you own have base power and toughness 10/10.");
        let lurrus = creature("Lurrus of the Dream-Den", "Companion — Each permanent card in your starting deck has mana value 2 or less.");
        let kaheera = creature("Kaheera, the Orphanguard", "Companion — Each creature card in your starting deck is a Cat, Elemental, Nightmare, Dinosaur, or Beast card.");

        assert!(compatible(&commander, &background));
        assert!(compatible(&background, &commander));
        assert!(!compatible(&commander, &lurrus));
        assert!(compatible(&lurrus, &kaheera));
    }

    #[test]
    fn test_friends_forever_needs_legendary_creatures() {
        let will = creature("Will the Wise", "Friends forever");
        let lucas = creature("Lucas the Sharpshooter", "Friends forever");
        let enchantment = card("Friendly Aura", "Legendary Enchantment", "Friends forever");
        assert!(compatible(&will, &lucas));
        assert!(!compatible(&will, &enchantment));
    }

    #[test]
    fn test_never_pairs_with_itself() {
        let tymna = creature("Tymna the Weaver", "Partner");
        assert!(!compatible(&tymna, &tymna.clone()));
    }

    const TEXTS: &[&str] = &[
        "Partner",
        "Partner—Heroes",
        "Partner—Survivors",
        "Partner with Alpha",
        "Partner with Beta",
        "Choose a Background",
        "Companion — Restriction.",
        "Friends forever",
        "Flying",
    ];
    const TYPES: &[&str] = &[
        "Legendary Creature — Human",
        "Legendary Enchantment — Background",
        "Creature — Elf",
    ];

    fn card_strategy() -> impl Strategy<Value = Card> {
        (
            prop::sample::select(vec!["Alpha", "Beta", "Gamma"]),
            prop::sample::select(TYPES.to_vec()),
            prop::sample::select(TEXTS.to_vec()),
        )
            .prop_map(|(name, type_line, text)| {
                let mut card = card(name, type_line, text);
                card.id = format!("{name}-{type_line}-{text}");
                card
            })
    }

    proptest! {
        #[test]
        fn prop_compatibility_is_symmetric(a in card_strategy(), b in card_strategy()) {
            prop_assert_eq!(compatible(&a, &b), compatible(&b, &a));
        }
    }
}
