//! Colors and color identities over the five-color alphabet.

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    W,
    U,
    B,
    R,
    G,
}

impl Color {
    pub const ALL: [Color; 5] = [Color::W, Color::U, Color::B, Color::R, Color::G];

    pub fn symbol(self) -> char {
        match self {
            Color::W => 'W',
            Color::U => 'U',
            Color::B => 'B',
            Color::R => 'R',
            Color::G => 'G',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'W' => Some(Color::W),
            'U' => Some(Color::U),
            'B' => Some(Color::B),
            'R' => Some(Color::R),
            'G' => Some(Color::G),
            _ => None,
        }
    }

    /// Basic land type that produces this color.
    pub fn basic_land_type(self) -> &'static str {
        match self {
            Color::W => "plains",
            Color::U => "island",
            Color::B => "swamp",
            Color::R => "mountain",
            Color::G => "forest",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A set of colors. The empty set is colorless.
///
/// Serialized as a list of color symbols in WUBRG order; symbols outside the
/// alphabet (such as `"C"`) are ignored on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ColorIdentity(u8);

impl ColorIdentity {
    pub const COLORLESS: ColorIdentity = ColorIdentity(0);

    /// Parses symbols such as `"WUG"`; unknown characters are skipped.
    pub fn parse(symbols: &str) -> Self {
        symbols.chars().filter_map(Color::from_symbol).collect()
    }

    pub fn contains(self, color: Color) -> bool {
        self.0 & color.bit() != 0
    }

    pub fn insert(&mut self, color: Color) {
        self.0 |= color.bit();
    }

    pub fn union(self, other: ColorIdentity) -> ColorIdentity {
        ColorIdentity(self.0 | other.0)
    }

    pub fn is_subset_of(self, other: ColorIdentity) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn is_colorless(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.is_colorless()
    }

    pub fn iter(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Color> for ColorIdentity {
    fn from_iter<T: IntoIterator<Item = Color>>(iter: T) -> Self {
        let mut identity = ColorIdentity::COLORLESS;
        for color in iter {
            identity.insert(color);
        }
        identity
    }
}

impl fmt::Display for ColorIdentity {
    /// Symbols in WUBRG order, `C` for colorless.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_colorless() {
            return write!(f, "C");
        }
        for color in self.iter() {
            write!(f, "{color}")?;
        }
        Ok(())
    }
}

impl Serialize for ColorIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for color in self.iter() {
            seq.serialize_element(&color)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for ColorIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdentityVisitor;

        impl<'de> Visitor<'de> for IdentityVisitor {
            type Value = ColorIdentity;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a list of color symbols or a string such as \"WUG\"")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(ColorIdentity::parse(value))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut identity = ColorIdentity::COLORLESS;
                while let Some(symbol) = seq.next_element::<String>()? {
                    identity = identity.union(ColorIdentity::parse(&symbol));
                }
                Ok(identity)
            }
        }

        deserializer.deserialize_any(IdentityVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!(ColorIdentity::parse("gwu").to_string(), "WUG");
        assert_eq!(ColorIdentity::parse("").to_string(), "C");
        assert_eq!(ColorIdentity::parse("CX").len(), 0);
    }

    #[test]
    fn test_subset() {
        let rg = ColorIdentity::parse("RG");
        assert!(rg.is_subset_of(ColorIdentity::parse("RGU")));
        assert!(!rg.is_subset_of(ColorIdentity::parse("R")));
        assert!(ColorIdentity::COLORLESS.is_subset_of(ColorIdentity::COLORLESS));
    }

    #[test]
    fn test_json_shapes() {
        let from_list: ColorIdentity = serde_json::from_str(r#"["G","W","C"]"#).unwrap();
        assert_eq!(from_list, ColorIdentity::parse("WG"));
        assert_eq!(serde_json::to_string(&from_list).unwrap(), r#"["W","G"]"#);
    }
}
