//! `<prefix><timestamp>.<extension>` file names.

/// Naming scheme for snapshot files keyed by a millisecond timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampedName {
    prefix: String,
    extension: String,
}

impl TimestampedName {
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn format(&self, timestamp_ms: i64) -> String {
        format!("{}{}.{}", self.prefix, timestamp_ms, self.extension)
    }

    /// Returns the embedded timestamp, or `None` for names outside the scheme.
    pub fn parse(&self, file_name: &str) -> Option<i64> {
        let rest = file_name.strip_prefix(self.prefix.as_str())?;
        let digits = rest.strip_suffix(self.extension.as_str())?.strip_suffix('.')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Picks the names belonging to the scheme, newest first.
    pub fn newest_first<'a, I>(&self, names: I) -> Vec<(i64, String)>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut matched: Vec<(i64, String)> = names
            .into_iter()
            .filter_map(|name| self.parse(name).map(|ts| (ts, name.clone())))
            .collect();
        matched.sort_by(|a, b| b.0.cmp(&a.0));
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_and_parse() {
        let naming = TimestampedName::new("cardlibrary_", "json");
        assert_eq!(naming.format(1_700_000_000_000), "cardlibrary_1700000000000.json");
        assert_eq!(naming.parse("cardlibrary_1700000000000.json"), Some(1_700_000_000_000));
    }

    #[test]
    fn test_parse_rejects_foreign_names() {
        let naming = TimestampedName::new("cardlibrary_", ".json");
        assert_eq!(naming.parse("cardlibrary_.json"), None);
        assert_eq!(naming.parse("cardlibrary_12a.json"), None);
        assert_eq!(naming.parse("cardlibrary_12.txt"), None);
        assert_eq!(naming.parse("other_12.json"), None);
        assert_eq!(naming.parse("cardlibrary_12json"), None);
    }

    #[test]
    fn test_newest_first_ignores_foreign_files() {
        let naming = TimestampedName::new("cardlibrary_", "json");
        let names = vec![
            "cardlibrary_10.json".to_string(),
            "notes.txt".to_string(),
            "cardlibrary_30.json".to_string(),
            "cardlibrary_20.json".to_string(),
        ];
        let ordered: Vec<i64> = naming.newest_first(&names).into_iter().map(|(ts, _)| ts).collect();
        assert_eq!(ordered, vec![30, 20, 10]);
    }
}
