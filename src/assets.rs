use rust_embed::RustEmbed;

/// Bundled reference datasets
#[derive(RustEmbed)]
#[folder = "assets/reference/"]
#[prefix = "reference/"]
pub struct ReferenceAssets;

impl ReferenceAssets {
    /// Path of the commander dataset merged into every load
    pub const COMMANDERS: &'static str = "reference/commanders.json";

    /// Get a reference asset by path
    pub fn get_asset(path: &str) -> Option<rust_embed::EmbeddedFile> {
        Self::get(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commander_dataset_is_embedded() {
        let file = ReferenceAssets::get_asset(ReferenceAssets::COMMANDERS).unwrap();
        assert!(!file.data.is_empty());
    }
}
