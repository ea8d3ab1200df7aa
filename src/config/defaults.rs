/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Application identity
pub const APP_NAME: &str = "commander-library";
pub const DEFAULT_CONFIG_FILE: &str = "commander-library.toml";

// Storage defaults
pub const DEFAULT_CACHE_DIR_NAME: &str = "card-library-cache";
pub const DEFAULT_CACHE_FILE_PREFIX: &str = "cardlibrary_";
pub const DEFAULT_CACHE_FRESHNESS: &str = "24h";
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 3;
pub const DEFAULT_CACHE_ENABLED: bool = true;
pub const CACHE_FORMAT_VERSION: &str = "1.0";

// Remote source defaults
pub const DEFAULT_SCRYFALL_API: &str = "https://api.scryfall.com";
pub const DEFAULT_BULK_DATA_TYPE: &str = "oracle_cards";
pub const DEFAULT_USER_AGENT: &str = "MTGCommanderBuilder/1.0";
pub const DEFAULT_CONNECT_TIMEOUT: &str = "10s";

// Synergy collaborator defaults
pub const DEFAULT_SYNERGY_BASE_URL: &str = "https://json.edhrec.com/pages";
pub const DEFAULT_SYNERGY_CACHE_TTL: &str = "1h";
pub const DEFAULT_SYNERGY_CACHE_CAPACITY: usize = 64;

// Search defaults
pub const DEFAULT_SEARCH_LIMIT: usize = 100;
pub const DEFAULT_PARTNER_SCAN_LIMIT: usize = 50;
pub const DEFAULT_FORMAT: &str = "commander";
