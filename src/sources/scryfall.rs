//! Scryfall bulk-data corpus source
//!
//! Two requests: the `/bulk-data` index, then the selected variant's
//! `download_uri`, which must be a JSON array of card records.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::SourcesConfig;
use crate::errors::{AppResult, SourceError};
use crate::models::{BulkDataDescriptor, BulkDataList, Card};
use crate::sources::CardSource;
use crate::utils::{HttpFetch, fetch_json};

const SOURCE_TYPE: &str = "scryfall";

#[derive(Debug, Clone)]
pub struct ScryfallSource {
    http: Arc<dyn HttpFetch>,
    api_base: String,
    bulk_data_type: String,
}

impl ScryfallSource {
    pub fn new(http: Arc<dyn HttpFetch>, config: &SourcesConfig) -> Self {
        Self {
            http,
            api_base: config.scryfall_api.trim_end_matches('/').to_string(),
            bulk_data_type: config.bulk_data_type.clone(),
        }
    }

    /// Finds the configured dataset variant in the bulk-data index.
    pub async fn resolve_descriptor(&self) -> AppResult<BulkDataDescriptor> {
        let url = format!("{}/bulk-data", self.api_base);
        debug!("Fetching bulk data index from {}", url);
        let list: BulkDataList = fetch_json(self.http.as_ref(), &url, SOURCE_TYPE).await?;

        let descriptor = list.find(&self.bulk_data_type).cloned().ok_or_else(|| {
            SourceError::DatasetNotFound {
                dataset: dataset_label(&self.bulk_data_type),
            }
        })?;

        info!(
            "Found bulk data '{}' (updated: {})",
            descriptor.name,
            descriptor.updated_at.as_deref().unwrap_or("unknown")
        );
        Ok(descriptor)
    }
}

/// `oracle_cards` -> `Oracle cards`
fn dataset_label(kind: &str) -> String {
    let spaced = kind.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

/// Parses a bulk download, insisting on a top-level JSON array.
pub fn parse_card_array(bytes: &[u8]) -> AppResult<Vec<Card>> {
    let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
    if first != Some(&b'[') {
        return Err(SourceError::parse_error(
            SOURCE_TYPE,
            "Invalid card data format - expected array",
        )
        .into());
    }
    serde_json::from_slice(bytes).map_err(|e| {
        SourceError::parse_error(SOURCE_TYPE, format!("Failed to parse card data: {e}")).into()
    })
}

#[async_trait]
impl CardSource for ScryfallSource {
    fn name(&self) -> &'static str {
        SOURCE_TYPE
    }

    async fn fetch_cards(&self) -> AppResult<Vec<Card>> {
        let descriptor = self.resolve_descriptor().await?;
        info!("Downloading card data from: {}", descriptor.download_uri);

        let bytes = self.http.fetch_bytes(&descriptor.download_uri).await?;
        debug!("Parsing {} bytes of card data", bytes.len());
        let cards = parse_card_array(&bytes)?;

        info!("Downloaded {} cards from {}", cards.len(), SOURCE_TYPE);
        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::utils::http_client::testing::FakeHttp;
    use serde_json::json;

    const INDEX: &str = "https://api.scryfall.com/bulk-data";
    const DOWNLOAD: &str = "https://data.scryfall.io/oracle-cards/oracle.json";

    fn index() -> serde_json::Value {
        json!({
            "object": "list",
            "data": [
                { "type": "default_cards", "name": "Default Cards", "download_uri": "https://data.scryfall.io/default.json" },
                { "type": "oracle_cards", "name": "Oracle Cards", "download_uri": DOWNLOAD, "updated_at": "2026-10-18T09:00:00+00:00" }
            ]
        })
    }

    fn source(http: FakeHttp) -> ScryfallSource {
        ScryfallSource::new(Arc::new(http), &SourcesConfig::default())
    }

    #[tokio::test]
    async fn test_fetch_cards_via_oracle_descriptor() {
        let http = FakeHttp::new()
            .with_json(INDEX, index())
            .with_json(DOWNLOAD, json!([{ "name": "Sol Ring" }, { "name": "Island" }]));

        let cards = source(http).fetch_cards().await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].name, "Island");
    }

    #[tokio::test]
    async fn test_missing_oracle_variant() {
        let http = FakeHttp::new().with_json(INDEX, json!({ "data": [] }));
        let err = source(http).fetch_cards().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Source(SourceError::DatasetNotFound { ref dataset }) if dataset == "Oracle cards"
        ));
    }

    #[tokio::test]
    async fn test_non_array_payload_is_format_error() {
        let http = FakeHttp::new()
            .with_json(INDEX, index())
            .with_json(DOWNLOAD, json!({ "object": "error" }));
        let err = source(http).fetch_cards().await.unwrap_err();
        assert!(matches!(err, AppError::Source(SourceError::ParseError { .. })));
    }

    #[tokio::test]
    async fn test_http_failure_propagates() {
        let http = FakeHttp::new().with_json(INDEX, index()).with_status(DOWNLOAD, 503);
        let err = source(http).fetch_cards().await.unwrap_err();
        assert!(matches!(err, AppError::Source(SourceError::Http { status: 503, .. })));
    }

    #[test]
    fn test_parse_card_array_accepts_leading_whitespace() {
        assert_eq!(parse_card_array(b"  \n[]").unwrap().len(), 0);
        assert!(parse_card_array(b"").is_err());
    }
}
