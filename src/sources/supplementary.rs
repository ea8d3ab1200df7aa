//! Bundled commander dataset used to backfill the remote corpus.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::assets::ReferenceAssets;
use crate::errors::{AppResult, SourceError};
use crate::models::Card;
use crate::sources::SupplementarySource;

const SOURCE_TYPE: &str = "supplementary";

/// Reads the embedded dataset, or a file that replaces it.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCommanders {
    path_override: Option<PathBuf>,
}

impl ReferenceCommanders {
    pub fn embedded() -> Self {
        Self::default()
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path_override: Some(path.into()),
        }
    }

    pub fn new(path_override: Option<PathBuf>) -> Self {
        Self { path_override }
    }

    async fn read_bytes(&self) -> AppResult<Vec<u8>> {
        match &self.path_override {
            Some(path) => {
                debug!("Reading supplementary dataset from {}", path.display());
                Ok(tokio::fs::read(path).await?)
            }
            None => ReferenceAssets::get_asset(ReferenceAssets::COMMANDERS)
                .map(|file| file.data.into_owned())
                .ok_or_else(|| {
                    SourceError::parse_error(SOURCE_TYPE, "embedded dataset missing").into()
                }),
        }
    }
}

#[async_trait]
impl SupplementarySource for ReferenceCommanders {
    async fn load_cards(&self) -> AppResult<Vec<Card>> {
        let bytes = self.read_bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| SourceError::parse_error(SOURCE_TYPE, e.to_string()))?;
        if !value.is_array() {
            return Err(
                SourceError::parse_error(SOURCE_TYPE, "Invalid reference format - expected array")
                    .into(),
            );
        }
        let cards: Vec<Card> = serde_json::from_value(value)
            .map_err(|e| SourceError::parse_error(SOURCE_TYPE, e.to_string()))?;
        info!("Loaded {} commanders from reference dataset", cards.len());
        Ok(cards)
    }
}
