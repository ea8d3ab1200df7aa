//! Card source trait definitions
//!
//! The loader only sees these two seams: the remote corpus and the bundled
//! supplementary dataset. Both are mockable in tests.

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::models::Card;

/// The primary corpus (remote bulk data)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardSource: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Download and parse the full card list
    async fn fetch_cards(&self) -> AppResult<Vec<Card>>;
}

/// The supplementary dataset merged into every load
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SupplementarySource: Send + Sync {
    /// Card-shaped records; failures are non-fatal to the caller
    async fn load_cards(&self) -> AppResult<Vec<Card>>;
}
