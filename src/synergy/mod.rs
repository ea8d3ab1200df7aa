//! Synergy collaborator
//!
//! Fetches per-commander recommendation pages by slug and keeps recent pages
//! in a small in-memory LRU cache with a time-to-live. A partner-pair lookup
//! that fails falls back to the first commander's own page, and the result
//! says which of the two happened.

pub mod page;
pub mod slug;

pub use page::{CardCategory, CommanderPage, SynergyCard};
pub use slug::{card_slug, commander_slug, pair_slug};

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::SynergyConfig;
use crate::errors::AppResult;
use crate::utils::{HttpFetch, fetch_json};

const SOURCE_TYPE: &str = "synergy";

/// Which page a lookup produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SynergyLookup {
    /// Data for the requested partner pair.
    Pair(Arc<CommanderPage>),
    /// Data for a single commander, as requested.
    Solo(Arc<CommanderPage>),
    /// The pair page could not be fetched; this is the first commander's page.
    SoloFallback {
        page: Arc<CommanderPage>,
        pair_slug: String,
        reason: String,
    },
    /// No page at all.
    Unavailable { reason: String },
}

impl SynergyLookup {
    pub fn page(&self) -> Option<&CommanderPage> {
        match self {
            SynergyLookup::Pair(page) | SynergyLookup::Solo(page) => Some(&**page),
            SynergyLookup::SoloFallback { page, .. } => Some(&**page),
            SynergyLookup::Unavailable { .. } => None,
        }
    }

    /// Partner names from the page, empty when there is none.
    pub fn partner_hints(&self) -> Vec<String> {
        self.page()
            .map(CommanderPage::partner_hints)
            .unwrap_or_default()
    }
}

#[derive(Debug)]
struct CachedPage {
    fetched_at: Instant,
    page: Arc<CommanderPage>,
}

/// Client for commander synergy pages.
#[derive(Debug)]
pub struct SynergyClient {
    http: Arc<dyn HttpFetch>,
    base_url: String,
    ttl: Duration,
    cache: Mutex<LruCache<String, CachedPage>>,
}

impl SynergyClient {
    pub fn new(http: Arc<dyn HttpFetch>, config: &SynergyConfig) -> Self {
        let capacity = NonZeroUsize::new(config.cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ttl: config.cache_ttl,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn page_url(&self, slug: &str) -> String {
        format!("{}/commanders/{}.json", self.base_url, slug)
    }

    async fn cached(&self, slug: &str) -> Option<Arc<CommanderPage>> {
        let mut cache = self.cache.lock().await;
        let fresh = cache
            .get(slug)
            .map(|entry| (entry.fetched_at.elapsed() < self.ttl, Arc::clone(&entry.page)));
        match fresh {
            Some((true, page)) => Some(page),
            Some((false, _)) => {
                cache.pop(slug);
                None
            }
            None => None,
        }
    }

    /// One page by slug, from cache when fresh.
    pub async fn fetch_page(&self, slug: &str) -> AppResult<Arc<CommanderPage>> {
        if let Some(page) = self.cached(slug).await {
            debug!("Synergy page from cache: {}", slug);
            return Ok(page);
        }

        let url = self.page_url(slug);
        debug!("Fetching synergy page: {}", url);
        let page: CommanderPage = fetch_json(self.http.as_ref(), &url, SOURCE_TYPE).await?;
        let page = Arc::new(page);
        info!(
            "Synergy page loaded for {}: {} card lists",
            slug,
            page.container.json_dict.cardlists.len()
        );

        self.cache.lock().await.put(
            slug.to_string(),
            CachedPage {
                fetched_at: Instant::now(),
                page: Arc::clone(&page),
            },
        );
        Ok(page)
    }

    /// Page for a commander, or for the pair when `partner` is given.
    pub async fn commander_page(&self, name: &str, partner: Option<&str>) -> SynergyLookup {
        let solo_slug = commander_slug(name);

        if let Some(partner) = partner {
            let pair = pair_slug(name, partner);
            match self.fetch_page(&pair).await {
                Ok(page) => return SynergyLookup::Pair(page),
                Err(e) => {
                    let reason = if e.is_not_found() {
                        "pair page not found".to_string()
                    } else {
                        e.to_string()
                    };
                    warn!(
                        "Partner pair synergy data unavailable for {} ({}), falling back to {}",
                        pair, reason, solo_slug
                    );
                    return match self.fetch_page(&solo_slug).await {
                        Ok(page) => SynergyLookup::SoloFallback {
                            page,
                            pair_slug: pair,
                            reason,
                        },
                        Err(e) => {
                            warn!("No synergy data for {}: {}", solo_slug, e);
                            SynergyLookup::Unavailable {
                                reason: e.to_string(),
                            }
                        }
                    };
                }
            }
        }

        match self.fetch_page(&solo_slug).await {
            Ok(page) => SynergyLookup::Solo(page),
            Err(e) => {
                warn!("No synergy data for {}: {}", solo_slug, e);
                SynergyLookup::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }
}
