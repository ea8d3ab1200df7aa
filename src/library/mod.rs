//! Corpus loader
//!
//! [`CardLibrary`] owns the load state machine
//! (`Idle -> Loading -> Loaded | Failed`) for one corpus. A load runs at most
//! once: concurrent callers share the in-flight attempt and later callers get
//! the settled result. `Failed` is left only through [`CardLibrary::reload`].
//!
//! Loading tries the cache store first, then the remote source, and always
//! merges the supplementary dataset. On a cache miss the merged corpus is
//! persisted in the background after it has been published.

pub mod merge;

pub use merge::merge_cards;

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use host_storage::HostStorage;

use crate::cache::CardLibraryCache;
use crate::config::{Config, SearchConfig};
use crate::errors::{AppError, AppResult};
use crate::models::{CacheInfo, Card, ColorIdentity, Corpus, LibraryStats};
use crate::partners::{PartnerMechanic, PartnerOptions, partner_candidates};
use crate::search::{self, CardFilter};
use crate::sources::{CardSource, ReferenceCommanders, ScryfallSource, SupplementarySource};
use crate::utils::StandardHttpClient;

/// Outcome of a corpus load, shared by every caller that awaited it.
pub type LoadResult = Result<Arc<Corpus>, Arc<AppError>>;

/// Where the loader is in its lifecycle.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded(Arc<Corpus>),
    Failed(Arc<AppError>),
}

impl LoadState {
    pub fn is_settled(&self) -> bool {
        matches!(self, LoadState::Loaded(_) | LoadState::Failed(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            LoadState::Idle => "idle",
            LoadState::Loading => "loading",
            LoadState::Loaded(_) => "loaded",
            LoadState::Failed(_) => "failed",
        }
    }
}

type LoadedCallback = Arc<dyn Fn(&Arc<Corpus>) + Send + Sync>;

/// Run one subscriber; a panicking subscriber is logged and skipped.
fn notify(callback: &LoadedCallback, corpus: &Arc<Corpus>) {
    if panic::catch_unwind(AssertUnwindSafe(|| callback(corpus))).is_err() {
        error!("Card library load subscriber panicked");
    }
}

struct Inner {
    primary: Arc<dyn CardSource>,
    supplementary: Arc<dyn SupplementarySource>,
    cache: Arc<CardLibraryCache>,
    search: SearchConfig,
    state: watch::Sender<LoadState>,
    subscribers: Mutex<Vec<(u64, LoadedCallback)>>,
    next_subscriber: AtomicU64,
    pending_persist: Mutex<Option<JoinHandle<()>>>,
}

/// Handle returned by [`CardLibrary::on_loaded`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    library: Weak<Inner>,
}

impl Subscription {
    /// Stop receiving load notifications.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.library.upgrade() {
            inner
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
        }
    }
}

/// The card library service: load state, live corpus and the queries over it.
///
/// Cheap to clone; clones share one state machine.
#[derive(Clone)]
pub struct CardLibrary {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for CardLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardLibrary")
            .field("source", &self.inner.primary.name())
            .field("state", &self.inner.state.borrow().name())
            .finish()
    }
}

impl CardLibrary {
    pub fn new(
        primary: Arc<dyn CardSource>,
        supplementary: Arc<dyn SupplementarySource>,
        cache: CardLibraryCache,
        search: SearchConfig,
    ) -> Self {
        let (state, _) = watch::channel(LoadState::Idle);
        Self {
            inner: Arc::new(Inner {
                primary,
                supplementary,
                cache: Arc::new(cache),
                search,
                state,
                subscribers: Mutex::new(Vec::new()),
                next_subscriber: AtomicU64::new(1),
                pending_persist: Mutex::new(None),
            }),
        }
    }

    /// Wire the Scryfall source, the bundled dataset and the cache store from
    /// configuration. `storage` is `None` when the host has no data directory.
    pub fn from_config(config: &Config, storage: Option<Arc<dyn HostStorage>>) -> AppResult<Self> {
        let http = Arc::new(StandardHttpClient::new(
            &config.sources.user_agent,
            config.sources.connect_timeout,
        )?);
        let primary = Arc::new(ScryfallSource::new(http, &config.sources));
        let supplementary = Arc::new(ReferenceCommanders::new(
            config.sources.supplementary_path.clone(),
        ));
        let cache = CardLibraryCache::new(storage, &config.storage);
        Ok(Self::new(primary, supplementary, cache, config.search.clone()))
    }

    /// Load the corpus, or join the load already in flight, or return the
    /// settled result of an earlier load.
    pub async fn load_library(&self) -> LoadResult {
        let mut state = self.inner.state.subscribe();
        let started = self.inner.state.send_if_modified(|state| {
            if matches!(state, LoadState::Idle) {
                *state = LoadState::Loading;
                true
            } else {
                false
            }
        });
        if started {
            Inner::spawn_load(&self.inner);
        }

        let settled = state
            .wait_for(LoadState::is_settled)
            .await
            .map_err(|_| Arc::new(AppError::internal("Card library dropped during load")))?
            .clone();
        match settled {
            LoadState::Loaded(corpus) => Ok(corpus),
            LoadState::Failed(e) => Err(e),
            LoadState::Idle | LoadState::Loading => {
                Err(Arc::new(AppError::internal("Card library load did not settle")))
            }
        }
    }

    /// Resolves once a corpus is published, including one published before
    /// this call. Keeps waiting through a failed load until a reload succeeds.
    pub async fn wait_until_loaded(&self) -> AppResult<Arc<Corpus>> {
        let mut state = self.inner.state.subscribe();
        let loaded = state
            .wait_for(|state| matches!(state, LoadState::Loaded(_)))
            .await
            .map_err(|_| AppError::internal("Card library dropped before loading"))?
            .clone();
        match loaded {
            LoadState::Loaded(corpus) => Ok(corpus),
            _ => Err(AppError::internal("Card library load did not settle")),
        }
    }

    /// Drop the newest cache entry and load again from scratch. Waits for a
    /// load in flight to settle first.
    pub async fn reload(&self) -> LoadResult {
        let mut state = self.inner.state.subscribe();
        let _ = state
            .wait_for(|state| !matches!(state, LoadState::Loading))
            .await;
        self.flush().await;
        self.inner.cache.clear().await;

        let reset = self.inner.state.send_if_modified(|state| {
            if state.is_settled() {
                *state = LoadState::Idle;
                true
            } else {
                false
            }
        });
        if reset {
            info!("Card library reset for reload");
        }
        self.load_library().await
    }

    /// Call `callback` with the corpus each time a load publishes one. If a
    /// corpus is already loaded the callback runs immediately.
    pub fn on_loaded<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Arc<Corpus>) + Send + Sync + 'static,
    {
        let callback: LoadedCallback = Arc::new(callback);
        let id = self.inner.next_subscriber.fetch_add(1, Ordering::Relaxed);
        let current = {
            let mut subscribers = self
                .inner
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            subscribers.push((id, Arc::clone(&callback)));
            self.corpus()
        };
        if let Some(corpus) = current {
            notify(&callback, &corpus);
        }
        Subscription {
            id,
            library: Arc::downgrade(&self.inner),
        }
    }

    /// Wait for a background cache write to finish.
    pub async fn flush(&self) {
        let pending = self
            .inner
            .pending_persist
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = pending
            && let Err(e) = handle.await
        {
            warn!("Cache persist task failed: {}", e);
        }
    }

    pub fn state(&self) -> LoadState {
        self.inner.state.borrow().clone()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.inner.state.borrow(), LoadState::Loaded(_))
    }

    /// The live corpus, if loaded.
    pub fn corpus(&self) -> Option<Arc<Corpus>> {
        match &*self.inner.state.borrow() {
            LoadState::Loaded(corpus) => Some(Arc::clone(corpus)),
            _ => None,
        }
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.inner.search
    }

    fn filter(&self, identity: Option<ColorIdentity>) -> CardFilter {
        CardFilter::new(self.inner.search.format.clone()).with_identity(identity)
    }

    /// Substring search; empty until loaded.
    pub fn lexical_search(
        &self,
        query: &str,
        limit: usize,
        identity: Option<ColorIdentity>,
    ) -> Vec<Card> {
        let Some(corpus) = self.corpus() else {
            return Vec::new();
        };
        search::lexical_search(corpus.cards(), query, limit, &self.filter(identity))
            .into_iter()
            .cloned()
            .collect()
    }

    /// Weighted term search; empty until loaded.
    pub fn semantic_search(
        &self,
        query: &str,
        limit: usize,
        identity: Option<ColorIdentity>,
    ) -> Vec<Card> {
        let Some(corpus) = self.corpus() else {
            return Vec::new();
        };
        search::semantic_search(corpus.cards(), query, limit, &self.filter(identity))
            .into_iter()
            .cloned()
            .collect()
    }

    /// Commander candidates matching the query; empty until loaded.
    pub fn search_commanders(&self, query: &str, limit: usize) -> Vec<Card> {
        let Some(corpus) = self.corpus() else {
            return Vec::new();
        };
        search::search_commanders(corpus.cards(), query, limit, &self.inner.search.format)
            .into_iter()
            .cloned()
            .collect()
    }

    /// `None` until loaded.
    pub fn stats(&self) -> Option<LibraryStats> {
        self.corpus()
            .map(|corpus| search::library_stats(corpus.cards()))
    }

    pub fn find_card(&self, name: &str) -> Option<Card> {
        self.corpus()
            .and_then(|corpus| corpus.find_by_name(name).cloned())
    }

    /// Mechanic of `commander` and its eligible co-commanders; no mechanic
    /// and no cards until loaded.
    pub fn partner_candidates(
        &self,
        commander: &Card,
        options: &PartnerOptions,
    ) -> (Option<PartnerMechanic>, Vec<Card>) {
        let Some(corpus) = self.corpus() else {
            return (None, Vec::new());
        };
        let found = partner_candidates(corpus.cards(), commander, options);
        (found.mechanic, found.cards.into_iter().cloned().collect())
    }

    /// Partner options seeded from the search configuration.
    pub fn partner_options(&self) -> PartnerOptions {
        PartnerOptions {
            format: self.inner.search.format.clone(),
            scan_limit: self.inner.search.partner_scan_limit,
            ..PartnerOptions::default()
        }
    }

    /// Remove the newest cache entry; the live corpus is untouched.
    pub async fn clear_cache(&self) {
        self.inner.cache.clear().await;
    }

    /// Remove every cache entry; the live corpus is untouched.
    pub async fn clear_all_cache(&self) {
        self.inner.cache.clear_all().await;
    }

    pub async fn cache_info(&self) -> Option<CacheInfo> {
        self.inner.cache.info().await
    }
}

impl Inner {
    /// Run the load on its own task so it completes even if every caller
    /// stops waiting. A panicking load settles as `Failed`.
    fn spawn_load(inner: &Arc<Inner>) {
        let inner = Arc::clone(inner);
        tokio::spawn(async move {
            let worker = tokio::spawn({
                let inner = Arc::clone(&inner);
                async move { inner.run_load().await }
            });
            if let Err(e) = worker.await {
                error!("Card library load task aborted: {}", e);
                let failed = LoadState::Failed(Arc::new(AppError::internal(format!(
                    "Card library load task aborted: {e}"
                ))));
                // a published corpus stays published
                inner.state.send_if_modified(|state| {
                    if matches!(state, LoadState::Loaded(_)) {
                        false
                    } else {
                        *state = failed;
                        true
                    }
                });
            }
        });
    }

    async fn run_load(self: Arc<Self>) {
        let started = Instant::now();
        match self.assemble().await {
            Ok((corpus, from_cache)) => {
                let corpus = Arc::new(corpus);
                if !from_cache {
                    self.persist_in_background(Arc::clone(&corpus));
                }
                info!(
                    "Card library loaded: {} cards ({}) in {:?}",
                    corpus.len(),
                    if from_cache { "cache" } else { self.primary.name() },
                    started.elapsed()
                );
                self.publish(corpus);
            }
            Err(e) => {
                error!("Failed to load card library: {}", e);
                self.state.send_replace(LoadState::Failed(Arc::new(e)));
            }
        }
    }

    /// Cached or remote cards merged with the supplementary dataset.
    async fn assemble(&self) -> AppResult<(Corpus, bool)> {
        let (primary, from_cache) = match self.cache.get().await {
            Some(cards) if !cards.is_empty() => (cards, true),
            _ => {
                info!("Fetching card library from {}", self.primary.name());
                (self.primary.fetch_cards().await?, false)
            }
        };

        let supplementary = match self.supplementary.load_cards().await {
            Ok(cards) => cards,
            Err(e) => {
                warn!("Could not load supplementary commanders: {}", e);
                Vec::new()
            }
        };
        debug!(
            "Merging {} primary cards with {} supplementary cards",
            primary.len(),
            supplementary.len()
        );

        Ok((Corpus::new(merge_cards(primary, supplementary)), from_cache))
    }

    fn persist_in_background(&self, corpus: Arc<Corpus>) {
        let cache = Arc::clone(&self.cache);
        let handle = tokio::spawn(async move {
            cache.set(corpus.cards()).await;
        });
        let previous = self
            .pending_persist
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if previous.is_some() {
            debug!("Superseded an unfinished cache write");
        }
    }

    /// Flip to `Loaded` and notify the subscribers registered so far.
    /// Subscribers registering concurrently see the new state and replay.
    fn publish(&self, corpus: Arc<Corpus>) {
        let callbacks: Vec<LoadedCallback> = {
            let subscribers = self
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            self.state.send_replace(LoadState::Loaded(Arc::clone(&corpus)));
            subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for callback in callbacks {
            notify(&callback, &corpus);
        }
    }
}
