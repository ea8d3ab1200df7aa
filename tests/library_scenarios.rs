//! End-to-end loader, cache and partner scenarios against real host storage.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use commander_library::cache::CardLibraryCache;
use commander_library::config::{SearchConfig, StorageConfig};
use commander_library::errors::{AppResult, SourceError};
use commander_library::library::{CardLibrary, LoadState};
use commander_library::models::{Card, Legality};
use commander_library::partners::compatible;
use commander_library::sources::{CardSource, SupplementarySource};
use commander_library::utils::time::now_millis;
use host_storage::{HostStorage, SandboxedStorage};

const CACHE_DIR: &str = "card-library-cache";

#[derive(Debug)]
struct StubSource {
    cards: Vec<Card>,
    delay: Duration,
    fetches: AtomicUsize,
    fail: bool,
}

impl StubSource {
    fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            delay: Duration::ZERO,
            fetches: AtomicUsize::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }
}

#[async_trait]
impl CardSource for StubSource {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn fetch_cards(&self) -> AppResult<Vec<Card>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(SourceError::unreachable("https://api.scryfall.com/bulk-data", "offline").into());
        }
        Ok(self.cards.clone())
    }
}

struct StubSupplementary(Vec<Card>);

#[async_trait]
impl SupplementarySource for StubSupplementary {
    async fn load_cards(&self) -> AppResult<Vec<Card>> {
        Ok(self.0.clone())
    }
}

fn card(name: &str) -> Card {
    Card {
        id: name.to_lowercase(),
        name: name.to_string(),
        ..Card::default()
    }
}

fn legend(name: &str, text: &str) -> Card {
    Card {
        type_line: Some("Legendary Creature — Human".to_string()),
        oracle_text: Some(text.to_string()),
        legalities: BTreeMap::from([("commander".to_string(), Legality::Legal)]),
        ..card(name)
    }
}

async fn storage_in(dir: &tempfile::TempDir) -> Arc<dyn HostStorage> {
    Arc::new(
        SandboxedStorage::builder()
            .base_directory(dir.path())
            .build()
            .await
            .unwrap(),
    )
}

fn library_with(
    primary: Arc<StubSource>,
    supplementary: Vec<Card>,
    storage: Option<Arc<dyn HostStorage>>,
) -> CardLibrary {
    CardLibrary::new(
        primary,
        Arc::new(StubSupplementary(supplementary)),
        CardLibraryCache::new(storage, &StorageConfig::default()),
        SearchConfig::default(),
    )
}

#[tokio::test]
async fn test_primary_entry_wins_merge() {
    let island = Card {
        type_line: Some("Basic Land — Island".to_string()),
        ..card("Island")
    };
    let supplementary_island = Card {
        oracle_text: Some("({T}: Add {U}.)".to_string()),
        ..card("Island")
    };
    let library = library_with(
        Arc::new(StubSource::new(vec![island.clone()])),
        vec![supplementary_island, card("New One")],
        None,
    );

    let corpus = library.load_library().await.unwrap();
    assert_eq!(corpus.len(), 2);
    assert_eq!(corpus.find_by_name("Island"), Some(&island));
    assert!(corpus.find_by_name("New One").is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_loads_share_one_fetch() {
    let source = Arc::new(StubSource {
        delay: Duration::from_millis(50),
        ..StubSource::new(vec![card("Sol Ring")])
    });
    let library = library_with(Arc::clone(&source), Vec::new(), None);

    let other = library.clone();
    let background = tokio::spawn(async move { other.load_library().await });
    let first = library.load_library().await.unwrap();
    let second = background.await.unwrap().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_stale_cache_entry_is_ignored_and_removed() {
    let temp_dir = tempfile::tempdir().unwrap();
    let storage = storage_in(&temp_dir).await;
    storage.ensure_dir(CACHE_DIR).await.unwrap();

    let stale = now_millis() - 25 * 60 * 60 * 1000;
    let stale_file = format!("cardlibrary_{stale}.json");
    let body = serde_json::json!({
        "cards": [{"name": "Stale Card"}],
        "timestamp": stale,
        "version": "1.0"
    });
    storage
        .write(&format!("{CACHE_DIR}/{stale_file}"), body.to_string().as_bytes())
        .await
        .unwrap();

    let cache = CardLibraryCache::new(Some(Arc::clone(&storage)), &StorageConfig::default());
    assert!(cache.get().await.is_none());
    assert!(!storage.exists(&format!("{CACHE_DIR}/{stale_file}")).await.unwrap());
}

#[tokio::test]
async fn test_stale_cache_falls_through_to_remote_and_is_replaced() {
    let temp_dir = tempfile::tempdir().unwrap();
    let storage = storage_in(&temp_dir).await;
    storage.ensure_dir(CACHE_DIR).await.unwrap();

    let stale = now_millis() - 25 * 60 * 60 * 1000;
    let body = serde_json::json!({ "cards": [{"name": "Stale Card"}], "timestamp": stale, "version": "1.0" });
    storage
        .write(&format!("{CACHE_DIR}/cardlibrary_{stale}.json"), body.to_string().as_bytes())
        .await
        .unwrap();

    let source = Arc::new(StubSource::new(vec![card("Fresh Card")]));
    let library = library_with(Arc::clone(&source), Vec::new(), Some(Arc::clone(&storage)));
    let corpus = library.load_library().await.unwrap();
    library.flush().await;

    assert!(corpus.find_by_name("Fresh Card").is_some());
    assert!(corpus.find_by_name("Stale Card").is_none());
    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);

    let files = storage.list_files(CACHE_DIR).await.unwrap();
    assert_eq!(files.len(), 1);
    assert_ne!(files[0], format!("cardlibrary_{stale}.json"));
}

#[tokio::test]
async fn test_failed_load_leaves_searches_empty() {
    let library = library_with(Arc::new(StubSource::failing()), vec![legend("Tymna the Weaver", "Partner")], None);

    let err = library.load_library().await.unwrap_err();
    assert!(err.to_string().contains("offline"));
    assert!(matches!(library.state(), LoadState::Failed(_)));
    assert!(library.lexical_search("tymna", 10, None).is_empty());
    assert!(library.corpus().is_none());
}

#[tokio::test]
async fn test_unwritable_storage_still_loads() {
    let temp_dir = tempfile::tempdir().unwrap();
    let storage = storage_in(&temp_dir).await;
    // a file where the cache directory should be
    storage.write(CACHE_DIR, b"not a directory").await.unwrap();

    let library = library_with(Arc::new(StubSource::new(vec![card("Sol Ring")])), Vec::new(), Some(storage));
    let corpus = library.load_library().await.unwrap();
    library.flush().await;

    assert_eq!(corpus.len(), 1);
    assert!(library.cache_info().await.is_none());
}

#[test]
fn test_heroes_partner_scenario() {
    let first = legend("First Hero", "Partner—Heroes (You can have two commanders if both have this ability.)");
    let second = legend("Second Hero", "Partner—Heroes");
    let generic = legend("Generic Partner", "Partner (You can have two commanders if both have partner.)");

    assert!(compatible(&first, &second));
    assert!(compatible(&second, &first));
    assert!(!compatible(&first, &generic));
    assert!(!compatible(&generic, &second));
}
