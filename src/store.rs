// src/store.rs
//! Key-value storage for feedback items and the latest digest.
//!
//! The store is an opaque read/write dependency: no locking, no
//! transactions, last write wins.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use metrics::counter;
use tracing::{debug, warn};

use crate::digest::Digest;
use crate::feedback::FeedbackItem;

pub const ITEMS_KEY: &str = "feedback_items";
pub const DIGEST_KEY: &str = "latest_digest";

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

#[async_trait::async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn put(&self, key: &str, value: String) -> Result<()>;
}

/// One file per key under `dir`. Each write goes through its own temp file
/// and a rename, so concurrent writers to one key never share a temp path.
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

#[async_trait::async_trait]
impl KvStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.path_for(key);
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_extension(format!("json.{}.{seq}.tmp", std::process::id()));
        tokio::fs::write(&tmp, value.as_bytes())
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e).with_context(|| format!("renaming into {}", path.display()));
        }
        Ok(())
    }
}

/// In-process map; for tests and throwaway local runs.
#[derive(Default)]
pub struct MemoryKvStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let g = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(g.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        let mut g = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        g.insert(key.to_string(), value);
        Ok(())
    }
}

/// Item source + digest cache on top of a [`KvStore`], with an injected
/// fallback item set for when the store has nothing usable.
#[derive(Clone)]
pub struct FeedbackRepository {
    store: Arc<dyn KvStore>,
    fallback: Arc<Vec<FeedbackItem>>,
}

impl FeedbackRepository {
    pub fn new(store: Arc<dyn KvStore>, fallback: Vec<FeedbackItem>) -> Self {
        Self {
            store,
            fallback: Arc::new(fallback),
        }
    }

    pub fn fallback(&self) -> &[FeedbackItem] {
        &self.fallback
    }

    async fn try_load(&self) -> Result<Option<Vec<FeedbackItem>>> {
        let Some(raw) = self.store.get(ITEMS_KEY).await? else {
            return Ok(None);
        };
        let items: Vec<FeedbackItem> =
            serde_json::from_str(&raw).context("parsing stored feedback items")?;
        Ok((!items.is_empty()).then_some(items))
    }

    /// Stored items, or the fallback set on a missing key, an empty list, or
    /// any read/parse failure.
    pub async fn load_items(&self) -> Vec<FeedbackItem> {
        match self.try_load().await {
            Ok(Some(items)) => {
                debug!(count = items.len(), "loaded feedback items from store");
                items
            }
            Ok(None) => {
                debug!("no stored feedback items; using fallback set");
                counter!("feedback_source_fallback_total").increment(1);
                self.fallback.to_vec()
            }
            Err(e) => {
                warn!(error = ?e, "failed to load feedback from store; using fallback set");
                counter!("feedback_source_fallback_total").increment(1);
                self.fallback.to_vec()
            }
        }
    }

    async fn try_cache(&self, digest: &Digest) -> Result<()> {
        let json = serde_json::to_string(digest).context("serializing digest")?;
        self.store.put(DIGEST_KEY, json).await
    }

    /// Best-effort write-behind; failures are logged and dropped.
    pub async fn cache_digest(&self, digest: &Digest) {
        if let Err(e) = self.try_cache(digest).await {
            warn!(error = ?e, "failed to cache digest");
            counter!("digest_cache_write_errors_total").increment(1);
        }
    }

    /// Overwrite the stored item set. Returns the number of items written.
    pub async fn seed(&self, items: &[FeedbackItem]) -> Result<usize> {
        let json = serde_json::to_string(items).context("serializing seed items")?;
        self.store.put(ITEMS_KEY, json).await?;
        Ok(items.len())
    }

    pub async fn latest_digest(&self) -> Result<Option<Digest>> {
        match self.store.get(DIGEST_KEY).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw).context("parsing cached digest")?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{Sentiment, Source, Theme, Urgency};
    use crate::seed::sample_feedback;

    struct BrokenStore;

    #[async_trait::async_trait]
    impl KvStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            anyhow::bail!("store offline")
        }
        async fn put(&self, _key: &str, _value: String) -> Result<()> {
            anyhow::bail!("store offline")
        }
    }

    fn one_item() -> Vec<FeedbackItem> {
        vec![FeedbackItem::new(
            "x",
            Source::Github,
            "Docs are great",
            Sentiment::Positive,
            Theme::Documentation,
            Urgency::Low,
        )]
    }

    #[tokio::test]
    async fn missing_key_uses_fallback() {
        let repo = FeedbackRepository::new(Arc::new(MemoryKvStore::new()), sample_feedback());
        assert_eq!(repo.load_items().await.len(), 12);
    }

    #[tokio::test]
    async fn corrupt_or_empty_payload_uses_fallback() {
        let store = Arc::new(MemoryKvStore::new());
        let repo = FeedbackRepository::new(store.clone(), one_item());

        store.put(ITEMS_KEY, "{not json".into()).await.unwrap();
        assert_eq!(repo.load_items().await, one_item());

        store.put(ITEMS_KEY, "[]".into()).await.unwrap();
        assert_eq!(repo.load_items().await, one_item());
    }

    #[tokio::test]
    async fn store_errors_are_absorbed() {
        let repo = FeedbackRepository::new(Arc::new(BrokenStore), one_item());
        assert_eq!(repo.load_items().await.len(), 1);
        assert!(repo.seed(&one_item()).await.is_err());
    }

    #[tokio::test]
    async fn seeded_items_round_trip_through_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileKvStore::new(dir.path().join("kv")));
        let repo = FeedbackRepository::new(store.clone(), Vec::new());

        assert_eq!(repo.seed(&one_item()).await.unwrap(), 1);
        assert_eq!(repo.load_items().await, one_item());
        assert!(dir.path().join("kv").join("feedback_items.json").exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_puts_to_one_key_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileKvStore::new(dir.path()));
        let big = "x".repeat(200_000);
        let small = "y".repeat(50);

        for _ in 0..25 {
            let mut tasks = Vec::new();
            for i in 0..8 {
                let store = store.clone();
                let value = if i % 2 == 0 { big.clone() } else { small.clone() };
                tasks.push(tokio::spawn(async move { store.put(DIGEST_KEY, value).await }));
            }
            for t in tasks {
                t.await.unwrap().unwrap();
            }
            let stored = store.get(DIGEST_KEY).await.unwrap().unwrap();
            assert!(stored == big || stored == small, "torn write: {} bytes", stored.len());
        }

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn file_keys_are_sanitized() {
        let s = FileKvStore::new("/tmp/kv");
        assert_eq!(s.path_for("../etc/passwd"), PathBuf::from("/tmp/kv/___etc_passwd.json"));
    }
}
