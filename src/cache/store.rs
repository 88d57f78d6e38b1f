//! Cache store contracts and the in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use url::Url;
use uuid::Uuid;

use crate::error::StoreError;
use crate::feed::FeedItem;

/// Feed item as the persistence boundary sees it.
///
/// A deliberate twin of [`FeedItem`] so the store never depends on domain
/// assumptions; conversion is lossless in both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedFeedItem {
  pub id: Uuid,
  pub description: Option<String>,
  pub location: Option<String>,
  pub url: Url,
}

impl PersistedFeedItem {
  pub fn from_domain(item: &FeedItem) -> Self {
    Self {
      id: item.id,
      description: item.description.clone(),
      location: item.location.clone(),
      url: item.url.clone(),
    }
  }

  pub fn into_domain(self) -> FeedItem {
    FeedItem {
      id: self.id,
      description: self.description,
      location: self.location,
      url: self.url,
    }
  }
}

/// The single cached feed slot: items plus the instant they were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedFeed {
  pub feed: Vec<PersistedFeedItem>,
  pub timestamp: DateTime<Utc>,
}

/// Durable store holding at most one feed slot.
///
/// Implementations serialize their own operations; callers may share one
/// store instance across loaders.
pub trait FeedStore: Send + Sync {
  /// `None` when no slot exists.
  fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError>;

  /// Atomically replace the slot with the given items and timestamp.
  fn insert(&self, feed: &[PersistedFeedItem], timestamp: DateTime<Utc>) -> Result<(), StoreError>;

  /// Remove the slot. Succeeds as a no-op when already empty.
  fn delete_cached_feed(&self) -> Result<(), StoreError>;
}

/// Durable store for per-URL image blobs.
pub trait ImageDataStore: Send + Sync {
  fn insert_data(&self, url: &Url, data: &[u8]) -> Result<(), StoreError>;

  fn retrieve_data(&self, url: &Url) -> Result<Option<Vec<u8>>, StoreError>;
}

/// Process-local store. Useful for tests and ephemeral embedding.
#[derive(Default)]
pub struct InMemoryFeedStore {
  slot: Mutex<Option<CachedFeed>>,
  blobs: Mutex<HashMap<Url, Vec<u8>>>,
}

impl InMemoryFeedStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl FeedStore for InMemoryFeedStore {
  fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError> {
    let slot = self
      .slot
      .lock()
      .map_err(|e| StoreError::Read(format!("lock poisoned: {e}")))?;
    Ok(slot.clone())
  }

  fn insert(&self, feed: &[PersistedFeedItem], timestamp: DateTime<Utc>) -> Result<(), StoreError> {
    let mut slot = self
      .slot
      .lock()
      .map_err(|e| StoreError::Write(format!("lock poisoned: {e}")))?;
    *slot = Some(CachedFeed {
      feed: feed.to_vec(),
      timestamp,
    });
    Ok(())
  }

  fn delete_cached_feed(&self) -> Result<(), StoreError> {
    let mut slot = self
      .slot
      .lock()
      .map_err(|e| StoreError::Delete(format!("lock poisoned: {e}")))?;
    *slot = None;
    Ok(())
  }
}

impl ImageDataStore for InMemoryFeedStore {
  fn insert_data(&self, url: &Url, data: &[u8]) -> Result<(), StoreError> {
    let mut blobs = self
      .blobs
      .lock()
      .map_err(|e| StoreError::Write(format!("lock poisoned: {e}")))?;
    blobs.insert(url.clone(), data.to_vec());
    Ok(())
  }

  fn retrieve_data(&self, url: &Url) -> Result<Option<Vec<u8>>, StoreError> {
    let blobs = self
      .blobs
      .lock()
      .map_err(|e| StoreError::Read(format!("lock poisoned: {e}")))?;
    Ok(blobs.get(url).cloned())
  }
}
