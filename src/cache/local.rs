//! Local loaders backed by the cache store.
//!
//! `LocalFeedLoader` is the policy layer over the raw store: it decides when
//! cached items are still worth serving, stamps writes with the injected
//! clock, and keeps the single slot tidy.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::clock::Clock;
use crate::error::{LoadError, StoreError};
use crate::feed::FeedItem;
use crate::loader::{Cache, Loader};

use super::policy::CachePolicy;
use super::store::{FeedStore, ImageDataStore, PersistedFeedItem};

/// Serves and maintains the locally cached feed.
pub struct LocalFeedLoader<S> {
  store: Arc<S>,
  clock: Arc<dyn Clock>,
  policy: CachePolicy,
}

impl<S: FeedStore> LocalFeedLoader<S> {
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
    Self {
      store,
      clock,
      policy: CachePolicy::default(),
    }
  }

  pub fn with_policy(mut self, policy: CachePolicy) -> Self {
    self.policy = policy;
    self
  }

  /// Replace the cached feed: delete the current slot, then insert.
  ///
  /// A failed delete propagates and the insert is never attempted; the new
  /// slot is stamped with the clock's current instant.
  pub async fn save(&self, feed: &[FeedItem]) -> Result<(), StoreError> {
    self.store.delete_cached_feed()?;

    let persisted: Vec<PersistedFeedItem> =
      feed.iter().map(PersistedFeedItem::from_domain).collect();
    self.store.insert(&persisted, self.clock.now())
  }

  /// Best-effort housekeeping: drop the slot when it is unreadable or stale.
  ///
  /// Never surfaces an error; a failed delete is only logged.
  pub async fn validate_cache(&self) {
    let deletion = match self.store.retrieve() {
      Err(e) => {
        tracing::debug!("cache unreadable, deleting: {e}");
        self.store.delete_cached_feed()
      }
      Ok(Some(cache)) if !self.policy.validate(cache.timestamp, self.clock.now()) => {
        self.store.delete_cached_feed()
      }
      Ok(_) => return,
    };

    if let Err(e) = deletion {
      tracing::debug!("cache validation could not delete the slot: {e}");
    }
  }
}

#[async_trait]
impl<S: FeedStore> Loader for LocalFeedLoader<S> {
  type Output = Vec<FeedItem>;

  /// A missing or stale slot is an empty feed, never an error; only a store
  /// failure propagates.
  async fn load(&self) -> Result<Vec<FeedItem>, LoadError> {
    match self.store.retrieve()? {
      Some(cache) if self.policy.validate(cache.timestamp, self.clock.now()) => Ok(
        cache
          .feed
          .into_iter()
          .map(PersistedFeedItem::into_domain)
          .collect(),
      ),
      _ => Ok(Vec::new()),
    }
  }
}

#[async_trait]
impl<S: FeedStore> Cache for LocalFeedLoader<S> {
  type Output = Vec<FeedItem>;

  async fn save(&self, value: &Vec<FeedItem>) -> Result<(), StoreError> {
    LocalFeedLoader::save(self, value).await
  }
}

/// Serves and stores the image data cached for a single URL.
pub struct LocalImageDataLoader<S> {
  store: Arc<S>,
  url: Url,
}

impl<S: ImageDataStore> LocalImageDataLoader<S> {
  pub fn new(store: Arc<S>, url: Url) -> Self {
    Self { store, url }
  }
}

#[async_trait]
impl<S: ImageDataStore> Loader for LocalImageDataLoader<S> {
  type Output = Vec<u8>;

  async fn load(&self) -> Result<Vec<u8>, LoadError> {
    self
      .store
      .retrieve_data(&self.url)?
      .ok_or(LoadError::NotFound)
  }
}

#[async_trait]
impl<S: ImageDataStore> Cache for LocalImageDataLoader<S> {
  type Output = Vec<u8>;

  async fn save(&self, value: &Vec<u8>) -> Result<(), StoreError> {
    self.store.insert_data(&self.url, value)
  }
}
