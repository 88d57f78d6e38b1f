//! Local persistence for offline support.
//!
//! This module provides the single-slot feed cache and per-URL image blobs:
//! - Store contracts plus SQLite and in-memory implementations
//! - A time-based validity policy (stale entries read as absent)
//! - Local loaders that apply the policy and keep the slot tidy

mod local;
mod policy;
mod sqlite;
mod store;

pub use local::{LocalFeedLoader, LocalImageDataLoader};
pub use policy::CachePolicy;
pub use sqlite::SqliteFeedStore;
pub use store::{CachedFeed, FeedStore, ImageDataStore, InMemoryFeedStore, PersistedFeedItem};
