//! Domain models for the feed and comments features.

use std::fmt;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use url::Url;
use uuid::Uuid;

use crate::error::LoadError;

/// A single image in the feed.
///
/// Immutable value; identity is the `id`. Built by the remote mappers or
/// reconstructed from the persisted cache, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
  pub id: Uuid,
  pub description: Option<String>,
  pub location: Option<String>,
  pub url: Url,
}

/// A comment on a feed image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageComment {
  pub id: Uuid,
  pub message: String,
  pub created_at: DateTime<Utc>,
  pub username: String,
}

/// Factory producing the next page of a paginated result.
pub type LoadMore<T> =
  Box<dyn Fn() -> BoxFuture<'static, Result<Paginated<T>, LoadError>> + Send + Sync>;

/// A page of items plus an optional continuation.
///
/// `load_more` captures the cursor for the next page; its absence means the
/// end of the list has been reached.
pub struct Paginated<T> {
  pub items: Vec<T>,
  pub load_more: Option<LoadMore<T>>,
}

impl<T> Paginated<T> {
  /// A terminal page with no continuation.
  pub fn new(items: Vec<T>) -> Self {
    Self {
      items,
      load_more: None,
    }
  }

  pub fn with_load_more(items: Vec<T>, load_more: LoadMore<T>) -> Self {
    Self {
      items,
      load_more: Some(load_more),
    }
  }

  /// Whether another page can be requested.
  pub fn has_more(&self) -> bool {
    self.load_more.is_some()
  }

  /// Start loading the next page, or `None` when the list is exhausted.
  pub fn next_page(&self) -> Option<BoxFuture<'static, Result<Paginated<T>, LoadError>>> {
    self.load_more.as_ref().map(|load_more| load_more())
  }
}

impl<T: fmt::Debug> fmt::Debug for Paginated<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Paginated")
      .field("items", &self.items)
      .field("has_more", &self.has_more())
      .finish()
  }
}
