//! Loader and cache capability seams.
//!
//! The composition layer (decorator, fallback, pagination) works entirely
//! against these two traits, so any producer of a value can be cached,
//! substituted, or chained without knowing what sits behind it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{LoadError, StoreError};

/// Anything that can asynchronously produce a value.
///
/// Cancellation is dropping the returned future; a dropped load must not
/// leave observable side effects behind.
#[async_trait]
pub trait Loader: Send + Sync {
  type Output: Send;

  async fn load(&self) -> Result<Self::Output, LoadError>;
}

/// A durable home for values a loader produced.
#[async_trait]
pub trait Cache: Send + Sync {
  type Output: Send + Sync + 'static;

  async fn save(&self, value: &Self::Output) -> Result<(), StoreError>;
}

#[async_trait]
impl<L: Loader + ?Sized> Loader for Arc<L> {
  type Output = L::Output;

  async fn load(&self) -> Result<Self::Output, LoadError> {
    (**self).load().await
  }
}

#[async_trait]
impl<C: Cache + ?Sized> Cache for Arc<C> {
  type Output = C::Output;

  async fn save(&self, value: &Self::Output) -> Result<(), StoreError> {
    (**self).save(value).await
  }
}
