//! Write-through caching decorator.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LoadError;
use crate::loader::{Cache, Loader};

/// Wraps a loader and saves every successful result to a paired cache.
///
/// The save is fire-and-forget: it is started before the result is handed
/// back and its outcome never changes what the caller sees. A failed load
/// leaves the cache untouched, and a cancelled (dropped) load never reaches
/// the save.
pub struct CacheDecorator<L, C> {
  decoratee: L,
  cache: Arc<C>,
}

impl<L, C> CacheDecorator<L, C> {
  pub fn new(decoratee: L, cache: Arc<C>) -> Self {
    Self { decoratee, cache }
  }
}

#[async_trait]
impl<L, C> Loader for CacheDecorator<L, C>
where
  L: Loader,
  L::Output: Clone + Send + Sync + 'static,
  C: Cache<Output = L::Output> + 'static,
{
  type Output = L::Output;

  async fn load(&self) -> Result<Self::Output, LoadError> {
    let value = self.decoratee.load().await?;
    save_ignoring_result(Arc::clone(&self.cache), value.clone());
    Ok(value)
  }
}

/// Spawn a save whose outcome is observed only by the log.
pub(crate) fn save_ignoring_result<C: Cache + 'static>(cache: Arc<C>, value: C::Output) {
  tokio::spawn(async move {
    if let Err(e) = cache.save(&value).await {
      tracing::debug!("ignoring cache save failure: {e}");
    }
  });
}
