//! Primary/fallback composition.

use async_trait::async_trait;

use crate::error::LoadError;
use crate::loader::Loader;

/// Tries the primary loader and substitutes the fallback on failure.
///
/// The fallback never starts before the primary's result is known, runs at
/// most once, and its result (success or failure) is final — there is no
/// further chaining and no retry of the primary.
pub struct FallbackLoader<P, F> {
  primary: P,
  fallback: F,
}

impl<P, F> FallbackLoader<P, F> {
  pub fn new(primary: P, fallback: F) -> Self {
    Self { primary, fallback }
  }
}

#[async_trait]
impl<P, F> Loader for FallbackLoader<P, F>
where
  P: Loader,
  F: Loader<Output = P::Output>,
{
  type Output = P::Output;

  async fn load(&self) -> Result<Self::Output, LoadError> {
    match self.primary.load().await {
      Ok(value) => Ok(value),
      Err(e) => {
        tracing::debug!("primary loader failed, trying fallback: {e}");
        self.fallback.load().await
      }
    }
  }
}
