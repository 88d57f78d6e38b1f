//! Narrow HTTP transport seam used by the remote loaders.

use async_trait::async_trait;
use url::Url;

use crate::error::LoadError;

/// A received HTTP response: status code plus raw body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
  pub status: u16,
  pub body: Vec<u8>,
}

/// Minimal GET-only transport.
///
/// Transport-level failures map to [`LoadError::Connectivity`]; any response
/// that did arrive is returned as-is, whatever its status, for the mappers
/// to judge. Dropping the returned future cancels the request.
#[async_trait]
pub trait HttpClient: Send + Sync {
  async fn get(&self, url: &Url) -> Result<HttpResponse, LoadError>;
}

/// reqwest-backed transport.
#[derive(Clone, Default)]
pub struct ReqwestHttpClient {
  client: reqwest::Client,
}

impl ReqwestHttpClient {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
  async fn get(&self, url: &Url) -> Result<HttpResponse, LoadError> {
    let response = self.client.get(url.clone()).send().await.map_err(|e| {
      tracing::debug!("transport failure for {url}: {e}");
      LoadError::Connectivity
    })?;

    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(|e| {
      tracing::debug!("failed to read response body for {url}: {e}");
      LoadError::Connectivity
    })?;

    Ok(HttpResponse {
      status,
      body: body.to_vec(),
    })
  }
}
