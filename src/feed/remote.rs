//! Remote loaders: one GET against a bound URL, then the matching mapper.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::error::LoadError;
use crate::http::HttpClient;
use crate::loader::Loader;

use super::api_types;
use super::types::{FeedItem, ImageComment};

/// Loads one page of feed items from the remote API.
pub struct RemoteFeedLoader {
  client: Arc<dyn HttpClient>,
  url: Url,
}

impl RemoteFeedLoader {
  pub fn new(client: Arc<dyn HttpClient>, url: Url) -> Self {
    Self { client, url }
  }
}

#[async_trait]
impl Loader for RemoteFeedLoader {
  type Output = Vec<FeedItem>;

  async fn load(&self) -> Result<Vec<FeedItem>, LoadError> {
    let response = self.client.get(&self.url).await?;
    api_types::map_feed(&response.body, response.status)
  }
}

/// Loads the comments for one feed image.
pub struct RemoteCommentsLoader {
  client: Arc<dyn HttpClient>,
  url: Url,
}

impl RemoteCommentsLoader {
  pub fn new(client: Arc<dyn HttpClient>, url: Url) -> Self {
    Self { client, url }
  }
}

#[async_trait]
impl Loader for RemoteCommentsLoader {
  type Output = Vec<ImageComment>;

  async fn load(&self) -> Result<Vec<ImageComment>, LoadError> {
    let response = self.client.get(&self.url).await?;
    api_types::map_comments(&response.body, response.status)
  }
}

/// Loads the raw bytes of one image.
pub struct RemoteImageDataLoader {
  client: Arc<dyn HttpClient>,
  url: Url,
}

impl RemoteImageDataLoader {
  pub fn new(client: Arc<dyn HttpClient>, url: Url) -> Self {
    Self { client, url }
  }
}

#[async_trait]
impl Loader for RemoteImageDataLoader {
  type Output = Vec<u8>;

  async fn load(&self) -> Result<Vec<u8>, LoadError> {
    let response = self.client.get(&self.url).await?;
    api_types::map_image_data(&response.body, response.status)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::http::HttpResponse;
  use std::sync::Mutex;

  struct HttpClientStub {
    result: Result<HttpResponse, LoadError>,
    requests: Mutex<Vec<Url>>,
  }

  impl HttpClientStub {
    fn new(result: Result<HttpResponse, LoadError>) -> Arc<Self> {
      Arc::new(Self {
        result,
        requests: Mutex::new(Vec::new()),
      })
    }

    fn responding(status: u16, body: &[u8]) -> Arc<Self> {
      Self::new(Ok(HttpResponse {
        status,
        body: body.to_vec(),
      }))
    }
  }

  #[async_trait]
  impl HttpClient for HttpClientStub {
    async fn get(&self, url: &Url) -> Result<HttpResponse, LoadError> {
      self.requests.lock().unwrap().push(url.clone());
      self.result.clone()
    }
  }

  fn any_url() -> Url {
    Url::parse("https://a-url.com/v1/feed").unwrap()
  }

  #[tokio::test]
  async fn test_feed_loader_requests_the_bound_url() {
    let client = HttpClientStub::responding(200, br#"{"items": []}"#);
    let loader = RemoteFeedLoader::new(client.clone(), any_url());

    loader.load().await.unwrap();

    assert_eq!(*client.requests.lock().unwrap(), vec![any_url()]);
  }

  #[tokio::test]
  async fn test_feed_loader_delivers_items_on_200() {
    let client = HttpClientStub::responding(
      200,
      br#"{"items": [{"id": "e621e1f8-c36c-495a-93fc-0c247a3e6e5f", "image": "https://example.com/a.jpg"}]}"#,
    );
    let loader = RemoteFeedLoader::new(client, any_url());

    let items = loader.load().await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].url.as_str(), "https://example.com/a.jpg");
  }

  #[tokio::test]
  async fn test_feed_loader_surfaces_invalid_data_on_404() {
    let client = HttpClientStub::responding(404, br#"{"items": []}"#);
    let loader = RemoteFeedLoader::new(client, any_url());

    assert_eq!(loader.load().await, Err(LoadError::InvalidData));
  }

  #[tokio::test]
  async fn test_feed_loader_propagates_connectivity_error() {
    let client = HttpClientStub::new(Err(LoadError::Connectivity));
    let loader = RemoteFeedLoader::new(client, any_url());

    assert_eq!(loader.load().await, Err(LoadError::Connectivity));
  }

  #[tokio::test]
  async fn test_image_data_loader_delivers_bytes_on_200() {
    let client = HttpClientStub::responding(200, b"image bytes");
    let loader = RemoteImageDataLoader::new(client, any_url());

    assert_eq!(loader.load().await, Ok(b"image bytes".to_vec()));
  }

  #[tokio::test]
  async fn test_image_data_loader_rejects_empty_body() {
    let client = HttpClientStub::responding(200, b"");
    let loader = RemoteImageDataLoader::new(client, any_url());

    assert_eq!(loader.load().await, Err(LoadError::InvalidData));
  }

  #[tokio::test]
  async fn test_comments_loader_surfaces_invalid_data_on_malformed_body() {
    let client = HttpClientStub::responding(200, b"not json");
    let loader = RemoteCommentsLoader::new(client, any_url());

    assert_eq!(loader.load().await, Err(LoadError::InvalidData));
  }
}
