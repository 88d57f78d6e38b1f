//! Concrete composition of the loading pipeline.
//!
//! This wraps the component layer with the production wiring: reqwest
//! transport, sqlite store, system clock. Feed loads are remote-first with
//! write-through caching and a local fallback; image data is local-first
//! with a caching remote fallback; comments are remote only.

use std::sync::Arc;

use url::Url;
use uuid::Uuid;

use crate::cache::{CachePolicy, LocalFeedLoader, LocalImageDataLoader, SqliteFeedStore};
use crate::clock::SystemClock;
use crate::compose::{CacheDecorator, FallbackLoader, PagedFeedLoader};
use crate::config::Config;
use crate::error::{LoadError, StoreError};
use crate::feed::endpoints::ImageCommentsEndpoint;
use crate::feed::remote::{RemoteCommentsLoader, RemoteImageDataLoader};
use crate::feed::{FeedItem, ImageComment, Paginated};
use crate::http::{HttpClient, ReqwestHttpClient};
use crate::loader::Loader;

pub struct FeedPipeline {
  client: Arc<dyn HttpClient>,
  store: Arc<SqliteFeedStore>,
  local_feed: Arc<LocalFeedLoader<SqliteFeedStore>>,
  base_url: Url,
}

impl FeedPipeline {
  pub fn new(config: &Config) -> Result<Self, StoreError> {
    let client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());

    let store = Arc::new(match &config.cache.db_path {
      Some(path) => SqliteFeedStore::open_at(path)?,
      None => SqliteFeedStore::open()?,
    });

    let policy = config
      .cache
      .max_age_days
      .map(CachePolicy::new)
      .unwrap_or_default();
    let local_feed = Arc::new(
      LocalFeedLoader::new(Arc::clone(&store), Arc::new(SystemClock)).with_policy(policy),
    );

    Ok(Self {
      client,
      store,
      local_feed,
      base_url: config.api.base_url.clone(),
    })
  }

  /// First feed page; follow the returned page's `load_more` for the rest.
  pub async fn load_feed(&self) -> Result<Paginated<FeedItem>, LoadError> {
    PagedFeedLoader::new(
      Arc::clone(&self.client),
      self.base_url.clone(),
      Arc::clone(&self.local_feed),
    )
    .load_first_page()
    .await
  }

  /// Comments for one feed image. Not cached.
  pub async fn load_comments(&self, image_id: Uuid) -> Result<Vec<ImageComment>, LoadError> {
    let url = ImageCommentsEndpoint::Get(image_id).url(&self.base_url);
    RemoteCommentsLoader::new(Arc::clone(&self.client), url)
      .load()
      .await
  }

  /// Image bytes: a cache hit wins, otherwise remote with write-through.
  pub async fn load_image_data(&self, url: &Url) -> Result<Vec<u8>, LoadError> {
    let local = Arc::new(LocalImageDataLoader::new(
      Arc::clone(&self.store),
      url.clone(),
    ));
    let remote = RemoteImageDataLoader::new(Arc::clone(&self.client), url.clone());

    FallbackLoader::new(Arc::clone(&local), CacheDecorator::new(remote, local))
      .load()
      .await
  }

  /// Drop the cached feed when it is stale or unreadable. Best-effort.
  pub async fn validate_cache(&self) {
    self.local_feed.validate_cache().await;
  }
}
