//! Paginated feed loading with cache merge-through.
//!
//! The first page is remote-first with the cached feed as offline fallback.
//! Each `load_more` call reads the whole cached feed and fetches the page
//! after the cursor concurrently, serves the concatenation, and writes it
//! back so the cache always holds everything seen so far.

use std::sync::Arc;

use url::Url;

use crate::cache::{FeedStore, LocalFeedLoader};
use crate::error::LoadError;
use crate::feed::endpoints::FeedEndpoint;
use crate::feed::remote::RemoteFeedLoader;
use crate::feed::{FeedItem, LoadMore, Paginated};
use crate::http::HttpClient;
use crate::loader::Loader;

use super::decorator::{save_ignoring_result, CacheDecorator};
use super::fallback::FallbackLoader;

/// Loads the feed page by page, merging each new page into the local cache.
pub struct PagedFeedLoader<S> {
  client: Arc<dyn HttpClient>,
  base_url: Url,
  local: Arc<LocalFeedLoader<S>>,
}

impl<S: FeedStore + 'static> PagedFeedLoader<S> {
  pub fn new(client: Arc<dyn HttpClient>, base_url: Url, local: Arc<LocalFeedLoader<S>>) -> Self {
    Self {
      client,
      base_url,
      local,
    }
  }

  /// First page: remote, written through to the cache, with the cached feed
  /// served instead when the network fails.
  pub async fn load_first_page(&self) -> Result<Paginated<FeedItem>, LoadError> {
    let remote = RemoteFeedLoader::new(
      Arc::clone(&self.client),
      FeedEndpoint::Get.url(&self.base_url),
    );
    let loader = FallbackLoader::new(
      CacheDecorator::new(remote, Arc::clone(&self.local)),
      Arc::clone(&self.local),
    );

    let items = loader.load().await?;
    let cursor = items.last().cloned();
    Ok(self.make_page(items, cursor))
  }

  /// Subsequent page: read the whole cached feed and fetch the items after
  /// the cursor concurrently, then serve cached-then-new.
  async fn load_page_after(&self, last: FeedItem) -> Result<Paginated<FeedItem>, LoadError> {
    let remote = RemoteFeedLoader::new(
      Arc::clone(&self.client),
      FeedEndpoint::After(last.id).url(&self.base_url),
    );

    let (cached, newly_fetched) = tokio::try_join!(self.local.load(), remote.load())?;

    // A page with no new items ends the list.
    let cursor = newly_fetched.last().cloned();

    let mut items = cached;
    items.extend(newly_fetched);

    save_ignoring_result(Arc::clone(&self.local), items.clone());
    Ok(self.make_page(items, cursor))
  }

  fn make_page(&self, items: Vec<FeedItem>, cursor: Option<FeedItem>) -> Paginated<FeedItem> {
    match cursor {
      Some(last) => Paginated::with_load_more(items, self.make_load_more(last)),
      None => Paginated::new(items),
    }
  }

  fn make_load_more(&self, last: FeedItem) -> LoadMore<FeedItem> {
    let client = Arc::clone(&self.client);
    let base_url = self.base_url.clone();
    let local = Arc::clone(&self.local);

    Box::new(move || {
      let chained = PagedFeedLoader {
        client: Arc::clone(&client),
        base_url: base_url.clone(),
        local: Arc::clone(&local),
      };
      let last = last.clone();
      Box::pin(async move { chained.load_page_after(last).await })
    })
  }
}
