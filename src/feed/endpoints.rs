//! URL builders for the feed API endpoints.

use url::Url;
use uuid::Uuid;

/// The feed listing endpoint, optionally positioned after a cursor item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEndpoint {
  /// First page.
  Get,
  /// The page following the item with this id.
  After(Uuid),
}

impl FeedEndpoint {
  pub fn url(&self, base: &Url) -> Url {
    let mut url = append_segments(base, &["v1", "feed"]);
    if let Self::After(id) = self {
      url
        .query_pairs_mut()
        .append_pair("after_id", &id.to_string());
    }
    url
  }
}

/// The comments endpoint for a single feed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCommentsEndpoint {
  Get(Uuid),
}

impl ImageCommentsEndpoint {
  pub fn url(&self, base: &Url) -> Url {
    let Self::Get(id) = self;
    append_segments(base, &["v1", "image", &id.to_string(), "comments"])
  }
}

/// Append path segments, keeping whatever path the base already carries.
fn append_segments(base: &Url, segments: &[&str]) -> Url {
  let mut url = base.clone();
  if let Ok(mut path) = url.path_segments_mut() {
    path.pop_if_empty().extend(segments);
  }
  url
}

#[cfg(test)]
mod tests {
  use super::*;

  fn base_url() -> Url {
    Url::parse("https://base-url.com").unwrap()
  }

  #[test]
  fn test_feed_endpoint_url() {
    let url = FeedEndpoint::Get.url(&base_url());
    assert_eq!(url.as_str(), "https://base-url.com/v1/feed");
  }

  #[test]
  fn test_feed_endpoint_after_url_carries_cursor() {
    let id = Uuid::new_v4();
    let url = FeedEndpoint::After(id).url(&base_url());
    assert_eq!(
      url.as_str(),
      format!("https://base-url.com/v1/feed?after_id={id}")
    );
  }

  #[test]
  fn test_feed_endpoint_keeps_base_path() {
    let base = Url::parse("https://base-url.com/essential-feed/").unwrap();
    let url = FeedEndpoint::Get.url(&base);
    assert_eq!(url.as_str(), "https://base-url.com/essential-feed/v1/feed");
  }

  #[test]
  fn test_comments_endpoint_url() {
    let id = Uuid::new_v4();
    let url = ImageCommentsEndpoint::Get(id).url(&base_url());
    assert_eq!(
      url.as_str(),
      format!("https://base-url.com/v1/image/{id}/comments")
    );
  }
}
