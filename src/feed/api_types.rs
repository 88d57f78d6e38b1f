//! Serde-deserializable types matching feed API responses, and the pure
//! mappers that turn a raw response into domain items.
//!
//! These types are separate from domain types so the wire shape (the
//! `{ "items": [...] }` envelope, the `image` field name) never leaks past
//! this module.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use crate::error::LoadError;

use super::types::{FeedItem, ImageComment};

const STATUS_OK: u16 = 200;

// ============================================================================
// Feed items
// ============================================================================

#[derive(Debug, Deserialize)]
struct FeedRoot {
  items: Vec<ApiFeedItem>,
}

/// Feed item as the server ships it.
#[derive(Debug, Deserialize)]
struct ApiFeedItem {
  id: Uuid,
  description: Option<String>,
  location: Option<String>,
  image: Url,
}

impl ApiFeedItem {
  fn into_item(self) -> FeedItem {
    FeedItem {
      id: self.id,
      description: self.description,
      location: self.location,
      url: self.image,
    }
  }
}

/// Map a feed response. Only a 200 with a well-formed envelope succeeds;
/// items keep the server-provided order.
pub fn map_feed(body: &[u8], status: u16) -> Result<Vec<FeedItem>, LoadError> {
  if status != STATUS_OK {
    return Err(LoadError::InvalidData);
  }

  let root: FeedRoot = serde_json::from_slice(body).map_err(|_| LoadError::InvalidData)?;
  Ok(root.items.into_iter().map(ApiFeedItem::into_item).collect())
}

// ============================================================================
// Image comments
// ============================================================================

#[derive(Debug, Deserialize)]
struct CommentsRoot {
  items: Vec<ApiImageComment>,
}

#[derive(Debug, Deserialize)]
struct ApiImageComment {
  id: Uuid,
  message: String,
  created_at: DateTime<Utc>,
  username: String,
}

impl ApiImageComment {
  fn into_comment(self) -> ImageComment {
    ImageComment {
      id: self.id,
      message: self.message,
      created_at: self.created_at,
      username: self.username,
    }
  }
}

/// Map a comments response. Same envelope rules as the feed.
pub fn map_comments(body: &[u8], status: u16) -> Result<Vec<ImageComment>, LoadError> {
  if status != STATUS_OK {
    return Err(LoadError::InvalidData);
  }

  let root: CommentsRoot = serde_json::from_slice(body).map_err(|_| LoadError::InvalidData)?;
  Ok(
    root
      .items
      .into_iter()
      .map(ApiImageComment::into_comment)
      .collect(),
  )
}

// ============================================================================
// Image data
// ============================================================================

/// Map an image-data response. Only a 200 with a non-empty body succeeds.
pub fn map_image_data(body: &[u8], status: u16) -> Result<Vec<u8>, LoadError> {
  if status != STATUS_OK || body.is_empty() {
    return Err(LoadError::InvalidData);
  }

  Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn feed_json() -> Vec<u8> {
    br#"{
      "items": [
        {
          "id": "e621e1f8-c36c-495a-93fc-0c247a3e6e5f",
          "description": "a description",
          "location": "a location",
          "image": "https://example.com/image-1.jpg"
        },
        {
          "id": "73a642a3-d45c-453b-a737-44c5eeca7af5",
          "image": "https://example.com/image-2.jpg"
        }
      ]
    }"#
      .to_vec()
  }

  #[test]
  fn test_map_feed_delivers_items_in_server_order() {
    let items = map_feed(&feed_json(), 200).unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(
      items[0].id.to_string(),
      "e621e1f8-c36c-495a-93fc-0c247a3e6e5f"
    );
    assert_eq!(items[0].description.as_deref(), Some("a description"));
    assert_eq!(items[0].location.as_deref(), Some("a location"));
    assert_eq!(items[0].url.as_str(), "https://example.com/image-1.jpg");
    assert_eq!(items[1].description, None);
    assert_eq!(items[1].location, None);
  }

  #[test]
  fn test_map_feed_rejects_non_200_status() {
    for status in [199, 201, 300, 400, 404, 500] {
      assert_eq!(map_feed(&feed_json(), status), Err(LoadError::InvalidData));
    }
  }

  #[test]
  fn test_map_feed_rejects_malformed_json() {
    assert_eq!(
      map_feed(b"not json at all", 200),
      Err(LoadError::InvalidData)
    );
    assert_eq!(map_feed(b"{}", 200), Err(LoadError::InvalidData));
  }

  #[test]
  fn test_map_feed_accepts_empty_item_list() {
    let items = map_feed(br#"{"items": []}"#, 200).unwrap();
    assert!(items.is_empty());
  }

  #[test]
  fn test_map_comments_parses_created_at() {
    let json = br#"{
      "items": [
        {
          "id": "7019d8a7-0f35-4ebd-8f7b-dd4104f2b1cc",
          "message": "a message",
          "created_at": "2020-05-20T11:24:59+00:00",
          "username": "a username"
        }
      ]
    }"#;

    let comments = map_comments(json, 200).unwrap();

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].message, "a message");
    assert_eq!(comments[0].username, "a username");
    assert_eq!(comments[0].created_at.to_rfc3339(), "2020-05-20T11:24:59+00:00");
  }

  #[test]
  fn test_map_comments_rejects_non_200_status() {
    assert_eq!(
      map_comments(br#"{"items": []}"#, 404),
      Err(LoadError::InvalidData)
    );
  }

  #[test]
  fn test_map_image_data_delivers_non_empty_body() {
    assert_eq!(map_image_data(b"image bytes", 200), Ok(b"image bytes".to_vec()));
  }

  #[test]
  fn test_map_image_data_rejects_empty_body() {
    assert_eq!(map_image_data(b"", 200), Err(LoadError::InvalidData));
  }

  #[test]
  fn test_map_image_data_rejects_non_200_status() {
    assert_eq!(map_image_data(b"image bytes", 404), Err(LoadError::InvalidData));
  }
}
