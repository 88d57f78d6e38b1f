//! SQLite-backed cache store.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use url::Url;
use uuid::Uuid;

use crate::error::StoreError;

use super::store::{CachedFeed, FeedStore, ImageDataStore, PersistedFeedItem};

/// Durable store backed by a single SQLite database file.
///
/// Operations are serialized behind the connection lock. The feed slot is
/// replaced inside one transaction, so readers never observe a partial
/// write.
pub struct SqliteFeedStore {
  conn: Mutex<Connection>,
}

/// Schema for the cache tables.
const SCHEMA: &str = r#"
-- The single feed slot: one metadata row, items in a side table
CREATE TABLE IF NOT EXISTS feed_cache (
    slot INTEGER PRIMARY KEY CHECK (slot = 0),
    timestamp TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS feed_items (
    position INTEGER PRIMARY KEY,
    id TEXT NOT NULL,
    description TEXT,
    location TEXT,
    url TEXT NOT NULL
);

-- Per-URL image blobs
CREATE TABLE IF NOT EXISTS image_data (
    url TEXT PRIMARY KEY,
    data BLOB NOT NULL
);
"#;

impl SqliteFeedStore {
  /// Open or create the store at the default location.
  pub fn open() -> Result<Self, StoreError> {
    Self::open_at(&Self::default_path()?)
  }

  /// Open or create the store at the given database path.
  pub fn open_at(path: &Path) -> Result<Self, StoreError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| StoreError::Open(format!("failed to create store directory: {e}")))?;
    }

    let conn = Connection::open(path).map_err(|e| {
      StoreError::Open(format!("failed to open store at {}: {}", path.display(), e))
    })?;

    let store = Self {
      conn: Mutex::new(conn),
    };
    store.run_migrations()?;

    Ok(store)
  }

  /// Default database path under the platform data directory.
  fn default_path() -> Result<PathBuf, StoreError> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| StoreError::Open("could not determine data directory".to_string()))?;

    Ok(data_dir.join("feedkit").join("cache.db"))
  }

  fn run_migrations(&self) -> Result<(), StoreError> {
    let conn = self.lock()?;
    conn
      .execute_batch(SCHEMA)
      .map_err(|e| StoreError::Open(format!("failed to run migrations: {e}")))
  }

  fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
    self
      .conn
      .lock()
      .map_err(|e| StoreError::Read(format!("lock poisoned: {e}")))
  }
}

impl FeedStore for SqliteFeedStore {
  fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError> {
    let conn = self.lock()?;

    let timestamp: Option<String> = conn
      .query_row("SELECT timestamp FROM feed_cache WHERE slot = 0", [], |row| {
        row.get(0)
      })
      .optional()
      .map_err(|e| StoreError::Read(e.to_string()))?;

    let timestamp = match timestamp {
      Some(t) => parse_timestamp(&t)?,
      None => return Ok(None),
    };

    let mut stmt = conn
      .prepare("SELECT id, description, location, url FROM feed_items ORDER BY position")
      .map_err(|e| StoreError::Read(e.to_string()))?;

    let rows = stmt
      .query_map([], |row| {
        Ok((
          row.get::<_, String>(0)?,
          row.get::<_, Option<String>>(1)?,
          row.get::<_, Option<String>>(2)?,
          row.get::<_, String>(3)?,
        ))
      })
      .map_err(|e| StoreError::Read(e.to_string()))?;

    let mut feed = Vec::new();
    for row in rows {
      let (id, description, location, url) = row.map_err(|e| StoreError::Read(e.to_string()))?;
      feed.push(PersistedFeedItem {
        id: id
          .parse::<Uuid>()
          .map_err(|e| StoreError::Read(format!("bad item id '{id}': {e}")))?,
        description,
        location,
        url: Url::parse(&url).map_err(|e| StoreError::Read(format!("bad item url '{url}': {e}")))?,
      });
    }

    Ok(Some(CachedFeed { feed, timestamp }))
  }

  fn insert(&self, feed: &[PersistedFeedItem], timestamp: DateTime<Utc>) -> Result<(), StoreError> {
    let mut conn = self.lock()?;
    let tx = conn
      .transaction()
      .map_err(|e| StoreError::Write(e.to_string()))?;

    tx.execute("DELETE FROM feed_cache", [])
      .map_err(|e| StoreError::Write(e.to_string()))?;
    tx.execute("DELETE FROM feed_items", [])
      .map_err(|e| StoreError::Write(e.to_string()))?;

    tx.execute(
      "INSERT INTO feed_cache (slot, timestamp) VALUES (0, ?)",
      params![timestamp.to_rfc3339()],
    )
    .map_err(|e| StoreError::Write(e.to_string()))?;

    for (position, item) in feed.iter().enumerate() {
      tx.execute(
        "INSERT INTO feed_items (position, id, description, location, url)
         VALUES (?, ?, ?, ?, ?)",
        params![
          position as i64,
          item.id.to_string(),
          item.description,
          item.location,
          item.url.as_str()
        ],
      )
      .map_err(|e| StoreError::Write(e.to_string()))?;
    }

    tx.commit().map_err(|e| StoreError::Write(e.to_string()))
  }

  fn delete_cached_feed(&self) -> Result<(), StoreError> {
    let mut conn = self.lock()?;
    let tx = conn
      .transaction()
      .map_err(|e| StoreError::Delete(e.to_string()))?;

    tx.execute("DELETE FROM feed_cache", [])
      .map_err(|e| StoreError::Delete(e.to_string()))?;
    tx.execute("DELETE FROM feed_items", [])
      .map_err(|e| StoreError::Delete(e.to_string()))?;

    tx.commit().map_err(|e| StoreError::Delete(e.to_string()))
  }
}

impl ImageDataStore for SqliteFeedStore {
  fn insert_data(&self, url: &Url, data: &[u8]) -> Result<(), StoreError> {
    let conn = self.lock()?;
    conn
      .execute(
        "INSERT OR REPLACE INTO image_data (url, data) VALUES (?, ?)",
        params![url.as_str(), data],
      )
      .map_err(|e| StoreError::Write(e.to_string()))?;
    Ok(())
  }

  fn retrieve_data(&self, url: &Url) -> Result<Option<Vec<u8>>, StoreError> {
    let conn = self.lock()?;
    conn
      .query_row(
        "SELECT data FROM image_data WHERE url = ?",
        params![url.as_str()],
        |row| row.get(0),
      )
      .optional()
      .map_err(|e| StoreError::Read(e.to_string()))
  }
}

/// Parse an RFC 3339 timestamp written by `insert`.
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, StoreError> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| StoreError::Read(format!("failed to parse timestamp '{s}': {e}")))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(name: &str) -> PersistedFeedItem {
    PersistedFeedItem {
      id: Uuid::new_v4(),
      description: Some(name.to_string()),
      location: Some("a location".to_string()),
      url: Url::parse(&format!("https://example.com/{name}.jpg")).unwrap(),
    }
  }

  fn open_temp() -> (tempfile::TempDir, SqliteFeedStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteFeedStore::open_at(&dir.path().join("cache.db")).unwrap();
    (dir, store)
  }

  #[test]
  fn test_retrieve_on_empty_store_finds_nothing() {
    let (_dir, store) = open_temp();

    assert_eq!(store.retrieve(), Ok(None));
  }

  #[test]
  fn test_feed_round_trips_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");
    let feed = vec![item("first"), item("second")];
    let timestamp = Utc::now();

    {
      let store = SqliteFeedStore::open_at(&path).unwrap();
      store.insert(&feed, timestamp).unwrap();
    }

    let store = SqliteFeedStore::open_at(&path).unwrap();
    let cached = store.retrieve().unwrap().unwrap();

    assert_eq!(cached.feed, feed);
    assert_eq!(cached.timestamp, timestamp);
  }

  #[test]
  fn test_insert_replaces_previous_slot() {
    let (_dir, store) = open_temp();
    store.insert(&[item("old-a"), item("old-b")], Utc::now()).unwrap();

    let replacement = vec![item("new")];
    store.insert(&replacement, Utc::now()).unwrap();

    let cached = store.retrieve().unwrap().unwrap();
    assert_eq!(cached.feed, replacement);
  }

  #[test]
  fn test_delete_on_empty_store_is_a_noop() {
    let (_dir, store) = open_temp();

    assert_eq!(store.delete_cached_feed(), Ok(()));
  }

  #[test]
  fn test_delete_removes_the_slot() {
    let (_dir, store) = open_temp();
    store.insert(&[item("a")], Utc::now()).unwrap();

    store.delete_cached_feed().unwrap();

    assert_eq!(store.retrieve(), Ok(None));
  }

  #[test]
  fn test_items_keep_insertion_order() {
    let (_dir, store) = open_temp();
    let feed: Vec<_> = (0..10).map(|i| item(&format!("item-{i}"))).collect();

    store.insert(&feed, Utc::now()).unwrap();

    assert_eq!(store.retrieve().unwrap().unwrap().feed, feed);
  }

  #[test]
  fn test_image_data_round_trips_per_url() {
    let (_dir, store) = open_temp();
    let url_a = Url::parse("https://example.com/a.jpg").unwrap();
    let url_b = Url::parse("https://example.com/b.jpg").unwrap();

    store.insert_data(&url_a, b"a-bytes").unwrap();
    store.insert_data(&url_b, b"b-bytes").unwrap();
    store.insert_data(&url_a, b"a-bytes-2").unwrap();

    assert_eq!(store.retrieve_data(&url_a), Ok(Some(b"a-bytes-2".to_vec())));
    assert_eq!(store.retrieve_data(&url_b), Ok(Some(b"b-bytes".to_vec())));
  }
}
