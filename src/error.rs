//! Error types shared across the loading pipeline.

use thiserror::Error;

/// Failure in the persistent cache store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
  #[error("failed to open the store: {0}")]
  Open(String),
  #[error("failed to read from the store: {0}")]
  Read(String),
  #[error("failed to write to the store: {0}")]
  Write(String),
  #[error("failed to delete from the store: {0}")]
  Delete(String),
}

/// Failure surfaced by feed, comment and image loaders.
///
/// Connectivity and invalid-data failures are never conflated: the former
/// means no response arrived at all, the latter that a response arrived but
/// was unusable. A stale cache is not an error anywhere in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
  /// Transport-level failure: the server could not be reached.
  #[error("could not reach the server")]
  Connectivity,
  /// A response arrived but had a bad status or a malformed body.
  #[error("invalid data in the server response")]
  InvalidData,
  /// The underlying persistence medium failed.
  #[error(transparent)]
  Store(#[from] StoreError),
  /// The requested data is not in the cache.
  #[error("not found in the cache")]
  NotFound,
}

/// Failure loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("no configuration file found")]
  NotFound,
  #[error("{0}")]
  Io(String),
  #[error("{0}")]
  Parse(String),
}
