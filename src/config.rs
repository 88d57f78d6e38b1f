use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub api: ApiConfig,
  #[serde(default)]
  pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Base URL of the feed API, e.g. "https://example.com/essential-feed"
  pub base_url: Url,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
  /// Database file override (default: platform data dir, feedkit/cache.db)
  pub db_path: Option<PathBuf>,
  /// Validity window in days (default: 7)
  pub max_age_days: Option<u64>,
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./feedkit.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/feedkit/config.yaml
  pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
    let path = match path {
      Some(p) => p.to_path_buf(),
      None => Self::find_config()?,
    };

    let contents = std::fs::read_to_string(&path)
      .map_err(|e| ConfigError::Io(format!("failed to read {}: {}", path.display(), e)))?;

    serde_yaml::from_str(&contents)
      .map_err(|e| ConfigError::Parse(format!("failed to parse {}: {}", path.display(), e)))
  }

  fn find_config() -> Result<PathBuf, ConfigError> {
    let local = PathBuf::from("feedkit.yaml");
    if local.exists() {
      return Ok(local);
    }

    let config_dir = dirs::config_dir()
      .ok_or_else(|| ConfigError::Io("could not determine config directory".to_string()))?;
    let path = config_dir.join("feedkit").join("config.yaml");
    if path.exists() {
      return Ok(path);
    }

    Err(ConfigError::NotFound)
  }

  /// Minimal in-code configuration for embedding without a config file.
  pub fn with_base_url(base_url: Url) -> Self {
    Self {
      api: ApiConfig { base_url },
      cache: CacheConfig::default(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parses_full_config() {
    let yaml = r#"
api:
  base_url: https://example.com/essential-feed
cache:
  db_path: /tmp/feedkit/cache.db
  max_age_days: 3
"#;

    let config: Config = serde_yaml::from_str(yaml).unwrap();

    assert_eq!(
      config.api.base_url.as_str(),
      "https://example.com/essential-feed"
    );
    assert_eq!(
      config.cache.db_path.as_deref(),
      Some(Path::new("/tmp/feedkit/cache.db"))
    );
    assert_eq!(config.cache.max_age_days, Some(3));
  }

  #[test]
  fn test_cache_section_is_optional() {
    let yaml = "api:\n  base_url: https://example.com\n";

    let config: Config = serde_yaml::from_str(yaml).unwrap();

    assert_eq!(config.cache.db_path, None);
    assert_eq!(config.cache.max_age_days, None);
  }
}
