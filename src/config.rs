use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::storage::{StoreOptions, DEFAULT_BATCH_SIZE};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ErrstoreConfig {
    pub database: Option<String>,
    pub table_prefix: Option<String>,
    pub batch_size: Option<usize>,
}

impl ErrstoreConfig {
    pub fn database_path(&self) -> PathBuf {
        self.database
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path)
    }

    pub fn table_prefix(&self) -> &str {
        self.table_prefix.as_deref().unwrap_or("")
    }

    pub fn store_options(&self) -> crate::Result<StoreOptions> {
        StoreOptions::with_batch_size(self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("errstore.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("errstore.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<ErrstoreConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: ErrstoreConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &ErrstoreConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("errstore.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errstore.toml");
        let config = ErrstoreConfig {
            database: Some("runs/errors.db".to_string()),
            table_prefix: Some("feed_42_".to_string()),
            batch_size: Some(100),
        };

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.store_options().unwrap().batch_size(), 100);
    }

    #[test]
    fn test_defaults() {
        let config: ErrstoreConfig = toml::from_str("").unwrap();
        assert_eq!(config.database_path(), default_database_path());
        assert_eq!(config.table_prefix(), "");
        assert_eq!(config.store_options().unwrap().batch_size(), DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_zero_batch_size_is_invalid() {
        let config: ErrstoreConfig = toml::from_str("batch_size = 0").unwrap();
        assert!(matches!(config.store_options(), Err(crate::Error::Config(_))));
    }
}
