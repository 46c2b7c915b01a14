//! Local store backed by one JSON file per key.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use super::LocalStore;
use crate::error::{WbgtError, WbgtResult};

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> WbgtResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(WbgtError::Cache(format!("Invalid cache key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl LocalStore for FileStore {
    async fn get(&self, key: &str) -> WbgtResult<Option<Value>> {
        let path = self.path_for(key)?;

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let value = serde_json::from_str(&content).map_err(|e| {
            WbgtError::Cache(format!("Could not parse {}: {}", path.display(), e))
        })?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: Value) -> WbgtResult<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        // Write to a temp file first so readers never see a half-written value
        let temp = self.dir.join(format!("{}.json.tmp", key));
        let content = serde_json::to_string_pretty(&value)?;

        tokio::fs::write(&temp, content).await?;
        tokio::fs::rename(&temp, &path).await?;
        Ok(())
    }
}
