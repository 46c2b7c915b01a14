//! The JSON file holding the remote collections.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use wbgt_core::record::{Record, Site};
use wbgt_core::remote::Document;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Contents {
    #[serde(default)]
    pub sites: Vec<Site>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

pub struct DocumentFile {
    path: PathBuf,
}

impl DocumentFile {
    pub fn open(path: &str) -> Self {
        DocumentFile {
            path: PathBuf::from(shellexpand::tilde(path).into_owned()),
        }
    }

    /// A missing file is an empty store.
    pub fn load(&self) -> Result<Contents> {
        if !self.path.exists() {
            return Ok(Contents::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    fn save(&self, contents: &Contents) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let temp = temp_path(&self.path);
        std::fs::write(&temp, serde_json::to_string_pretty(contents)?)
            .with_context(|| format!("Failed to write {}", temp.display()))?;
        std::fs::rename(&temp, &self.path)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    pub fn insert(&self, record: Record) -> Result<String> {
        let mut contents = self.load()?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        contents.documents.push(Document {
            id: id.clone(),
            record,
        });
        self.save(&contents)?;
        tracing::info!(document_id = %id, "document inserted");
        Ok(id)
    }

    pub fn update(&self, document_id: &str, record: Record) -> Result<()> {
        let mut contents = self.load()?;
        let Some(document) = contents.documents.iter_mut().find(|d| d.id == document_id) else {
            bail!("No document with id '{}'", document_id);
        };
        document.record = record;
        self.save(&contents)
    }

    pub fn query_by_record_id(&self, record_id: &str) -> Result<Vec<Document>> {
        Ok(self
            .load()?
            .documents
            .into_iter()
            .filter(|d| d.record.id == record_id)
            .collect())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wbgt_core::slot::TimeSlot;

    fn record(id: &str) -> Record {
        let mut record = Record::new(
            Site::new("S1", "A工事"),
            NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(),
            TimeSlot::Morning,
            30.0,
            60.0,
            31.0,
        );
        record.id = id.to_string();
        record
    }

    fn file(dir: &tempfile::TempDir) -> DocumentFile {
        DocumentFile::open(&dir.path().join("remote.json").to_string_lossy())
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let contents = file(&dir).load().unwrap();
        assert!(contents.documents.is_empty());
        assert!(contents.sites.is_empty());
    }

    #[test]
    fn test_insert_query_update() {
        let dir = tempfile::tempdir().unwrap();
        let store = file(&dir);

        let doc_id = store.insert(record("a1")).unwrap();
        store.insert(record("a2")).unwrap();

        let found = store.query_by_record_id("a1").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, doc_id);

        let mut edited = record("a1");
        edited.wbgt = 25.0;
        store.update(&doc_id, edited).unwrap();

        assert_eq!(store.query_by_record_id("a1").unwrap()[0].record.wbgt, 25.0);
        assert_eq!(store.load().unwrap().documents.len(), 2);
    }

    #[test]
    fn test_update_unknown_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(file(&dir).update("nope", record("a1")).is_err());
    }

    #[test]
    fn test_sites_are_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("remote.json"),
            r#"{ "sites": [{ "id": "k1", "label": "A工事" }] }"#,
        )
        .unwrap();

        let contents = file(&dir).load().unwrap();
        assert_eq!(contents.sites, vec![Site::new("k1", "A工事")]);
    }
}
