//! Local filesystem record store.
//!
//! Keeps every offer in a single JSON document. Writes go to a temp file
//! first and are renamed into place, so a failed persist leaves the previous
//! document untouched.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── config.toml           # Scraper configuration
//! └── jobs.json             # StoredJobs document
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::JobOffer;
use crate::storage::{RecordStore, StoreSummary, StoredJobs};

/// Default document name inside the root directory.
pub const DEFAULT_JOBS_FILE: &str = "jobs.json";

/// JSON-file record store.
pub struct LocalRecordStore {
    root_dir: PathBuf,
    jobs_file: String,
    /// Serializes read-modify-write cycles within the process
    write_lock: Mutex<()>,
}

impl LocalRecordStore {
    /// Create a store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self::with_file(root_dir, DEFAULT_JOBS_FILE)
    }

    /// Create a store using a custom document name.
    pub fn with_file(root_dir: impl Into<PathBuf>, jobs_file: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            jobs_file: jobs_file.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Full path of the jobs document.
    pub fn jobs_path(&self) -> PathBuf {
        self.path(&self.jobs_file)
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn read_document(&self) -> Result<Option<StoredJobs>> {
        self.read_json(&self.jobs_file).await.map_err(|e| {
            AppError::storage(format!(
                "Failed to read {}: {}",
                self.jobs_path().display(),
                e
            ))
        })
    }

    /// Count stored offers per source.
    pub async fn summary(&self) -> Result<StoreSummary> {
        let Some(doc) = self.read_document().await? else {
            return Ok(StoreSummary::default());
        };

        let mut summary = StoreSummary {
            total: doc.jobs.len(),
            updated_at: Some(doc.updated_at),
            ..StoreSummary::default()
        };
        for job in &doc.jobs {
            *summary.by_source.entry(job.source).or_default() += 1;
        }
        Ok(summary)
    }
}

/// Replace offers with a matching link in place, append the rest.
fn upsert(existing: &mut Vec<JobOffer>, offers: &[JobOffer]) -> (usize, usize) {
    let mut index: HashMap<String, usize> = existing
        .iter()
        .enumerate()
        .map(|(i, job)| (job.link.clone(), i))
        .collect();

    let mut inserted = 0;
    let mut updated = 0;
    for offer in offers {
        match index.get(&offer.link) {
            Some(&i) => {
                existing[i] = offer.clone();
                updated += 1;
            }
            None => {
                index.insert(offer.link.clone(), existing.len());
                existing.push(offer.clone());
                inserted += 1;
            }
        }
    }
    (inserted, updated)
}

#[async_trait]
impl RecordStore for LocalRecordStore {
    async fn known_links(&self) -> Result<HashSet<String>> {
        let links = self
            .read_document()
            .await?
            .map(|doc| doc.jobs.into_iter().map(|job| job.link).collect())
            .unwrap_or_default();
        Ok(links)
    }

    async fn persist(&self, offers: &[JobOffer]) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut jobs = self
            .read_document()
            .await?
            .map(|doc| doc.jobs)
            .unwrap_or_default();
        let (inserted, updated) = upsert(&mut jobs, offers);

        let document = StoredJobs::new(jobs);
        self.write_json(&self.jobs_file, &document)
            .await
            .map_err(|e| {
                AppError::storage(format!(
                    "Failed to write {}: {}",
                    self.jobs_path().display(),
                    e
                ))
            })?;

        log::info!(
            "Saved {} jobs to {} ({} new, {} updated, {} total)",
            offers.len(),
            self.jobs_path().display(),
            inserted,
            updated,
            document.count
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobSource;
    use chrono::Utc;
    use tempfile::TempDir;

    fn offer(link: &str, title: &str, source: JobSource) -> JobOffer {
        JobOffer {
            link: link.to_string(),
            title: title.to_string(),
            company: None,
            location: None,
            source,
            salary: None,
            years_experience: None,
            skills: Vec::new(),
            posted_date: None,
            expiration_date: None,
            raw_text_snapshot: None,
            ingested_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let store = LocalRecordStore::new(tmp.path());

        store.write_bytes("test.txt", b"hello").await.unwrap();
        let data = store.read_bytes("test.txt").await.unwrap();
        assert_eq!(data, Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn test_empty_store() {
        let tmp = TempDir::new().unwrap();
        let store = LocalRecordStore::new(tmp.path());

        assert!(store.known_links().await.unwrap().is_empty());
        assert!(store.read_document().await.unwrap().is_none());
        assert_eq!(store.summary().await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_persist_then_known_links() {
        let tmp = TempDir::new().unwrap();
        let store = LocalRecordStore::new(tmp.path());

        store
            .persist(&[
                offer("https://a/1", "One", JobSource::Pracuj),
                offer("https://a/2", "Two", JobSource::JustJoin),
            ])
            .await
            .unwrap();

        let links = store.known_links().await.unwrap();
        assert_eq!(links.len(), 2);
        assert!(links.contains("https://a/1"));
        assert!(tmp.path().join("jobs.json").exists());
        assert!(!tmp.path().join("jobs.tmp").exists());
    }

    #[tokio::test]
    async fn test_persist_upserts_by_link() {
        let tmp = TempDir::new().unwrap();
        let store = LocalRecordStore::new(tmp.path());

        store
            .persist(&[
                offer("https://a/1", "Old", JobSource::Pracuj),
                offer("https://a/2", "Keep", JobSource::Pracuj),
            ])
            .await
            .unwrap();
        store
            .persist(&[
                offer("https://a/1", "New", JobSource::Pracuj),
                offer("https://a/3", "Added", JobSource::NoFluffJobs),
            ])
            .await
            .unwrap();

        let jobs = store.read_document().await.unwrap().unwrap().jobs;
        let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Keep", "Added"]);

        let summary = store.summary().await.unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_source[&JobSource::Pracuj], 2);
        assert_eq!(summary.by_source[&JobSource::NoFluffJobs], 1);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_storage_error() {
        let tmp = TempDir::new().unwrap();
        let store = LocalRecordStore::with_file(tmp.path(), "broken.json");
        store.write_bytes("broken.json", b"{not json").await.unwrap();

        let err = store.known_links().await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert!(store
            .persist(&[offer("https://a/1", "One", JobSource::Pracuj)])
            .await
            .is_err());
    }

    #[test]
    fn test_upsert_later_write_wins_within_batch() {
        let mut existing = Vec::new();
        let (inserted, updated) = upsert(
            &mut existing,
            &[
                offer("https://a/1", "First", JobSource::Pracuj),
                offer("https://a/1", "Second", JobSource::Pracuj),
            ],
        );
        assert_eq!((inserted, updated), (1, 1));
        assert_eq!(existing.len(), 1);
        assert_eq!(existing[0].title, "Second");
    }
}
