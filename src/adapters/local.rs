use crate::domain::model::RawObject;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem-backed storage. Keys are paths relative to the base
/// directory, using `/` separators as written by the collector.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn collect_files(dir: &Path, base: &Path, out: &mut Vec<RawObject>) -> std::io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                Self::collect_files(&path, base, out)?;
            } else {
                let key = path
                    .strip_prefix(base)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .replace('\\', "/");
                let modified = entry
                    .metadata()
                    .and_then(|m| m.modified())
                    .ok()
                    .map(DateTime::<Utc>::from);
                out.push(RawObject { key, modified });
            }
        }
        Ok(())
    }
}

impl Storage for LocalStorage {
    async fn list_files(&self, prefix: &str) -> Result<Vec<RawObject>> {
        let base = PathBuf::from(&self.base_path);
        if !base.exists() {
            return Ok(Vec::new());
        }

        let mut objects = Vec::new();
        Self::collect_files(&base, &base, &mut objects)?;
        objects.retain(|obj| obj.key.starts_with(prefix));
        Ok(objects)
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_in(dir: &TempDir) -> LocalStorage {
        LocalStorage::new(dir.path().to_string_lossy().to_string())
    }

    #[tokio::test]
    async fn test_write_then_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        storage
            .write_file("year=2025/month=01/day=01/batch.json", b"[]")
            .await
            .unwrap();

        let data = storage
            .read_file("year=2025/month=01/day=01/batch.json")
            .await
            .unwrap();
        assert_eq!(data, b"[]");
    }

    #[tokio::test]
    async fn test_list_files_walks_partitions() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        storage
            .write_file("year=2025/month=01/day=01/a.json", b"[]")
            .await
            .unwrap();
        storage
            .write_file("year=2025/month=01/day=02/b.json", b"[]")
            .await
            .unwrap();

        let mut keys: Vec<String> = storage
            .list_files("")
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();
        keys.sort();

        assert_eq!(
            keys,
            vec![
                "year=2025/month=01/day=01/a.json",
                "year=2025/month=01/day=02/b.json"
            ]
        );
    }

    #[tokio::test]
    async fn test_list_files_filters_by_prefix() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        storage.write_file("year=2025/a.json", b"[]").await.unwrap();
        storage.write_file("year=2024/b.json", b"[]").await.unwrap();

        let objects = storage.list_files("year=2025/").await.unwrap();

        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].key, "year=2025/a.json");
    }

    #[tokio::test]
    async fn test_list_files_reports_modified_time() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        storage.write_file("a.json", b"[]").await.unwrap();

        let objects = storage.list_files("").await.unwrap();
        assert!(objects[0].modified.is_some());
    }

    #[tokio::test]
    async fn test_list_files_on_missing_base_is_empty() {
        let storage = LocalStorage::new("/nonexistent/base/dir".to_string());

        assert!(storage.list_files("").await.unwrap().is_empty());
    }
}
