use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::info;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tokio::sync::Mutex as AsyncMutex;

use crate::utils::error::CustomError;

/// Flat-file record store: one JSON array per collection under `data_dir`.
pub struct JsonStore {
    data_dir: PathBuf,
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        JsonStore {
            data_dir: data_dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Creates the data directory and seeds missing collections with `[]`.
    pub async fn init(&self, names: &[&str]) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir).await?;

        for name in names {
            let path = self.path_for(name);
            if fs::try_exists(&path).await? {
                continue;
            }
            fs::write(&path, b"[]").await?;
            info!("Seeded empty collection {}", path.display());
        }

        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn collection<T>(&self, name: &str) -> JsonCollection<T> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|p| p.into_inner());
            locks
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        JsonCollection {
            path: self.path_for(name),
            lock,
            _marker: PhantomData,
        }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", name))
    }
}

/// Handle on one collection file. Handles for the same name share a writer lock.
pub struct JsonCollection<T> {
    path: PathBuf,
    lock: Arc<AsyncMutex<()>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonCollection<T> {
    fn clone(&self) -> Self {
        JsonCollection {
            path: self.path.clone(),
            lock: self.lock.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub async fn load(&self) -> Result<Vec<T>, CustomError> {
        let raw = fs::read(&self.path).await.map_err(|e| {
            CustomError::StorageReadError(format!("{}: {}", self.path.display(), e))
        })?;

        serde_json::from_slice(&raw).map_err(|e| {
            CustomError::StorageReadError(format!("{}: {}", self.path.display(), e))
        })
    }

    /// Overwrites the whole collection. The file is replaced by rename, so a
    /// concurrent `load` sees either the old or the new array.
    pub async fn save(&self, records: &[T]) -> Result<(), CustomError> {
        let json = serde_json::to_vec_pretty(records).map_err(|e| {
            CustomError::StorageWriteError(format!("{}: {}", self.path.display(), e))
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json).await.map_err(|e| {
            CustomError::StorageWriteError(format!("{}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            CustomError::StorageWriteError(format!("{}: {}", self.path.display(), e))
        })
    }

    /// Read-modify-write under the collection's writer lock. Nothing is
    /// written when `apply` fails.
    pub async fn modify<R, F>(&self, apply: F) -> Result<R, CustomError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, CustomError>,
    {
        let _guard = self.lock.lock().await;

        let mut records = self.load().await?;
        let out = apply(&mut records)?;
        self.save(&records).await?;

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: u32,
        text: String,
    }

    fn note(id: u32, text: &str) -> Note {
        Note {
            id,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());

        let err = store.collection::<Note>("notes").load().await.unwrap_err();
        assert!(matches!(err, CustomError::StorageReadError(_)));
    }

    #[tokio::test]
    async fn corrupt_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.json"), "{ not an array").unwrap();
        let store = JsonStore::new(dir.path());

        let err = store.collection::<Note>("notes").load().await.unwrap_err();
        assert!(matches!(err, CustomError::StorageReadError(_)));
    }

    #[tokio::test]
    async fn init_seeds_only_missing_collections() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        let store = JsonStore::new(&data);
        store.init(&["notes"]).await.unwrap();

        let notes = store.collection::<Note>("notes");
        assert!(notes.load().await.unwrap().is_empty());

        notes.save(&[note(1, "kept")]).await.unwrap();
        store.init(&["notes"]).await.unwrap();
        assert_eq!(notes.load().await.unwrap(), vec![note(1, "kept")]);
    }

    #[tokio::test]
    async fn save_writes_pretty_json_array() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        let notes = store.collection::<Note>("notes");

        notes.save(&[note(1, "a"), note(2, "b")]).await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("notes.json")).unwrap();
        assert!(raw.starts_with("[\n  {"));
        assert!(!dir.path().join("notes.json.tmp").exists());
        assert_eq!(notes.load().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_modify_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        let notes = store.collection::<Note>("notes");
        notes.save(&[note(1, "a")]).await.unwrap();

        let result: Result<(), _> = notes
            .modify(|records| {
                records.clear();
                Err(CustomError::NotFoundError("nope".into()))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(notes.load().await.unwrap(), vec![note(1, "a")]);
    }

    #[tokio::test]
    async fn concurrent_modifies_do_not_lose_updates() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonStore::new(dir.path()));
        store.collection::<Note>("notes").save(&[]).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..20u32 {
            let notes = store.collection::<Note>("notes");
            handles.push(tokio::spawn(async move {
                notes
                    .modify(|records| {
                        records.push(note(i, "x"));
                        Ok(())
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let notes = store.collection::<Note>("notes").load().await.unwrap();
        assert_eq!(notes.len(), 20);
    }
}
