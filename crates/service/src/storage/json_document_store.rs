use std::{marker::PhantomData, path::{Path, PathBuf}, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::Mutex};
use tracing::warn;

use crate::errors::ServiceError;

/// Generic JSON file-backed single-document store.
///
/// Nothing is cached: every `read` goes to disk. A missing or unparsable file
/// is replaced by `T::default()`, which is persisted and returned. Writes
/// overwrite the whole file. All access goes through one lock, so a reader
/// never observes a half-written file and `update` cycles never interleave.
pub struct JsonDocumentStore<T> {
    file_path: PathBuf,
    lock: Mutex<()>,
    _doc: PhantomData<fn() -> T>,
}

impl<T> JsonDocumentStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Initialize the store from a path. Creates the parent directory and
    /// seeds the file with the default document if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
        }
        let store = Arc::new(Self { file_path, lock: Mutex::new(()), _doc: PhantomData });
        if fs::metadata(&store.file_path).await.is_err() {
            store.persist(&T::default()).await?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Load the document, resetting it to the default when absent or corrupt.
    pub async fn read(&self) -> Result<T, ServiceError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Overwrite the file with `doc`.
    pub async fn write(&self, doc: &T) -> Result<(), ServiceError> {
        let _guard = self.lock.lock().await;
        self.persist(doc).await
    }

    /// Read, mutate and persist under the store lock. Nothing is written if `f` fails.
    pub async fn update<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut T) -> Result<R, ServiceError>,
    {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        let out = f(&mut doc)?;
        self.persist(&doc).await?;
        Ok(out)
    }

    async fn load(&self) -> Result<T, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %self.file_path.display(), error = %e, "data file unreadable; resetting to defaults");
                return self.reset().await;
            }
        };
        match serde_json::from_slice::<T>(&bytes) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                warn!(path = %self.file_path.display(), error = %e, "data file corrupt; resetting to defaults");
                self.reset().await
            }
        }
    }

    async fn reset(&self) -> Result<T, ServiceError> {
        let doc = T::default();
        self.persist(&doc).await?;
        Ok(doc)
    }

    async fn persist(&self, doc: &T) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(doc).map_err(ServiceError::storage)?;
        fs::write(&self.file_path, data).await.map_err(ServiceError::storage)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Counter {
        hits: u32,
        label: String,
    }

    impl Default for Counter {
        fn default() -> Self {
            Self { hits: 0, label: "fresh".into() }
        }
    }

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("json_document_store_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_file_is_seeded_with_default() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonDocumentStore::<Counter>::new(&tmp).await?;
        assert_eq!(store.read().await?, Counter::default());
        let on_disk: Counter = serde_json::from_slice(&tokio::fs::read(&tmp).await?)?;
        assert_eq!(on_disk, Counter::default());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn update_persists_and_survives_reload() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonDocumentStore::<Counter>::new(&tmp).await?;
        let hits = store
            .update(|c| {
                c.hits += 2;
                Ok(c.hits)
            })
            .await?;
        assert_eq!(hits, 2);

        let reloaded = JsonDocumentStore::<Counter>::new(&tmp).await?;
        assert_eq!(reloaded.read().await?.hits, 2);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_update_writes_nothing() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonDocumentStore::<Counter>::new(&tmp).await?;
        let res: Result<(), _> = store
            .update(|c| {
                c.hits = 99;
                Err(ServiceError::invalid("nope"))
            })
            .await;
        assert!(matches!(res, Err(ServiceError::InvalidInput(_))));
        assert_eq!(store.read().await?.hits, 0);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_reset_to_default() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonDocumentStore::<Counter>::new(&tmp).await?;
        store.write(&Counter { hits: 5, label: "kept".into() }).await?;
        tokio::fs::write(&tmp, b"{not json").await?;

        assert_eq!(store.read().await?, Counter::default());
        let on_disk: Counter = serde_json::from_slice(&tokio::fs::read(&tmp).await?)?;
        assert_eq!(on_disk, Counter::default());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn deleted_file_is_recreated_on_read() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonDocumentStore::<Counter>::new(&tmp).await?;
        store.write(&Counter { hits: 3, label: "x".into() }).await?;
        tokio::fs::remove_file(&tmp).await?;

        assert_eq!(store.read().await?, Counter::default());
        assert!(tokio::fs::metadata(&tmp).await.is_ok());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_updates_are_not_lost() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonDocumentStore::<Counter>::new(&tmp).await?;
        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .update(|c| {
                        c.hits += 1;
                        Ok(())
                    })
                    .await
            }));
        }
        for h in handles {
            h.await??;
        }
        assert_eq!(store.read().await?.hits, 20);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
