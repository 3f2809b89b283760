use std::{path::PathBuf, sync::Arc};

use crate::domain::BlocklistDocument;
use crate::errors::ServiceError;
use crate::repository::blocklist_store::{BlocklistStore, DocumentMutation};
use crate::storage::json_document_store::JsonDocumentStore;

/// File store: persists the blocklist document as one JSON file.
#[derive(Clone)]
pub struct ExtensionStore {
    store: Arc<JsonDocumentStore<BlocklistDocument>>,
}

impl ExtensionStore {
    /// Initialize the store, seeding the default document if the file is missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonDocumentStore::<BlocklistDocument>::new(path).await?;
        Ok(Arc::new(Self { store }))
    }

    pub fn path(&self) -> &std::path::Path {
        self.store.path()
    }
}

#[async_trait::async_trait]
impl BlocklistStore for ExtensionStore {
    async fn read(&self) -> Result<BlocklistDocument, ServiceError> { self.store.read().await }
    async fn write(&self, doc: &BlocklistDocument) -> Result<(), ServiceError> { self.store.write(doc).await }
    async fn update(&self, f: DocumentMutation) -> Result<(), ServiceError> { self.store.update(f).await }
}
