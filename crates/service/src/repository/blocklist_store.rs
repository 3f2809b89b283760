use crate::domain::BlocklistDocument;
use crate::errors::ServiceError;
use async_trait::async_trait;

/// Mutation applied to the document inside one read-modify-write cycle.
pub type DocumentMutation =
    Box<dyn FnOnce(&mut BlocklistDocument) -> Result<(), ServiceError> + Send>;

/// Trait abstraction for blocklist document storage.
/// Implementations must re-read the persisted copy on every call.
#[async_trait]
pub trait BlocklistStore: Send + Sync {
    async fn read(&self) -> Result<BlocklistDocument, ServiceError>;
    async fn write(&self, doc: &BlocklistDocument) -> Result<(), ServiceError>;
    /// Read, apply `f`, then write. Nothing is written when `f` fails.
    async fn update(&self, f: DocumentMutation) -> Result<(), ServiceError>;
}
