use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{
    normalize_extension, BlockedExtensions, CustomExtension, FixedExtension, MAX_CUSTOM_EXTENSIONS,
    MAX_EXTENSION_LEN,
};
use crate::errors::ServiceError;
use crate::repository::blocklist_store::BlocklistStore;

/// Blocklist operations: validation, uniqueness and cap rules over the stored document.
///
/// Holds no document state; every call goes back to the store.
#[derive(Clone)]
pub struct ExtensionService {
    store: Arc<dyn BlocklistStore>,
}

impl ExtensionService {
    pub fn new(store: Arc<dyn BlocklistStore>) -> Self {
        Self { store }
    }

    /// Fixed extensions ordered by identifier.
    pub async fn list_fixed(&self) -> Result<Vec<FixedExtension>, ServiceError> {
        let mut fixed = self.store.read().await?.fixed_extensions;
        fixed.sort_by(|a, b| a.extension.cmp(&b.extension));
        Ok(fixed)
    }

    /// Set the blocked flag of a fixed extension.
    pub async fn set_fixed_blocked(&self, extension: &str, blocked: bool) -> Result<(), ServiceError> {
        let target = normalize_extension(extension);
        let ext = target.clone();
        self.store
            .update(Box::new(move |doc| {
                let entry = doc
                    .fixed_extensions
                    .iter_mut()
                    .find(|e| e.extension == ext)
                    .ok_or_else(|| ServiceError::not_found("Extension not found"))?;
                entry.blocked = blocked;
                Ok(())
            }))
            .await?;
        info!(extension = %target, blocked, "fixed extension updated");
        Ok(())
    }

    /// Custom extensions, newest first. Entries sharing a timestamp keep insertion order.
    pub async fn list_custom(&self) -> Result<Vec<CustomExtension>, ServiceError> {
        let mut custom = self.store.read().await?.custom_extensions;
        custom.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(custom)
    }

    /// Validate, normalize and append a custom extension; returns the stored identifier.
    pub async fn add_custom(&self, raw: &str) -> Result<String, ServiceError> {
        if raw.is_empty() {
            return Err(ServiceError::invalid("Extension is required"));
        }
        let normalized = normalize_extension(raw);
        if normalized.is_empty() || normalized.chars().count() > MAX_EXTENSION_LEN {
            return Err(ServiceError::invalid("Invalid extension"));
        }

        let ext = normalized.clone();
        self.store
            .update(Box::new(move |doc| {
                if doc.is_fixed(&ext) {
                    return Err(ServiceError::conflict("Already in fixed extensions"));
                }
                if doc.custom_extensions.len() >= MAX_CUSTOM_EXTENSIONS {
                    return Err(ServiceError::CapacityExceeded(MAX_CUSTOM_EXTENSIONS));
                }
                if doc.has_custom(&ext) {
                    return Err(ServiceError::conflict("Extension already exists"));
                }
                doc.custom_extensions.push(CustomExtension { extension: ext, created_at: Utc::now() });
                Ok(())
            }))
            .await?;
        info!(extension = %normalized, "custom extension added");
        Ok(normalized)
    }

    /// Remove one custom extension.
    pub async fn delete_custom(&self, extension: &str) -> Result<(), ServiceError> {
        let target = normalize_extension(extension);
        let ext = target.clone();
        self.store
            .update(Box::new(move |doc| {
                let idx = doc
                    .custom_extensions
                    .iter()
                    .position(|e| e.extension == ext)
                    .ok_or_else(|| ServiceError::not_found("Not found"))?;
                doc.custom_extensions.remove(idx);
                Ok(())
            }))
            .await?;
        info!(extension = %target, "custom extension deleted");
        Ok(())
    }

    /// Everything currently blocked: fixed first, then custom, in stored order.
    pub async fn blocked(&self) -> Result<BlockedExtensions, ServiceError> {
        let doc = self.store.read().await?;
        Ok(BlockedExtensions::from(&doc))
    }
}
