//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::annotation::Annotation;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    lists: RwLock<HashMap<String, Vec<Annotation>>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, annotations: &[Annotation]) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let annotations = annotations.to_vec();
        Box::pin(async move {
            let mut lists = self
                .lists
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            lists.insert(id, annotations);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Vec<Annotation>>> {
        let id = id.to_string();
        Box::pin(async move {
            let lists = self
                .lists
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            lists.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut lists = self
                .lists
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            lists.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let lists = self
                .lists
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            Ok(lists.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let lists = self
                .lists
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            Ok(lists.contains_key(&id))
        })
    }
}
