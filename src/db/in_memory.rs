// src/db/in_memory.rs

//! Backend em memória: os dados vivem só enquanto o processo roda.
//! Também é o backend usado nos testes.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    common::error::AppError,
    db::backend::{CollectionBackend, CollectionName},
};

#[derive(Clone, Default)]
pub struct InMemoryBackend {
    collections: Arc<RwLock<HashMap<CollectionName, Vec<Value>>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Já começa com registros numa coleção.
    #[cfg(test)]
    pub fn with_records(collection: CollectionName, records: Vec<Value>) -> Self {
        let backend = Self::new();
        if let Ok(mut collections) = backend.collections.write() {
            collections.insert(collection, records);
        }
        backend
    }

    #[cfg(test)]
    pub fn snapshot(&self, collection: CollectionName) -> Vec<Value> {
        self.collections
            .read()
            .map(|c| c.get(&collection).cloned().unwrap_or_default())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CollectionBackend for InMemoryBackend {
    async fn load(&self, collection: CollectionName) -> Result<Vec<Value>, AppError> {
        let collections = self
            .collections
            .read()
            .map_err(|e| anyhow::anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(collections.get(&collection).cloned().unwrap_or_default())
    }

    async fn save(&self, collection: CollectionName, records: &[Value]) -> Result<(), AppError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| anyhow::anyhow!("Failed to acquire write lock: {}", e))?;

        collections.insert(collection, records.to_vec());
        Ok(())
    }
}
