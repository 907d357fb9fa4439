// src/db/backend.rs

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::common::error::AppError;

// As duas coleções persistidas pelo sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionName {
    Clients,
    Invoices,
}

impl CollectionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionName::Clients => "clients",
            CollectionName::Invoices => "invoices",
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistência de uma coleção inteira, injetada nos repositórios.
///
/// `load` nunca falha por arquivo ausente ou corrompido: devolve uma lista
/// vazia e registra um aviso. `save` substitui todo o conteúdo anterior.
#[async_trait]
pub trait CollectionBackend: Send + Sync {
    async fn load(&self, collection: CollectionName) -> Result<Vec<Value>, AppError>;

    async fn save(&self, collection: CollectionName, records: &[Value]) -> Result<(), AppError>;
}
