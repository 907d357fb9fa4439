// src/db/json_file.rs

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::backend::{CollectionBackend, CollectionName},
};

/// Um arquivo JSON por coleção, cada um com um array no topo.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    clients_path: PathBuf,
    invoices_path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(data_dir: impl AsRef<Path>, clients_file: &str, invoices_file: &str) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            clients_path: data_dir.join(clients_file),
            invoices_path: data_dir.join(invoices_file),
        }
    }

    pub fn path_for(&self, collection: CollectionName) -> &Path {
        match collection {
            CollectionName::Clients => &self.clients_path,
            CollectionName::Invoices => &self.invoices_path,
        }
    }

    /// Garante que o diretório e os dois arquivos existam (com `[]`).
    pub async fn bootstrap(&self) -> Result<(), AppError> {
        for collection in [CollectionName::Clients, CollectionName::Invoices] {
            let path = self.path_for(collection);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).await?;
            }
            if fs::try_exists(path).await? {
                continue;
            }
            fs::write(path, "[]").await?;
            tracing::info!("📁 Arquivo de {} criado em {}", collection, path.display());
        }
        Ok(())
    }
}

#[async_trait]
impl CollectionBackend for JsonFileBackend {
    async fn load(&self, collection: CollectionName) -> Result<Vec<Value>, AppError> {
        let path = self.path_for(collection);

        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(
                    "⚠️ {} não existe. Começando com a coleção de {} vazia.",
                    path.display(),
                    collection
                );
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(records)) => Ok(records),
            Ok(_) => {
                tracing::warn!(
                    "⚠️ {} não contém um array JSON. Começando com lista vazia.",
                    path.display()
                );
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ {} está corrompido ({}). Começando com lista vazia.",
                    path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, collection: CollectionName, records: &[Value]) -> Result<(), AppError> {
        let path = self.path_for(collection);
        let body = serde_json::to_string_pretty(records)?;

        // Escreve num arquivo temporário ao lado e renomeia por cima:
        // quem lê nunca vê o arquivo pela metade.
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| collection.to_string());
        let tmp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        fs::write(&tmp_path, body).await?;
        if let Err(e) = fs::rename(&tmp_path, path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        tracing::debug!("{} registros gravados em {}", records.len(), path.display());
        Ok(())
    }
}
