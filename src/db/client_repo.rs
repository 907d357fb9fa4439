// src/db/client_repo.rs

use std::sync::Arc;

use serde_json::Value;

use crate::{
    common::error::AppError,
    db::{
        backend::{CollectionBackend, CollectionName},
        collection::{CollectionRepository, Record},
    },
    models::client::{Client, ClientPatch},
};

impl Record for Client {
    const KEY_FIELD: &'static str = "mobile_number";

    fn key(&self) -> Option<&str> {
        Some(self.mobile_number.as_str()).filter(|m| !m.is_empty())
    }
}

// Resultado de um "save" de cliente
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saved {
    Created,
    Updated,
}

// O repositório de clientes, indexado pelo número de celular
#[derive(Clone)]
pub struct ClientRepository {
    inner: CollectionRepository<Client>,
}

impl ClientRepository {
    pub async fn load(backend: Arc<dyn CollectionBackend>) -> Result<Self, AppError> {
        let inner = CollectionRepository::load(CollectionName::Clients, backend).await?;
        Ok(Self { inner })
    }

    /// Todos os clientes como estão gravados, na ordem.
    pub async fn list(&self) -> Result<Vec<Value>, AppError> {
        self.inner.read(|c| c.to_values()).await
    }

    pub async fn count(&self) -> usize {
        self.inner.read(|c| c.len()).await
    }

    /// Cria o cliente, ou (com `merge_existing`) mescla os campos num já existente.
    pub async fn save(&self, client: Client, merge_existing: bool) -> Result<Saved, AppError> {
        self.inner
            .mutate(|clients| {
                let mobile_number = client.mobile_number.clone();
                if !clients.contains_key(&mobile_number) {
                    clients.push(client);
                    return Ok(Saved::Created);
                }
                if !merge_existing {
                    return Err(AppError::ClientAlreadyExists(mobile_number));
                }

                let patch = client.to_fields()?;
                clients
                    .update(&mobile_number, |existing| existing.merge(patch))
                    .ok_or_else(|| AppError::ClientNotFound(mobile_number.clone()))??;
                Ok(Saved::Updated)
            })
            .await
    }

    // Merge raso dos campos enviados sobre o cliente existente
    pub async fn update(&self, mobile_number: &str, patch: ClientPatch) -> Result<Client, AppError> {
        self.inner
            .mutate(|clients| {
                clients
                    .update(mobile_number, |existing| {
                        existing.merge(patch)?;
                        Ok::<_, AppError>(existing.clone())
                    })
                    .ok_or_else(|| AppError::ClientNotFound(mobile_number.to_string()))?
            })
            .await
    }

    pub async fn delete(&self, mobile_number: &str) -> Result<(), AppError> {
        self.inner
            .mutate(|clients| match clients.remove(mobile_number) {
                0 => Err(AppError::ClientNotFound(mobile_number.to_string())),
                _ => Ok(()),
            })
            .await
    }
}
