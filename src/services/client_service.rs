// src/services/client_service.rs

use std::str::FromStr;

use serde_json::Value;

use crate::{
    common::error::AppError,
    db::{client_repo::Saved, ClientRepository},
    models::client::{Client, ClientPatch},
};

/// O que fazer quando o celular enviado no "save" já existe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientSaveMode {
    /// Mescla os campos enviados no cliente existente.
    #[default]
    Upsert,
    /// Recusa com 409.
    Reject,
}

impl FromStr for ClientSaveMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upsert" => Ok(ClientSaveMode::Upsert),
            "reject" => Ok(ClientSaveMode::Reject),
            other => Err(format!(
                "unknown client save mode `{other}` (expected `upsert` or `reject`)"
            )),
        }
    }
}

#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
    save_mode: ClientSaveMode,
}

impl ClientService {
    pub fn new(repo: ClientRepository, save_mode: ClientSaveMode) -> Self {
        Self { repo, save_mode }
    }

    pub async fn save_client(&self, client: Client) -> Result<Saved, AppError> {
        let mobile_number = client.mobile_number.clone();
        let saved = self
            .repo
            .save(client, self.save_mode == ClientSaveMode::Upsert)
            .await?;

        match saved {
            Saved::Created => tracing::info!("👤 Cliente {} criado", mobile_number),
            Saved::Updated => tracing::info!("👤 Cliente {} atualizado (upsert)", mobile_number),
        }
        Ok(saved)
    }

    pub async fn list_clients(&self) -> Result<Vec<Value>, AppError> {
        self.repo.list().await
    }

    pub async fn update_client(
        &self,
        mobile_number: &str,
        patch: ClientPatch,
    ) -> Result<Client, AppError> {
        // O celular é a chave: não pode ser trocado por aqui
        if let Some(new_mobile) = patch.get("mobile_number") {
            let same = match new_mobile {
                Value::String(s) => s == mobile_number,
                Value::Number(n) => n.to_string() == mobile_number,
                _ => false,
            };
            if !same {
                return Err(AppError::InvalidInput(
                    "mobile_number cannot be changed.".to_string(),
                ));
            }
        }

        let client = self.repo.update(mobile_number, patch).await?;
        tracing::info!("👤 Cliente {} atualizado", mobile_number);
        Ok(client)
    }

    pub async fn delete_client(&self, mobile_number: &str) -> Result<(), AppError> {
        self.repo.delete(mobile_number).await?;
        tracing::info!("🗑️ Cliente {} removido", mobile_number);
        Ok(())
    }
}
