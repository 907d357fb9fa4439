// src/models/client.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::{error::AppError, money::lenient_key};

// --- CLIENTE (O Dado) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Client {
    // Chave natural da coleção. Registros antigos sem celular ficam com "".
    #[serde(default, deserialize_with = "lenient_key")]
    #[schema(example = "9876543210")]
    pub mobile_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Maria da Silva")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "maria@email.com")]
    pub email: Option<String>,

    // Endereço flexível: o frontend manda string ou objeto.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Rua das Flores, 123 - Centro")]
    pub address: Option<Value>,

    // Qualquer outro campo enviado pelo frontend é guardado como veio
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

impl Client {
    /// Campos do cliente como objeto JSON (campos ausentes não aparecem).
    pub fn to_fields(&self) -> Result<Map<String, Value>, AppError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(anyhow::anyhow!("client did not serialize to an object").into()),
        }
    }

    /// Merge raso: cada campo de `patch` substitui o campo existente.
    pub fn merge(&mut self, patch: Map<String, Value>) -> Result<(), AppError> {
        let mut fields = self.to_fields()?;
        fields.extend(patch);

        *self = serde_json::from_value(Value::Object(fields)).map_err(|e| {
            AppError::InvalidInput(format!("Invalid client data: {e}"))
        })?;
        Ok(())
    }
}

// Atualização parcial: só os campos enviados
pub type ClientPatch = Map<String, Value>;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveClientPayload {
    #[serde(default, deserialize_with = "lenient_key")]
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "9876543210")]
    pub mobile_number: String,

    #[schema(example = "Maria da Silva")]
    pub name: Option<String>,

    #[schema(example = "maria@email.com")]
    pub email: Option<String>,

    pub address: Option<Value>,

    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

impl From<SaveClientPayload> for Client {
    fn from(payload: SaveClientPayload) -> Self {
        Self {
            mobile_number: payload.mobile_number,
            name: payload.name,
            email: payload.email,
            address: payload.address,
            extra: payload.extra,
        }
    }
}
