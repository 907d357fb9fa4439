// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Erros de regra de negócio: 400 com a própria mensagem
    #[error("{0}")]
    InvalidInput(String),

    #[error("Client with this mobile number already exists.")]
    ClientAlreadyExists(String),

    #[error("Client with mobile number {0} not found.")]
    ClientNotFound(String),

    #[error("Invoice {0} not found.")]
    InvoiceNotFound(String),

    #[error("Invoice {0} is already fully paid.")]
    InvoiceAlreadyPaid(String),

    #[error("Payment exceeds remaining balance of {remaining}.")]
    PaymentExceedsBalance { remaining: Decimal },

    // Registro gravado com campos ilegíveis: só pode ser removido
    #[error("Stored record {0} is malformed and cannot be changed.")]
    MalformedRecord(String),

    // Corpo da requisição que não é o JSON esperado
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    // Falhas de leitura/escrita dos arquivos de coleção
    #[error("Erro de armazenamento: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("Erro de serialização: {0}")]
    SerializationError(#[from] serde_json::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidInput(_)
            | AppError::InvalidBody(_)
            | AppError::InvoiceAlreadyPaid(_)
            | AppError::PaymentExceedsBalance { .. } => StatusCode::BAD_REQUEST,
            AppError::ClientAlreadyExists(_) | AppError::MalformedRecord(_) => {
                StatusCode::CONFLICT
            }
            AppError::ClientNotFound(_) | AppError::InvoiceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::StorageError(_)
            | AppError::SerializationError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "status": "error",
                    "message": "One or more fields are invalid.",
                    "details": details,
                }));
                return (status, body).into_response();
            }

            // O detalhe dos erros internos só vai para o log, nunca para o cliente.
            e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                "An unexpected error occurred.".to_string()
            }

            e => e.to_string(),
        };

        let body = Json(json!({ "status": "error", "message": message }));
        (status, body).into_response()
    }
}
