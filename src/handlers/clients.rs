// src/handlers/clients.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::{error::AppError, extract::AppJson, response::StatusMessage},
    config::AppState,
    db::client_repo::Saved,
    models::client::{Client, ClientPatch, SaveClientPayload},
};

// POST /save_client
#[utoipa::path(
    post,
    path = "/save_client",
    tag = "Clients",
    request_body = SaveClientPayload,
    responses(
        (status = 201, description = "Cliente criado", body = StatusMessage),
        (status = 200, description = "Cliente existente atualizado", body = StatusMessage),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Celular já cadastrado (modo reject)")
    )
)]
pub async fn save_client(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<SaveClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mobile_number = payload.mobile_number.clone();
    let saved = app_state
        .client_service
        .save_client(Client::from(payload))
        .await?;

    let (status, message) = match saved {
        Saved::Created => (StatusCode::CREATED, "Client added successfully!".to_string()),
        Saved::Updated => (
            StatusCode::OK,
            format!("Client with mobile number {mobile_number} updated."),
        ),
    };
    Ok((status, Json(StatusMessage::success(message))))
}

// GET /clients
#[utoipa::path(
    get,
    path = "/clients",
    tag = "Clients",
    responses(
        (status = 200, description = "Lista de clientes", body = Vec<Client>)
    )
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let clients = app_state.client_service.list_clients().await?;
    Ok((StatusCode::OK, Json(clients)))
}

// PUT /clients/{mobile_number}
#[utoipa::path(
    put,
    path = "/clients/{mobile_number}",
    tag = "Clients",
    request_body(content = Client, description = "Só os campos a atualizar"),
    params(
        ("mobile_number" = String, Path, description = "Celular do cliente")
    ),
    responses(
        (status = 200, description = "Cliente atualizado", body = StatusMessage),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado"),
        (status = 409, description = "Registro gravado ilegível")
    )
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    Path(mobile_number): Path<String>,
    AppJson(patch): AppJson<ClientPatch>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .client_service
        .update_client(&mobile_number, patch)
        .await?;

    Ok((
        StatusCode::OK,
        Json(StatusMessage::success(format!(
            "Client with mobile number {mobile_number} updated."
        ))),
    ))
}

// DELETE /clients/{mobile_number}
#[utoipa::path(
    delete,
    path = "/clients/{mobile_number}",
    tag = "Clients",
    params(
        ("mobile_number" = String, Path, description = "Celular do cliente")
    ),
    responses(
        (status = 200, description = "Cliente removido", body = StatusMessage),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    Path(mobile_number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.client_service.delete_client(&mobile_number).await?;

    Ok((
        StatusCode::OK,
        Json(StatusMessage::success(format!(
            "Client with mobile number {mobile_number} deleted."
        ))),
    ))
}
