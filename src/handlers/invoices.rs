// src/handlers/invoices.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{
        error::AppError,
        extract::AppJson,
        response::{InvoiceSaved, PaymentRecorded, StatusMessage},
    },
    config::AppState,
    models::invoice::{AddPaymentPayload, Invoice},
};

// POST /save_invoice
#[utoipa::path(
    post,
    path = "/save_invoice",
    tag = "Invoices",
    request_body = Invoice,
    responses(
        (status = 201, description = "Fatura salva (número atribuído se faltava ou colidia)", body = InvoiceSaved),
        (status = 400, description = "Valores inválidos")
    )
)]
pub async fn save_invoice(
    State(app_state): State<AppState>,
    AppJson(invoice): AppJson<Invoice>,
) -> Result<impl IntoResponse, AppError> {
    let saved = app_state.invoice_service.save_invoice(invoice).await?;

    Ok((
        StatusCode::CREATED,
        Json(InvoiceSaved {
            status: "success",
            message: "Invoice saved successfully!".to_string(),
            invoice_number: saved.invoice_number.unwrap_or_default(),
        }),
    ))
}

// GET /invoices e GET /dashboard/invoices (o frontend chama as duas)
#[utoipa::path(
    get,
    path = "/invoices",
    tag = "Invoices",
    responses(
        (status = 200, description = "Lista de faturas", body = Vec<Invoice>)
    )
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let invoices = app_state.invoice_service.list_invoices().await?;
    Ok((StatusCode::OK, Json(invoices)))
}

// DELETE /invoices/{invoice_number}
#[utoipa::path(
    delete,
    path = "/invoices/{invoice_number}",
    tag = "Invoices",
    params(
        ("invoice_number" = String, Path, description = "Número da fatura")
    ),
    responses(
        (status = 200, description = "Fatura removida", body = StatusMessage),
        (status = 404, description = "Fatura não encontrada")
    )
)]
pub async fn delete_invoice(
    State(app_state): State<AppState>,
    Path(invoice_number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .invoice_service
        .delete_invoice(&invoice_number)
        .await?;

    Ok((
        StatusCode::OK,
        Json(StatusMessage::success(format!(
            "Invoice {invoice_number} deleted."
        ))),
    ))
}

// PUT /invoices/{invoice_number}/add_payment
#[utoipa::path(
    put,
    path = "/invoices/{invoice_number}/add_payment",
    tag = "Invoices",
    request_body = AddPaymentPayload,
    params(
        ("invoice_number" = String, Path, description = "Número da fatura")
    ),
    responses(
        (status = 200, description = "Pagamento registrado", body = PaymentRecorded),
        (status = 400, description = "Valor inválido, fatura quitada ou valor acima do saldo"),
        (status = 404, description = "Fatura não encontrada"),
        (status = 409, description = "Registro gravado ilegível")
    )
)]
pub async fn add_payment(
    State(app_state): State<AppState>,
    Path(invoice_number): Path<String>,
    AppJson(payload): AppJson<AddPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = app_state
        .invoice_service
        .add_payment(&invoice_number, payload.amount_paid)
        .await?;

    Ok((
        StatusCode::OK,
        Json(PaymentRecorded {
            status: "success",
            message: "Payment recorded successfully.".to_string(),
            remaining_balance: invoice.remaining_balance.unwrap_or_default(),
            invoice_number,
        }),
    ))
}
