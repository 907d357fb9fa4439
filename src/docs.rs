// src/docs.rs

use utoipa::OpenApi;
use crate::common;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Clients ---
        handlers::clients::save_client,
        handlers::clients::list_clients,
        handlers::clients::update_client,
        handlers::clients::delete_client,

        // --- Invoices ---
        handlers::invoices::save_invoice,
        handlers::invoices::list_invoices,
        handlers::invoices::delete_invoice,
        handlers::invoices::add_payment,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- Clients ---
            models::client::Client,
            models::client::SaveClientPayload,

            // --- Invoices ---
            models::invoice::Invoice,
            models::invoice::AddPaymentPayload,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,

            // --- Envelopes ---
            common::response::StatusMessage,
            common::response::InvoiceSaved,
            common::response::PaymentRecorded,
        )
    ),
    tags(
        (name = "Clients", description = "Cadastro de clientes (chave: celular)"),
        (name = "Invoices", description = "Faturas, numeração e pagamentos"),
        (name = "Dashboard", description = "Totais gerenciais")
    )
)]
pub struct ApiDoc;
