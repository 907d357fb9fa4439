// src/common/response.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// Envelope padrão de sucesso: { "status": "success", "message": "..." }
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusMessage {
    #[schema(example = "success")]
    pub status: &'static str,
    #[schema(example = "Client added successfully!")]
    pub message: String,
}

impl StatusMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }
}

// Resposta do POST /save_invoice (o frontend precisa do número atribuído)
#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceSaved {
    #[schema(example = "success")]
    pub status: &'static str,
    #[schema(example = "Invoice saved successfully!")]
    pub message: String,
    #[schema(example = "03")]
    pub invoice_number: String,
}

// Resposta do PUT /invoices/{number}/add_payment
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentRecorded {
    #[schema(example = "success")]
    pub status: &'static str,
    #[schema(example = "Payment recorded successfully.")]
    pub message: String,
    #[schema(example = "03")]
    pub invoice_number: String,
    #[schema(value_type = f64, example = 40.0)]
    pub remaining_balance: Decimal,
}
