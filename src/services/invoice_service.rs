// src/services/invoice_service.rs

use rust_decimal::Decimal;
use serde_json::Value;

use crate::{
    common::error::AppError,
    db::InvoiceRepository,
    models::invoice::Invoice,
    services::ledger::{self, NumberingPolicy},
};

#[derive(Clone)]
pub struct InvoiceService {
    repo: InvoiceRepository,
    numbering: NumberingPolicy,
}

impl InvoiceService {
    pub fn new(repo: InvoiceRepository, numbering: NumberingPolicy) -> Self {
        Self { repo, numbering }
    }

    /// Grava a fatura, atribuindo um número novo se faltar ou colidir.
    pub async fn save_invoice(&self, invoice: Invoice) -> Result<Invoice, AppError> {
        let numbering = self.numbering;

        let saved = self
            .repo
            .insert_with(invoice, |existing, invoice| {
                ledger::prepare_new_invoice(invoice)?;

                let proposed = invoice.invoice_number.as_deref();
                let assigned = ledger::assign_invoice_number(
                    existing.keys(),
                    proposed,
                    &numbering,
                )?;

                if proposed.is_some_and(|p| p != assigned) {
                    tracing::info!(
                        "🔁 Número de fatura duplicado detectado. Atribuindo novo número: {}",
                        assigned
                    );
                }
                invoice.invoice_number = Some(assigned);
                Ok(())
            })
            .await?;

        tracing::info!(
            "🧾 Fatura {} salva",
            saved.invoice_number.as_deref().unwrap_or_default()
        );
        Ok(saved)
    }

    pub async fn list_invoices(&self) -> Result<Vec<Value>, AppError> {
        self.repo.list().await
    }

    pub async fn delete_invoice(&self, invoice_number: &str) -> Result<(), AppError> {
        let removed = self.repo.delete(invoice_number).await?;
        tracing::info!("🗑️ Fatura {} removida ({} registro(s))", invoice_number, removed);
        Ok(())
    }

    /// Registra um pagamento e devolve a fatura com o saldo novo.
    pub async fn add_payment(
        &self,
        invoice_number: &str,
        amount: Option<Decimal>,
    ) -> Result<Invoice, AppError> {
        let amount = amount
            .ok_or_else(|| AppError::InvalidInput("Invalid payment amount.".to_string()))?;

        let invoice = self
            .repo
            .update_with(invoice_number, |invoice| {
                ledger::record_payment(invoice, amount).map(|_| ())
            })
            .await?;

        tracing::info!(
            "💰 Pagamento de {} registrado na fatura {}. Saldo: {}",
            amount,
            invoice_number,
            invoice.remaining_balance.unwrap_or_default()
        );
        Ok(invoice)
    }
}
