// src/db/invoice_repo.rs

use std::sync::Arc;

use serde_json::Value;

use crate::{
    common::error::AppError,
    db::{
        backend::{CollectionBackend, CollectionName},
        collection::{Collection, CollectionRepository, Record},
    },
    models::invoice::Invoice,
};

impl Record for Invoice {
    const KEY_FIELD: &'static str = "invoice_number";

    fn key(&self) -> Option<&str> {
        self.invoice_number.as_deref()
    }

    fn normalize(&mut self) {
        self.normalize_legacy_fields();
    }
}

// O repositório de faturas, indexado pelo número da fatura
#[derive(Clone)]
pub struct InvoiceRepository {
    inner: CollectionRepository<Invoice>,
}

impl InvoiceRepository {
    pub async fn load(backend: Arc<dyn CollectionBackend>) -> Result<Self, AppError> {
        let inner = CollectionRepository::load(CollectionName::Invoices, backend).await?;
        Ok(Self { inner })
    }

    /// Todas as faturas como estão gravadas, na ordem.
    pub async fn list(&self) -> Result<Vec<Value>, AppError> {
        self.inner.read(|c| c.to_values()).await
    }

    /// Faturas legíveis e o total de entradas (legíveis ou não).
    pub async fn snapshot(&self) -> (Vec<Invoice>, usize) {
        self.inner
            .read(|c| (c.iter().cloned().collect(), c.len()))
            .await
    }

    /// Insere a fatura. `prepare` roda sob o mesmo lock da gravação e recebe
    /// a coleção atual, para que a numeração e o append sejam atômicos.
    pub async fn insert_with<F>(&self, mut invoice: Invoice, prepare: F) -> Result<Invoice, AppError>
    where
        F: FnOnce(&Collection<Invoice>, &mut Invoice) -> Result<(), AppError>,
    {
        self.inner
            .mutate(|invoices| {
                prepare(invoices, &mut invoice)?;
                invoices.push(invoice.clone());
                Ok(invoice)
            })
            .await
    }

    /// Aplica `change` à fatura e grava. Erro da closure cancela a gravação.
    pub async fn update_with<F>(&self, invoice_number: &str, change: F) -> Result<Invoice, AppError>
    where
        F: FnOnce(&mut Invoice) -> Result<(), AppError>,
    {
        self.inner
            .mutate(|invoices| {
                invoices
                    .update(invoice_number, |invoice| {
                        change(invoice)?;
                        Ok::<_, AppError>(invoice.clone())
                    })
                    .ok_or_else(|| AppError::InvoiceNotFound(invoice_number.to_string()))?
            })
            .await
    }

    pub async fn delete(&self, invoice_number: &str) -> Result<usize, AppError> {
        self.inner
            .mutate(|invoices| match invoices.remove(invoice_number) {
                0 => Err(AppError::InvoiceNotFound(invoice_number.to_string())),
                removed => Ok(removed),
            })
            .await
    }
}
