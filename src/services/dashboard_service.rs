// src/services/dashboard_service.rs

use crate::{
    db::{ClientRepository, InvoiceRepository},
    models::dashboard::DashboardSummary,
    services::ledger,
};

#[derive(Clone)]
pub struct DashboardService {
    clients: ClientRepository,
    invoices: InvoiceRepository,
}

impl DashboardService {
    pub fn new(clients: ClientRepository, invoices: InvoiceRepository) -> Self {
        Self { clients, invoices }
    }

    pub async fn get_summary(&self) -> DashboardSummary {
        let total_clients = self.clients.count().await;
        let (invoices, total_invoices) = self.invoices.snapshot().await;
        ledger::compute_summary(total_clients, total_invoices, &invoices)
    }
}
