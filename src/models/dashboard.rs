// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// Os cards do topo do dashboard
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardSummary {
    #[schema(example = 12)]
    pub total_clients: usize,
    #[schema(example = 30)]
    pub total_invoices: usize,
    #[schema(value_type = f64, example = 110.0)]
    pub total_paid_amount: Decimal, // Total faturado menos o que falta receber
    #[schema(value_type = f64, example = 40.0)]
    pub total_unpaid_amount: Decimal, // Soma dos saldos em aberto
}
