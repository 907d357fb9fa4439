// src/services/ledger.rs

//! Regras de numeração, pagamento e totais das faturas.
//!
//! Funções puras: não sabem nada de HTTP nem de armazenamento.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::{
    common::{error::AppError, money::round_money},
    models::{dashboard::DashboardSummary, invoice::Invoice},
};

/// Quais números existentes entram no cálculo do próximo número.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberSource {
    /// Só números compostos apenas de dígitos ("07", "12").
    #[default]
    Numeric,
    /// Também o sufixo numérico de números mistos ("INV-0042" conta como 42).
    TrailingDigits,
}

impl FromStr for NumberSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numeric" => Ok(NumberSource::Numeric),
            "trailing_digits" => Ok(NumberSource::TrailingDigits),
            other => Err(format!(
                "unknown invoice number source `{other}` (expected `numeric` or `trailing_digits`)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberingPolicy {
    pub source: NumberSource,
    pub width: usize,
}

impl Default for NumberingPolicy {
    fn default() -> Self {
        Self {
            source: NumberSource::Numeric,
            width: 2,
        }
    }
}

impl NumberingPolicy {
    fn sequence_value(&self, invoice_number: &str) -> Option<u64> {
        let digits = match self.source {
            NumberSource::Numeric => invoice_number,
            NumberSource::TrailingDigits => {
                let prefix = invoice_number.trim_end_matches(|c: char| c.is_ascii_digit());
                &invoice_number[prefix.len()..]
            }
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Números grandes demais para u64 não participam da sequência
        digits.parse().ok()
    }
}

/// Decide o número da nova fatura.
///
/// Mantém `proposed` quando ele existe e não colide (comparação exata de
/// string) com nenhum número existente. Caso contrário devolve
/// `max(existentes numéricos) + 1`, ou `1`, com zeros à esquerda até
/// `policy.width`.
pub fn assign_invoice_number<'a>(
    existing: impl IntoIterator<Item = &'a str>,
    proposed: Option<&str>,
    policy: &NumberingPolicy,
) -> Result<String, AppError> {
    let proposed = proposed.map(str::trim).filter(|p| !p.is_empty());

    let mut collides = proposed.is_none();
    let mut max: Option<u64> = None;
    for number in existing {
        if Some(number) == proposed {
            collides = true;
        }
        if let Some(value) = policy.sequence_value(number) {
            max = Some(max.map_or(value, |m| m.max(value)));
        }
    }

    match proposed {
        Some(number) if !collides => Ok(number.to_string()),
        _ => {
            let next = match max {
                Some(m) => m.checked_add(1).ok_or_else(|| {
                    AppError::InvalidInput("Invoice number sequence exhausted.".to_string())
                })?,
                None => 1,
            };
            Ok(format!("{:0width$}", next, width = policy.width))
        }
    }
}

/// Regras de criação: valores não negativos e saldo entre 0 e o total.
/// Sem saldo informado, o saldo começa igual ao total.
pub fn prepare_new_invoice(invoice: &mut Invoice) -> Result<(), AppError> {
    invoice.normalize_legacy_fields();

    if invoice.total_amount.is_some_and(|t| t < Decimal::ZERO) {
        return Err(AppError::InvalidInput(
            "total_amount cannot be negative.".to_string(),
        ));
    }
    if invoice.remaining_balance.is_some_and(|b| b < Decimal::ZERO) {
        return Err(AppError::InvalidInput(
            "remaining_balance cannot be negative.".to_string(),
        ));
    }
    if let (Some(total), Some(balance)) = (invoice.total_amount, invoice.remaining_balance) {
        if balance > total {
            return Err(AppError::InvalidInput(
                "remaining_balance cannot exceed total_amount.".to_string(),
            ));
        }
    }

    if invoice.remaining_balance.is_none() {
        invoice.remaining_balance = invoice.total_amount;
    }
    Ok(())
}

/// Aplica um pagamento, guardando só o saldo restante.
pub fn record_payment(invoice: &mut Invoice, amount: Decimal) -> Result<Decimal, AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidInput("Invalid payment amount.".to_string()));
    }

    let balance = invoice.outstanding_balance();
    if balance <= Decimal::ZERO {
        return Err(AppError::InvoiceAlreadyPaid(
            invoice.invoice_number.clone().unwrap_or_default(),
        ));
    }
    if amount > balance {
        return Err(AppError::PaymentExceedsBalance { remaining: balance });
    }

    let remaining = round_money(balance - amount);
    invoice.remaining_balance = Some(remaining);
    Ok(remaining)
}

/// Totais do dashboard. Faturas sem `total_amount` contam como zero.
///
/// Os totais de clientes e faturas vêm à parte porque incluem os registros
/// ilegíveis, que não entram nas somas.
pub fn compute_summary(
    total_clients: usize,
    total_invoices: usize,
    invoices: &[Invoice],
) -> DashboardSummary {
    let total_amount: Decimal = invoices.iter().filter_map(|i| i.total_amount).sum();
    let total_unpaid: Decimal = invoices.iter().filter_map(|i| i.remaining_balance).sum();

    DashboardSummary {
        total_clients,
        total_invoices,
        total_paid_amount: round_money(total_amount - total_unpaid),
        total_unpaid_amount: round_money(total_unpaid),
    }
}
