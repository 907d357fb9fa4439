// src/models/invoice.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::common::money::{amount_or_none, decimal_from_value, lenient_decimal, lenient_string};

// Nome antigo do saldo, ainda presente em arquivos gravados por versões anteriores
const LEGACY_BALANCE_FIELD: &str = "remaining_amount";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Invoice {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(example = "03")]
    pub invoice_number: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>, example = 100.0)]
    pub total_amount: Option<Decimal>,

    // Quanto falta pagar
    #[serde(
        default,
        deserialize_with = "lenient_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>, example = 40.0)]
    pub remaining_balance: Option<Decimal>,

    // Dados do cliente, itens, datas... tudo que o frontend mandar
    #[serde(flatten)]
    #[schema(ignore)]
    pub details: Map<String, Value>,
}

impl Invoice {
    /// Move o campo legado `remaining_amount` para `remaining_balance`.
    /// Valores ilegíveis ficam onde estão.
    pub fn normalize_legacy_fields(&mut self) {
        if self.remaining_balance.is_some() {
            return;
        }
        let Some(raw) = self.details.get(LEGACY_BALANCE_FIELD) else {
            return;
        };
        if let Ok(balance) = decimal_from_value(raw) {
            self.remaining_balance = balance;
            self.details.remove(LEGACY_BALANCE_FIELD);
        }
    }

    /// Saldo atual: `remaining_balance`, senão o total, senão zero.
    pub fn outstanding_balance(&self) -> Decimal {
        self.remaining_balance
            .or(self.total_amount)
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddPaymentPayload {
    // Valor ilegível vira `None` e cai no "Invalid payment amount."
    #[serde(default, deserialize_with = "amount_or_none")]
    #[schema(value_type = Option<f64>, example = 60.0)]
    pub amount_paid: Option<Decimal>,
}
