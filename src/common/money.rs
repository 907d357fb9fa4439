// src/common/money.rs

//! Leitura tolerante de valores vindos do frontend.
//!
//! O frontend às vezes manda `"100.50"` (string) e às vezes `100.5` (número),
//! tanto para valores monetários quanto para identificadores como o número da
//! fatura. Estes helpers aceitam os dois formatos.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// Casas decimais usadas em todos os valores monetários.
pub const MONEY_SCALE: u32 = 2;

/// Arredonda para 2 casas (meio para o par, como o `round` do frontend antigo).
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Converte um `Value` JSON (número ou string) em `Decimal`.
/// `null` e string vazia viram `None`.
pub fn decimal_from_value(value: &Value) -> Result<Option<Decimal>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => parse_decimal(&n.to_string()).map(Some),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => parse_decimal(s.trim()).map(Some),
        other => Err(format!("expected a number, got {other}")),
    }
}

fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| format!("invalid decimal value: {raw}"))
}

/// `deserialize_with` para campos `Option<Decimal>`.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(v) => decimal_from_value(&v).map_err(de::Error::custom),
    }
}

/// Como [`lenient_decimal`], mas um valor ilegível vira `None` em vez de erro.
pub fn amount_or_none<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| decimal_from_value(&v).ok().flatten()))
}

/// `deserialize_with` para identificadores que podem chegar como número.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

/// Igual a [`lenient_string`], mas para chaves obrigatórias: ausente vira `""`.
pub fn lenient_key<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(Option::unwrap_or_default)
}
