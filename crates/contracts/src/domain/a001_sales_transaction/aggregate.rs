use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store identifier as it appears in the sales export ("ID Loja").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreId(pub String);

impl StoreId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One sales transaction line. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub store_id: StoreId,

    /// Units sold
    pub quantity: u64,

    /// Line total after discounts
    pub final_value: f64,

    /// Sale date (YYYY-MM-DD)
    pub date: NaiveDate,

    /// Sale document code ("Código Venda"), informational only
    #[serde(default)]
    pub sale_code: Option<String>,

    #[serde(default)]
    pub product: Option<String>,
}

impl TransactionRecord {
    pub fn new(store_id: StoreId, quantity: u64, final_value: f64, date: NaiveDate) -> Self {
        Self {
            store_id,
            quantity,
            final_value,
            date,
            sale_code: None,
            product: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.store_id.0.trim().is_empty() {
            return Err("store_id must not be empty".into());
        }
        if !self.final_value.is_finite() {
            return Err(format!("final_value is not a finite number: {}", self.final_value));
        }
        if self.final_value < 0.0 {
            return Err(format!("final_value must be non-negative: {}", self.final_value));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_validate_accepts_zero_values() {
        let tx = TransactionRecord::new(StoreId::new("7"), 0, 0.0, date());
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_and_nan() {
        let negative = TransactionRecord::new(StoreId::new("7"), 1, -10.0, date());
        assert!(negative.validate().is_err());

        let nan = TransactionRecord::new(StoreId::new("7"), 1, f64::NAN, date());
        assert!(nan.validate().is_err());

        let blank = TransactionRecord::new(StoreId::new("  "), 1, 10.0, date());
        assert!(blank.validate().is_err());
    }
}
