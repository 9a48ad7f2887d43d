use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PromoConfigError {
    #[error("promo entry `{0}` is not CODE=FRACTION")]
    Malformed(String),
    #[error("promo code must not be empty")]
    EmptyCode,
    #[error("discount for {code} must be a fraction between 0 and 1, got {value}")]
    OutOfRange { code: String, value: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromoValidation {
    pub valid: bool,
    pub discount: Decimal,
}

impl PromoValidation {
    pub fn invalid() -> Self {
        Self {
            valid: false,
            discount: Decimal::ZERO,
        }
    }
}

/// Read-only promo code table. Codes match case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct PromoBook {
    codes: HashMap<String, Decimal>,
}

impl PromoBook {
    pub fn new<I, S>(entries: I) -> Result<Self, PromoConfigError>
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: AsRef<str>,
    {
        let mut codes = HashMap::new();
        for (code, discount) in entries {
            let code = code.as_ref().trim();
            if code.is_empty() {
                return Err(PromoConfigError::EmptyCode);
            }
            if discount < Decimal::ZERO || discount > Decimal::ONE {
                return Err(PromoConfigError::OutOfRange {
                    code: code.to_string(),
                    value: discount.to_string(),
                });
            }
            codes.insert(code.to_uppercase(), discount);
        }
        Ok(Self { codes })
    }

    /// SAVE10, WELCOME15 and ULTIMATE20.
    pub fn seed() -> Self {
        let codes = [
            ("SAVE10", Decimal::new(10, 2)),
            ("WELCOME15", Decimal::new(15, 2)),
            ("ULTIMATE20", Decimal::new(20, 2)),
        ]
        .into_iter()
        .map(|(c, d)| (c.to_string(), d))
        .collect();
        Self { codes }
    }

    pub fn validate(&self, code: &str) -> PromoValidation {
        match self.codes.get(&code.to_uppercase()) {
            Some(discount) => PromoValidation {
                valid: true,
                discount: *discount,
            },
            None => PromoValidation::invalid(),
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for PromoBook {
    fn default() -> Self {
        Self::seed()
    }
}

/// Parses `CODE=FRACTION[,CODE=FRACTION...]`.
impl FromStr for PromoBook {
    type Err = PromoConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut entries = Vec::new();
        for raw in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (code, value) = raw
                .split_once('=')
                .ok_or_else(|| PromoConfigError::Malformed(raw.to_string()))?;
            let discount = Decimal::from_str(value.trim())
                .map_err(|_| PromoConfigError::Malformed(raw.to_string()))?;
            entries.push((code.to_string(), discount));
        }
        Self::new(entries)
    }
}
