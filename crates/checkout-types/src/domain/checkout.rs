//! Account and payment form checks applied before an order is accepted.
//!
//! Payment details are format-checked only. Nothing here talks to a payment
//! network and none of it is persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_CARD_NUMBER_LEN: usize = 13;
pub const MIN_CVV_LEN: usize = 3;
pub const MIN_COUNTRY_LEN: usize = 2;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Invalid card number")]
    InvalidCardNumber,
    #[error("Format: MM/YY")]
    InvalidExpiry,
    #[error("Invalid CVV")]
    InvalidCvv,
    #[error("Please select a country")]
    MissingCountry,
    #[error("Price must not be negative")]
    NegativePrice,
    #[error("Price is out of range")]
    PriceOutOfRange,
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let (local, domain) = email.split_once('@').ok_or(ValidationError::InvalidEmail)?;
    let domain_ok = !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty());
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        Ok(())
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub country: String,
}

impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card_number", &"***")
            .field("expiry_date", &self.expiry_date)
            .field("cvv", &"***")
            .field("country", &self.country)
            .finish()
    }
}

impl PaymentDetails {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.card_number.chars().count() < MIN_CARD_NUMBER_LEN {
            return Err(ValidationError::InvalidCardNumber);
        }
        if !is_mm_yy(&self.expiry_date) {
            return Err(ValidationError::InvalidExpiry);
        }
        if self.cvv.chars().count() < MIN_CVV_LEN {
            return Err(ValidationError::InvalidCvv);
        }
        if self.country.chars().count() < MIN_COUNTRY_LEN {
            return Err(ValidationError::MissingCountry);
        }
        Ok(())
    }
}

// Two digits, a slash, two digits. The month is not range-checked.
fn is_mm_yy(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 5
        && b[2] == b'/'
        && [b[0], b[1], b[3], b[4]].iter().all(u8::is_ascii_digit)
}
