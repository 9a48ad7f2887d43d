use anyhow::Context;
use checkout_types::domain::promo::PromoBook;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: String,
    pub database_url: Option<String>,
    pub promo_codes: PromoBook,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let server_port = env::var("SERVER_PORT").unwrap_or_else(|_| "3000".into());
        let database_url = env::var("DATABASE_URL").ok();
        let promo_codes = promo_book(env::var("PROMO_CODES").ok())?;
        Ok(Self {
            server_port,
            database_url,
            promo_codes,
        })
    }
}

// A blank value counts as unset so promos are never switched off by accident.
fn promo_book(raw: Option<String>) -> anyhow::Result<PromoBook> {
    match raw.filter(|r| !r.trim().is_empty()) {
        Some(raw) => raw.parse().context("invalid PROMO_CODES"),
        None => Ok(PromoBook::seed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_promo_codes_fall_back_to_seed() {
        for raw in [None, Some(String::new()), Some("   ".to_string())] {
            let book = promo_book(raw).unwrap();
            assert_eq!(book.len(), PromoBook::seed().len());
            assert!(book.validate("SAVE10").valid);
        }
    }

    #[test]
    fn configured_promo_codes_replace_seed() {
        let book = promo_book(Some("FLASH50=0.5".into())).unwrap();
        assert_eq!(book.len(), 1);
        assert!(!book.validate("SAVE10").valid);
        assert!(promo_book(Some("FLASH50=2".into())).is_err());
    }

    #[test]
    fn from_env_treats_empty_promo_codes_as_unset() {
        env::set_var("PROMO_CODES", "");
        let config = Config::from_env().unwrap();
        env::remove_var("PROMO_CODES");
        assert!(config.promo_codes.validate("welcome15").valid);
        assert!(!config.promo_codes.is_empty());
    }
}
