//! Client-local cart snapshot, kept as a single JSON document on disk.

use checkout_types::domain::cart::CartItem;
use checkout_types::domain::pricing::Quote;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

use crate::PromoResponse;

const CART_KEY: &str = "cart.json";

/// The persisted cart: the plan snapshot plus any promo applied on the cart page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredCart {
    #[serde(flatten)]
    pub item: CartItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
}

impl StoredCart {
    pub fn new(item: CartItem) -> Self {
        Self {
            item,
            discount: None,
            promo_code: None,
        }
    }

    /// Records a validated promo. A rejected code clears any earlier one.
    pub fn apply_promo(&mut self, code: &str, result: &PromoResponse) {
        if result.valid && result.discount > Decimal::ZERO {
            self.discount = Some(result.discount);
            self.promo_code = Some(code.to_string());
        } else {
            self.discount = None;
            self.promo_code = None;
        }
    }

    pub fn discount(&self) -> Decimal {
        self.discount.unwrap_or_default()
    }

    pub fn quote(&self) -> Option<Quote> {
        self.item.quote(self.discount())
    }
}

#[derive(Debug, Clone)]
pub struct CartStore {
    path: PathBuf,
}

impl CartStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CART_KEY),
        }
    }

    /// Overwrites the stored snapshot.
    pub async fn save(&self, cart: &StoredCart) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec(cart)?;
        tokio::fs::write(&self.path, bytes).await
    }

    /// Missing or unreadable snapshots both mean "no cart".
    pub async fn load(&self) -> io::Result<Option<StoredCart>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        match serde_json::from_slice(&bytes) {
            Ok(cart) => Ok(Some(cart)),
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "discarding unparseable cart");
                Ok(None)
            }
        }
    }

    pub async fn clear(&self) -> io::Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
