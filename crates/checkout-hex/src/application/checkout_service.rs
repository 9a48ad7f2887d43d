use crate::errors::AppError;
use anyhow::Context;
use checkout_types::domain::cart::CartItem;
use checkout_types::domain::checkout::{Credentials, PaymentDetails};
use checkout_types::domain::order::{Order, OrderDraft};
use checkout_types::domain::promo::{PromoBook, PromoValidation};
use checkout_types::ports::order_repository::OrderRepository;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

/// A checkout submission after transport decoding.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub credentials: Credentials,
    pub cart_item: CartItem,
    pub promo_code: Option<String>,
    pub payment: PaymentDetails,
}

pub struct CheckoutService<R: OrderRepository> {
    repo: R,
    promos: Arc<PromoBook>,
}

impl<R: OrderRepository> CheckoutService<R> {
    pub fn new(repo: R, promos: PromoBook) -> Self {
        Self {
            repo,
            promos: Arc::new(promos),
        }
    }

    pub fn validate_promo(&self, code: &str) -> PromoValidation {
        self.promos.validate(code)
    }

    /// Validates the submission, prices it and stores the order.
    ///
    /// An unknown promo code does not fail the order; it settles with no
    /// discount and the submitted code is kept on the record.
    pub async fn place_order(&self, req: PlaceOrder) -> Result<Order, AppError> {
        req.credentials
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        req.payment
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let discount = match req.promo_code.as_deref().filter(|c| !c.is_empty()) {
            Some(code) => {
                let promo = self.promos.validate(code);
                if !promo.valid {
                    tracing::warn!(code, "ignoring unknown promo code");
                }
                promo.discount
            }
            None => Decimal::ZERO,
        };

        let draft = OrderDraft::settle(
            req.credentials.email,
            req.cart_item,
            req.promo_code,
            discount,
        )
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let order = self
            .repo
            .create(draft)
            .await
            .map_err(|e| anyhow::anyhow!(e.to_string()))
            .context("Failed to create order")?;
        tracing::info!(
            order_id = %order.id,
            plan = %order.cart_item.plan_id,
            total = %order.total,
            "order placed"
        );
        Ok(order)
    }

    pub async fn get_order(&self, id: Uuid) -> Result<Order, AppError> {
        match self
            .repo
            .get(id)
            .await
            .map_err(|e| anyhow::anyhow!(e.to_string()))
            .context("Failed to retrieve order")?
        {
            Some(o) => Ok(o),
            None => Err(AppError::NotFound("Order not found".into())),
        }
    }
}
