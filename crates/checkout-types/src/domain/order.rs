use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cart::CartItem;
use super::checkout::ValidationError;

/// Everything about an order except its identity, ready to be stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub email: String,
    pub cart_item: CartItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    pub discount: Decimal,
    pub subtotal: Decimal,
    pub total: Decimal,
}

impl OrderDraft {
    /// Prices the cart with the resolved `discount` and fills in the totals.
    pub fn settle(
        email: String,
        cart_item: CartItem,
        promo_code: Option<String>,
        discount: Decimal,
    ) -> Result<Self, ValidationError> {
        if cart_item.price < Decimal::ZERO
            || cart_item
                .selected_add_ons()
                .iter()
                .any(|a| a.monthly_price < Decimal::ZERO || a.yearly_price < Decimal::ZERO)
        {
            return Err(ValidationError::NegativePrice);
        }
        let quote = cart_item
            .quote(discount)
            .ok_or(ValidationError::PriceOutOfRange)?;
        Ok(Self {
            email,
            cart_item,
            promo_code,
            discount,
            subtotal: quote.subtotal,
            total: quote.total,
        })
    }
}

/// A placed order. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub email: String,
    pub cart_item: CartItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    pub discount: Decimal,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Assigns a fresh v4 id and the current time.
    pub fn place(draft: OrderDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: draft.email,
            cart_item: draft.cart_item,
            promo_code: draft.promo_code,
            discount: draft.discount,
            subtotal: draft.subtotal,
            total: draft.total,
            created_at: Utc::now(),
        }
    }

    pub fn discount_amount(&self) -> Decimal {
        self.cart_item.price * self.discount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{find_add_on, find_plan, BillingTerm};
    use rust_decimal_macros::dec;

    fn premium_with_vpn() -> CartItem {
        let mut item = CartItem::for_plan(find_plan("premium").unwrap(), BillingTerm::Yearly);
        item.toggle_add_on(find_add_on("vpn").unwrap());
        item
    }

    #[test]
    fn settle_computes_totals() {
        let draft = OrderDraft::settle(
            "a@b.com".into(),
            premium_with_vpn(),
            Some("SAVE10".into()),
            dec!(0.10),
        )
        .unwrap();
        assert_eq!(draft.subtotal, dec!(79.98));
        assert_eq!(draft.total, dec!(74.981));

        let order = Order::place(draft);
        assert_eq!(order.discount_amount(), dec!(4.999));
    }

    #[test]
    fn negative_prices_rejected() {
        let mut item = premium_with_vpn();
        item.price = dec!(-1);
        let res = OrderDraft::settle("a@b.com".into(), item, None, Decimal::ZERO);
        assert_eq!(res, Err(ValidationError::NegativePrice));
    }

    #[test]
    fn oversized_prices_rejected() {
        let mut item = premium_with_vpn();
        item.price = Decimal::MAX;
        let res = OrderDraft::settle("a@b.com".into(), item, None, dec!(0.1));
        assert_eq!(res, Err(ValidationError::PriceOutOfRange));
    }

    #[test]
    fn placed_orders_get_distinct_ids() {
        let draft =
            OrderDraft::settle("a@b.com".into(), premium_with_vpn(), None, Decimal::ZERO).unwrap();
        let a = Order::place(draft.clone());
        let b = Order::place(draft);
        assert_ne!(a.id, b.id);
        assert!(b.created_at >= a.created_at);
    }

    #[test]
    fn order_serializes_camel_case() {
        let draft =
            OrderDraft::settle("a@b.com".into(), premium_with_vpn(), None, Decimal::ZERO).unwrap();
        let json = serde_json::to_value(Order::place(draft)).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["cartItem"]["billingTerm"], "yearly");
        assert!(json.get("promoCode").is_none());
    }
}
