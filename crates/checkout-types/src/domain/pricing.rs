//! Order pricing shared by the cart display and order settlement.
//!
//! The promo discount applies to the base plan price only. Add-ons are always
//! charged in full:
//!
//! ```text
//! subtotal        = base + sum(add-on price for term)
//! discount_amount = base * discount
//! total           = subtotal - discount_amount
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::catalog::{AddOn, BillingTerm};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub add_ons_total: Decimal,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
}

/// Prices a plan plus add-ons for one billing cycle.
///
/// `discount` is a fraction in `[0, 1]`; callers resolve it from a promo code
/// beforehand and pass zero when there is none. `None` when the amounts do
/// not fit in a `Decimal`.
pub fn quote(
    base_price: Decimal,
    term: BillingTerm,
    add_ons: &[AddOn],
    discount: Decimal,
) -> Option<Quote> {
    let add_ons_total = add_ons
        .iter()
        .try_fold(Decimal::ZERO, |acc, a| acc.checked_add(a.price_for(term)))?;
    let subtotal = base_price.checked_add(add_ons_total)?;
    let discount_amount = base_price.checked_mul(discount)?;
    Some(Quote {
        add_ons_total,
        subtotal,
        discount_amount,
        total: subtotal.checked_sub(discount_amount)?,
    })
}

impl Quote {
    /// Effective monthly cost, used for the "billed annually" line.
    pub fn per_month(&self, term: BillingTerm) -> Decimal {
        match term {
            BillingTerm::Monthly => self.total,
            BillingTerm::Yearly => self.total / Decimal::from(12),
        }
    }
}

/// Whole-percent label for a discount fraction, e.g. `0.15` -> `15`.
pub fn discount_percent(discount: Decimal) -> Decimal {
    (discount * Decimal::ONE_HUNDRED).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Two-place currency rendering for display.
pub fn format_money(amount: Decimal) -> String {
    format!(
        "${:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}
