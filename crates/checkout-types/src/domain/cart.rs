use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::{AddOn, BillingTerm, Plan, PlanTier};
use super::pricing::{self, Quote};

/// Plan selection snapshot taken when the customer clicks "buy".
///
/// `price` is the per-cycle plan price at selection time; later catalog
/// changes do not reprice an existing cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub plan_id: String,
    pub plan_name: String,
    pub tier: PlanTier,
    pub billing_term: BillingTerm,
    pub price: Decimal,
    pub devices: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_ons: Option<Vec<AddOn>>,
}

impl CartItem {
    pub fn for_plan(plan: &Plan, term: BillingTerm) -> Self {
        Self {
            plan_id: plan.id.clone(),
            plan_name: plan.name.clone(),
            tier: plan.tier,
            billing_term: term,
            price: plan.price_for(term),
            devices: plan.devices,
            add_ons: None,
        }
    }

    pub fn selected_add_ons(&self) -> &[AddOn] {
        self.add_ons.as_deref().unwrap_or_default()
    }

    /// Adds the add-on if absent, removes it if already selected.
    pub fn toggle_add_on(&mut self, add_on: &AddOn) {
        let selected = self.add_ons.get_or_insert_with(Vec::new);
        if let Some(pos) = selected.iter().position(|a| a.id == add_on.id) {
            selected.remove(pos);
        } else {
            selected.push(add_on.clone());
        }
    }

    /// `None` when the snapshot's amounts are too large to price.
    pub fn quote(&self, discount: Decimal) -> Option<Quote> {
        pricing::quote(self.price, self.billing_term, self.selected_add_ons(), discount)
    }
}
