//! Static plan and add-on catalog offered on the landing page and the upsell step.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Premium,
    Ultimate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillingTerm {
    Monthly,
    #[default]
    Yearly,
}

impl BillingTerm {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingTerm::Monthly => "monthly",
            BillingTerm::Yearly => "yearly",
        }
    }
}

impl fmt::Display for BillingTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub tier: PlanTier,
    pub name: String,
    pub monthly_price: Decimal,
    pub yearly_price: Decimal,
    pub devices: u32,
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_best_value: bool,
}

impl Plan {
    /// Price charged once per billing cycle for `term`.
    pub fn price_for(&self, term: BillingTerm) -> Decimal {
        match term {
            BillingTerm::Monthly => self.monthly_price,
            BillingTerm::Yearly => self.yearly_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddOn {
    pub id: String,
    pub name: String,
    pub description: String,
    pub monthly_price: Decimal,
    pub yearly_price: Decimal,
}

impl AddOn {
    pub fn price_for(&self, term: BillingTerm) -> Decimal {
        match term {
            BillingTerm::Monthly => self.monthly_price,
            BillingTerm::Yearly => self.yearly_price,
        }
    }
}

fn plan(
    id: &str,
    tier: PlanTier,
    name: &str,
    (monthly_cents, yearly_cents): (i64, i64),
    devices: u32,
    features: &[&str],
    is_best_value: bool,
) -> Plan {
    Plan {
        id: id.into(),
        tier,
        name: name.into(),
        monthly_price: Decimal::new(monthly_cents, 2),
        yearly_price: Decimal::new(yearly_cents, 2),
        devices,
        features: features.iter().map(|f| f.to_string()).collect(),
        is_best_value,
    }
}

fn add_on(id: &str, name: &str, description: &str, (monthly_cents, yearly_cents): (i64, i64)) -> AddOn {
    AddOn {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        monthly_price: Decimal::new(monthly_cents, 2),
        yearly_price: Decimal::new(yearly_cents, 2),
    }
}

pub fn plans() -> &'static [Plan] {
    static PLANS: OnceLock<Vec<Plan>> = OnceLock::new();
    PLANS.get_or_init(|| {
        vec![
            plan(
                "free",
                PlanTier::Free,
                "Free",
                (0, 0),
                1,
                &[
                    "Essential antivirus protection",
                    "Basic web protection",
                    "Smart Scan for quick checkups",
                    "Manual virus removal",
                ],
                false,
            ),
            plan(
                "premium",
                PlanTier::Premium,
                "Premium Security",
                (499, 4999),
                10,
                &[
                    "Everything in Free",
                    "AI-powered anti-scam guidance",
                    "Real-time malware & ransomware shield",
                    "Web & email shield with anti-phishing",
                    "Advanced firewall protection",
                    "Wi-Fi security check",
                    "Automatic updates & real-time protection",
                    "Priority support",
                ],
                false,
            ),
            plan(
                "ultimate",
                PlanTier::Ultimate,
                "Ultimate",
                (799, 7999),
                10,
                &[
                    "Everything in Premium Security",
                    "Secure VPN for privacy",
                    "PC Cleanup & optimization",
                    "AntiTrack for browsing privacy",
                    "Unlimited device coverage",
                    "Premium priority support",
                ],
                true,
            ),
        ]
    })
}

pub fn add_ons() -> &'static [AddOn] {
    static ADD_ONS: OnceLock<Vec<AddOn>> = OnceLock::new();
    ADD_ONS.get_or_init(|| {
        vec![
            add_on(
                "vpn",
                "SecureVPN",
                "Encrypt your connection and browse privately on any network",
                (299, 2999),
            ),
            add_on(
                "cleanup",
                "PC Cleanup",
                "Remove junk files and optimize your computer's performance",
                (199, 1999),
            ),
            add_on(
                "antitrack",
                "AntiTrack",
                "Block online trackers and protect your browsing privacy",
                (199, 1999),
            ),
        ]
    })
}

pub fn find_plan(id: &str) -> Option<&'static Plan> {
    plans().iter().find(|p| p.id == id)
}

pub fn find_add_on(id: &str) -> Option<&'static AddOn> {
    add_ons().iter().find(|a| a.id == id)
}
