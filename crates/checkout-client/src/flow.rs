//! Two-step checkout: account details, add-on upsell, then payment.
//!
//! ```text
//! CollectingAccount -> ShowingUpsell -> CollectingPayment -> Submitting -> Completed
//!                                              ^                 |
//!                                              +---- rejected ---+
//! ```
//!
//! A rejected submission returns to `CollectingPayment` with everything the
//! customer entered still in place, so they can correct it and resubmit.

use checkout_types::domain::catalog::AddOn;
use checkout_types::domain::checkout::{Credentials, PaymentDetails, ValidationError};
use checkout_types::domain::pricing::Quote;

use crate::cart::{CartStore, StoredCart};
use crate::{CheckoutClient, ClientError, CreateOrderRequest, CreateOrderResponse, OrderSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CollectingAccount,
    ShowingUpsell,
    CollectingPayment,
    Submitting,
    Completed,
}

#[derive(thiserror::Error, Debug)]
pub enum FlowError {
    #[error("cannot {action} while in {stage:?}")]
    InvalidTransition { action: &'static str, stage: Stage },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("cart storage: {0}")]
    Storage(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    stage: Stage,
    cart: StoredCart,
    credentials: Option<Credentials>,
    payment: Option<PaymentDetails>,
    last_error: Option<String>,
    order: Option<OrderSummary>,
}

impl CheckoutFlow {
    pub fn start(cart: StoredCart) -> Self {
        Self {
            stage: Stage::CollectingAccount,
            cart,
            credentials: None,
            payment: None,
            last_error: None,
            order: None,
        }
    }

    /// `None` when there is no stored cart to check out.
    pub async fn resume(store: &CartStore) -> Result<Option<Self>, FlowError> {
        Ok(store.load().await?.map(Self::start))
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn cart(&self) -> &StoredCart {
        &self.cart
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Payment details from the last submission attempt, for refilling the form.
    pub fn payment(&self) -> Option<&PaymentDetails> {
        self.payment.as_ref()
    }

    pub fn order(&self) -> Option<&OrderSummary> {
        self.order.as_ref()
    }

    /// Live pricing for the summary panel.
    pub fn quote(&self) -> Option<Quote> {
        self.cart.quote()
    }

    fn expect(&self, stage: Stage, action: &'static str) -> Result<(), FlowError> {
        if self.stage != stage {
            return Err(FlowError::InvalidTransition {
                action,
                stage: self.stage,
            });
        }
        Ok(())
    }

    pub fn submit_account(&mut self, credentials: Credentials) -> Result<(), FlowError> {
        self.expect(Stage::CollectingAccount, "submit account")?;
        credentials.validate()?;
        self.credentials = Some(credentials);
        self.stage = Stage::ShowingUpsell;
        Ok(())
    }

    pub fn toggle_add_on(&mut self, add_on: &AddOn) -> Result<(), FlowError> {
        self.expect(Stage::ShowingUpsell, "change add-ons")?;
        self.cart.item.toggle_add_on(add_on);
        Ok(())
    }

    /// Leaves the upsell; the add-on selection is fixed from here on.
    pub fn continue_to_payment(&mut self) -> Result<(), FlowError> {
        self.expect(Stage::ShowingUpsell, "continue to payment")?;
        self.cart.item.add_ons.get_or_insert_with(Vec::new);
        self.stage = Stage::CollectingPayment;
        Ok(())
    }

    /// Moves to `Submitting` and builds the request body.
    pub fn begin_submit(&mut self, payment: PaymentDetails) -> Result<CreateOrderRequest, FlowError> {
        self.expect(Stage::CollectingPayment, "submit payment")?;
        payment.validate()?;
        let credentials = self
            .credentials
            .clone()
            .ok_or(FlowError::InvalidTransition {
                action: "submit payment",
                stage: Stage::CollectingAccount,
            })?;
        self.payment = Some(payment.clone());
        self.last_error = None;
        self.stage = Stage::Submitting;
        Ok(CreateOrderRequest {
            email: credentials.email,
            password: credentials.password,
            cart_item: self.cart.item.clone(),
            promo_code: self.cart.promo_code.clone(),
            payment_details: payment,
        })
    }

    /// Applies the server's answer to an in-flight submission.
    pub fn finish(
        &mut self,
        outcome: Result<CreateOrderResponse, ClientError>,
    ) -> Result<(), FlowError> {
        self.expect(Stage::Submitting, "finish submission")?;
        match outcome {
            Ok(res) if res.success => {
                self.order = Some(res.order);
                self.stage = Stage::Completed;
            }
            Ok(res) => self.reject(res.message),
            Err(e) => self.reject(e.to_string()),
        }
        Ok(())
    }

    fn reject(&mut self, message: String) {
        tracing::warn!(%message, "order submission rejected");
        self.last_error = Some(message);
        self.stage = Stage::CollectingPayment;
    }

    /// Submits the order and clears the stored cart once it is accepted.
    ///
    /// The order is placed once the server accepts it, so a cart that cannot
    /// be cleared afterwards is logged rather than reported as a failure.
    pub async fn submit(
        &mut self,
        payment: PaymentDetails,
        client: &CheckoutClient,
        store: &CartStore,
    ) -> Result<Stage, FlowError> {
        let req = self.begin_submit(payment)?;
        let outcome = client.create_order(&req).await;
        self.finish(outcome)?;
        if self.stage == Stage::Completed {
            if let Err(e) = store.clear().await {
                tracing::warn!(error = %e, "order placed but stored cart was not cleared");
            }
        }
        Ok(self.stage)
    }
}
