//! Premium membership: status checks and the purchase flow.
//!
//! ## Purchase
//! 1. Create a payment order for the plan
//! 2. Resolve the checkout key (order, then response envelope, then config)
//! 3. Hand the order to the checkout widget
//! 4. After a successful payment, poll `/premium/verify` until the
//!    membership shows up or the attempts run out

use crate::context::AppContext;
use api_client::{ApiError, PaymentOrder};
use async_trait::async_trait;
use model::MembershipPlan;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_CURRENCY: &str = "INR";

/// Prefilled customer details shown in the checkout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutPrefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// Everything the checkout widget needs to take a payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOptions {
    pub key: String,
    pub amount: u64,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub order_id: String,
    pub prefill: CheckoutPrefill,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Paid,
    Failed { description: Option<String> },
    /// Closed without paying
    Dismissed,
}

/// The payment UI. Resolves when the user has paid, failed or closed it.
#[async_trait]
pub trait CheckoutWidget: Send + Sync {
    async fn open(&self, options: CheckoutOptions) -> CheckoutOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// Paid and confirmed by the server
    Activated,
    /// Paid, but the server had not confirmed it when polling stopped
    Pending,
    PaymentFailed,
    Dismissed,
    /// No checkout key anywhere
    MissingKey,
    /// The order came back without an id or amount
    InvalidOrder,
}

#[derive(Debug, Clone)]
pub struct PremiumFlow {
    ctx: AppContext,
    checkout_key: Option<String>,
    poll_interval: Duration,
    poll_attempts: u32,
}

impl PremiumFlow {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            checkout_key: None,
            poll_interval: Duration::from_secs(2),
            poll_attempts: 10,
        }
    }

    pub fn with_checkout_key(mut self, key: Option<String>) -> Self {
        self.checkout_key = key;
        self
    }

    pub fn with_polling(mut self, interval: Duration, attempts: u32) -> Self {
        self.poll_interval = interval;
        self.poll_attempts = attempts;
        self
    }

    /// Ask the server whether the user is premium. Any failure counts as
    /// not premium. The answer is stored.
    #[instrument(skip(self))]
    pub async fn status(&self) -> bool {
        let premium = match self.ctx.client.verify_premium().await {
            Ok(premium) => premium,
            Err(e) => {
                warn!("Premium check failed: {}", e);
                false
            }
        };
        self.ctx.store.premium().set(Some(premium));
        premium
    }

    #[instrument(skip(self, checkout))]
    pub async fn purchase(
        &self,
        plan: MembershipPlan,
        checkout: &dyn CheckoutWidget,
    ) -> Result<PurchaseOutcome, ApiError> {
        let order = match self.ctx.client.create_payment_order(plan).await {
            Ok(order) => order,
            Err(e) => {
                warn!("Creating a {} order failed: {}", plan, e);
                self.ctx.api_error("Failed to create order", &e);
                return Err(e);
            }
        };

        let options = match self.checkout_options(plan, order) {
            Ok(options) => options,
            Err(outcome) => return Ok(outcome),
        };

        info!("Opening checkout for order {}", options.order_id);
        self.ctx
            .success("Complete your payment", "Use the checkout window to finish.");

        match checkout.open(options).await {
            CheckoutOutcome::Paid => Ok(self.await_activation().await),
            CheckoutOutcome::Failed { description } => {
                warn!("Payment failed: {:?}", description);
                self.ctx.error(
                    "Payment failed",
                    description.unwrap_or_else(|| "Please try again.".to_string()),
                );
                Ok(PurchaseOutcome::PaymentFailed)
            }
            CheckoutOutcome::Dismissed => {
                debug!("Checkout dismissed");
                Ok(PurchaseOutcome::Dismissed)
            }
        }
    }

    fn checkout_options(
        &self,
        plan: MembershipPlan,
        order: PaymentOrder,
    ) -> Result<CheckoutOptions, PurchaseOutcome> {
        let Some(key) = order.key_id.clone().or_else(|| self.checkout_key.clone()) else {
            self.ctx.error(
                "Payment configuration error",
                "Razorpay key not configured. Please contact support.",
            );
            return Err(PurchaseOutcome::MissingKey);
        };

        let (Some(order_id), Some(amount)) = (order.order_id.clone(), order.amount) else {
            self.ctx
                .error("Invalid order data", "Order details are missing.");
            return Err(PurchaseOutcome::InvalidOrder);
        };
        if order_id.trim().is_empty() || amount == 0 {
            self.ctx
                .error("Invalid order data", "Order details are missing.");
            return Err(PurchaseOutcome::InvalidOrder);
        }

        let notes = order.notes;
        let name = match (notes.first_name, notes.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            _ => String::new(),
        };

        Ok(CheckoutOptions {
            key,
            amount,
            currency: order
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            name: "DevFinder".to_string(),
            description: format!("Premium {} Membership", plan.name()),
            order_id,
            prefill: CheckoutPrefill {
                name,
                email: notes.email_id.unwrap_or_default(),
                contact: notes.phone_number.unwrap_or_default(),
            },
        })
    }

    async fn await_activation(&self) -> PurchaseOutcome {
        self.ctx
            .success("Payment successful", "Activating your premium membership…");

        for attempt in 1..=self.poll_attempts {
            tokio::time::sleep(self.poll_interval).await;
            if self.status().await {
                info!("Premium active after {} checks", attempt);
                self.ctx
                    .success("Welcome to Premium", "Your membership is now active.");
                return PurchaseOutcome::Activated;
            }
        }

        info!("Premium not confirmed after {} checks", self.poll_attempts);
        self.ctx.info(
            "Payment received",
            "Your premium will be active shortly. Refresh the page in a moment.",
        );
        PurchaseOutcome::Pending
    }
}
