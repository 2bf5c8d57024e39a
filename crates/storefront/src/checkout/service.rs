//! Placing orders.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use qorikusi_core::CheckoutStep;

use super::flow::{CheckoutError, CheckoutFlow, OrderSummary};

/// Delay used by [`SimulatedOrderProcessor`] unless configured otherwise.
pub const DEFAULT_ORDER_DELAY: Duration = Duration::from_secs(1);

/// Something that accepts a finished order (payment gateway, order service).
#[async_trait]
pub trait OrderProcessor: Send + Sync {
    /// Accept `order`, or explain why not.
    async fn process(&self, order: &OrderSummary) -> Result<(), CheckoutError>;
}

/// Accepts every order after a fixed delay. There is no real payment backend.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedOrderProcessor {
    delay: Duration,
}

impl Default for SimulatedOrderProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER_DELAY)
    }
}

impl SimulatedOrderProcessor {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl OrderProcessor for SimulatedOrderProcessor {
    async fn process(&self, _order: &OrderSummary) -> Result<(), CheckoutError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// Drives the final checkout step through an [`OrderProcessor`].
#[derive(Clone)]
pub struct CheckoutService {
    processor: Arc<dyn OrderProcessor>,
}

impl CheckoutService {
    #[must_use]
    pub fn new(processor: Arc<dyn OrderProcessor>) -> Self {
        Self { processor }
    }

    /// Submit the order and move the flow to confirmation.
    ///
    /// The flow must be at the payment step with payment ready. On any
    /// failure the flow stays at payment.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NotAtPayment`, `CheckoutError::Validation`
    /// (card fields touched), or the processor's error.
    #[instrument(skip_all, fields(order_reference = %flow.order_reference()))]
    pub async fn place_order(&self, flow: &mut CheckoutFlow) -> Result<OrderSummary, CheckoutError> {
        match flow.step() {
            CheckoutStep::Payment => {}
            CheckoutStep::Confirmation => return Err(CheckoutError::AlreadyConfirmed),
            other => return Err(CheckoutError::NotAtPayment(other)),
        }
        flow.ensure_payment_ready()?;

        let summary = flow.order_summary();
        if let Err(e) = self.processor.process(&summary).await {
            warn!(error = %e, "Order processing failed");
            return Err(e);
        }

        flow.confirm();
        crate::error::add_breadcrumb(
            "checkout",
            "Order placed",
            Some(&[("order_reference", summary.order_reference.as_str())]),
        );
        info!(
            payment_method = %summary.payment_method,
            total = %summary.totals.total,
            "Order placed"
        );
        Ok(summary)
    }
}

impl Default for CheckoutService {
    fn default() -> Self {
        Self::new(Arc::new(SimulatedOrderProcessor::default()))
    }
}
