//! The three-step checkout state machine.
//!
//! ```text
//! Shipping ──advance (shipping valid)──▶ Payment ──advance (payment ready)──▶ Confirmation
//!    ▲                                      │
//!    └───────────────── back ───────────────┘
//! ```
//!
//! A rejected transition leaves the step untouched and marks the offending
//! form's fields as touched so every error is shown.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use qorikusi_core::{CheckoutStep, PaymentMethod};

use super::forms::{PaymentDetails, ShippingDetails, payment_fields, shipping_fields};
use super::pricing::{OrderTotals, ShippingPolicy};
use crate::cart::{Cart, CartItem};
use crate::validation::{FieldError, FormErrors, TouchedFields};

const ORDER_REFERENCE_MIN: u32 = 100_000;
const ORDER_REFERENCE_MAX: u32 = 999_999;

/// Errors returned by checkout transitions.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The current step's form is incomplete.
    #[error("{0}")]
    Validation(#[from] FormErrors),

    /// The order was already placed.
    #[error("the order is already confirmed")]
    AlreadyConfirmed,

    /// An order can only be placed from the payment step.
    #[error("cannot place the order from the {0} step")]
    NotAtPayment(CheckoutStep),

    /// The order processor refused or failed.
    #[error("order processing failed: {0}")]
    Processing(String),
}

/// A six-digit order reference in `100000..=999999`.
///
/// Not checked for uniqueness.
pub fn generate_order_reference<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.random_range(ORDER_REFERENCE_MIN..=ORDER_REFERENCE_MAX)
        .to_string()
}

/// What gets submitted when the order is placed.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub order_reference: String,
    pub items: Vec<CartItem>,
    pub totals: OrderTotals,
    pub shipping: ShippingDetails,
    pub payment_method: PaymentMethod,
    pub placed_at: DateTime<Utc>,
}

/// One shopper's pass through checkout.
#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    items: Vec<CartItem>,
    policy: ShippingPolicy,
    order_reference: String,
    payment_method: PaymentMethod,
    pub shipping: ShippingDetails,
    pub payment: PaymentDetails,
    shipping_touched: TouchedFields,
    payment_touched: TouchedFields,
}

impl CheckoutFlow {
    /// Start checkout for `items` at the shipping step.
    #[must_use]
    pub fn new(items: Vec<CartItem>, policy: ShippingPolicy) -> Self {
        Self::with_order_reference(items, policy, generate_order_reference(&mut rand::rng()))
    }

    /// Start checkout with a snapshot of `cart`.
    #[must_use]
    pub fn from_cart(cart: &Cart, policy: ShippingPolicy) -> Self {
        Self::new(cart.items().to_vec(), policy)
    }

    #[must_use]
    pub fn with_order_reference(
        items: Vec<CartItem>,
        policy: ShippingPolicy,
        order_reference: String,
    ) -> Self {
        Self {
            step: CheckoutStep::Shipping,
            items,
            policy,
            order_reference,
            payment_method: PaymentMethod::default(),
            shipping: ShippingDetails::default(),
            payment: PaymentDetails::default(),
            shipping_touched: TouchedFields::default(),
            payment_touched: TouchedFields::default(),
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Move forward one step if the current step's form allows it.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Validation` (step unchanged, fields touched) or
    /// `CheckoutError::AlreadyConfirmed` from the terminal step.
    pub fn advance(&mut self) -> Result<CheckoutStep, CheckoutError> {
        match self.step {
            CheckoutStep::Shipping => {
                if let Err(errors) = self.shipping.validate() {
                    self.shipping_touched.touch_all(&shipping_fields::ALL);
                    debug!(fields = ?errors.field_names(), "Shipping step blocked");
                    return Err(errors.into());
                }
                self.step = CheckoutStep::Payment;
            }
            CheckoutStep::Payment => {
                self.ensure_payment_ready()?;
                self.step = CheckoutStep::Confirmation;
            }
            CheckoutStep::Confirmation => return Err(CheckoutError::AlreadyConfirmed),
        }
        debug!(step = %self.step, "Checkout advanced");
        Ok(self.step)
    }

    /// Go back one step. A no-op at the first step.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::AlreadyConfirmed` once the order is placed.
    pub fn back(&mut self) -> Result<CheckoutStep, CheckoutError> {
        match self.step {
            CheckoutStep::Shipping => {}
            CheckoutStep::Payment => self.step = CheckoutStep::Shipping,
            CheckoutStep::Confirmation => return Err(CheckoutError::AlreadyConfirmed),
        }
        Ok(self.step)
    }

    /// Choose how to pay. Non-card methods drop the payment form's rules and
    /// its touched state.
    pub fn select_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
        if !method.requires_card_details() {
            self.payment_touched.clear();
        }
    }

    /// Check the payment step without touching any field.
    ///
    /// # Errors
    ///
    /// Returns the card form errors when paying by card.
    pub fn payment_ready(&self) -> Result<(), FormErrors> {
        if self.payment_method.requires_card_details() {
            self.payment.validate()
        } else {
            Ok(())
        }
    }

    /// Like [`CheckoutFlow::payment_ready`], but marks the card fields
    /// touched on failure.
    pub(crate) fn ensure_payment_ready(&mut self) -> Result<(), FormErrors> {
        self.payment_ready().inspect_err(|errors| {
            self.payment_touched.touch_all(&payment_fields::ALL);
            debug!(fields = ?errors.field_names(), "Payment step blocked");
        })
    }

    /// Mark one shipping field as touched (e.g. on blur).
    pub fn touch_shipping(&mut self, field: &'static str) {
        self.shipping_touched.touch(field);
    }

    /// Mark one payment field as touched (e.g. on blur).
    pub fn touch_payment(&mut self, field: &'static str) {
        self.payment_touched.touch(field);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    #[must_use]
    pub fn order_reference(&self) -> &str {
        &self.order_reference
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub const fn shipping_touched(&self) -> &TouchedFields {
        &self.shipping_touched
    }

    #[must_use]
    pub const fn payment_touched(&self) -> &TouchedFields {
        &self.payment_touched
    }

    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        self.policy
            .totals(self.items.iter().map(CartItem::line_total).sum())
    }

    /// Shipping errors for touched fields only.
    #[must_use]
    pub fn visible_shipping_errors(&self) -> Vec<(&'static str, FieldError)> {
        visible(&self.shipping_touched, self.shipping.validate())
    }

    /// Payment errors for touched fields only; empty for non-card methods.
    #[must_use]
    pub fn visible_payment_errors(&self) -> Vec<(&'static str, FieldError)> {
        visible(&self.payment_touched, self.payment_ready())
    }

    /// Snapshot of the order as it stands.
    #[must_use]
    pub fn order_summary(&self) -> OrderSummary {
        OrderSummary {
            order_reference: self.order_reference.clone(),
            items: self.items.clone(),
            totals: self.totals(),
            shipping: self.shipping.clone(),
            payment_method: self.payment_method,
            placed_at: Utc::now(),
        }
    }

    pub(crate) const fn confirm(&mut self) {
        self.step = CheckoutStep::Confirmation;
    }
}

fn visible(
    touched: &TouchedFields,
    result: Result<(), FormErrors>,
) -> Vec<(&'static str, FieldError)> {
    let Err(errors) = result else {
        return Vec::new();
    };
    touched
        .visible(&errors)
        .map(|(field, error)| (field, error.clone()))
        .collect()
}
