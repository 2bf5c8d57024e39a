//! Checkout: shipping, payment and confirmation.
//!
//! - [`pricing`] - Subtotal, shipping fee and total
//! - [`forms`] - Shipping and card forms
//! - [`flow`] - The step state machine
//! - [`service`] - Submitting the finished order

pub mod flow;
pub mod forms;
pub mod pricing;
pub mod service;

pub use flow::{CheckoutError, CheckoutFlow, OrderSummary, generate_order_reference};
pub use forms::{PaymentDetails, ShippingDetails, payment_fields, shipping_fields};
pub use pricing::{
    DEFAULT_FLAT_SHIPPING_COST, DEFAULT_FREE_SHIPPING_THRESHOLD, OrderTotals, ShippingPolicy,
};
pub use service::{CheckoutService, DEFAULT_ORDER_DELAY, OrderProcessor, SimulatedOrderProcessor};
