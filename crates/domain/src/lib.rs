//! Checkout domain for the smart-home package storefront.
//!
//! This crate provides the core workflow logic:
//! - Money value object (minor-unit rupee amounts)
//! - Package catalog with load-time id validation
//! - Order configuration with dynamic pricing
//! - Customer address capture and validation
//! - Checkout state machine producing immutable order records and receipts

pub mod catalog;
pub mod checkout;
pub mod money;

pub use catalog::{Catalog, CatalogError, Package};
pub use checkout::{
    AdditionalUnitsLine, AddressField, CheckoutError, CheckoutSession, CheckoutState,
    CustomerAddress, Order, OrderConfiguration, Receipt,
};
pub use money::Money;
