//! Checkout workflow: configuration, address capture, and the state machine.

mod address;
mod configurator;
mod order;
mod receipt;
mod session;
mod state;

pub use address::{AddressField, CustomerAddress};
pub use configurator::OrderConfiguration;
pub use order::Order;
pub use receipt::{AdditionalUnitsLine, Receipt};
pub use session::CheckoutSession;
pub use state::CheckoutState;

use common::PackageId;
use thiserror::Error;

/// Errors that can occur during checkout operations.
///
/// All variants are recoverable: a failed transition leaves the session
/// untouched and is surfaced to the caller.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Selection references a package id not present in the catalog.
    #[error("Unknown package: {id}")]
    InvalidPackageId { id: PackageId },

    /// The session is not in a state where the action is defined.
    #[error("Invalid state transition: cannot {action} from {current_state} state")]
    InvalidStateTransition {
        current_state: CheckoutState,
        action: &'static str,
    },

    /// One or more required address fields are empty at submission.
    #[error("Required address fields missing: {}", format_fields(.missing))]
    MissingRequiredFields { missing: Vec<AddressField> },

    /// The selected package is sold at a flat rate and does not price
    /// additional appliances.
    #[error("Package {id} does not support additional appliances")]
    AdditionalUnitsUnavailable { id: PackageId },
}

fn format_fields(fields: &[AddressField]) -> String {
    fields
        .iter()
        .map(AddressField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
