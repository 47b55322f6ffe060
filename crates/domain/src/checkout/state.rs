//! Checkout state machine states.

use serde::{Deserialize, Serialize};

/// The state of a checkout session.
///
/// State transitions:
/// ```text
/// SelectingPackage ──select──► EnteringAddress ──submit──► Submitted
///        ▲                          │                          │
///        └───────────back──────────-┘                          │
///        └─────────────────────────reset───────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckoutState {
    /// Browsing the catalog; no package chosen yet.
    #[default]
    SelectingPackage,

    /// A package is chosen; the customer fills in the installation address
    /// and may adjust the appliance count.
    EnteringAddress,

    /// An order has been placed; the receipt is shown.
    Submitted,
}

impl CheckoutState {
    /// Returns true if a package can be selected in this state.
    pub fn can_select_package(&self) -> bool {
        matches!(self, CheckoutState::SelectingPackage)
    }

    /// Returns true if the configuration and address can be edited.
    pub fn can_edit(&self) -> bool {
        matches!(self, CheckoutState::EnteringAddress)
    }

    /// Returns true if the order can be submitted in this state.
    pub fn can_submit(&self) -> bool {
        matches!(self, CheckoutState::EnteringAddress)
    }

    /// Returns true if the session can go back to package selection.
    pub fn can_go_back(&self) -> bool {
        matches!(self, CheckoutState::EnteringAddress)
    }

    /// Returns true if the session can be reset for a new order.
    pub fn can_reset(&self) -> bool {
        matches!(self, CheckoutState::Submitted)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::SelectingPackage => "SelectingPackage",
            CheckoutState::EnteringAddress => "EnteringAddress",
            CheckoutState::Submitted => "Submitted",
        }
    }
}

impl std::fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
