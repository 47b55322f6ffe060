//! The checkout session state machine.

use std::collections::HashSet;

use common::{OrderId, PackageId};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::money::Money;

use super::{
    AddressField, CheckoutError, CheckoutState, CustomerAddress, Order, OrderConfiguration, Receipt,
};

/// A single customer's checkout session.
///
/// Owns the order configuration, the address being entered, and the placed
/// order, and drives them through `SelectingPackage → EnteringAddress →
/// Submitted`. Every transition is a named method returning a `Result`; a
/// rejected transition leaves the session untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutSession {
    state: CheckoutState,
    configuration: OrderConfiguration,
    address: CustomerAddress,
    order: Option<Order>,
    /// Order ids issued by this session, kept across resets so a fresh
    /// order can never reuse an earlier id.
    #[serde(default)]
    issued_order_ids: HashSet<OrderId>,
}

impl CheckoutSession {
    /// Creates a new session at the package-selection step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// Returns the current order configuration.
    pub fn configuration(&self) -> &OrderConfiguration {
        &self.configuration
    }

    /// Returns the address as entered so far.
    pub fn address(&self) -> &CustomerAddress {
        &self.address
    }

    /// Returns the placed order, if one exists.
    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    /// Returns the receipt once an order has been placed.
    pub fn receipt(&self) -> Option<Receipt> {
        self.order.as_ref().map(Receipt::for_order)
    }

    /// Current total price; always freshly computed from the configuration.
    pub fn total(&self, catalog: &Catalog) -> Money {
        self.configuration.total(catalog)
    }

    /// Selects a package and moves to the address step.
    pub fn select_package(
        &mut self,
        catalog: &Catalog,
        id: PackageId,
    ) -> Result<(), CheckoutError> {
        if !self.state.can_select_package() {
            return Err(CheckoutError::InvalidStateTransition {
                current_state: self.state,
                action: "select package",
            });
        }

        self.configuration.select(catalog, id)?;
        self.state = CheckoutState::EnteringAddress;
        tracing::debug!(
            package = %self.selected_id_display(),
            "package selected"
        );
        Ok(())
    }

    /// Adjusts the additional-appliance count by a signed delta.
    ///
    /// Only defined on the address step, and only for packages that price
    /// additional appliances. The count clamps at zero.
    pub fn adjust_additional_units(
        &mut self,
        catalog: &Catalog,
        delta: i32,
    ) -> Result<(), CheckoutError> {
        if !self.state.can_edit() {
            return Err(CheckoutError::InvalidStateTransition {
                current_state: self.state,
                action: "adjust additional appliances",
            });
        }

        let package = self.selected_package(catalog, "adjust additional appliances")?;
        if !package.supports_additional_units() {
            return Err(CheckoutError::AdditionalUnitsUnavailable {
                id: package.id().clone(),
            });
        }

        self.configuration.adjust_units(delta);
        Ok(())
    }

    /// Sets one address field to the exact text entered.
    pub fn set_address_field(
        &mut self,
        field: AddressField,
        value: impl Into<String>,
    ) -> Result<(), CheckoutError> {
        if !self.state.can_edit() {
            return Err(CheckoutError::InvalidStateTransition {
                current_state: self.state,
                action: "edit address",
            });
        }

        self.address.set(field, value);
        Ok(())
    }

    /// Returns from the address step to package selection.
    ///
    /// Address input is discarded; the configuration (selected package and
    /// appliance count) carries over.
    pub fn back(&mut self) -> Result<(), CheckoutError> {
        if !self.state.can_go_back() {
            return Err(CheckoutError::InvalidStateTransition {
                current_state: self.state,
                action: "go back",
            });
        }

        self.address.clear();
        self.state = CheckoutState::SelectingPackage;
        Ok(())
    }

    /// Validates the address and places the order.
    ///
    /// On validation failure the session stays on the address step and no
    /// order is created. On success the package, appliance count, computed
    /// total and address are snapshotted into an immutable [`Order`] before
    /// any session field changes, so the commit is atomic from the caller's
    /// perspective.
    pub fn submit(&mut self, catalog: &Catalog) -> Result<&Order, CheckoutError> {
        if !self.state.can_submit() {
            return Err(CheckoutError::InvalidStateTransition {
                current_state: self.state,
                action: "submit",
            });
        }

        self.address.validate()?;

        let package = self.selected_package(catalog, "submit")?.clone();
        let total = self.configuration.total(catalog);
        let order_id = self.next_order_id();

        let order = Order::place(
            order_id.clone(),
            package,
            self.configuration.additional_units(),
            total,
            self.address.clone(),
        );

        self.issued_order_ids.insert(order_id);
        self.state = CheckoutState::Submitted;
        let placed = self.order.insert(order);
        tracing::info!(order_id = %placed.order_id(), total = %placed.total_cost(), "order placed");
        Ok(&*placed)
    }

    /// Starts a new order: clears configuration, address and the stored
    /// order together, returning to package selection. No partial reset.
    pub fn reset(&mut self) -> Result<(), CheckoutError> {
        if !self.state.can_reset() {
            return Err(CheckoutError::InvalidStateTransition {
                current_state: self.state,
                action: "reset",
            });
        }

        self.configuration.clear();
        self.address.clear();
        self.order = None;
        self.state = CheckoutState::SelectingPackage;
        tracing::debug!("session reset for a new order");
        Ok(())
    }

    /// Generates an order id that no earlier order in this session used.
    /// A collision is practically impossible; if one occurs we regenerate
    /// rather than ever overwriting a prior order.
    fn next_order_id(&self) -> OrderId {
        loop {
            let candidate = OrderId::generate();
            if !self.issued_order_ids.contains(&candidate) {
                return candidate;
            }
        }
    }

    fn selected_package<'c>(
        &self,
        catalog: &'c Catalog,
        action: &'static str,
    ) -> Result<&'c crate::catalog::Package, CheckoutError> {
        let id = self
            .configuration
            .selected_package_id()
            .ok_or(CheckoutError::InvalidStateTransition {
                current_state: self.state,
                action,
            })?;
        catalog
            .get(id)
            .ok_or_else(|| CheckoutError::InvalidPackageId { id: id.clone() })
    }

    fn selected_id_display(&self) -> &str {
        self.configuration
            .selected_package_id()
            .map(PackageId::as_str)
            .unwrap_or("-")
    }
}
