//! The immutable order record produced at submission.

use chrono::{DateTime, Local, Utc};
use common::OrderId;
use serde::{Deserialize, Serialize};

use crate::catalog::Package;
use crate::money::Money;

use super::CustomerAddress;

/// A finalized order.
///
/// Embeds point-in-time copies of the package and the customer address,
/// never live references, so the receipt stays stable even if the session
/// state is mutated or reset afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    order_id: OrderId,
    package: Package,
    additional_units: u32,
    total_cost: Money,
    customer: CustomerAddress,
    placed_at: DateTime<Utc>,
    order_date: String,
}

impl Order {
    /// Builds an order from the values captured at submission time.
    pub fn place(
        order_id: OrderId,
        package: Package,
        additional_units: u32,
        total_cost: Money,
        customer: CustomerAddress,
    ) -> Self {
        Self {
            order_id,
            package,
            additional_units,
            total_cost,
            customer,
            placed_at: Utc::now(),
            order_date: Local::now().format("%d/%m/%Y").to_string(),
        }
    }

    /// Returns the generated order id.
    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Returns the package snapshot.
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Returns the appliance count copied from the configuration.
    pub fn additional_units(&self) -> u32 {
        self.additional_units
    }

    /// Returns the total cost computed at submission time.
    pub fn total_cost(&self) -> Money {
        self.total_cost
    }

    /// Returns the customer snapshot.
    pub fn customer(&self) -> &CustomerAddress {
        &self.customer
    }

    /// Returns the submission instant.
    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    /// Returns the human-readable local order date.
    pub fn order_date(&self) -> &str {
        &self.order_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::checkout::AddressField;
    use common::PackageId;

    fn sample_order() -> Order {
        let catalog = Catalog::standard();
        let package = catalog.get(&PackageId::new("home")).unwrap().clone();
        let mut customer = CustomerAddress::default();
        customer.set(AddressField::FullName, "Asha Verma");

        Order::place(
            OrderId::generate(),
            package,
            3,
            Money::from_paise(16_000),
            customer,
        )
    }

    #[test]
    fn test_order_captures_submission_values() {
        let order = sample_order();
        assert_eq!(order.package().id().as_str(), "home");
        assert_eq!(order.additional_units(), 3);
        assert_eq!(order.total_cost().paise(), 16_000);
        assert_eq!(order.customer().full_name(), "Asha Verma");
    }

    #[test]
    fn test_order_date_is_formatted() {
        let order = sample_order();
        // DD/MM/YYYY
        assert_eq!(order.order_date().len(), 10);
        assert_eq!(order.order_date().matches('/').count(), 2);
    }

    #[test]
    fn test_order_serialization_roundtrip() {
        let order = sample_order();
        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deserialized);
    }
}
