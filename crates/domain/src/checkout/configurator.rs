//! Order configuration: package choice, appliance count, and pricing.

use common::PackageId;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::money::Money;

use super::CheckoutError;

/// Mutable session state tracking the in-progress package choice and
/// additional-appliance count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfiguration {
    selected_package_id: Option<PackageId>,
    additional_units: u32,
}

impl OrderConfiguration {
    /// Returns the selected package id, if any.
    pub fn selected_package_id(&self) -> Option<&PackageId> {
        self.selected_package_id.as_ref()
    }

    /// Returns the additional-appliance count.
    pub fn additional_units(&self) -> u32 {
        self.additional_units
    }

    /// Selects a package, validating the id against the catalog.
    pub fn select(&mut self, catalog: &Catalog, id: PackageId) -> Result<(), CheckoutError> {
        if !catalog.contains(&id) {
            return Err(CheckoutError::InvalidPackageId { id });
        }
        self.selected_package_id = Some(id);
        Ok(())
    }

    /// Adjusts the appliance count by a signed delta, clamping at zero.
    /// No upper bound is enforced.
    pub fn adjust_units(&mut self, delta: i32) {
        self.additional_units = if delta < 0 {
            self.additional_units.saturating_sub(delta.unsigned_abs())
        } else {
            self.additional_units.saturating_add(delta as u32)
        };
    }

    /// Computes the current total price.
    ///
    /// This is a pure function of the configuration and the catalog and is
    /// recomputed on every call, never cached. Packages without a per-unit
    /// price ignore the appliance count; with nothing selected the total is
    /// zero.
    pub fn total(&self, catalog: &Catalog) -> Money {
        let Some(package) = self
            .selected_package_id
            .as_ref()
            .and_then(|id| catalog.get(id))
        else {
            return Money::zero();
        };

        match package.additional_unit_price() {
            Some(unit_price) => package.base_price() + unit_price.multiply(self.additional_units),
            None => package.base_price(),
        }
    }

    /// Clears the configuration back to its initial state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> PackageId {
        PackageId::new("home")
    }

    fn industry() -> PackageId {
        PackageId::new("industry")
    }

    #[test]
    fn test_select_valid_package() {
        let catalog = Catalog::standard();
        let mut config = OrderConfiguration::default();

        config.select(&catalog, home()).unwrap();
        assert_eq!(config.selected_package_id(), Some(&home()));
    }

    #[test]
    fn test_select_unknown_package_fails() {
        let catalog = Catalog::standard();
        let mut config = OrderConfiguration::default();

        let result = config.select(&catalog, PackageId::new("enterprise"));
        assert!(matches!(result, Err(CheckoutError::InvalidPackageId { .. })));
        assert!(config.selected_package_id().is_none());
    }

    #[test]
    fn test_total_without_selection_is_zero() {
        let catalog = Catalog::standard();
        let config = OrderConfiguration::default();
        assert!(config.total(&catalog).is_zero());
    }

    #[test]
    fn test_total_with_zero_units_is_base_price() {
        let catalog = Catalog::standard();

        for id in [home(), industry()] {
            let mut config = OrderConfiguration::default();
            config.select(&catalog, id.clone()).unwrap();
            let base = catalog.get(&id).unwrap().base_price();
            assert_eq!(config.total(&catalog), base);
        }
    }

    #[test]
    fn test_total_increases_by_unit_price_per_unit() {
        let catalog = Catalog::standard();
        let mut config = OrderConfiguration::default();
        config.select(&catalog, home()).unwrap();

        let mut previous = config.total(&catalog);
        for _ in 0..5 {
            config.adjust_units(1);
            let current = config.total(&catalog);
            assert_eq!((current - previous).paise(), 2_000);
            previous = current;
        }
    }

    #[test]
    fn test_flat_rate_package_ignores_units_in_pricing() {
        let catalog = Catalog::standard();
        let mut config = OrderConfiguration::default();
        config.select(&catalog, industry()).unwrap();
        config.adjust_units(7);

        assert_eq!(config.total(&catalog).paise(), 20_000);
    }

    #[test]
    fn test_adjust_units_clamps_at_zero() {
        let mut config = OrderConfiguration::default();

        config.adjust_units(-5);
        assert_eq!(config.additional_units(), 0);

        config.adjust_units(3);
        config.adjust_units(-1);
        config.adjust_units(-10);
        assert_eq!(config.additional_units(), 0);
    }

    #[test]
    fn test_scenario_a_pricing() {
        let catalog = Catalog::standard();
        let mut config = OrderConfiguration::default();
        config.select(&catalog, home()).unwrap();
        config.adjust_units(3);

        assert_eq!(config.total(&catalog).paise(), 16_000);
    }

    #[test]
    fn test_clear_resets_everything() {
        let catalog = Catalog::standard();
        let mut config = OrderConfiguration::default();
        config.select(&catalog, home()).unwrap();
        config.adjust_units(4);

        config.clear();
        assert!(config.selected_package_id().is_none());
        assert_eq!(config.additional_units(), 0);
    }
}
