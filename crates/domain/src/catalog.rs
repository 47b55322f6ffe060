//! Package catalog: the fixed table of purchasable packages.

use common::PackageId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Money;

/// Errors that can occur while building the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two packages share the same id.
    #[error("Duplicate package id: {id}")]
    DuplicatePackageId { id: PackageId },
}

/// A predefined, purchasable product tier.
///
/// Packages are defined once at startup and never mutated. The id is the
/// stable join key used by the configurator and on order snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    id: PackageId,
    title: String,
    description: String,
    base_price: Money,
    /// Per-appliance add-on price; absent for packages sold at a flat rate.
    additional_unit_price: Option<Money>,
    features: Vec<String>,
    highlight: String,
}

impl Package {
    /// Creates a new package definition.
    pub fn new(
        id: impl Into<PackageId>,
        title: impl Into<String>,
        description: impl Into<String>,
        base_price: Money,
        additional_unit_price: Option<Money>,
        features: Vec<String>,
        highlight: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            base_price,
            additional_unit_price,
            features,
            highlight: highlight.into(),
        }
    }

    /// Returns the package id.
    pub fn id(&self) -> &PackageId {
        &self.id
    }

    /// Returns the display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the short description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the base price.
    pub fn base_price(&self) -> Money {
        self.base_price
    }

    /// Returns the per-appliance add-on price, if the package has one.
    pub fn additional_unit_price(&self) -> Option<Money> {
        self.additional_unit_price
    }

    /// Returns true if the package prices additional appliances.
    pub fn supports_additional_units(&self) -> bool {
        self.additional_unit_price.is_some()
    }

    /// Returns the ordered feature list.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Returns the highlight line shown on the package card.
    pub fn highlight(&self) -> &str {
        &self.highlight
    }
}

/// The fixed set of packages on offer, keyed by id.
///
/// Id uniqueness is enforced at construction; lookups are by id and
/// iteration preserves definition order.
#[derive(Debug, Clone)]
pub struct Catalog {
    packages: Vec<Package>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate package ids.
    pub fn new(packages: Vec<Package>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for package in &packages {
            if !seen.insert(package.id().clone()) {
                return Err(CatalogError::DuplicatePackageId {
                    id: package.id().clone(),
                });
            }
        }
        Ok(Self { packages })
    }

    /// The production catalog: the two packages on offer.
    pub fn standard() -> Self {
        let packages = vec![
            Package::new(
                "home",
                "Home Package",
                "Perfect for residential smart home automation",
                Money::from_paise(10_000),
                Some(Money::from_paise(2_000)),
                vec![
                    "Smart energy monitoring".to_string(),
                    "Mobile app control".to_string(),
                    "Safety features included".to_string(),
                    "1-year warranty".to_string(),
                ],
                "5 Switch Boards Included",
            ),
            Package::new(
                "industry",
                "Industry Package",
                "Enterprise solution with local server",
                Money::from_paise(20_000),
                None,
                vec![
                    "Local server infrastructure".to_string(),
                    "Enterprise-grade security".to_string(),
                    "Advanced analytics".to_string(),
                    "24/7 support".to_string(),
                ],
                "Local Server Included",
            ),
        ];

        // The two ids are distinct by construction.
        match Self::new(packages) {
            Ok(catalog) => catalog,
            Err(_) => unreachable!("standard catalog ids are unique"),
        }
    }

    /// Looks up a package by id.
    pub fn get(&self, id: &PackageId) -> Option<&Package> {
        self.packages.iter().find(|p| p.id() == id)
    }

    /// Returns true if the id exists in the catalog.
    pub fn contains(&self, id: &PackageId) -> bool {
        self.get(id).is_some()
    }

    /// Iterates packages in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    /// Returns the number of packages.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns true if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
