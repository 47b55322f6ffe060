//! Customer installation address capture and validation.

use serde::{Deserialize, Serialize};

use super::CheckoutError;

/// The fields of an installation address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    FullName,
    Phone,
    Address,
    City,
    State,
    Pincode,
    Notes,
}

impl AddressField {
    /// The fields that must be non-empty at submission.
    pub const REQUIRED: [AddressField; 4] = [
        AddressField::FullName,
        AddressField::Phone,
        AddressField::Address,
        AddressField::City,
    ];

    /// Returns true if the field is required at submission.
    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }

    /// Returns the wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressField::FullName => "full_name",
            AddressField::Phone => "phone",
            AddressField::Address => "address",
            AddressField::City => "city",
            AddressField::State => "state",
            AddressField::Pincode => "pincode",
            AddressField::Notes => "notes",
        }
    }
}

impl std::fmt::Display for AddressField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Customer contact and installation address.
///
/// Values are stored exactly as entered; no normalization is applied.
/// Only name, phone, street address and city are required — the rest is
/// optional context for the installation crew.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerAddress {
    full_name: String,
    phone: String,
    address: String,
    city: String,
    state: String,
    pincode: String,
    notes: String,
}

impl CustomerAddress {
    /// Assigns a field, retaining the exact text.
    pub fn set(&mut self, field: AddressField, value: impl Into<String>) {
        let value = value.into();
        match field {
            AddressField::FullName => self.full_name = value,
            AddressField::Phone => self.phone = value,
            AddressField::Address => self.address = value,
            AddressField::City => self.city = value,
            AddressField::State => self.state = value,
            AddressField::Pincode => self.pincode = value,
            AddressField::Notes => self.notes = value,
        }
    }

    /// Returns a field's current value.
    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::FullName => &self.full_name,
            AddressField::Phone => &self.phone,
            AddressField::Address => &self.address,
            AddressField::City => &self.city,
            AddressField::State => &self.state,
            AddressField::Pincode => &self.pincode,
            AddressField::Notes => &self.notes,
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Returns the required fields that are empty after trimming
    /// leading/trailing whitespace.
    pub fn missing_required_fields(&self) -> Vec<AddressField> {
        AddressField::REQUIRED
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    /// Presence validation over the required fields.
    ///
    /// Optional fields never affect the result. No phone-format check is
    /// applied at this step.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let missing = self.missing_required_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::MissingRequiredFields { missing })
        }
    }

    /// Clears every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
