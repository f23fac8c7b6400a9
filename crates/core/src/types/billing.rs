//! Billing details collected at checkout.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors raised when a billing form is not ready for submission.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingError {
    /// A required field is empty.
    #[error("missing required field: {field}")]
    MissingField {
        /// First empty field in declaration order.
        field: BillingField,
    },
}

/// The fields of the billing form.
///
/// Declaration order is the order fields are validated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BillingField {
    FullName,
    Country,
    StreetAddressLine1,
    StreetAddressLine2,
    City,
    State,
    ZipCode,
    PhoneNumber,
    Email,
}

impl BillingField {
    /// Every field, in validation order.
    pub const ALL: [Self; 9] = [
        Self::FullName,
        Self::Country,
        Self::StreetAddressLine1,
        Self::StreetAddressLine2,
        Self::City,
        Self::State,
        Self::ZipCode,
        Self::PhoneNumber,
        Self::Email,
    ];

    /// The wire/form key for this field (e.g. `fullName`).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Country => "country",
            Self::StreetAddressLine1 => "streetAddressLine1",
            Self::StreetAddressLine2 => "streetAddressLine2",
            Self::City => "city",
            Self::State => "state",
            Self::ZipCode => "zipCode",
            Self::PhoneNumber => "phoneNumber",
            Self::Email => "email",
        }
    }

    /// The key split on capital letters, as shown in "please fill" alerts
    /// (e.g. `full Name`, `street Address Line1`).
    #[must_use]
    pub fn spaced_name(self) -> String {
        let key = self.key();
        let mut spaced = String::with_capacity(key.len() + 4);
        for c in key.chars() {
            if c.is_ascii_uppercase() {
                spaced.push(' ');
            }
            spaced.push(c);
        }
        spaced
    }
}

impl fmt::Display for BillingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Billing details as entered by the shopper.
///
/// All nine fields are required; see [`BillingForm::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingForm {
    pub full_name: String,
    pub country: String,
    pub street_address_line1: String,
    pub street_address_line2: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone_number: String,
    pub email: String,
}

impl BillingForm {
    /// Get the current value of a field.
    #[must_use]
    pub fn get(&self, field: BillingField) -> &str {
        match field {
            BillingField::FullName => &self.full_name,
            BillingField::Country => &self.country,
            BillingField::StreetAddressLine1 => &self.street_address_line1,
            BillingField::StreetAddressLine2 => &self.street_address_line2,
            BillingField::City => &self.city,
            BillingField::State => &self.state,
            BillingField::ZipCode => &self.zip_code,
            BillingField::PhoneNumber => &self.phone_number,
            BillingField::Email => &self.email,
        }
    }

    /// Replace the value of a field.
    pub fn set(&mut self, field: BillingField, value: impl Into<String>) {
        let slot = match field {
            BillingField::FullName => &mut self.full_name,
            BillingField::Country => &mut self.country,
            BillingField::StreetAddressLine1 => &mut self.street_address_line1,
            BillingField::StreetAddressLine2 => &mut self.street_address_line2,
            BillingField::City => &mut self.city,
            BillingField::State => &mut self.state,
            BillingField::ZipCode => &mut self.zip_code,
            BillingField::PhoneNumber => &mut self.phone_number,
            BillingField::Email => &mut self.email,
        };
        *slot = value.into();
    }

    /// Builder-style variant of [`BillingForm::set`].
    #[must_use]
    pub fn with(mut self, field: BillingField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Check that every field is filled in.
    ///
    /// Stops at the first empty field in [`BillingField::ALL`] order.
    ///
    /// # Errors
    ///
    /// Returns [`BillingError::MissingField`] naming the first empty field.
    pub fn validate(&self) -> Result<(), BillingError> {
        match BillingField::ALL
            .into_iter()
            .find(|&field| self.get(field).is_empty())
        {
            Some(field) => Err(BillingError::MissingField { field }),
            None => Ok(()),
        }
    }
}
