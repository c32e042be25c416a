//! Buyer shipping address.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A shipping address as submitted to and returned by the remote API.
///
/// All six fields are required. The field order matches the order in which
/// the profile setup form asks for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub subdistrict: String,
    #[serde(default)]
    pub postal_code: String,
}

/// One of the required address fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    Name,
    Province,
    City,
    District,
    Subdistrict,
    PostalCode,
}

impl AddressField {
    /// All fields in form order.
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Province,
        Self::City,
        Self::District,
        Self::Subdistrict,
        Self::PostalCode,
    ];

    /// The form input name (matches the JSON key).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Province => "province",
            Self::City => "city",
            Self::District => "district",
            Self::Subdistrict => "subdistrict",
            Self::PostalCode => "postalCode",
        }
    }

    /// Human label for the form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Province => "Province",
            Self::City => "City",
            Self::District => "District",
            Self::Subdistrict => "Subdistrict",
            Self::PostalCode => "Postal code",
        }
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Address validation failure.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// A required field is empty or whitespace.
    #[error("{0} is required")]
    MissingField(AddressField),
}

impl AddressForm {
    /// The value of a field.
    #[must_use]
    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::Name => &self.name,
            AddressField::Province => &self.province,
            AddressField::City => &self.city,
            AddressField::District => &self.district,
            AddressField::Subdistrict => &self.subdistrict,
            AddressField::PostalCode => &self.postal_code,
        }
    }

    /// Fields that are empty after trimming, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<AddressField> {
        AddressField::ALL
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    /// Check that every required field is filled in.
    ///
    /// # Errors
    ///
    /// Returns the first missing field in form order.
    pub fn validate(&self) -> Result<(), AddressError> {
        match self.missing_fields().first() {
            Some(field) => Err(AddressError::MissingField(*field)),
            None => Ok(()),
        }
    }

    /// A copy with surrounding whitespace removed from every field.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            province: self.province.trim().to_owned(),
            city: self.city.trim().to_owned(),
            district: self.district.trim().to_owned(),
            subdistrict: self.subdistrict.trim().to_owned(),
            postal_code: self.postal_code.trim().to_owned(),
        }
    }

    /// One-line summary for address lists.
    #[must_use]
    pub fn summary(&self) -> String {
        [
            self.subdistrict.as_str(),
            self.district.as_str(),
            self.city.as_str(),
            self.province.as_str(),
            self.postal_code.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}
