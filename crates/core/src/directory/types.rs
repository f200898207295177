//! Resident and property records read from the community directory.

use fincahub_shared::types::{CommunityId, PropertyId, ResidentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DirectoryError;

/// Role of a resident inside the community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResidentRole {
    /// Property administrator.
    Admin,
    /// Community president.
    President,
    /// Regular neighbor.
    Neighbor,
}

impl ResidentRole {
    /// Returns the canonical upper-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::President => "PRESIDENT",
            Self::Neighbor => "NEIGHBOR",
        }
    }
}

impl std::fmt::Display for ResidentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResidentRole {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "PRESIDENT" => Ok(Self::President),
            "NEIGHBOR" => Ok(Self::Neighbor),
            _ => Err(DirectoryError::InvalidInput(format!("unknown role: {s}"))),
        }
    }
}

/// A resident with the units of the properties they own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    /// Resident ID.
    pub id: ResidentId,
    /// Community the resident belongs to.
    pub community_id: CommunityId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Community role.
    pub role: ResidentRole,
    /// Registered bank account, if any.
    pub iban: Option<String>,
    /// Units of owned properties, in association order.
    pub property_units: Vec<String>,
}

impl Resident {
    /// Unit of the first associated property.
    #[must_use]
    pub fn primary_unit(&self) -> Option<&str> {
        self.property_units.first().map(String::as_str)
    }

    /// Registered IBAN, ignoring blank values.
    #[must_use]
    pub fn registered_iban(&self) -> Option<&str> {
        self.iban.as_deref().map(str::trim).filter(|iban| !iban.is_empty())
    }
}

/// Owner reference carried by a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Resident ID.
    pub id: ResidentId,
    /// Display name.
    pub name: String,
}

/// A property (dwelling, shop, garage) of the community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property ID.
    pub id: PropertyId,
    /// Owning community.
    pub community_id: CommunityId,
    /// Unit label (e.g. "1A").
    pub unit: String,
    /// Floor number.
    pub floor: i32,
    /// Percentage share of the building's ownership.
    pub coefficient: Decimal,
    /// Zero or more owners.
    pub owners: Vec<Owner>,
}

/// Resident listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResidentFilter {
    /// Only residents with this role.
    pub role: Option<ResidentRole>,
    /// Only residents with a registered IBAN.
    pub with_iban: bool,
}

impl ResidentFilter {
    /// Residents that can be charged by direct debit.
    #[must_use]
    pub const fn with_iban() -> Self {
        Self {
            role: None,
            with_iban: true,
        }
    }

    /// Residents with the given role.
    #[must_use]
    pub const fn role(role: ResidentRole) -> Self {
        Self {
            role: Some(role),
            with_iban: false,
        }
    }

    /// Returns true if the resident passes the filter.
    #[must_use]
    pub fn matches(&self, resident: &Resident) -> bool {
        self.role.is_none_or(|role| resident.role == role)
            && (!self.with_iban || resident.registered_iban().is_some())
    }
}

/// Input for registering a resident.
#[derive(Debug, Clone)]
pub struct NewResident {
    /// Community the resident belongs to.
    pub community_id: CommunityId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Community role.
    pub role: ResidentRole,
    /// Registered bank account, if any.
    pub iban: Option<String>,
}

/// Input for registering a property.
#[derive(Debug, Clone)]
pub struct NewProperty {
    /// Owning community.
    pub community_id: CommunityId,
    /// Unit label.
    pub unit: String,
    /// Floor number.
    pub floor: i32,
    /// Percentage share, must not be negative.
    pub coefficient: Decimal,
}

impl NewProperty {
    /// Checks the coefficient and unit label.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::InvalidInput` for a blank unit or a negative coefficient.
    pub fn validate(&self) -> Result<(), DirectoryError> {
        if self.unit.trim().is_empty() {
            return Err(DirectoryError::InvalidInput("unit label is required".to_string()));
        }
        if self.coefficient.is_sign_negative() && !self.coefficient.is_zero() {
            return Err(DirectoryError::InvalidInput(format!(
                "coefficient cannot be negative: {}",
                self.coefficient
            )));
        }
        Ok(())
    }
}
