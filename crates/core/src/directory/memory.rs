//! In-memory directory.

use std::sync::Arc;

use async_trait::async_trait;
use fincahub_shared::types::{CommunityId, PropertyId, ResidentId};
use tokio::sync::RwLock;

use super::error::DirectoryError;
use super::store::Directory;
use super::types::{NewProperty, NewResident, Owner, Property, Resident, ResidentFilter};

#[derive(Debug, Default)]
struct DirectoryState {
    residents: Vec<Resident>,
    properties: Vec<Property>,
    // (property, resident) in association order
    ownership: Vec<(PropertyId, ResidentId)>,
}

impl DirectoryState {
    fn units_of(&self, resident_id: ResidentId) -> Vec<String> {
        self.ownership
            .iter()
            .filter(|(_, owner)| *owner == resident_id)
            .filter_map(|(property_id, _)| self.properties.iter().find(|p| p.id == *property_id))
            .map(|p| p.unit.clone())
            .collect()
    }

    fn owners_of(&self, property_id: PropertyId) -> Vec<Owner> {
        self.ownership
            .iter()
            .filter(|(property, _)| *property == property_id)
            .filter_map(|(_, resident_id)| self.residents.iter().find(|r| r.id == *resident_id))
            .map(|r| Owner {
                id: r.id,
                name: r.name.clone(),
            })
            .collect()
    }
}

/// Directory kept in process memory, for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resident.
    pub async fn add_resident(&self, input: NewResident) -> Resident {
        let resident = Resident {
            id: ResidentId::new(),
            community_id: input.community_id,
            name: input.name,
            email: input.email,
            role: input.role,
            iban: input.iban,
            property_units: Vec::new(),
        };
        self.state.write().await.residents.push(resident.clone());
        resident
    }

    /// Registers a property without owners.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::InvalidInput` if the input fails validation.
    pub async fn add_property(&self, input: NewProperty) -> Result<Property, DirectoryError> {
        input.validate()?;
        let property = Property {
            id: PropertyId::new(),
            community_id: input.community_id,
            unit: input.unit,
            floor: input.floor,
            coefficient: input.coefficient,
            owners: Vec::new(),
        };
        self.state.write().await.properties.push(property.clone());
        Ok(property)
    }

    /// Records `resident_id` as an owner of `property_id`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if either record is missing or they belong
    /// to different communities.
    pub async fn assign_owner(
        &self,
        property_id: PropertyId,
        resident_id: ResidentId,
    ) -> Result<(), DirectoryError> {
        let mut state = self.state.write().await;
        let property = state
            .properties
            .iter()
            .find(|p| p.id == property_id)
            .ok_or(DirectoryError::PropertyNotFound(property_id))?;
        let community_id = property.community_id;
        if !state
            .residents
            .iter()
            .any(|r| r.id == resident_id && r.community_id == community_id)
        {
            return Err(DirectoryError::ResidentNotFound(resident_id));
        }
        if !state.ownership.contains(&(property_id, resident_id)) {
            state.ownership.push((property_id, resident_id));
        }
        Ok(())
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn list_residents(
        &self,
        community_id: CommunityId,
        filter: &ResidentFilter,
    ) -> Result<Vec<Resident>, DirectoryError> {
        let state = self.state.read().await;
        let mut residents: Vec<Resident> = state
            .residents
            .iter()
            .filter(|r| r.community_id == community_id)
            .map(|r| Resident {
                property_units: state.units_of(r.id),
                ..r.clone()
            })
            .filter(|r| filter.matches(r))
            .collect();
        residents.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(residents)
    }

    async fn list_properties(&self, community_id: CommunityId) -> Result<Vec<Property>, DirectoryError> {
        let state = self.state.read().await;
        let mut properties: Vec<Property> = state
            .properties
            .iter()
            .filter(|p| p.community_id == community_id)
            .map(|p| Property {
                owners: state.owners_of(p.id),
                ..p.clone()
            })
            .collect();
        properties.sort_by(|a, b| a.unit.cmp(&b.unit));
        Ok(properties)
    }
}
