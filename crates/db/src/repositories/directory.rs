//! Directory repository for communities, residents and properties.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};
use tracing::error;
use uuid::Uuid;

use fincahub_core::directory::{
    Directory, DirectoryError, NewProperty, NewResident, Owner, Property, Resident,
    ResidentFilter,
};
use fincahub_shared::types::{CommunityId, PropertyId, ResidentId};

use crate::entities::sea_orm_active_enums::ResidentRole as DbResidentRole;
use crate::entities::{communities, properties, property_owners, residents};

/// Postgres implementation of the community directory.
#[derive(Debug, Clone)]
pub struct DirectoryRepository {
    db: DatabaseConnection,
}

impl DirectoryRepository {
    /// Creates a new directory repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a community.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Storage` if the insert fails.
    pub async fn create_community(
        &self,
        name: &str,
        address: Option<&str>,
    ) -> Result<CommunityId, DirectoryError> {
        let model = communities::ActiveModel {
            id: Set(CommunityId::new().into_inner()),
            name: Set(name.to_string()),
            address: Set(address.map(str::to_string)),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(storage)?;

        Ok(CommunityId::from_uuid(model.id))
    }

    /// Registers a resident without properties.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Storage` if the insert fails.
    pub async fn create_resident(&self, input: NewResident) -> Result<Resident, DirectoryError> {
        let model = residents::ActiveModel {
            id: Set(ResidentId::new().into_inner()),
            community_id: Set(input.community_id.into_inner()),
            name: Set(input.name),
            email: Set(input.email),
            role: Set(input.role.into()),
            iban: Set(input.iban),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(storage)?;

        Ok(to_resident(model, Vec::new()))
    }

    /// Registers a property without owners.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::InvalidInput` if the input fails validation,
    /// or `DirectoryError::Storage` if the insert fails.
    pub async fn create_property(&self, input: NewProperty) -> Result<Property, DirectoryError> {
        input.validate()?;

        let model = properties::ActiveModel {
            id: Set(PropertyId::new().into_inner()),
            community_id: Set(input.community_id.into_inner()),
            unit: Set(input.unit),
            floor: Set(input.floor),
            coefficient: Set(input.coefficient),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(storage)?;

        Ok(to_property(model, Vec::new()))
    }

    /// Records `resident_id` as an owner of `property_id`. Idempotent.
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
        let property = properties::Entity::find_by_id(property_id.into_inner())
            .one(&self.db)
            .await
            .map_err(storage)?
            .ok_or(DirectoryError::PropertyNotFound(property_id))?;

        let resident = residents::Entity::find_by_id(resident_id.into_inner())
            .filter(residents::Column::CommunityId.eq(property.community_id))
            .one(&self.db)
            .await
            .map_err(storage)?;
        if resident.is_none() {
            return Err(DirectoryError::ResidentNotFound(resident_id));
        }

        property_owners::Entity::insert(property_owners::ActiveModel {
            property_id: Set(property_id.into_inner()),
            resident_id: Set(resident_id.into_inner()),
            linked_at: NotSet,
        })
        .on_conflict(
            OnConflict::columns([
                property_owners::Column::PropertyId,
                property_owners::Column::ResidentId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .map_err(storage)?;

        Ok(())
    }
}

fn storage(err: DbErr) -> DirectoryError {
    error!(error = %err, "Directory query failed");
    DirectoryError::Storage(err.to_string())
}

fn to_resident(model: residents::Model, property_units: Vec<String>) -> Resident {
    Resident {
        id: ResidentId::from_uuid(model.id),
        community_id: CommunityId::from_uuid(model.community_id),
        name: model.name,
        email: model.email,
        role: model.role.into(),
        iban: model.iban,
        property_units,
    }
}

fn to_property(model: properties::Model, owners: Vec<Owner>) -> Property {
    Property {
        id: PropertyId::from_uuid(model.id),
        community_id: CommunityId::from_uuid(model.community_id),
        unit: model.unit,
        floor: model.floor,
        coefficient: model.coefficient,
        owners,
    }
}

#[async_trait]
impl Directory for DirectoryRepository {
    async fn list_residents(
        &self,
        community_id: CommunityId,
        filter: &ResidentFilter,
    ) -> Result<Vec<Resident>, DirectoryError> {
        let mut query =
            residents::Entity::find().filter(residents::Column::CommunityId.eq(community_id.into_inner()));
        if let Some(role) = filter.role {
            query = query.filter(residents::Column::Role.eq(DbResidentRole::from(role)));
        }
        if filter.with_iban {
            query = query.filter(residents::Column::Iban.is_not_null());
        }

        let models = query
            .order_by_asc(residents::Column::Name)
            .all(&self.db)
            .await
            .map_err(storage)?;
        if models.is_empty() {
            return Ok(Vec::new());
        }

        // Units per resident, oldest link first
        let links = property_owners::Entity::find()
            .filter(property_owners::Column::ResidentId.is_in(models.iter().map(|m| m.id)))
            .find_also_related(properties::Entity)
            .order_by_asc(property_owners::Column::LinkedAt)
            .all(&self.db)
            .await
            .map_err(storage)?;

        let mut units: HashMap<Uuid, Vec<String>> = HashMap::new();
        for (link, property) in links {
            if let Some(property) = property {
                units.entry(link.resident_id).or_default().push(property.unit);
            }
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let property_units = units.remove(&model.id).unwrap_or_default();
                to_resident(model, property_units)
            })
            // blank IBANs pass the NOT NULL check
            .filter(|resident| filter.matches(resident))
            .collect())
    }

    async fn list_properties(&self, community_id: CommunityId) -> Result<Vec<Property>, DirectoryError> {
        let models = properties::Entity::find()
            .filter(properties::Column::CommunityId.eq(community_id.into_inner()))
            .order_by_asc(properties::Column::Unit)
            .all(&self.db)
            .await
            .map_err(storage)?;
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let links = property_owners::Entity::find()
            .filter(property_owners::Column::PropertyId.is_in(models.iter().map(|m| m.id)))
            .find_also_related(residents::Entity)
            .order_by_asc(property_owners::Column::LinkedAt)
            .all(&self.db)
            .await
            .map_err(storage)?;

        let mut owners: HashMap<Uuid, Vec<Owner>> = HashMap::new();
        for (link, resident) in links {
            if let Some(resident) = resident {
                owners.entry(link.property_id).or_default().push(Owner {
                    id: ResidentId::from_uuid(resident.id),
                    name: resident.name,
                });
            }
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let property_owners = owners.remove(&model.id).unwrap_or_default();
                to_property(model, property_owners)
            })
            .collect())
    }
}
