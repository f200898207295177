//! Read port onto the community directory.

use async_trait::async_trait;
use fincahub_shared::types::CommunityId;

use super::error::DirectoryError;
use super::types::{Property, Resident, ResidentFilter};

/// Resident and property records maintained outside the ledger.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Residents of the community selected by `filter`, ordered by name.
    async fn list_residents(
        &self,
        community_id: CommunityId,
        filter: &ResidentFilter,
    ) -> Result<Vec<Resident>, DirectoryError>;

    /// Properties of the community with their owners, ordered by unit.
    async fn list_properties(&self, community_id: CommunityId) -> Result<Vec<Property>, DirectoryError>;
}
