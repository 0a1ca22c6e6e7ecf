// ABOUTME: Catalog registration operations.
// ABOUTME: Entities and the location records that back them.

use async_trait::async_trait;

use super::OpsError;
use crate::types::{EntityUid, LocationId};

#[async_trait]
pub trait CatalogOps: Send + Sync {
    /// Resolve a `type:target` location reference, if it is registered.
    async fn location_by_ref(&self, location_ref: &str) -> Result<Option<LocationId>, OpsError>;

    async fn remove_location(&self, id: &LocationId) -> Result<(), OpsError>;

    async fn remove_entity(&self, uid: &EntityUid) -> Result<(), OpsError>;
}
