// ABOUTME: Opaque string identifiers tagged with what they identify.
// ABOUTME: Catalog entity UIDs, catalog location IDs, and Kubernetes deployment UIDs.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityMarker {}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationMarker {}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMarker {}

/// An identifier handed out by some other system.
///
/// Entity UIDs and location IDs are both bare strings on the wire, and
/// removing the wrong one from the catalog cannot be undone. The marker keeps
/// them from being swapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T> {
    value: String,
    #[serde(skip)]
    kind: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// Catalog entity UID (`metadata.uid`).
pub type EntityUid = Id<EntityMarker>;
/// Catalog location record ID.
pub type LocationId = Id<LocationMarker>;
/// Kubernetes deployment object UID (`metadata.uid`).
pub type DeploymentUid = Id<DeploymentMarker>;
