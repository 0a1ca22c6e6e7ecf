// ABOUTME: CatalogClient, catalog de-registration over the catalog REST API.
// ABOUTME: Resolves location refs and removes locations and entities.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::http;
use crate::ops::{CatalogOps, OpsError};
use crate::types::{EntityUid, LocationId};

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct LocationEntry {
    data: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    target: String,
}

impl Location {
    fn reference(&self) -> String {
        format!("{}:{}", self.kind, self.target)
    }
}

impl CatalogClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            api_url: format!("{}/api/catalog", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl CatalogOps for CatalogClient {
    async fn location_by_ref(&self, location_ref: &str) -> Result<Option<LocationId>, OpsError> {
        let path = "/locations";
        let request = self.http.get(format!("{}{path}", self.api_url));
        let entries: Vec<LocationEntry> = http::send(path, request).await?.parse(path)?;

        Ok(entries
            .into_iter()
            .map(|entry| entry.data)
            .find(|location| location.reference() == location_ref)
            .map(|location| LocationId::new(location.id)))
    }

    async fn remove_location(&self, id: &LocationId) -> Result<(), OpsError> {
        let path = format!("/locations/{}", urlencoding::encode(id.as_str()));
        info!(location = %id, "removing catalog location");
        let request = self.http.delete(format!("{}{path}", self.api_url));
        http::send(&path, request).await?;
        Ok(())
    }

    async fn remove_entity(&self, uid: &EntityUid) -> Result<(), OpsError> {
        let path = format!("/entities/by-uid/{}", urlencoding::encode(uid.as_str()));
        info!(entity = %uid, "removing catalog entity");
        let request = self.http.delete(format!("{}{path}", self.api_url));
        http::send(&path, request).await?;
        Ok(())
    }
}
