// ABOUTME: HTTP adapters for the developer portal backend and its catalog.
// ABOUTME: Implement the collaborator traits from `ops` with reqwest.

mod catalog;
mod client;
mod http;
mod payload;
mod requests;

pub use catalog::CatalogClient;
pub use client::PortalClient;
pub use payload::decode_payload;
