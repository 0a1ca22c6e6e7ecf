// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod app_name;
mod id;

pub use app_name::{AppName, AppNameError};
pub use id::{DeploymentUid, EntityUid, Id, LocationId};
