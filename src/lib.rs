//! # gcf-inventory
//!
//! Collects Google Cloud Functions into a vendor-neutral cloud-asset
//! inventory. One pass lists every function of a project, normalizes each
//! into a cloud-service resource, and returns the successes alongside an
//! error response for every function that could not be normalized.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`connector`] | Listing functions from the Cloud Functions API |
//! | [`manager`] | The collection pass and region tracking |
//! | [`model`] | Inventory wire format and the function data model |
//! | [`gcp`] | Credentials, HTTP and URL plumbing |
//! | [`params`] | Collection parameters |
//! | [`config`] | Persistent user configuration |
//! | [`error`] | Per-item error taxonomy |

pub mod config;
pub mod connector;
pub mod error;
pub mod gcp;
pub mod manager;
pub mod model;
pub mod params;

pub use error::CollectError;
pub use manager::{CollectedRegions, FunctionManager, RegionTracker};
pub use params::CollectParams;
