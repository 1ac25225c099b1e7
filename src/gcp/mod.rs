//! GCP API interaction module
//!
//! This module provides the plumbing for talking to Google Cloud Platform
//! APIs: authentication, the HTTP wrapper, and the client that builds
//! Cloud Functions URLs.
//!
//! # Module Structure
//!
//! - [`auth`] - ADC, service account keys and static access tokens
//! - [`client`] - Main GCP client for making API requests
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use gcf_inventory::gcp::{auth::GcpCredentials, client::GcpClient};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let credentials = GcpCredentials::new().await?;
//!     let client = GcpClient::new("my-project", credentials)?;
//!     let page = client.get(&client.functions_location_url("-", "functions")).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
