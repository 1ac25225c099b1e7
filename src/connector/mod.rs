//! Connectors
//!
//! A connector performs the listing against the remote API: pagination,
//! authentication and HTTP are its business, not the collector's.
//!
//! - [`FunctionConnector`] lists every function visible to one project
//! - [`ConnectorLocator`] builds a connector scoped to a set of collection parameters
//! - [`function`] holds the Cloud Functions REST implementation

pub mod function;

use crate::model::RawFunctionRecord;
use crate::params::CollectParams;
use anyhow::Result;
use async_trait::async_trait;

pub use function::{CloudFunctionsConnector, GcpConnectorLocator};

#[async_trait]
pub trait FunctionConnector: Send + Sync {
    /// List every function, following pagination to the end
    async fn list_functions(&self) -> Result<Vec<RawFunctionRecord>>;
}

#[async_trait]
pub trait ConnectorLocator: Send + Sync {
    async fn function_connector(&self, params: &CollectParams)
        -> Result<Box<dyn FunctionConnector>>;
}
