//! Inventory schema
//!
//! - [`base`] - envelope, responses and reference model shared by all types
//! - [`function`] - the Cloud Functions data model and type metadata

pub mod base;
pub mod function;

pub use base::{
    CloudServiceResource, CloudServiceResponse, CloudServiceTypeResponse, ErrorResourceResponse,
    ReferenceModel, Referenceable,
};
pub use function::{
    cloud_service_types, Environment, Function, FunctionDisplay, FunctionResource,
    FunctionResponse, RawFunctionRecord,
};
