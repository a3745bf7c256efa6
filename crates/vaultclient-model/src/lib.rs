//! Operation table, input types and error codes for the Vault client.
//!
//! This crate holds the static description of the remote Vault API:
//!
//! - [`operation`] - every remote operation and its wire descriptor
//! - [`input`] - typed inputs, one struct per operation
//! - [`error`] - the closed table of domain error codes

pub mod error;
pub mod input;
pub mod operation;

pub use error::{DomainError, DomainErrorCode};
pub use operation::{
    AuthRequirement, HttpMethod, Operation, OperationDescriptor, PayloadEncoding, ResultShape,
};
