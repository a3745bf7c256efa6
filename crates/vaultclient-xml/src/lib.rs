//! Legacy XML response decoding for the Vault client.
//!
//! Older Vault deployments answer some requests with XML documents instead
//! of JSON. This crate turns such a document into a [`serde_json::Value`] so
//! that the response normalizer can treat both formats the same way.
//!
//! # Conversion rules
//!
//! - The root element name is kept as the single top-level key
//! - Repeated sibling elements become arrays, single elements stay unwrapped
//! - Elements with text only become strings, empty elements become `""`
//! - Attributes are collected under `"$"`
//! - Text mixed with child elements is kept under `"_"`

pub mod deserialize;
pub mod error;

pub use deserialize::{ATTRIBUTES_KEY, TEXT_KEY, xml_to_value};
pub use error::XmlError;
