//! Client core for the Vault identity service.
//!
//! A call flows through four stages:
//!
//! 1. [`request::RequestBuilder`] validates the typed input and lays out
//!    method, path, query or body from the static operation table
//! 2. [`auth::Authenticator`] signs the finished request when the operation
//!    requires it
//! 3. [`transport::Transport`] sends it over a pooled HTTP(S) client
//! 4. [`response::normalize`] turns the status and body into a value or a
//!    single [`vaultclient_model::DomainError`]
//!
//! [`VaultClient`] ties the stages together and exposes one method per
//! operation.
//!
//! ```no_run
//! use vaultclient_core::{ClientConfig, VaultClient};
//! use vaultclient_model::input::{CreateAccountInput, RequestOptions};
//!
//! # async fn run() -> Result<(), vaultclient_core::VaultClientError> {
//! let client = VaultClient::new(ClientConfig::from_env()?)?;
//! let response = client
//!     .create_account(
//!         &CreateAccountInput {
//!             name: "acme".into(),
//!             email_address: "ops@acme.io".into(),
//!             ..Default::default()
//!         },
//!         &RequestOptions::default(),
//!     )
//!     .await?;
//! println!("{}", response.body);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod operations;
pub mod request;
pub mod response;
pub mod transport;
pub mod validation;

pub use client::{REQUEST_UID_HEADER, VaultClient};
pub use config::{AuthScheme, ClientConfig, TlsConfig};
pub use error::{TransportError, VaultClientError, VaultResult};
pub use operations::OperationInput;
pub use response::VaultResponse;
