//! Credential adapters - bearer tokens for the agent service.
//!
//! - `StaticTokenCredential` - a pre-issued token from configuration
//! - `ClientSecretCredential` - service principal with a client secret
//! - `ManagedIdentityCredential` - App Service identity endpoint or IMDS
//! - `ChainedCredential` - tries sources in order
//! - `CachedCredential` - per-scope cache with early refresh

mod cached;
mod chained;
mod client_secret;
mod managed_identity;
mod static_token;
mod token_response;

pub use cached::{CachedCredential, DEFAULT_REFRESH_MARGIN};
pub use chained::ChainedCredential;
pub use client_secret::ClientSecretCredential;
pub use managed_identity::ManagedIdentityCredential;
pub use static_token::StaticTokenCredential;
