//! Foundation module - Shared domain primitives.
//!
//! Contains the error vocabulary shared by the gateway's request
//! validation and the conversation model.

mod errors;

pub use errors::ValidationError;
