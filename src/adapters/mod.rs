//! Adapters - implementations of ports and the hosting surfaces.

pub mod agents;
pub mod credentials;
pub mod http;
