//! HTTP adapters - the two hosting surfaces for the chat gateway.
//!
//! Both delegate to [`ChatGateway`](crate::application::ChatGateway) and
//! share one [`CorsPolicy`].

pub mod cors;
pub mod function_host;
pub mod standalone;

// Re-export key types for convenience
pub use cors::{CorsConfigError, CorsPolicy};
pub use function_host::{function_host_router, FunctionHostState};
pub use standalone::{standalone_router, StandaloneState};
