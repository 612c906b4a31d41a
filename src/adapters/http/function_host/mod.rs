//! Function host adapter (Azure Functions custom handler).
//!
//! The host forwards each HTTP trigger invocation as a JSON envelope to
//! `POST /{function_name}` and expects the HTTP output binding back in
//! `Outputs.res`. The chat contract inside the envelope is the same as the
//! standalone server's.

mod envelope;
mod handlers;
mod routes;

pub use envelope::{
    HttpTriggerRequest, HttpTriggerResponse, InvocationData, InvocationRequest,
    InvocationResponse, InvocationOutputs,
};
pub use handlers::FunctionHostState;
pub use routes::function_host_router;
