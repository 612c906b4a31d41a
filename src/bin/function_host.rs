//! Agent Gateway - custom handler process for the function host.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match agent_gateway::bootstrap::run_function_host().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Startup failed: {}", e);
            eprintln!("agent-gateway-function: {}", e);
            ExitCode::FAILURE
        }
    }
}
