//! Agent Gateway - standalone HTTP server.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match agent_gateway::bootstrap::run_standalone().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Startup failed: {}", e);
            eprintln!("agent-gateway: {}", e);
            ExitCode::FAILURE
        }
    }
}
