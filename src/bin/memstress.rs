//! memstress: HTTP memory-pressure test server
//!
//! Allocates and frees blocks of native memory on demand so that container
//! memory limits and OOM handling can be exercised from the outside.
//!
//! ## Configuration
//! - First positional argument: greeting served at `/`, upper-cased
//!   (the literal token `default` keeps the built-in sentence)
//! - MEMSTRESS_HOST: bind host (default: 0.0.0.0)
//! - MEMSTRESS_PORT: bind port (default: 8080)
//! - MEMSTRESS_LOG: tracing filter (default: info)

use std::process::ExitCode;

use tracing::error;

use memstress::bootstrap::init_tracing;
use memstress::config::Settings;
use memstress::rest;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let settings = Settings::from_env(std::env::args().skip(1));

    if let Err(e) = rest::serve(settings).await {
        error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
