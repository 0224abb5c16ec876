//! fml_build - production build orchestrator for FML applications.
//!
//! Bundles, minifies and content-hashes an application into a deployable
//! output directory.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match fml_build::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(hint) = e.suggestion() {
                eprintln!("  {hint}");
            }
            1
        }
    };

    process::exit(exit_code);
}
