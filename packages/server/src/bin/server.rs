//! Sketchroom live-session server.
//!
//! Serves the room and drawing WebSocket channels plus the membership API.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sketchroom-server -- --port 8899 --topics-dir sample/topic
//! ```

use clap::Parser;
use sketchroom_server::ServerArgs;
use sketchroom_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = ServerArgs::parse();
    tracing::debug!("Starting with {:?}", args);

    // Run the server
    if let Err(e) = sketchroom_server::run_server(args).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
