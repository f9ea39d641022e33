//! Command line configuration of the server.

use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_PORT: u16 = 8899;

/// Sketchroom live-session server
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory holding config.json and one <category>.json per category
    #[arg(long, env = "TOPICS_DIR", default_value = "sample/topic")]
    pub topics_dir: PathBuf,
}

impl ServerArgs {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
