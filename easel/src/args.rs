use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Easel image request gateway
#[derive(Debug, Parser)]
#[command(name = "easel", about = "Image generation gateway with deadlines, retries and a chat pass-through")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "easel.toml", env = "EASEL_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address; takes precedence over `--port`
    #[arg(long, env = "EASEL_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Override only the listen port, keeping the configured interface
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Log filter in `EnvFilter` syntax
    #[arg(long, default_value = "info", env = "EASEL_LOG")]
    pub log: String,
}

impl Args {
    /// Resolve the listen address from CLI overrides and the configured value
    pub fn listen_address(&self, configured: Option<SocketAddr>, fallback: SocketAddr) -> SocketAddr {
        if let Some(listen) = self.listen {
            return listen;
        }

        let mut address = configured.unwrap_or(fallback);
        if let Some(port) = self.port {
            address.set_port(port);
        }
        address
    }
}
