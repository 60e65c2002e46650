use std::path::{Path, PathBuf};

use clap::Parser;

const DEFAULT_CONFIG: &str = "slidecast.toml";

/// Slidecast slide and voiceover service
#[derive(Debug, Parser)]
#[command(name = "slidecast", about = "AI slide deck generation and voiceover service")]
pub struct Args {
    /// Path to configuration file; `slidecast.toml` is used if present
    #[arg(short, long, env = "SLIDECAST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "SLIDECAST_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}

impl Args {
    /// Explicit path, else the default location
    pub fn config_path(&self) -> &Path {
        self.config.as_deref().unwrap_or_else(|| Path::new(DEFAULT_CONFIG))
    }
}
