use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Command line and environment configuration of the streaming server.
#[derive(Debug, Clone, Parser)]
#[command(name = "media-range", version, about = "Serve media files with HTTP range support")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "MEDIA_RANGE_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Directory the served files live in.
    #[arg(long, env = "MEDIA_RANGE_ROOT", default_value = "videos")]
    pub root: PathBuf,

    /// Path the routes are mounted under.
    #[arg(long, env = "MEDIA_RANGE_PREFIX", default_value = "/api/v1/stream")]
    pub prefix: String,

    /// Do not send CORS headers.
    #[arg(long = "no-cors", action = ArgAction::SetFalse)]
    pub cors: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

impl Config {
    /// The route prefix with exactly one leading slash and no trailing one.
    /// `None` when the routes are mounted at the root.
    pub fn mount_path(&self) -> Option<String> {
        let trimmed = self.prefix.trim_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(format!("/{trimmed}"))
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            root: PathBuf::from("videos"),
            prefix: "/api/v1/stream".to_string(),
            cors: true,
            log_json: false,
        }
    }
}
