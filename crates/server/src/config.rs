//! Server configuration from flags and environment.

use clap::Parser;
use notes_core::EmptyNotesPolicy;
use std::net::SocketAddr;
use std::time::Duration;

/// Upload service that turns PowerPoint speaker notes into Word documents.
#[derive(Parser, Debug, Clone)]
#[command(name = "notes-server")]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "NOTES_SERVER_ADDR", default_value = "127.0.0.1:5000")]
    pub addr: SocketAddr,

    /// Largest accepted upload body, in bytes
    #[arg(long, env = "NOTES_MAX_UPLOAD_BYTES", default_value_t = 16 * 1024 * 1024)]
    pub max_upload_bytes: usize,

    /// Seconds a rendered document waits for its download
    #[arg(long, env = "NOTES_DOWNLOAD_TTL_SECS", default_value_t = 600)]
    pub download_ttl_secs: u64,

    /// Rendered documents held at once; the oldest is dropped beyond this
    #[arg(long, env = "NOTES_MAX_PENDING_DOWNLOADS", default_value_t = 64)]
    pub max_pending_downloads: usize,

    /// How to handle slides without notes: skip or placeholder
    #[arg(long, env = "NOTES_EMPTY_NOTES", default_value = "skip")]
    pub empty_notes: EmptyNotesPolicy,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServerConfig {
    pub fn download_ttl(&self) -> Duration {
        Duration::from_secs(self.download_ttl_secs)
    }
}
