use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// `OpenAI`-compatible transcription gateway for `DashScope` ASR
#[derive(Debug, Parser)]
#[command(name = "dashscribe", about = "OpenAI-compatible transcription endpoint backed by DashScope ASR")]
pub struct Args {
    /// Path to configuration file; defaults and environment bindings apply when omitted
    #[arg(short, long, env = "DASHSCRIBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "DASHSCRIBE_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter directives (e.g. "info,stt=debug")
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}
