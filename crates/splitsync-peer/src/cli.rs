use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Headless splitsync peer: an in-memory editor that mirrors its window
/// layout with another peer over a local socket.
#[derive(Parser, Debug)]
#[command(name = "splitsync-peer", version, about)]
pub struct Args {
    #[command(subcommand)]
    pub role: Role,

    /// Socket path override.
    #[arg(long, global = true)]
    pub socket: Option<PathBuf>,

    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// JSON layout tree to start from.
    #[arg(long, global = true)]
    pub layout: Option<PathBuf>,

    /// Files to open in the first window at startup.
    #[arg(long, global = true, num_args = 1..)]
    pub open: Vec<String>,

    /// Viewport width in cells.
    #[arg(long, global = true, default_value_t = 160)]
    pub width: u32,

    /// Viewport height in cells.
    #[arg(long, global = true, default_value_t = 48)]
    pub height: u32,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Listen on the socket; a new connection replaces the previous one.
    Listen,
    /// Connect to a listening peer, retrying with a fixed backoff.
    Connect,
}

impl Role {
    pub fn is_listener(self) -> bool {
        self == Role::Listen
    }
}

pub fn parse() -> Args {
    Args::parse()
}
