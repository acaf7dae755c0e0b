use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use pathkv_core::Context;
use pathkv_stores::BackendConfig;

/// pathkv - read and write a key-value store laid out as plain files
#[derive(Parser, Debug)]
#[command(name = "pathkv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Root directory of the local store [default: <data dir>/pathkv]
    #[arg(long, global = true, env = "PATHKV_ROOT")]
    pub root: Option<PathBuf>,

    /// Use an in-memory store instead of a local directory
    #[arg(long, global = true)]
    pub memory: bool,

    /// Operate on the sub-store under this key
    #[arg(long, global = true, default_value = "")]
    pub prefix: String,

    /// Give up on each store operation after this many milliseconds
    #[arg(long, global = true, env = "PATHKV_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Log store operations
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the directories and blobs under a key
    Ls {
        #[arg(default_value = "")]
        key: String,
    },
    /// Print the value stored at a key
    Get {
        key: String,

        /// Read from a pathkv HTTP endpoint instead of the local store
        #[arg(long)]
        remote: Option<String>,
    },
    /// Store a value at a key, reading stdin when no value is given
    Put { key: String, value: Option<String> },
    /// Delete the value at a key
    Rm { key: String },
    /// Serve the store read-only over HTTP
    Serve {
        #[arg(long, env = "PATHKV_ADDR", default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

fn default_root() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("pathkv"))
        .unwrap_or_else(|| PathBuf::from(".pathkv"))
}

impl Cli {
    pub fn backend(&self) -> BackendConfig {
        if self.memory {
            BackendConfig::Memory
        } else {
            BackendConfig::from_root(Some(self.root.clone().unwrap_or_else(default_root)))
        }
    }

    pub fn context(&self) -> Context {
        match self.timeout_ms {
            Some(ms) => Context::background().with_timeout(Duration::from_millis(ms)),
            None => Context::background(),
        }
    }

    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
