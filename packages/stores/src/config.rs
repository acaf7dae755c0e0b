//! Construction-time backend selection.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use pathkv_core::{Result, Store};

use crate::{InMemoryStore, LocalStore};

/// Which backend to construct.
///
/// Serializes with a `type` tag, e.g. `{"type": "local", "root": "/srv/kv"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    /// In-memory store; contents vanish with the process.
    Memory,
    /// Local filesystem store rooted at `root`.
    Local { root: PathBuf },
}

impl BackendConfig {
    /// `Local` when a root is given, otherwise `Memory`.
    pub fn from_root(root: Option<PathBuf>) -> Self {
        match root {
            Some(root) => BackendConfig::Local { root },
            None => BackendConfig::Memory,
        }
    }

    /// Construct the configured backend.
    pub fn open(&self) -> Result<Box<dyn Store>> {
        match self {
            BackendConfig::Memory => Ok(Box::new(InMemoryStore::new())),
            BackendConfig::Local { root } => Ok(Box::new(LocalStore::new(root.clone())?)),
        }
    }
}
