//! Store backends for pathkv.
//!
//! - [`InMemoryStore`]: a flat map with directories synthesized on `list`
//! - [`LocalStore`]: a plain directory tree on the local filesystem
//! - [`BackendConfig`]: picks one of the two at construction time

pub mod config;
pub mod in_memory;
pub mod local_disk;

pub use config::BackendConfig;
pub use in_memory::InMemoryStore;
pub use local_disk::LocalStore;
