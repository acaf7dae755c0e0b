//! pathkv core: the store contract
//!
//! A lowest-common-denominator key-value abstraction with an imposed
//! `/`-directory structure. Backends live in `pathkv-stores`; this crate holds
//! what they share:
//! - `Reader` / `Store`: the four operations every backend implements
//! - `Error`: one distinguished `KeyNotFound`, everything else opaque
//! - `Context`: cancellation and deadlines passed to every operation
//! - `SubStore`: a prefixed view over any store
//! - JSON helpers layered over `read` / `write`
//!
//! # Example
//!
//! ```rust
//! use pathkv_core::{Context, Error, Reader};
//!
//! fn read_user(store: &dyn Reader, id: &str) -> Result<Option<bytes::Bytes>, Error> {
//!     match store.read(&Context::background(), &format!("users/{}", id)) {
//!         Ok(data) => Ok(Some(data)),
//!         Err(Error::KeyNotFound) => Ok(None),
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

pub use bytes::Bytes;

mod context;
mod error;
pub mod json;
pub mod key;
mod sub_store;
mod traits;

pub use context::{CancelHandle, Context};
pub use error::{Error, Result};
pub use json::{read_json, write_json};
pub use sub_store::SubStore;
pub use traits::{Listing, Reader, Store};

#[cfg(any(test, feature = "test-utils"))]
pub mod trait_test_suite;
