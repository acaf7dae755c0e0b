//! # pathkv-http
//!
//! HTTP plumbing for pathkv stores.
//!
//! ## Serving
//!
//! [`router`] exposes any `Reader` read-only. The request path is the key:
//!
//! ```ignore
//! use std::sync::Arc;
//! use pathkv_stores::LocalStore;
//!
//! let store = Arc::new(LocalStore::new("/srv/kv")?);
//! // GET http://localhost:8080/foo/bar  ->  store.read("foo/bar")
//! pathkv_http::serve("127.0.0.1:8080".parse()?, store).await?;
//! ```
//!
//! | read result        | status |
//! |--------------------|--------|
//! | `Ok(bytes)`        | 200    |
//! | `Err(KeyNotFound)` | 404    |
//! | any other error    | 500    |
//!
//! ## Reading remotely
//!
//! [`HttpReader`] is the other side: a `Reader` that issues `GET` requests
//! against such an endpoint, mapping 404 back to `KeyNotFound`.

pub mod client;
pub mod error;
pub mod handler;

pub use client::HttpReader;
pub use error::Error;
pub use handler::{router, serve, status_for};
