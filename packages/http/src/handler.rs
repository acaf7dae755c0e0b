//! Read-only HTTP exposure of a `Reader`.
//!
//! The request path is the key: `GET /foo/bar` maps to `read("foo/bar")`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use http::StatusCode;
use tokio::net::TcpListener;

use pathkv_core::{key, Context, Error as StoreError, Reader};

use crate::Error;

/// The status code reported for a failed read.
pub fn status_for(error: &StoreError) -> StatusCode {
    match error {
        StoreError::KeyNotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build a router serving `GET` on every path from `reader`.
///
/// Successful reads return 200 with the raw bytes. A missing key is 404 and
/// any other failure is 500; error responses have no body. Methods other than
/// `GET` (and `HEAD`) are rejected with 405.
pub fn router<R: Reader + 'static>(reader: Arc<R>) -> Router {
    Router::new()
        .route("/", get(read_root::<R>))
        .route("/*key", get(read_key::<R>))
        .with_state(reader)
}

async fn read_root<R: Reader + 'static>(State(reader): State<Arc<R>>) -> Response {
    respond(reader, String::new()).await
}

async fn read_key<R: Reader + 'static>(
    State(reader): State<Arc<R>>,
    Path(key): Path<String>,
) -> Response {
    respond(reader, key).await
}

async fn respond<R: Reader + 'static>(reader: Arc<R>, raw_key: String) -> Response {
    let key = key::trim(&raw_key).to_string();

    // Stores may block on I/O.
    let lookup_key = key.clone();
    let result = tokio::task::spawn_blocking(move || {
        reader.read(&Context::background(), &lookup_key)
    })
    .await;

    match result {
        Ok(Ok(data)) => {
            tracing::debug!(%key, len = data.len(), "served");
            (StatusCode::OK, Body::from(data)).into_response()
        }
        Ok(Err(e)) => {
            let status = status_for(&e);
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::warn!(%key, error = %e, "read failed");
            } else {
                tracing::debug!(%key, "not found");
            }
            status.into_response()
        }
        Err(join_error) => {
            tracing::warn!(%key, error = %join_error, "read task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Serve `reader` on `addr` until the process stops.
pub async fn serve<R: Reader + 'static>(addr: SocketAddr, reader: Arc<R>) -> Result<(), Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("pathkv listening on {}", listener.local_addr()?);
    axum::serve(listener, router(reader)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(status_for(&StoreError::KeyNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&StoreError::Cancelled),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&StoreError::Other {
                message: "boom".to_string()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
