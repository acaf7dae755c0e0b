use reqwest::blocking::Client;
use reqwest::StatusCode;
use url::Url;

use pathkv_core::{key, Bytes, Context, Error as StoreError, Listing, Reader, Result};

use crate::error::Error;

/// A `Reader` backed by a remote pathkv HTTP endpoint.
///
/// `read(key)` performs `GET {base_url}/{key}`. A 404 is `KeyNotFound`; any
/// other non-success status is an opaque error. The read-only HTTP surface
/// has no listing, so `list` is unsupported.
///
/// This uses reqwest's blocking client and must not be called from inside an
/// async runtime thread; use `spawn_blocking` there.
///
/// # Example
///
/// ```ignore
/// use pathkv_core::{Context, Reader};
/// use pathkv_http::HttpReader;
///
/// let remote = HttpReader::new("http://localhost:8080")?;
/// let data = remote.read(&Context::background(), "users/alice")?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpReader {
    client: Client,
    base_url: Url,
}

impl HttpReader {
    /// Create a reader for the given base URL.
    pub fn new(base_url: &str) -> std::result::Result<Self, Error> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a reader with a custom reqwest client.
    pub fn with_client(client: Client, base_url: &str) -> std::result::Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl {
                message: format!("'{}' cannot be used as a base URL", base_url),
            });
        }
        // Key segments are appended after the base path.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the full URL for a key.
    ///
    /// Each key segment becomes one percent-encoded path segment, so reserved
    /// characters such as `?`, `#` or `%` reach the server as part of the key.
    fn build_url(&self, key: &str) -> std::result::Result<Url, Error> {
        let mut url = self.base_url.clone();
        let mut segments = key::segments(key).peekable();
        if segments.peek().is_some() {
            url.path_segments_mut()
                .map_err(|()| Error::InvalidUrl {
                    message: format!("'{}' cannot be used as a base URL", self.base_url),
                })?
                .pop_if_empty()
                .extend(segments);
        }
        Ok(url)
    }

    fn get(&self, ctx: &Context, key: &str) -> std::result::Result<Option<Bytes>, Error> {
        let url = self.build_url(key)?;
        tracing::debug!(%url, "GET");

        let mut request = self.client.get(url.clone());
        if let Some(remaining) = ctx.remaining() {
            request = request.timeout(remaining);
        }

        let response = request.send()?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.bytes()?)),
            status => Err(Error::UnexpectedStatus {
                status,
                url: url.to_string(),
            }),
        }
    }
}

impl Reader for HttpReader {
    fn list(&self, ctx: &Context, _key: &str) -> Result<Listing> {
        ctx.check()?;
        Err(StoreError::Unsupported { operation: "list" })
    }

    fn read(&self, ctx: &Context, key: &str) -> Result<Bytes> {
        ctx.check()?;
        self.get(ctx, key)?.ok_or(StoreError::KeyNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let reader = HttpReader::new("http://localhost:8080/api").unwrap();
        assert_eq!(reader.base_url().as_str(), "http://localhost:8080/api/");

        let url = reader.build_url("/users//alice/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/users/alice");
    }

    #[test]
    fn reserved_characters_are_encoded() {
        let reader = HttpReader::new("http://localhost:8080").unwrap();
        assert_eq!(
            reader.build_url("what?/tag#1").unwrap().as_str(),
            "http://localhost:8080/what%3F/tag%231"
        );
        assert_eq!(
            reader.build_url("50%").unwrap().as_str(),
            "http://localhost:8080/50%25"
        );

        // A leading segment that looks like a scheme stays a path segment.
        let url = reader.build_url("c:d").unwrap();
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.path(), "/c:d");
    }

    #[test]
    fn root_key_is_base_url() {
        let reader = HttpReader::new("http://localhost:8080").unwrap();
        assert_eq!(reader.build_url("").unwrap().as_str(), "http://localhost:8080/");
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            HttpReader::new("not a url"),
            Err(Error::UrlParse(_))
        ));
        assert!(matches!(
            HttpReader::new("mailto:someone@example.com"),
            Err(Error::InvalidUrl { .. })
        ));
    }

    #[test]
    fn list_is_unsupported() {
        let reader = HttpReader::new("http://localhost:8080").unwrap();
        let err = reader.list(&Context::background(), "").unwrap_err();
        assert!(matches!(err, StoreError::Unsupported { .. }));
    }

    #[test]
    fn cancelled_context_skips_request() {
        // Nothing listens on this port; a request would fail differently.
        let reader = HttpReader::new("http://127.0.0.1:9").unwrap();
        let (ctx, cancel) = Context::background().with_cancel();
        cancel.cancel();
        assert!(matches!(
            reader.read(&ctx, "k"),
            Err(StoreError::Cancelled)
        ));
    }
}
