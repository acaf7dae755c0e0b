use pathkv_core::Error as StoreError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid URL: {message}")]
    InvalidUrl { message: String },

    #[error("Unexpected HTTP status {status} for {url}")]
    UnexpectedStatus { status: http::StatusCode, url: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<Error> for StoreError {
    fn from(error: Error) -> Self {
        match error {
            Error::Http(e) if e.is_timeout() => StoreError::DeadlineExceeded,
            Error::Io(e) => StoreError::Io(e),
            other => StoreError::Other {
                message: other.to_string(),
            },
        }
    }
}
