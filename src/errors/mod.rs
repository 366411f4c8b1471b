use std::fmt;
use std::io;
use axum::{http::StatusCode, response::{IntoResponse, Response}};

/// Error types shared by the pages, loaders and streaming backends
#[derive(Debug)]
pub enum PageError {
    Io(io::Error),
    /// Network or transport failure
    Fetch(String),
    /// Malformed YAML or JSON
    Parse(String),
    UnknownBackend(String),
    NotFound(String),
    InvalidPath,
    BadRequest(String),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::Io(e) => write!(f, "I/O error: {}", e),
            PageError::Fetch(e) => write!(f, "fetch error: {}", e),
            PageError::Parse(e) => write!(f, "parse error: {}", e),
            PageError::UnknownBackend(model) => write!(f, "unknown model: {}", model),
            PageError::NotFound(name) => write!(f, "not found: {}", name),
            PageError::InvalidPath => write!(f, "invalid path"),
            PageError::BadRequest(e) => write!(f, "bad request: {}", e),
        }
    }
}

impl std::error::Error for PageError {}

impl From<io::Error> for PageError {
    fn from(err: io::Error) -> Self {
        PageError::Io(err)
    }
}

impl From<reqwest::Error> for PageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PageError::Parse(err.to_string())
        } else {
            PageError::Fetch(err.to_string())
        }
    }
}

impl From<serde_yaml::Error> for PageError {
    fn from(err: serde_yaml::Error) -> Self {
        PageError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        PageError::Parse(err.to_string())
    }
}

impl PageError {
    pub fn status(&self) -> StatusCode {
        match self {
            PageError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PageError::Fetch(_) | PageError::Parse(_) => StatusCode::BAD_GATEWAY,
            PageError::UnknownBackend(_) | PageError::InvalidPath | PageError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            PageError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
