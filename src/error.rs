//! Typed errors and HTTP status mapping.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
    #[error("validation: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("http {status} on {path}: {body}")]
    Status { status: u16, path: String, body: String },
    /// Raised by bootstrap only; callers send the user to `login_url`.
    #[error("not authenticated, log in at {login_url}")]
    Unauthenticated { login_url: String },
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no item loaded; call get_item first")]
    NoItemLoaded,
    #[error("unknown model: {0}")]
    UnknownModel(String),
    #[error("store '{0}' already registered with a different record type")]
    StoreTypeMismatch(String),
    #[error("response has no usable Content-Disposition filename")]
    MissingFilename,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
