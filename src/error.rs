use crate::status::StatusError;
use crate::wire::WireError;

/// Boxed source of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    YAML(#[from] serde_yaml::Error),
    #[error("transport: {0}")]
    Transport(#[source] BoxError),
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),
    #[error("reading response body: {0}")]
    Body(#[source] std::io::Error),
    #[error(transparent)]
    Wire(#[from] WireError),
    #[error(transparent)]
    JSON(#[from] serde_json::Error),
    #[error(transparent)]
    Status(#[from] StatusError),
    #[error("invalid origin {0:?}")]
    InvalidOrigin(String),
}

pub type Result<T> = std::result::Result<T, Error>;
