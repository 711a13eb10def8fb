// Error taxonomy for favorites operations

use thiserror::Error;

/// Status class attached to every operation response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Created,
    Ok,
    NoContent,
    ClientError,
    NotFound,
    Conflict,
    UpstreamUnavailable,
    ServerError,
}

impl StatusClass {
    /// HTTP status code used by the server for this class
    pub fn http_code(self) -> u16 {
        match self {
            StatusClass::Created => 201,
            StatusClass::Ok => 200,
            StatusClass::NoContent => 204,
            StatusClass::ClientError => 400,
            StatusClass::NotFound => 404,
            StatusClass::Conflict => 409,
            StatusClass::UpstreamUnavailable => 502,
            StatusClass::ServerError => 500,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, StatusClass::Created | StatusClass::Ok | StatusClass::NoContent)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Recipe not found in catalog: {0}")]
    UpstreamNotFound(String),

    #[error("Recipe already in favorites: {0}")]
    DuplicateEntry(String),

    #[error("Favorite not found: {0}")]
    NotFound(i64),

    #[error("Upstream catalog error: {0}")]
    UpstreamError(String),

    #[error("Binary encoder not ready: schema still loading")]
    EncoderNotReady,

    #[error("Payload does not match binary schema: {0}")]
    SchemaViolation(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl Error {
    pub fn status(&self) -> StatusClass {
        match self {
            Error::InvalidInput(_) => StatusClass::ClientError,
            Error::UpstreamNotFound(_) | Error::NotFound(_) => StatusClass::NotFound,
            Error::DuplicateEntry(_) => StatusClass::Conflict,
            Error::UpstreamError(_) => StatusClass::UpstreamUnavailable,
            Error::EncoderNotReady | Error::SchemaViolation(_) | Error::Encoding(_) => StatusClass::ServerError,
        }
    }

    /// Message safe to hand back to a client
    ///
    /// Upstream and server-side details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Error::UpstreamError(_) => "Failed to fetch data from the recipe or cocktail catalogs".to_string(),
            Error::EncoderNotReady => "Binary encoder is not ready yet, try again shortly".to_string(),
            Error::SchemaViolation(_) | Error::Encoding(_) => "Failed to encode response".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
