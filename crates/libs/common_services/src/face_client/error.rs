use crate::retry::Transient;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaceServiceError {
    #[error("Failed to build request URL: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Face service returned {status}: {body}")]
    RemoteStatus { status: StatusCode, body: String },

    #[error("Collection {0} already exists")]
    CollectionExists(String),
}

impl Transient for FaceServiceError {
    fn is_transient(&self) -> bool {
        match self {
            Self::RequestError(_) => true,
            Self::RemoteStatus { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::UrlParseError(_) | Self::CollectionExists(_) => false,
        }
    }
}
