use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with an `{"error": ...}` payload.
    #[error("{0}")]
    Api(String),
    /// Network failure, non-2xx status or an undecodable body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0} not found")]
    NotFound(String),
}
