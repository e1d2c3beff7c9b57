//! Error definitions for the SDK.

use thiserror::Error;

use rust_openai_types::ParseApiTypeError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP client error: {source}")]
    HttpClient {
        #[from]
        source: reqwest::Error,
    },

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Unrecognized API type: {value:?}")]
    UnknownApiType { value: String },

    #[error("Request path must start with '/': {suffix:?}")]
    MalformedSuffix { suffix: String },

    #[error("Model is required to build a deployment URL for {suffix}")]
    MissingModel { suffix: String },
}

impl From<ParseApiTypeError> for Error {
    fn from(err: ParseApiTypeError) -> Self {
        Self::UnknownApiType { value: err.value }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
