use reqwest::{header::InvalidHeaderValue, StatusCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgroserverLoaderError {
    #[error("Invalid http header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("Failed to fetch: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("Invalid CSS selector {0}")]
    InvalidSelector(String),

    #[error("Invalid value {value:?} for {name}")]
    InvalidConfig { name: &'static str, value: String },
}
