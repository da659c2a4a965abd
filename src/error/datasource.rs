use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("[KaspaApi] Request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("[KaspaApi] HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("[KaspaApi] Upstream error: {0}")]
    Upstream(String),

    #[error("[KaspaApi] Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("[DataSource] Failed to decode payload: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("[Snapshot] Failed to read snapshot: {0}")]
    SnapshotIo(#[from] std::io::Error),

    #[error("[DataSource] No data for address: {0}")]
    AddressNotFound(String),
}
