use std::path::PathBuf;
use std::time::Duration;

use access_core::{ProcessingResult, RequestId};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/process";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bundle_bytes: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: REQUEST_TIMEOUT,
            max_bundle_bytes: 200 * 1024 * 1024,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid service endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    Build(String),
}

/// Failure of a call to the processing service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
    #[error("service error{}{}", status_suffix(.status), detail_suffix(.detail))]
    Service {
        status: Option<u16>,
        detail: Option<String>,
    },
    #[error("invalid service reference '{0}'")]
    InvalidReference(String),
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" (status {code})")).unwrap_or_default()
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

/// A fetched result bundle, not yet written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleDownload {
    pub url: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    RequestCompleted {
        request_id: RequestId,
        result: Result<ProcessingResult, ServiceError>,
    },
    BundleSaved {
        url: String,
        path: PathBuf,
    },
    BundleFailed {
        reference: String,
        message: String,
    },
    PingCompleted {
        result: Result<(), ServiceError>,
    },
}
