//! Accessibility client engine: processing service IO and effect execution.
mod client;
mod document;
mod engine;
mod filename;
mod persist;
mod response;
mod types;

pub use client::{ProcessingService, ReqwestServiceClient, FIELD_FILE, FIELD_URL};
pub use document::{load_document, DocumentError, ACCEPTED_EXTENSIONS};
pub use engine::{EngineEvents, EngineHandle};
pub use filename::bundle_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use response::{error_detail, normalize_response};
pub use types::{
    BundleDownload, ClientError, EngineEvent, ServiceError, ServiceSettings, DEFAULT_ENDPOINT,
    REQUEST_TIMEOUT,
};
