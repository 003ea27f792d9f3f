use std::fmt;
use std::sync::Arc;

use crate::Stage;

/// A document picked for upload: its filename and raw content.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    filename: String,
    content: Arc<[u8]>,
}

impl DocumentHandle {
    pub fn new(filename: impl Into<String>, content: impl Into<Arc<[u8]>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// MIME type inferred from the filename extension.
    pub fn mime_type(&self) -> &'static str {
        let ext = self
            .filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or_default();
        if ext.eq_ignore_ascii_case("pdf") {
            "application/pdf"
        } else if ext.eq_ignore_ascii_case("txt") {
            "text/plain"
        } else {
            "application/octet-stream"
        }
    }
}

impl fmt::Debug for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentHandle")
            .field("filename", &self.filename)
            .field("len", &self.content.len())
            .finish()
    }
}

/// The two mutually exclusive inputs. Setting one clears the other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputSelection {
    document: Option<DocumentHandle>,
    source_url: String,
}

impl InputSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_document(&mut self, handle: DocumentHandle) {
        self.document = Some(handle);
        self.source_url.clear();
    }

    pub fn set_source_url(&mut self, text: impl Into<String>) {
        self.source_url = text.into();
        self.document = None;
    }

    pub fn document(&self) -> Option<&DocumentHandle> {
        self.document.as_ref()
    }

    /// The URL exactly as entered, untrimmed.
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// The payload a submission would carry, if any. Document wins; the URL is trimmed.
    pub fn submission(&self) -> Option<Submission> {
        if let Some(document) = &self.document {
            return Some(Submission::Document(document.clone()));
        }
        let url = self.source_url.trim();
        if url.is_empty() {
            None
        } else {
            Some(Submission::Url(url.to_string()))
        }
    }
}

/// Exactly one populated field of the outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Document(DocumentHandle),
    Url(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyInput,
    RequestInFlight,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::EmptyInput => write!(f, "no document or url provided"),
            RejectReason::RequestInFlight => write!(f, "a request is already in flight"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("invalid submission: {0}")]
    InvalidSubmission(RejectReason),
}

/// True when a new request may start from `stage` with `selection`.
pub fn can_submit(selection: &InputSelection, stage: Stage) -> bool {
    check_submission(selection, stage).is_ok()
}

pub(crate) fn check_submission(
    selection: &InputSelection,
    stage: Stage,
) -> Result<Submission, SubmitError> {
    if stage != Stage::Idle {
        return Err(SubmitError::InvalidSubmission(RejectReason::RequestInFlight));
    }
    selection
        .submission()
        .ok_or(SubmitError::InvalidSubmission(RejectReason::EmptyInput))
}
