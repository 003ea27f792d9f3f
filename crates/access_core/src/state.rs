use std::fmt;

use crate::present::{present_result, SignLookup};
use crate::selection::check_submission;
use crate::view_model::{stage_label, AppViewModel, InputView};
use crate::{
    can_submit, AccessibilityMode, DocumentHandle, Effect, InputSelection, ProcessingResult,
    SubmitError, Submission,
};

pub type RequestId = u64;

/// The single user-visible failure notice. Failure kinds are only told apart in logs.
pub const FAILURE_NOTICE: &str = "Error processing content. Check the processing service.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Extracting,
    AiProcessing,
}

impl Stage {
    pub fn is_busy(self) -> bool {
        self != Stage::Idle
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Timeout,
    Service { status: Option<u16> },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Service { status: Some(code) } => write!(f, "service status {code}"),
            FailureKind::Service { status: None } => write!(f, "malformed service response"),
        }
    }
}

/// Failure of the boundary call, with a diagnostic message for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl RequestFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Session state. Only the lifecycle transitions below mutate the stage and result slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    selection: InputSelection,
    stage: Stage,
    in_flight: Option<RequestId>,
    next_request_id: RequestId,
    result: Option<ProcessingResult>,
    mode: AccessibilityMode,
    sign_lookup: SignLookup,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sign_lookup(sign_lookup: SignLookup) -> Self {
        Self {
            sign_lookup,
            ..Self::default()
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn selection(&self) -> &InputSelection {
        &self.selection
    }

    pub fn result(&self) -> Option<&ProcessingResult> {
        self.result.as_ref()
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    pub fn mode(&self) -> AccessibilityMode {
        self.mode
    }

    pub fn view(&self) -> AppViewModel {
        let input = match (self.selection.document(), self.selection.source_url()) {
            (Some(document), _) => InputView::Document {
                filename: document.filename().to_string(),
            },
            (None, url) if !url.is_empty() => InputView::Url(url.to_string()),
            _ => InputView::Empty,
        };
        AppViewModel {
            stage: self.stage,
            stage_label: stage_label(self.stage),
            busy: self.stage.is_busy(),
            submit_enabled: can_submit(&self.selection, self.stage),
            input,
            mode: self.mode,
            mode_classes: self.mode.classes(),
            panels: self
                .result
                .as_ref()
                .map(|result| present_result(result, &self.sign_lookup)),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn select_document(&mut self, handle: DocumentHandle) {
        self.selection.set_document(handle);
        self.dirty = true;
    }

    pub(crate) fn set_source_url(&mut self, text: String) {
        self.selection.set_source_url(text);
        self.dirty = true;
    }

    pub(crate) fn set_mode(&mut self, mode: AccessibilityMode) {
        if self.mode != mode {
            self.mode = mode;
            self.dirty = true;
        }
    }

    /// `Idle -> Extracting`. Rejects with `InvalidSubmission` unless the guard holds,
    /// leaving the state untouched.
    pub fn begin_submission(&mut self) -> Result<(RequestId, Submission), SubmitError> {
        let submission = check_submission(&self.selection, self.stage)?;
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.result = None;
        self.stage = Stage::Extracting;
        self.in_flight = Some(request_id);
        self.dirty = true;
        Ok((request_id, submission))
    }

    /// `Extracting -> AiProcessing` once the request has left the client.
    pub(crate) fn mark_dispatched(&mut self, request_id: RequestId) -> bool {
        if self.in_flight != Some(request_id) || self.stage != Stage::Extracting {
            return false;
        }
        self.stage = Stage::AiProcessing;
        self.dirty = true;
        true
    }

    /// `AiProcessing -> Idle`. Responses for anything but the in-flight request are dropped.
    pub(crate) fn complete(
        &mut self,
        request_id: RequestId,
        outcome: Result<ProcessingResult, RequestFailure>,
    ) -> Option<Effect> {
        if self.in_flight != Some(request_id) {
            return None;
        }
        // A response can only settle a dispatched request.
        if self.stage == Stage::Extracting {
            self.mark_dispatched(request_id);
        }
        self.in_flight = None;
        self.stage = Stage::Idle;
        self.dirty = true;
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                None
            }
            Err(_) => {
                self.result = None;
                Some(Effect::NotifyFailure {
                    message: FAILURE_NOTICE.to_string(),
                })
            }
        }
    }

    pub(crate) fn bundle_url(&self) -> Option<&str> {
        self.result.as_ref().and_then(|result| result.zip_url.as_deref())
    }
}
