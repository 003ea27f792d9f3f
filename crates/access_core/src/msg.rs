use crate::{AccessibilityMode, DocumentHandle, ProcessingResult, RequestFailure, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a document to upload.
    DocumentSelected(DocumentHandle),
    /// User edited the URL input.
    SourceUrlChanged(String),
    /// User picked a presentation mode.
    ModeSelected(AccessibilityMode),
    /// User clicked the submit action.
    SubmitClicked,
    /// The effect runner handed the request to the engine.
    RequestDispatched { request_id: RequestId },
    /// Engine completion for the in-flight request.
    ResponseReceived {
        request_id: RequestId,
        result: Result<ProcessingResult, RequestFailure>,
    },
    /// User activated the bundle download action.
    DownloadClicked,
}
