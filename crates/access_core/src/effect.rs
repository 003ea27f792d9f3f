use crate::{RequestId, Submission};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand the submission to the processing service.
    DispatchRequest {
        request_id: RequestId,
        submission: Submission,
    },
    /// One-shot, user-visible failure notice.
    NotifyFailure { message: String },
    /// Open the result bundle in an independent context. Fire-and-forget.
    OpenBundle { url: String },
}
