//! Accessibility client core: pure request lifecycle state machine and view-model helpers.
mod effect;
mod mode;
mod msg;
mod present;
mod result;
mod selection;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use mode::{AccessibilityMode, ParseModeError};
pub use msg::Msg;
pub use present::{
    present_result, AudioPanel, ResultPanel, SignLink, SignLookup, AUDIO_PLACEHOLDER,
    DEFAULT_SIGN_LOOKUP, TEXT_PLACEHOLDER,
};
pub use result::ProcessingResult;
pub use selection::{
    can_submit, DocumentHandle, InputSelection, RejectReason, SubmitError, Submission,
};
pub use state::{AppState, FailureKind, RequestFailure, RequestId, Stage, FAILURE_NOTICE};
pub use update::update;
pub use view_model::{stage_label, AppViewModel, InputView};

/// Error for a malformed sign-language lookup base.
pub use url::ParseError as SignLookupError;
