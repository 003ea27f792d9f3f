use std::sync::Once;

use access_core::{
    update, AppState, DocumentHandle, Effect, FailureKind, Msg, ProcessingResult, RejectReason,
    RequestFailure, Stage, SubmitError, Submission, FAILURE_NOTICE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn with_url(url: &str) -> AppState {
    let (state, _) = update(AppState::new(), Msg::SourceUrlChanged(url.to_string()));
    state
}

fn submit(state: AppState) -> (AppState, u64) {
    let (state, effects) = update(state, Msg::SubmitClicked);
    let request_id = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::DispatchRequest { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("dispatch effect");
    (state, request_id)
}

fn sample_result() -> ProcessingResult {
    ProcessingResult {
        simplified_text: Some("Law is a set of rules.".to_string()),
        audio_url: Some("/audio/1.mp3".to_string()),
        keywords: vec!["law".to_string(), "justice".to_string()],
        zip_url: Some("/bundle/1.zip".to_string()),
    }
}

fn failure(kind: FailureKind) -> RequestFailure {
    RequestFailure::new(kind, "boom")
}

#[test]
fn submit_moves_idle_to_extracting_and_dispatches_trimmed_url() {
    init_logging();
    let state = with_url("  https://en.wikipedia.org/wiki/Law \n");

    let (state, effects) = update(state, Msg::SubmitClicked);

    assert_eq!(state.stage(), Stage::Extracting);
    assert_eq!(state.in_flight(), Some(1));
    assert_eq!(
        effects,
        vec![Effect::DispatchRequest {
            request_id: 1,
            submission: Submission::Url("https://en.wikipedia.org/wiki/Law".to_string()),
        }]
    );
    let view = state.view();
    assert!(view.busy);
    assert!(!view.submit_enabled);
    assert_eq!(view.stage_label, "Extracting content...");
}

#[test]
fn dispatch_advances_to_ai_processing() {
    init_logging();
    let (state, request_id) = submit(with_url("https://example.com"));

    let (state, effects) = update(state, Msg::RequestDispatched { request_id });

    assert!(effects.is_empty());
    assert_eq!(state.stage(), Stage::AiProcessing);
    assert_eq!(state.view().stage_label, "Processing with AI...");
}

#[test]
fn success_returns_to_idle_and_stores_result() {
    init_logging();
    let (state, request_id) = submit(with_url("https://example.com"));
    let (state, _) = update(state, Msg::RequestDispatched { request_id });

    let (state, effects) = update(
        state,
        Msg::ResponseReceived {
            request_id,
            result: Ok(sample_result()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.stage(), Stage::Idle);
    assert_eq!(state.in_flight(), None);
    assert_eq!(state.result(), Some(&sample_result()));
    let view = state.view();
    assert!(!view.busy);
    assert!(view.submit_enabled);
    assert_eq!(view.stage_label, "Make Accessible");
}

#[test]
fn every_failure_kind_notifies_once_and_returns_to_idle() {
    init_logging();
    let kinds = [
        FailureKind::Network,
        FailureKind::Timeout,
        FailureKind::Service { status: Some(500) },
        FailureKind::Service { status: None },
    ];

    for kind in kinds {
        let (state, request_id) = submit(with_url("https://example.com"));
        let (state, _) = update(state, Msg::RequestDispatched { request_id });
        let (state, effects) = update(
            state,
            Msg::ResponseReceived {
                request_id,
                result: Err(failure(kind.clone())),
            },
        );

        assert_eq!(state.stage(), Stage::Idle, "kind {kind}");
        assert_eq!(state.result(), None, "kind {kind}");
        assert_eq!(
            effects,
            vec![Effect::NotifyFailure {
                message: FAILURE_NOTICE.to_string()
            }],
            "kind {kind}"
        );
    }
}

#[test]
fn timeout_scenario_leaves_no_result_and_allows_resubmission() {
    init_logging();
    let (state, request_id) = submit(with_url("https://en.wikipedia.org/wiki/Law"));
    let (state, _) = update(state, Msg::RequestDispatched { request_id });
    let (state, effects) = update(
        state,
        Msg::ResponseReceived {
            request_id,
            result: Err(failure(FailureKind::Timeout)),
        },
    );

    let notifications = effects
        .iter()
        .filter(|effect| matches!(effect, Effect::NotifyFailure { .. }))
        .count();
    assert_eq!(notifications, 1);
    assert_eq!(state.stage(), Stage::Idle);
    assert_eq!(state.result(), None);

    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(state.stage(), Stage::Extracting);
    assert_eq!(effects.len(), 1);
}

#[test]
fn submit_while_busy_is_a_noop() {
    init_logging();
    let (state, request_id) = submit(with_url("https://example.com"));

    let before = state.clone();
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());
    assert_eq!(state, before);

    let (state, _) = update(state, Msg::RequestDispatched { request_id });
    let before = state.clone();
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());
    assert_eq!(state, before);
    assert_eq!(state.in_flight(), Some(request_id));
}

#[test]
fn begin_submission_rejects_directly_when_busy() {
    init_logging();
    let (mut state, _) = submit(with_url("https://example.com"));

    assert_eq!(
        state.begin_submission(),
        Err(SubmitError::InvalidSubmission(RejectReason::RequestInFlight))
    );
    assert_eq!(state.stage(), Stage::Extracting);
}

#[test]
fn empty_or_whitespace_input_is_rejected_and_stays_idle() {
    init_logging();
    for input in ["", "   ", "\t\n"] {
        let mut state = with_url(input);
        assert_eq!(
            state.begin_submission(),
            Err(SubmitError::InvalidSubmission(RejectReason::EmptyInput))
        );
        assert_eq!(state.stage(), Stage::Idle);

        let (state, effects) = update(state, Msg::SubmitClicked);
        assert!(effects.is_empty());
        assert_eq!(state.stage(), Stage::Idle);
        assert!(!state.view().submit_enabled);
    }
}

#[test]
fn new_submission_clears_previous_result() {
    init_logging();
    let (state, request_id) = submit(with_url("https://example.com"));
    let (state, _) = update(state, Msg::RequestDispatched { request_id });
    let (state, _) = update(
        state,
        Msg::ResponseReceived {
            request_id,
            result: Ok(sample_result()),
        },
    );
    assert!(state.result().is_some());

    let (state, second_id) = submit(state);
    assert_eq!(second_id, request_id + 1);
    assert_eq!(state.result(), None);
    assert_eq!(state.view().panels, None);
}

#[test]
fn selection_persists_across_requests() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::DocumentSelected(DocumentHandle::new("notes.txt", b"plain".to_vec())),
    );
    let (state, request_id) = submit(state);
    let (state, _) = update(state, Msg::RequestDispatched { request_id });
    let (state, _) = update(
        state,
        Msg::ResponseReceived {
            request_id,
            result: Ok(ProcessingResult::default()),
        },
    );

    assert_eq!(
        state.selection().document().map(DocumentHandle::filename),
        Some("notes.txt")
    );
    assert!(state.view().submit_enabled);
}

#[test]
fn stale_response_is_ignored() {
    init_logging();
    let (state, request_id) = submit(with_url("https://example.com"));
    let (state, _) = update(state, Msg::RequestDispatched { request_id });

    let before = state.clone();
    let (state, effects) = update(
        state,
        Msg::ResponseReceived {
            request_id: request_id + 7,
            result: Err(failure(FailureKind::Network)),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state, before);
    assert_eq!(state.stage(), Stage::AiProcessing);
}

#[test]
fn response_before_dispatch_ack_still_settles_to_idle() {
    init_logging();
    let (state, request_id) = submit(with_url("https://example.com"));

    let (state, effects) = update(
        state,
        Msg::ResponseReceived {
            request_id,
            result: Ok(sample_result()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.stage(), Stage::Idle);

    // A late dispatch acknowledgement must not re-enter a busy stage.
    let (state, _) = update(state, Msg::RequestDispatched { request_id });
    assert_eq!(state.stage(), Stage::Idle);
}

#[test]
fn download_click_opens_bundle_only_when_present() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::DownloadClicked);
    assert!(effects.is_empty());

    let (state, request_id) = submit({
        let (state, _) = update(state, Msg::SourceUrlChanged("https://example.com".into()));
        state
    });
    let (state, _) = update(state, Msg::RequestDispatched { request_id });
    let (state, _) = update(
        state,
        Msg::ResponseReceived {
            request_id,
            result: Ok(sample_result()),
        },
    );

    let before = state.clone();
    let (state, effects) = update(state, Msg::DownloadClicked);
    assert_eq!(
        effects,
        vec![Effect::OpenBundle {
            url: "/bundle/1.zip".to_string()
        }]
    );
    assert_eq!(state, before);
}

#[test]
fn transitions_mark_dirty_for_rendering() {
    init_logging();
    let mut state = with_url("https://example.com");
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());

    let (mut state, request_id) = submit(state);
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::RequestDispatched { request_id });
    assert!(state.consume_dirty());

    let (mut state, _) = update(
        state,
        Msg::ResponseReceived {
            request_id,
            result: Ok(ProcessingResult::default()),
        },
    );
    assert!(state.consume_dirty());
}
