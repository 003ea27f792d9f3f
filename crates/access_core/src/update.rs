use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DocumentSelected(handle) => {
            state.select_document(handle);
            Vec::new()
        }
        Msg::SourceUrlChanged(text) => {
            state.set_source_url(text);
            Vec::new()
        }
        Msg::ModeSelected(mode) => {
            state.set_mode(mode);
            Vec::new()
        }
        Msg::SubmitClicked => match state.begin_submission() {
            Ok((request_id, submission)) => vec![Effect::DispatchRequest {
                request_id,
                submission,
            }],
            // Guard unmet: the affordance is already disabled, nothing changes.
            Err(_) => Vec::new(),
        },
        Msg::RequestDispatched { request_id } => {
            state.mark_dispatched(request_id);
            Vec::new()
        }
        Msg::ResponseReceived { request_id, result } => {
            state.complete(request_id, result).into_iter().collect()
        }
        Msg::DownloadClicked => match state.bundle_url() {
            Some(url) => vec![Effect::OpenBundle {
                url: url.to_string(),
            }],
            None => Vec::new(),
        },
    };

    (state, effects)
}
