use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use access_core::{Effect, FailureKind, Msg, RequestFailure};
use access_engine::{EngineEvent, EngineEvents, EngineHandle, ServiceError};
use client_logging::{client_debug, client_info, client_warn};

/// Everything the session loop reacts to, from any thread.
#[derive(Debug)]
pub enum Inbox {
    Core(Msg),
    Line(String),
    Notice(Notice),
    InputClosed,
}

/// Engine outcomes that are reported to the user but do not touch core state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    BundleSaved(PathBuf),
    BundleFailed(String),
    Ping(Result<(), String>),
}

pub struct EffectRunner {
    engine: EngineHandle,
    inbox: mpsc::Sender<Inbox>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, events: EngineEvents, inbox: mpsc::Sender<Inbox>) -> Self {
        spawn_event_loop(events, inbox.clone());
        Self { engine, inbox }
    }

    /// Executes effects. Failure notices are returned for the caller to show.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<String> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::DispatchRequest {
                    request_id,
                    submission,
                } => {
                    client_info!("Dispatching request {}", request_id);
                    self.engine.submit(request_id, submission);
                    let _ = self
                        .inbox
                        .send(Inbox::Core(Msg::RequestDispatched { request_id }));
                }
                Effect::OpenBundle { url } => {
                    client_info!("Downloading bundle {}", url);
                    self.engine.download_bundle(url);
                }
                Effect::NotifyFailure { message } => notices.push(message),
            }
        }
        notices
    }

    pub fn ping(&self) {
        self.engine.ping();
    }
}

fn spawn_event_loop(events: EngineEvents, inbox: mpsc::Sender<Inbox>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            let item = match event {
                EngineEvent::RequestCompleted { request_id, result } => {
                    client_debug!("Request {} completed", request_id);
                    Inbox::Core(Msg::ResponseReceived {
                        request_id,
                        result: result.map_err(|err| map_failure(&err)),
                    })
                }
                EngineEvent::BundleSaved { path, .. } => Inbox::Notice(Notice::BundleSaved(path)),
                EngineEvent::BundleFailed { message, .. } => {
                    Inbox::Notice(Notice::BundleFailed(message))
                }
                EngineEvent::PingCompleted { result } => {
                    if let Err(err) = &result {
                        client_warn!("Ping failed: {}", err);
                    }
                    Inbox::Notice(Notice::Ping(result.map_err(|err| err.to_string())))
                }
            };
            if inbox.send(item).is_err() {
                break;
            }
        }
    });
}

pub fn map_failure(err: &ServiceError) -> RequestFailure {
    let kind = match err {
        ServiceError::Network(_) => FailureKind::Network,
        ServiceError::Timeout(_) => FailureKind::Timeout,
        ServiceError::Service { status, .. } => FailureKind::Service { status: *status },
        ServiceError::InvalidReference(_) | ServiceError::TooLarge { .. } => {
            FailureKind::Service { status: None }
        }
    };
    RequestFailure::new(kind, err.to_string())
}
