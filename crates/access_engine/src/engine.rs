use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use access_core::{RequestId, Submission};
use client_logging::{client_error, client_info, client_warn};

use crate::persist::AtomicFileWriter;
use crate::{EngineEvent, ProcessingService, ServiceError};

enum EngineCommand {
    Submit {
        request_id: RequestId,
        submission: Submission,
    },
    DownloadBundle {
        reference: String,
    },
    Ping,
}

/// Identifies a command after it has been handed to its task.
enum CommandKey {
    Submit(RequestId),
    DownloadBundle(String),
    Ping,
}

impl EngineCommand {
    fn key(&self) -> CommandKey {
        match self {
            EngineCommand::Submit { request_id, .. } => CommandKey::Submit(*request_id),
            EngineCommand::DownloadBundle { reference } => {
                CommandKey::DownloadBundle(reference.clone())
            }
            EngineCommand::Ping => CommandKey::Ping,
        }
    }
}

impl CommandKey {
    /// The completion event owed to the caller when the command's task died.
    fn aborted(self, message: String) -> EngineEvent {
        match self {
            CommandKey::Submit(request_id) => EngineEvent::RequestCompleted {
                request_id,
                result: Err(ServiceError::Network(message)),
            },
            CommandKey::DownloadBundle(reference) => {
                EngineEvent::BundleFailed { reference, message }
            }
            CommandKey::Ping => EngineEvent::PingCompleted {
                result: Err(ServiceError::Network(message)),
            },
        }
    }
}

/// Command side of the engine. Cheap to clone.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Event side of the engine: completions and bundle outcomes.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    /// Starts the background runtime. Commands are executed concurrently; the
    /// single-request rule is enforced by the caller's lifecycle.
    pub fn new(
        service: Arc<dyn ProcessingService>,
        bundle_dir: PathBuf,
    ) -> io::Result<(Self, EngineEvents)> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let writer = AtomicFileWriter::new(bundle_dir);

        thread::Builder::new()
            .name("access-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let key = command.key();
                    let task = runtime.spawn(handle_command(
                        service.clone(),
                        writer.clone(),
                        command,
                        event_tx.clone(),
                    ));
                    let event_tx = event_tx.clone();
                    // Every command owes exactly one event, even if its task panics.
                    runtime.spawn(async move {
                        if let Err(err) = task.await {
                            client_error!("Engine task failed: {}", err);
                            let message = format!("engine task failed: {err}");
                            let _ = event_tx.send(key.aborted(message));
                        }
                    });
                }
            })?;

        Ok((Self { cmd_tx }, EngineEvents { event_rx }))
    }

    pub fn submit(&self, request_id: RequestId, submission: Submission) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            request_id,
            submission,
        });
    }

    pub fn download_bundle(&self, reference: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::DownloadBundle {
            reference: reference.into(),
        });
    }

    pub fn ping(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Ping);
    }
}

impl EngineEvents {
    /// Blocks until the next event; `None` once the engine has shut down.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    service: Arc<dyn ProcessingService>,
    writer: AtomicFileWriter,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit {
            request_id,
            submission,
        } => {
            let result = service.submit(&submission).await;
            if let Err(err) = &result {
                client_warn!("Request {} failed: {}", request_id, err);
            }
            let _ = event_tx.send(EngineEvent::RequestCompleted { request_id, result });
        }
        EngineCommand::DownloadBundle { reference } => {
            let event = match service.download(&reference).await {
                Ok(bundle) => match writer.write(&bundle.filename, &bundle.bytes) {
                    Ok(path) => {
                        client_info!("Saved bundle {} to {:?}", bundle.url, path);
                        EngineEvent::BundleSaved {
                            url: bundle.url,
                            path,
                        }
                    }
                    Err(err) => EngineEvent::BundleFailed {
                        reference,
                        message: err.to_string(),
                    },
                },
                Err(err) => EngineEvent::BundleFailed {
                    reference,
                    message: err.to_string(),
                },
            };
            if let EngineEvent::BundleFailed { reference, message } = &event {
                client_warn!("Bundle download {} failed: {}", reference, message);
            }
            let _ = event_tx.send(event);
        }
        EngineCommand::Ping => {
            let result = service.ping().await;
            let _ = event_tx.send(EngineEvent::PingCompleted { result });
        }
    }
}
