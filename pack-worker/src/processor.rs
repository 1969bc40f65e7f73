use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use boxpack::util::{CancelToken, Cancelled};
use log::{debug, error, info, warn};
use packopt::engine::{self, PackRequest, PackResponse};
use packopt::progress::Progress;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Error reported in the terminal message of a cancelled run
pub const CANCELLED_ERROR: &str = "cancelled";

/// Fields shared by every inbound message.
/// For cancellation messages, only `correlation_id` and `cancelled: true` are required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    #[serde(default)]
    correlation_id: Option<String>,
    #[serde(default)]
    cancelled: bool,
}

/// A parsed inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerMessage {
    /// Stop the run(s) with this correlation id
    Cancel { correlation_id: Option<String> },
    Pack {
        correlation_id: Option<String>,
        request: Box<PackRequest>,
    },
}

impl WorkerMessage {
    pub fn parse(body: &str) -> Result<Self> {
        let envelope: Envelope =
            serde_json::from_str(body).context("Failed to parse request message")?;
        if envelope.cancelled {
            return Ok(WorkerMessage::Cancel {
                correlation_id: envelope.correlation_id,
            });
        }
        let request: PackRequest =
            serde_json::from_str(body).context("Failed to parse packing request")?;
        Ok(WorkerMessage::Pack {
            correlation_id: envelope.correlation_id,
            request: Box::new(request),
        })
    }
}

/// Outbound message: a [`PackResponse`] tagged with the correlation id of its request
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkerResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(flatten)]
    pub response: PackResponse,
}

struct ActiveRun {
    correlation_id: Option<String>,
    cancel: CancelToken,
}

/// Dispatches inbound messages to packing runs and emits their responses on `output`.
///
/// Every packing request supersedes the runs still in flight: those are cancelled.
/// Each run emits zero or more progress messages followed by exactly one terminal message.
#[derive(Clone)]
pub struct Processor {
    output: mpsc::UnboundedSender<WorkerResponse>,
    cancellation_registry: Arc<Mutex<HashMap<u64, ActiveRun>>>,
    run_counter: Arc<AtomicU64>,
}

impl Processor {
    pub fn new(output: mpsc::UnboundedSender<WorkerResponse>) -> Self {
        Self {
            output,
            cancellation_registry: Arc::new(Mutex::new(HashMap::new())),
            run_counter: Arc::new(AtomicU64::new(0)),
        }
    }

    fn emit(&self, correlation_id: Option<String>, response: PackResponse) {
        if let Err(e) = self.output.send(WorkerResponse {
            correlation_id,
            response,
        }) {
            warn!("[WORKER] Failed to emit response, output closed: {e}");
        }
    }

    /// Cancels every run with the given correlation id, returns how many were running
    pub fn mark_cancelled(&self, correlation_id: Option<&str>) -> usize {
        let registry = self.cancellation_registry.lock().unwrap();
        registry
            .values()
            .filter(|run| run.correlation_id.as_deref() == correlation_id)
            .inspect(|run| run.cancel.cancel())
            .count()
    }

    /// Cancels every run in flight, returns how many there were
    pub fn cancel_all(&self) -> usize {
        let registry = self.cancellation_registry.lock().unwrap();
        registry.values().for_each(|run| run.cancel.cancel());
        registry.len()
    }

    pub fn n_active(&self) -> usize {
        self.cancellation_registry.lock().unwrap().len()
    }

    /// Handles one inbound message.
    /// Returns the handle of the spawned run for packing requests, `None` otherwise.
    pub fn process_message(&self, body: &str) -> Option<JoinHandle<()>> {
        let message = match WorkerMessage::parse(body) {
            Ok(message) => message,
            Err(e) => {
                let error_msg = format!("{e:#}");
                error!(
                    "[WORKER] {error_msg}. Body (first 200 chars): {}",
                    body.chars().take(200).collect::<String>()
                );
                // the correlation id might still be recoverable
                let correlation_id = serde_json::from_str::<serde_json::Value>(body)
                    .ok()
                    .and_then(|v| v.get("correlationId")?.as_str().map(str::to_string));
                self.emit(correlation_id, PackResponse::failure(error_msg));
                return None;
            }
        };

        match message {
            WorkerMessage::Cancel { correlation_id } => {
                let n_cancelled = self.mark_cancelled(correlation_id.as_deref());
                match n_cancelled {
                    0 => info!(
                        "[WORKER] Cancellation request for idle correlation_id={correlation_id:?}, ignored"
                    ),
                    n => info!(
                        "[WORKER] Cancellation forwarded to {n} running optimizer(s): correlation_id={correlation_id:?}"
                    ),
                }
                None
            }
            WorkerMessage::Pack {
                correlation_id,
                request,
            } => {
                let n_superseded = self.cancel_all();
                if n_superseded > 0 {
                    info!("[WORKER] New request supersedes {n_superseded} run(s) in flight");
                }
                Some(self.spawn_run(correlation_id, *request))
            }
        }
    }

    fn spawn_run(&self, correlation_id: Option<String>, request: PackRequest) -> JoinHandle<()> {
        let run_id = self.run_counter.fetch_add(1, Ordering::Relaxed);
        let cancel = CancelToken::new();
        // registered before spawning, so a later request is guaranteed to see it
        self.cancellation_registry.lock().unwrap().insert(
            run_id,
            ActiveRun {
                correlation_id: correlation_id.clone(),
                cancel: cancel.clone(),
            },
        );
        info!(
            "[WORKER] Processing request: correlation_id={correlation_id:?}, {} items",
            request.items.len()
        );

        let processor = self.clone();
        tokio::spawn(async move {
            let result = processor
                .run(correlation_id.clone(), request, cancel)
                .await;

            // Cleanup: remove the run from the registry (always happens)
            processor
                .cancellation_registry
                .lock()
                .unwrap()
                .remove(&run_id);

            let terminal = match result {
                Ok(outcome) => {
                    info!("[WORKER] Run finished: correlation_id={correlation_id:?}");
                    PackResponse::from(outcome)
                }
                Err(e) if e.downcast_ref::<Cancelled>().is_some() => {
                    info!("[WORKER] Run cancelled: correlation_id={correlation_id:?}");
                    PackResponse::failure(CANCELLED_ERROR)
                }
                Err(e) => {
                    error!("[WORKER] Run failed: correlation_id={correlation_id:?}: {e:#}");
                    PackResponse::failure(format!("{e:#}"))
                }
            };
            processor.emit(correlation_id, terminal);
        })
    }

    async fn run(
        &self,
        correlation_id: Option<String>,
        request: PackRequest,
        cancel: CancelToken,
    ) -> Result<engine::Outcome> {
        // Channel for forwarding progress from the blocking task to the output
        let (tx, mut rx) = mpsc::unbounded_channel::<u8>();

        let processor = self.clone();
        let progress_task = tokio::spawn(async move {
            while let Some(pct) = rx.recv().await {
                debug!("[WORKER] progress {pct}%: correlation_id={correlation_id:?}");
                processor.emit(correlation_id.clone(), PackResponse::progress(pct));
            }
        });

        let progress = Progress::new(move |pct| {
            // the receiver only goes away once the run is over
            let _ = tx.send(pct);
        });

        // Run the engine in a blocking task to avoid blocking the async runtime
        let outcome = tokio::task::spawn_blocking(move || engine::run(&request, cancel, progress))
            .await
            .context("Failed to join blocking packing task")
            .and_then(|outcome| outcome);

        // the sender was dropped together with the progress sink, so this drains and ends
        progress_task
            .await
            .context("Failed to join progress task")?;

        outcome
    }
}
