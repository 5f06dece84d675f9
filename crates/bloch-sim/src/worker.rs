//! Background execution of simulation requests.
//!
//! The worker owns a [`Simulator`] and a request channel. Every request gets
//! a monotonically increasing [`RequestId`]; when the worker reaches a
//! request that is older than the most recent submission, it answers with
//! [`SimError::Superseded`] instead of simulating. A result computed for a
//! request that was superseded while it ran is discarded the same way.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{SimError, SimResult};
use crate::simulator::{SimulationRequest, SimulationResult, Simulator};

/// Identifier assigned to a submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Job {
    id: RequestId,
    request: SimulationRequest,
    reply: oneshot::Sender<SimResult<SimulationResult>>,
}

/// A submitted request awaiting its result.
#[derive(Debug)]
pub struct PendingSimulation {
    id: RequestId,
    reply: oneshot::Receiver<SimResult<SimulationResult>>,
}

impl PendingSimulation {
    /// The id assigned on submission.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Wait for the worker's answer.
    pub async fn wait(self) -> SimResult<SimulationResult> {
        self.reply.await.map_err(|_| SimError::WorkerClosed)?
    }
}

/// Handle to a background simulation task.
pub struct SimulationWorker {
    sender: mpsc::UnboundedSender<Job>,
    latest: Arc<AtomicU64>,
    handle: JoinHandle<()>,
}

impl SimulationWorker {
    /// Start the worker on the current tokio runtime.
    pub fn spawn(simulator: Simulator) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let latest = Arc::new(AtomicU64::new(0));
        let handle = tokio::spawn(run_worker(simulator, receiver, Arc::clone(&latest)));
        Self {
            sender,
            latest,
            handle,
        }
    }

    /// Queue a request. Any request submitted earlier that has not finished
    /// yet is superseded.
    pub fn submit(&self, request: SimulationRequest) -> SimResult<PendingSimulation> {
        let id = RequestId(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
        let (reply, receiver) = oneshot::channel();
        self.sender
            .send(Job { id, request, reply })
            .map_err(|_| SimError::WorkerClosed)?;
        debug!("Submitted simulation request {id}");
        Ok(PendingSimulation {
            id,
            reply: receiver,
        })
    }

    /// Submit a request and wait for its result.
    pub async fn simulate(&self, request: SimulationRequest) -> SimResult<SimulationResult> {
        self.submit(request)?.wait().await
    }

    /// Stop accepting requests and wait for queued ones to be answered.
    pub async fn shutdown(self) {
        drop(self.sender);
        if let Err(e) = self.handle.await {
            warn!("Simulation worker task failed: {e}");
        }
    }
}

async fn run_worker(
    simulator: Simulator,
    mut receiver: mpsc::UnboundedReceiver<Job>,
    latest: Arc<AtomicU64>,
) {
    let is_stale = |id: RequestId| id.0 < latest.load(Ordering::SeqCst);

    while let Some(Job { id, request, reply }) = receiver.recv().await {
        if is_stale(id) {
            debug!("Skipping superseded request {id}");
            let _ = reply.send(Err(SimError::Superseded(id.0)));
            continue;
        }

        let sim = simulator.clone();
        let outcome = tokio::task::spawn_blocking(move || sim.simulate(&request))
            .await
            .unwrap_or_else(|e| {
                warn!("Simulation task for request {id} failed: {e}");
                Err(SimError::WorkerClosed)
            });

        let outcome = if is_stale(id) {
            debug!("Discarding result of superseded request {id}");
            Err(SimError::Superseded(id.0))
        } else {
            outcome
        };
        let _ = reply.send(outcome);
    }
    debug!("Simulation worker stopped");
}
