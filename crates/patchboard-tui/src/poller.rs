use crate::backend::WorkflowBackend;
use patchboard_core::Snapshot;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// A snapshot fetched on behalf of run `run_id`.
#[derive(Debug)]
pub struct PollEvent {
    pub run_id: u64,
    pub snapshot: Snapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Stopped,
    Polling,
}

struct ActivePoll {
    run_id: u64,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Repeating status fetch for one run at a time.
///
/// Each fetch is awaited before the next tick is taken and ticks missed in
/// the meantime are skipped, so at most one request is ever outstanding.
/// The loop ends on its own after delivering a terminal snapshot.
pub struct StatusPoller {
    backend: Arc<dyn WorkflowBackend>,
    period: Duration,
    active: Option<ActivePoll>,
}

impl StatusPoller {
    pub fn new(backend: Arc<dyn WorkflowBackend>, period: Duration) -> Self {
        Self {
            backend,
            period,
            active: None,
        }
    }

    pub fn state(&self) -> PollerState {
        match &self.active {
            Some(active) if !active.handle.is_finished() => PollerState::Polling,
            _ => PollerState::Stopped,
        }
    }

    /// STOPPED -> POLLING. Returns false, changing nothing, while a loop
    /// is still running.
    pub fn start(&mut self, run_id: u64, tx: mpsc::Sender<PollEvent>) -> bool {
        if self.state() == PollerState::Polling {
            return false;
        }
        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(poll_loop(
            self.backend.clone(),
            self.period,
            run_id,
            tx,
            shutdown_rx,
        ));
        info!(event = "poller_start", run_id, period_ms = self.period.as_millis() as u64);
        self.active = Some(ActivePoll {
            run_id,
            shutdown,
            handle,
        });
        true
    }

    /// Safe from any state. A fetch already in flight is left to finish;
    /// its result is dropped.
    pub fn stop(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        let _ = active.shutdown.send(true);
        info!(event = "poller_stop", run_id = active.run_id);
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn stop_requested(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow() || shutdown.has_changed().is_err()
}

async fn poll_loop(
    backend: Arc<dyn WorkflowBackend>,
    period: Duration,
    run_id: u64,
    tx: mpsc::Sender<PollEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => {}
        }
        if stop_requested(&shutdown) {
            break;
        }

        let result = backend.fetch_status().await;
        if stop_requested(&shutdown) {
            debug!(event = "poll_result_discarded", run_id);
            break;
        }

        match result {
            Ok(snapshot) => {
                let status = snapshot.status;
                if tx.send(PollEvent { run_id, snapshot }).await.is_err() {
                    break;
                }
                if status.is_terminal() {
                    info!(event = "poller_terminal", run_id, status = %status);
                    break;
                }
            }
            Err(err) => {
                warn!(event = "poll_error", run_id, error = %err);
            }
        }
    }
}
