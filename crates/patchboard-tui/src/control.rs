use crate::backend::{BackendError, WorkflowBackend};
use crate::poller::{PollEvent, PollerState, StatusPoller};
use patchboard_core::Language;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum StartError {
    #[error("a simulation is already running")]
    AlreadyRunning,
    #[error("failed to start simulation: {0}")]
    Backend(#[from] BackendError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Idle,
    Starting,
    Running,
}

/// The "run" action: one start request at a time, then the poller.
pub struct SimulationControl {
    backend: Arc<dyn WorkflowBackend>,
    poller: StatusPoller,
    events: mpsc::Sender<PollEvent>,
    state: ControlState,
    run_id: u64,
}

impl SimulationControl {
    pub fn new(
        backend: Arc<dyn WorkflowBackend>,
        poll_period: Duration,
        events: mpsc::Sender<PollEvent>,
    ) -> Self {
        Self {
            poller: StatusPoller::new(backend.clone(), poll_period),
            backend,
            events,
            state: ControlState::Idle,
            run_id: 0,
        }
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state == ControlState::Idle
    }

    pub fn label(&self) -> &'static str {
        match self.state {
            ControlState::Idle => "Start Simulation",
            ControlState::Starting | ControlState::Running => "Simulating...",
        }
    }

    /// Id of the most recently accepted run; 0 before the first one.
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn poller_state(&self) -> PollerState {
        self.poller.state()
    }

    /// Sends the start request and, once accepted, begins polling under a
    /// fresh run id. Re-entry is refused before any request goes out.
    pub async fn start(&mut self, language: Language) -> Result<u64, StartError> {
        if !self.is_enabled() {
            return Err(StartError::AlreadyRunning);
        }
        self.state = ControlState::Starting;

        match self.backend.start_simulation(language).await {
            Ok(()) => {
                self.run_id += 1;
                self.state = ControlState::Running;
                self.poller.stop();
                self.poller.start(self.run_id, self.events.clone());
                info!(event = "simulation_started", run_id = self.run_id, language = %language);
                Ok(self.run_id)
            }
            Err(err) => {
                self.state = ControlState::Idle;
                warn!(event = "simulation_start_failed", language = %language, error = %err);
                Err(err.into())
            }
        }
    }

    /// Terminal snapshot seen: stop polling and re-enable the action.
    pub fn finish(&mut self) {
        self.poller.stop();
        if self.state != ControlState::Idle {
            info!(event = "simulation_finished", run_id = self.run_id);
        }
        self.state = ControlState::Idle;
    }

    pub fn shutdown(&mut self) {
        self.poller.stop();
    }
}
