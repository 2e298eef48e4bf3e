use crate::backend::WorkflowBackend;
use crate::config::Config;
use crate::control::{SimulationControl, StartError};
use crate::poller::PollEvent;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use patchboard_core::{Language, Run};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Conversation,
    Checks,
    Files,
}

impl View {
    pub const ALL: [View; 3] = [View::Conversation, View::Checks, View::Files];

    pub fn label(self) -> &'static str {
        match self {
            View::Conversation => "Conversation",
            View::Checks => "Checks",
            View::Files => "Files changed",
        }
    }

    pub fn next(self) -> Self {
        match self {
            View::Conversation => View::Checks,
            View::Checks => View::Files,
            View::Files => View::Conversation,
        }
    }
}

/// Modal message; swallows every key except the ones that dismiss it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    StartRun,
    Quit,
}

pub struct App {
    pub config: Config,
    pub language: Language,
    pub view: View,
    pub notice: Option<Notice>,
    pub status_note: Option<String>,
    pub last_poll_at: Option<DateTime<Local>>,
    pub frame: u64,
    control: SimulationControl,
    run: Run,
}

impl App {
    pub fn new(
        config: Config,
        backend: Arc<dyn WorkflowBackend>,
        events: mpsc::Sender<PollEvent>,
    ) -> Self {
        let control = SimulationControl::new(backend, config.poll_interval, events);
        Self {
            language: config.language,
            config,
            view: View::default(),
            notice: None,
            status_note: None,
            last_poll_at: None,
            frame: 0,
            control,
            run: Run::new(),
        }
    }

    pub fn run(&self) -> &Run {
        &self.run
    }

    pub fn run_mut(&mut self) -> &mut Run {
        &mut self.run
    }

    pub fn control(&self) -> &SimulationControl {
        &self.control
    }

    pub fn on_tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        if self.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.notice = None;
            }
            return InputAction::None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return InputAction::Quit;
        }

        match key.code {
            KeyCode::Char('q') => return InputAction::Quit,
            KeyCode::Char('s') | KeyCode::Enter => {
                if self.control.is_enabled() {
                    return InputAction::StartRun;
                }
                self.status_note = Some("A simulation is already running".to_string());
            }
            KeyCode::Char('l') => {
                if self.control.is_enabled() {
                    self.language = self.language.next();
                }
            }
            KeyCode::Char('1') => self.view = View::Conversation,
            KeyCode::Char('2') => self.view = View::Checks,
            KeyCode::Char('3') => self.view = View::Files,
            KeyCode::Tab => self.view = self.view.next(),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::PageDown => self.scroll_logs(10),
            KeyCode::PageUp => self.scroll_logs(-10),
            _ => {}
        }
        InputAction::None
    }

    fn move_selection(&mut self, delta: isize) {
        match self.view {
            View::Files => {
                self.run.select_relative_file(delta);
            }
            View::Checks => self.scroll_logs(delta),
            View::Conversation => {}
        }
    }

    fn scroll_logs(&mut self, delta: isize) {
        let logs = self.run.logs_mut();
        if delta < 0 {
            logs.scroll_up(delta.unsigned_abs());
        } else {
            logs.scroll_down(delta.unsigned_abs());
        }
    }

    /// Clears the previous run's surfaces, then asks the backend to start.
    pub async fn start_run(&mut self) {
        if !self.control.is_enabled() {
            return;
        }
        self.run = Run::new();
        self.last_poll_at = None;
        self.status_note = None;

        match self.control.start(self.language).await {
            Ok(run_id) => {
                self.view = View::Checks;
                self.status_note = Some(format!("Run {run_id} started ({})", self.language));
            }
            Err(StartError::AlreadyRunning) => {
                self.status_note = Some("A simulation is already running".to_string());
            }
            Err(StartError::Backend(err)) => {
                self.notice = Some(Notice {
                    title: "Failed to start simulation".to_string(),
                    message: format!("{err}\n\nBackend: {}", self.config.backend_url),
                });
            }
        }
    }

    pub fn apply_poll_event(&mut self, event: PollEvent) {
        if event.run_id != self.control.run_id() {
            debug!(
                event = "poll_event_stale",
                run_id = event.run_id,
                current = self.control.run_id()
            );
            return;
        }
        self.last_poll_at = Some(Local::now());
        let outcome = self.run.apply_snapshot(event.snapshot);
        if outcome.is_terminal() {
            self.control.finish();
            self.status_note = Some(format!("Run {} finished: {}", event.run_id, outcome.status));
        }
    }

    pub fn shutdown(&mut self) {
        self.control.shutdown();
    }
}
