mod backend;
mod config;
mod control;
mod poller;
mod state;
mod theme;
mod ui;

use anyhow::{Context, Result};
use backend::HttpBackend;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use poller::PollEvent;
use ratatui::{backend::CrosstermBackend, Terminal};
use state::{App, InputAction};
use std::{io, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tracing::info;

const FRAME_TICK: Duration = Duration::from_millis(250);
const POLL_EVENT_CAPACITY: usize = 32;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load_config();
    config::init_logging(&config)?;
    info!(
        event = "startup",
        backend_url = %config.backend_url,
        language = %config.language,
        poll_interval_ms = config.poll_interval.as_millis() as u64
    );

    let backend = HttpBackend::new(&config.backend_url, config.request_timeout)
        .context("build HTTP client")?;
    let (poll_tx, poll_rx) = mpsc::channel(POLL_EVENT_CAPACITY);
    let mut app = App::new(config, Arc::new(backend), poll_tx);

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &mut app, poll_rx).await;
    app.shutdown();
    restore_terminal(&mut terminal)?;

    if let Err(err) = result {
        eprintln!("patchboard: {err}");
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    mut poll_rx: mpsc::Receiver<PollEvent>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(FRAME_TICK);

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        let action = tokio::select! {
            _ = ticker.tick() => {
                app.on_tick();
                InputAction::None
            }
            Some(event) = poll_rx.recv() => {
                app.apply_poll_event(event);
                InputAction::None
            }
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key)))
                    if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) =>
                {
                    app.handle_key(key)
                }
                Some(Ok(_)) => InputAction::None,
                Some(Err(err)) => return Err(err.into()),
                None => InputAction::Quit,
            },
        };

        match action {
            InputAction::None => {}
            InputAction::StartRun => app.start_run().await,
            InputAction::Quit => break,
        }
    }

    Ok(())
}
