//! Full-screen replay view.
//!
//! Drawing happens on the replay task; keyboard input is read on a blocking
//! thread that cancels the replay on `q`, `Esc` or Ctrl-C.

pub mod app;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use hanoi_core::{Engine, Renderer, ReplayOutcome, Snapshot};

use app::{App, Phase};

const INPUT_POLL: Duration = Duration::from_millis(100);

/// Renderer that owns the terminal for the duration of a replay.
pub struct TuiRenderer {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
    cancel: CancellationToken,
    stop_input: CancellationToken,
    input: Option<JoinHandle<Result<()>>>,
}

impl TuiRenderer {
    /// Switch the terminal to the alternate screen and start listening for
    /// keys. Pressing `q`/`Esc` cancels `cancel`.
    pub fn start(engine: &Engine, cancel: CancellationToken) -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let terminal = match enter_screen() {
            Ok(terminal) => terminal,
            Err(e) => {
                // Best effort; the setup error is what gets reported.
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                let _ = disable_raw_mode();
                return Err(e);
            }
        };

        let stop_input = cancel.child_token();
        let input = tokio::task::spawn_blocking({
            let cancel = cancel.clone();
            let stop = stop_input.clone();
            move || {
                let result = poll_input(&cancel, &stop);
                if result.is_err() {
                    cancel.cancel();
                }
                result
            }
        });

        Ok(Self {
            terminal,
            app: App::new(engine.roles(), engine.disks(), engine.current(), None),
            cancel,
            stop_input,
            input: Some(input),
        })
    }

    /// Stop the input thread and give the terminal back.
    pub async fn restore(mut self) -> Result<()> {
        self.stop_input.cancel();
        let input_result = join_input(self.input.take()).await;

        // The terminal goes back first; an input error is reported after.
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        input_result
    }

    fn draw(&mut self) -> Result<()> {
        let app = &self.app;
        self.terminal
            .draw(|f| ui::render(f, app))
            .context("failed to draw replay")?;
        Ok(())
    }
}

#[async_trait]
impl Renderer for TuiRenderer {
    async fn begin(&mut self, snapshot: &Snapshot, total: Option<u64>) -> Result<()> {
        self.app.total = total;
        self.app.update(snapshot);
        self.draw()
    }

    async fn step(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.app.update(snapshot);
        self.draw()
    }

    async fn finish(&mut self, outcome: &ReplayOutcome, snapshot: &Snapshot) -> Result<()> {
        self.app.finish(outcome, snapshot);
        self.draw()?;

        // Keep the solved puzzle on screen until the user dismisses it.
        if self.app.phase == Phase::Completed {
            self.cancel.cancelled().await;
        }
        Ok(())
    }
}

fn enter_screen() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))
        .context("failed to set up terminal")?;
    Ok(terminal)
}

/// Wait for the input thread and hand back its result. A panicked or
/// aborted thread is logged, not treated as an error.
async fn join_input(handle: Option<JoinHandle<Result<()>>>) -> Result<()> {
    let Some(handle) = handle else {
        return Ok(());
    };
    match handle.await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "input thread did not shut down cleanly");
            Ok(())
        }
    }
}

fn poll_input(cancel: &CancellationToken, stop: &CancellationToken) -> Result<()> {
    while !stop.is_cancelled() {
        if !event::poll(INPUT_POLL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let quit = match key.code {
                KeyCode::Char('q') | KeyCode::Esc => true,
                KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
                _ => false,
            };
            if quit {
                tracing::debug!("quit key pressed");
                cancel.cancel();
            }
        }
    }
    Ok(())
}
