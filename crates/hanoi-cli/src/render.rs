//! Line-oriented renderers: plain text for people, JSON lines for tools.

use std::io::Write;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

use hanoi_core::{Renderer, ReplayOutcome, Snapshot};

// -----------------------------------------------------------------------
// Text
// -----------------------------------------------------------------------

/// Prints one line per applied move.
pub struct TextRenderer<W> {
    out: W,
}

impl<W: Write + Send> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) -> Result<()> {
        self.out
            .write_fmt(text)
            .and_then(|()| self.out.write_all(b"\n"))
            .and_then(|()| self.out.flush())
            .context("failed to write replay output")
    }
}

#[async_trait]
impl<W: Write + Send> Renderer for TextRenderer<W> {
    async fn begin(&mut self, snapshot: &Snapshot, total: Option<u64>) -> Result<()> {
        let disks = snapshot.configuration.disk_count();
        match total {
            Some(total) => self.line(format_args!(
                "Start: {disks} disks, {total} moves | {}",
                snapshot.configuration
            )),
            None => self.line(format_args!(
                "Start: {disks} disks | {}",
                snapshot.configuration
            )),
        }
    }

    async fn step(&mut self, snapshot: &Snapshot) -> Result<()> {
        match snapshot.last {
            Some(t) => self.line(format_args!(
                "Move {}: disk {} {} -> {} | {}",
                snapshot.moves_applied, t.disk, t.from, t.to, snapshot.configuration
            )),
            None => self.line(format_args!(
                "Move {}: | {}",
                snapshot.moves_applied, snapshot.configuration
            )),
        }
    }

    async fn finish(&mut self, outcome: &ReplayOutcome, _snapshot: &Snapshot) -> Result<()> {
        match outcome {
            ReplayOutcome::Completed { moves_applied } => {
                self.line(format_args!("Solved in {moves_applied} moves."))
            }
            ReplayOutcome::Cancelled { moves_applied } => {
                self.line(format_args!("Stopped after {moves_applied} moves."))
            }
        }
    }
}

// -----------------------------------------------------------------------
// JSON lines
// -----------------------------------------------------------------------

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event<'a> {
    Begin {
        total: Option<u64>,
        #[serde(flatten)]
        snapshot: &'a Snapshot,
    },
    Step {
        #[serde(flatten)]
        snapshot: &'a Snapshot,
    },
    Finish {
        outcome: &'static str,
        #[serde(flatten)]
        snapshot: &'a Snapshot,
    },
}

/// Emits one JSON object per replay event.
pub struct JsonRenderer<W> {
    out: W,
}

impl<W: Write + Send> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &Event<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, event).context("failed to encode replay event")?;
        self.out
            .write_all(b"\n")
            .and_then(|()| self.out.flush())
            .context("failed to write replay output")
    }
}

#[async_trait]
impl<W: Write + Send> Renderer for JsonRenderer<W> {
    async fn begin(&mut self, snapshot: &Snapshot, total: Option<u64>) -> Result<()> {
        self.emit(&Event::Begin { total, snapshot })
    }

    async fn step(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.emit(&Event::Step { snapshot })
    }

    async fn finish(&mut self, outcome: &ReplayOutcome, snapshot: &Snapshot) -> Result<()> {
        let outcome = match outcome {
            ReplayOutcome::Completed { .. } => "completed",
            ReplayOutcome::Cancelled { .. } => "cancelled",
        };
        self.emit(&Event::Finish { outcome, snapshot })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use hanoi_core::{Engine, Plan, ReplayConfig, Roles, run_replay};
    use tokio_util::sync::CancellationToken;

    use super::*;

    async fn replay_into(renderer: &mut dyn Renderer, disks: u32) -> ReplayOutcome {
        let mut engine = Engine::with_disks(disks, Roles::STANDARD);
        let config = ReplayConfig {
            step_delay: Duration::ZERO,
        };
        run_replay(
            &mut engine,
            Plan::new(disks, Roles::STANDARD),
            renderer,
            &config,
            CancellationToken::new(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn text_output_for_two_disks() {
        let mut renderer = TextRenderer::new(Vec::new());
        replay_into(&mut renderer, 2).await;

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Start: 2 disks, 3 moves | A:[2, 1] B:[] C:[]",
                "Move 1: disk 1 A -> B | A:[2] B:[1] C:[]",
                "Move 2: disk 2 A -> C | A:[] B:[1] C:[2]",
                "Move 3: disk 1 B -> C | A:[] B:[] C:[2, 1]",
                "Solved in 3 moves.",
            ]
        );
    }

    #[tokio::test]
    async fn json_output_is_one_event_per_line() {
        let mut renderer = JsonRenderer::new(Vec::new());
        replay_into(&mut renderer, 1).await;

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        let events: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(events.len(), 3);

        assert_eq!(events[0]["event"], "begin");
        assert_eq!(events[0]["total"], 1);
        assert_eq!(events[0]["moves_applied"], 0);
        assert_eq!(events[0]["configuration"]["A"], serde_json::json!([1]));

        assert_eq!(events[1]["event"], "step");
        assert_eq!(events[1]["moves_applied"], 1);
        assert_eq!(
            events[1]["last"],
            serde_json::json!({"disk": 1, "from": "A", "to": "C"})
        );

        assert_eq!(events[2]["event"], "finish");
        assert_eq!(events[2]["outcome"], "completed");
        assert_eq!(events[2]["configuration"]["C"], serde_json::json!([1]));
    }
}
