//! `hanoi solve` and `hanoi replay`: drive the engine through a move
//! sequence and show each step.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use hanoi_core::{
    Engine, Move, Plan, ReplayConfig, ReplayOutcome, TranscriptFormat, check_disk_count,
    parse_transcript, run_replay,
};

use crate::config::HanoiConfig;
use crate::render::{JsonRenderer, TextRenderer};
use crate::tui::TuiRenderer;
use crate::{PegArgs, RendererKind};

/// Run the solve command: replay the planner's own solution.
pub async fn run_solve(
    disks: i64,
    pegs: &PegArgs,
    renderer: RendererKind,
    config: &HanoiConfig,
) -> Result<()> {
    let disks = check_disk_count(disks)?;
    config.check_ceiling(disks)?;
    let roles = pegs.roles()?;

    let mut engine = Engine::with_disks(disks, roles);
    let outcome = drive(&mut engine, Plan::new(disks, roles), renderer, config).await?;
    report(outcome, renderer);
    Ok(())
}

/// Run the replay command: feed a transcript's moves to the engine.
pub async fn run_replay_file(path: &Path, renderer: RendererKind, config: &HanoiConfig) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read transcript: {}", path.display()))?;
    let transcript = parse_transcript(&content, TranscriptFormat::from_path(path))
        .with_context(|| format!("failed to parse transcript: {}", path.display()))?;
    config.check_ceiling(transcript.puzzle.disks)?;
    let roles = transcript.roles()?;

    let mut engine = Engine::with_disks(transcript.puzzle.disks, roles);
    let outcome = drive(&mut engine, transcript.moves, renderer, config)
        .await
        .with_context(|| format!("transcript {} does not replay cleanly", path.display()))?;
    report(outcome, renderer);
    Ok(())
}

async fn drive<I>(
    engine: &mut Engine,
    moves: I,
    renderer: RendererKind,
    config: &HanoiConfig,
) -> Result<ReplayOutcome>
where
    I: IntoIterator<Item = Move>,
{
    let replay_config = ReplayConfig {
        step_delay: config.step_delay,
    };
    let cancel = CancellationToken::new();

    let result = match renderer {
        RendererKind::Tui => {
            let mut tui = TuiRenderer::start(engine, cancel.clone())?;
            let result = run_replay(engine, moves, &mut tui, &replay_config, cancel).await;
            tui.restore().await?;
            result
        }
        RendererKind::Text => {
            spawn_interrupt_handler(cancel.clone());
            let mut text = TextRenderer::new(std::io::stdout());
            run_replay(engine, moves, &mut text, &replay_config, cancel).await
        }
        RendererKind::Json => {
            spawn_interrupt_handler(cancel.clone());
            let mut json = JsonRenderer::new(std::io::stdout());
            run_replay(engine, moves, &mut json, &replay_config, cancel).await
        }
    };

    Ok(result?)
}

/// First Ctrl+C cancels the replay, second force-exits.
fn spawn_interrupt_handler(cancel: CancellationToken) {
    let got_first_signal = Arc::new(AtomicBool::new(false));

    tokio::spawn(async move {
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            if got_first_signal.swap(true, Ordering::SeqCst) {
                eprintln!("\nForce exit.");
                std::process::exit(130);
            }
            eprintln!("\nStopping replay (Ctrl+C again to force)...");
            cancel.cancel();
        }
    });
}

fn report(outcome: ReplayOutcome, renderer: RendererKind) {
    match outcome {
        ReplayOutcome::Completed { moves_applied } => {
            // The line renderers already printed a summary.
            if renderer == RendererKind::Tui {
                println!("Solved in {moves_applied} moves.");
            }
        }
        ReplayOutcome::Cancelled { moves_applied } => {
            eprintln!("Replay interrupted after {moves_applied} moves.");
            std::process::exit(130);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use hanoi_core::{Peg, Roles, Transcript};

    use super::*;

    fn fast(max_disks: u32) -> HanoiConfig {
        HanoiConfig {
            step_delay: Duration::ZERO,
            max_disks,
        }
    }

    fn standard_pegs() -> PegArgs {
        PegArgs {
            source: Peg::A,
            auxiliary: Peg::B,
            destination: Peg::C,
        }
    }

    #[tokio::test]
    async fn solve_with_text_renderer_completes() {
        run_solve(3, &standard_pegs(), RendererKind::Text, &fast(10))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn solve_respects_the_ceiling() {
        let err = run_solve(6, &standard_pegs(), RendererKind::Json, &fast(5))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("maximum of 5"), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn planned_transcript_replays() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("solution.json");
        let transcript = Transcript::from_plan(3, Roles::STANDARD).unwrap();
        std::fs::write(&path, transcript.to_json_string().unwrap()).unwrap();

        run_replay_file(&path, RendererKind::Json, &fast(10))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn illegal_transcript_halts_with_context() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(
            &path,
            "moves = [[\"A\", \"C\"], [\"A\", \"C\"]]\n\n[puzzle]\ndisks = 2\n",
        )
        .unwrap();

        let err = run_replay_file(&path, RendererKind::Text, &fast(10))
            .await
            .unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("does not replay cleanly"), "unexpected error: {chain}");
        assert!(chain.contains("replay halted at move 2"), "unexpected error: {chain}");
        assert!(chain.contains("disk 2 would rest on smaller disk 1"), "unexpected error: {chain}");
    }

    #[tokio::test]
    async fn missing_transcript_is_reported() {
        let err = run_replay_file(Path::new("/nonexistent/moves.toml"), RendererKind::Text, &fast(10))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read transcript"), "unexpected error: {err}");
    }
}
