//! Replay driver: feeds moves to an [`Engine`] one at a time and hands each
//! resulting snapshot to a [`Renderer`], pausing between steps.
//!
//! The pause is a timed yield raced against a [`CancellationToken`], so the
//! caller can stop the replay at any point between two moves. A stopped
//! replay leaves the engine at whatever intermediate configuration it had
//! reached; nothing is rolled back.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::engine::{Configuration, Engine, EngineError, Snapshot};
use crate::model::Move;

/// Consumer of replay frames (terminal UI, line printer, test recorder).
#[async_trait]
pub trait Renderer: Send {
    /// Called once with the starting configuration. `total` is the number
    /// of moves the replay expects to apply, when known.
    async fn begin(&mut self, snapshot: &Snapshot, total: Option<u64>) -> anyhow::Result<()>;

    /// Called after every successfully applied move.
    async fn step(&mut self, snapshot: &Snapshot) -> anyhow::Result<()>;

    /// Called once when the replay completes or is cancelled. Not called
    /// when the replay fails.
    async fn finish(&mut self, outcome: &ReplayOutcome, snapshot: &Snapshot)
    -> anyhow::Result<()>;
}

/// Pacing for [`run_replay`].
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Pause after each applied move.
    pub step_delay: Duration,
}

impl ReplayConfig {
    pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(500);
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            step_delay: Self::DEFAULT_STEP_DELAY,
        }
    }
}

/// How a replay ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// Every move was applied and the puzzle is solved.
    Completed { moves_applied: u64 },
    /// The cancellation token fired between two moves.
    Cancelled { moves_applied: u64 },
}

/// A replay that could not run to completion.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("replay halted at move {step}")]
    Engine {
        step: u64,
        #[source]
        source: EngineError,
    },

    #[error(
        "all {moves_applied} moves applied but the puzzle is not solved ({configuration}); \
         the move sequence does not match the engine"
    )]
    NotTerminal {
        moves_applied: u64,
        configuration: Configuration,
    },

    #[error("renderer failed: {0:#}")]
    Renderer(anyhow::Error),
}

/// Replay `moves` on `engine`, pacing each step by `config.step_delay`.
///
/// The engine is used as given; initialize it first. Engine errors are not
/// retried or repaired: the replay stops and the offending move and both
/// pegs involved are logged.
pub async fn run_replay<I>(
    engine: &mut Engine,
    moves: I,
    renderer: &mut dyn Renderer,
    config: &ReplayConfig,
    cancel: CancellationToken,
) -> Result<ReplayOutcome, ReplayError>
where
    I: IntoIterator<Item = Move>,
{
    let mut moves = moves.into_iter().peekable();
    let total = match moves.size_hint() {
        (lower, Some(upper)) if lower == upper => Some(lower as u64),
        _ => None,
    };

    tracing::info!(
        disks = engine.disks(),
        source = %engine.roles().source(),
        destination = %engine.roles().destination(),
        total = ?total,
        "starting replay"
    );

    renderer
        .begin(&engine.current(), total)
        .await
        .map_err(ReplayError::Renderer)?;

    while let Some(mv) = moves.next() {
        if cancel.is_cancelled() {
            return finish_cancelled(engine, renderer).await;
        }

        let step = engine.moves_applied() + 1;
        let snapshot = match engine.apply(mv) {
            Ok(snapshot) => snapshot,
            Err(source) => {
                let state = source.configuration();
                tracing::error!(
                    step,
                    mv = %mv,
                    from_peg = ?state.sizes(mv.from()),
                    to_peg = ?state.sizes(mv.to()),
                    error = %source,
                    "illegal move, halting replay"
                );
                return Err(ReplayError::Engine { step, source });
            }
        };

        renderer.step(&snapshot).await.map_err(ReplayError::Renderer)?;

        // No pause after the final move.
        if !config.step_delay.is_zero() && moves.peek().is_some() {
            tokio::select! {
                _ = cancel.cancelled() => {
                    return finish_cancelled(engine, renderer).await;
                }
                _ = tokio::time::sleep(config.step_delay) => {}
            }
        }
    }

    if !engine.is_terminal() {
        tracing::error!(
            moves_applied = engine.moves_applied(),
            configuration = %engine.configuration(),
            "move sequence exhausted before the puzzle was solved"
        );
        return Err(ReplayError::NotTerminal {
            moves_applied: engine.moves_applied(),
            configuration: engine.configuration().clone(),
        });
    }

    let outcome = ReplayOutcome::Completed {
        moves_applied: engine.moves_applied(),
    };
    tracing::info!(moves_applied = engine.moves_applied(), "replay completed");
    renderer
        .finish(&outcome, &engine.current())
        .await
        .map_err(ReplayError::Renderer)?;
    Ok(outcome)
}

async fn finish_cancelled(
    engine: &Engine,
    renderer: &mut dyn Renderer,
) -> Result<ReplayOutcome, ReplayError> {
    let outcome = ReplayOutcome::Cancelled {
        moves_applied: engine.moves_applied(),
    };
    tracing::warn!(
        moves_applied = engine.moves_applied(),
        configuration = %engine.configuration(),
        "replay cancelled"
    );
    renderer
        .finish(&outcome, &engine.current())
        .await
        .map_err(ReplayError::Renderer)?;
    Ok(outcome)
}
