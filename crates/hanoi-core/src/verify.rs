//! Optional verification pass: replay a move sequence through a fresh
//! engine and confirm it solves the puzzle.

use thiserror::Error;

use crate::engine::{Configuration, Engine, EngineError, InvariantError};
use crate::model::{Move, Roles};
use crate::planner::move_count;

/// Summary of a sequence that solved the puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification {
    pub moves_applied: u64,
    /// The sequence used exactly `2^n - 1` moves.
    pub optimal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("move {step} is illegal")]
    Illegal {
        step: u64,
        #[source]
        source: EngineError,
    },

    #[error("invariant broken after move {step}")]
    Invariant {
        step: u64,
        #[source]
        source: InvariantError,
    },

    #[error("sequence ended after {moves_applied} moves without solving the puzzle ({configuration})")]
    NotTerminal {
        moves_applied: u64,
        configuration: Configuration,
    },
}

/// Replay `moves` on `disks` disks and check that every move is legal, the
/// invariants hold after each one, and the final configuration is terminal.
pub fn verify_sequence<I>(disks: u32, roles: Roles, moves: I) -> Result<Verification, VerifyError>
where
    I: IntoIterator<Item = Move>,
{
    let mut engine = Engine::with_disks(disks, roles);

    for mv in moves {
        let step = engine.moves_applied() + 1;
        engine
            .apply(mv)
            .map_err(|source| VerifyError::Illegal { step, source })?;
        engine
            .configuration()
            .check_invariants(disks)
            .map_err(|source| VerifyError::Invariant { step, source })?;
    }

    if !engine.is_terminal() {
        return Err(VerifyError::NotTerminal {
            moves_applied: engine.moves_applied(),
            configuration: engine.configuration().clone(),
        });
    }

    let moves_applied = engine.moves_applied();
    Ok(Verification {
        moves_applied,
        optimal: move_count(disks) == Some(moves_applied),
    })
}
