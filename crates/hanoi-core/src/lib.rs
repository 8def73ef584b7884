//! Optimal Tower of Hanoi planning and a peg state engine that replays it.
//!
//! The [`planner`] produces the minimal move sequence, the [`engine`]
//! applies moves one at a time while enforcing the stacking rule, and
//! [`replay`] drives the two against an external [`replay::Renderer`].

pub mod engine;
pub mod model;
pub mod planner;
pub mod replay;
pub mod transcript;
pub mod verify;

pub use engine::{Configuration, Engine, EngineError, InvariantError, Snapshot, Transfer};
pub use model::{Disk, Move, MoveError, Peg, PegParseError, Roles};
pub use planner::{Moves, Plan, PlanError, check_disk_count, move_count, plan};
pub use replay::{Renderer, ReplayConfig, ReplayError, ReplayOutcome, run_replay};
pub use transcript::{
    PuzzleMeta, Transcript, TranscriptError, TranscriptFormat, parse_transcript,
};
pub use verify::{Verification, VerifyError, verify_sequence};
