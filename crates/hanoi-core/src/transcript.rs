//! Transcript files: a puzzle description plus a list of moves.
//!
//! A transcript is the serializable form of a move log, used for golden
//! comparisons and for feeding externally authored moves to the engine.
//!
//! ```toml
//! moves = [["A", "B"], ["A", "C"], ["B", "C"]]
//!
//! [puzzle]
//! disks = 2
//! source = "A"
//! auxiliary = "B"
//! destination = "C"
//! ```
//!
//! `moves` comes first because TOML keys after a table header belong to
//! that table.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Move, Peg, Roles};
use crate::planner::{PlanError, plan};

/// Errors that can occur reading or writing a transcript.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// On-disk encoding of a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    Toml,
    Json,
}

impl TranscriptFormat {
    /// `.json` files are JSON; anything else is read as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// The `[puzzle]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleMeta {
    pub disks: u32,
    #[serde(default = "default_source")]
    pub source: Peg,
    #[serde(default = "default_auxiliary")]
    pub auxiliary: Peg,
    #[serde(default = "default_destination")]
    pub destination: Peg,
}

impl PuzzleMeta {
    /// The role assignment, rejecting repeated pegs.
    pub fn roles(&self) -> Result<Roles, PlanError> {
        Roles::new(self.source, self.auxiliary, self.destination)
    }
}

fn default_source() -> Peg {
    Roles::STANDARD.source()
}

fn default_auxiliary() -> Peg {
    Roles::STANDARD.auxiliary()
}

fn default_destination() -> Peg {
    Roles::STANDARD.destination()
}

/// A puzzle and the moves played on it, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub moves: Vec<Move>,
    pub puzzle: PuzzleMeta,
}

impl Transcript {
    /// The planner's solution for `disks` disks.
    pub fn from_plan(disks: u32, roles: Roles) -> Result<Self, PlanError> {
        let moves = plan(disks, roles.source(), roles.auxiliary(), roles.destination())?;
        Ok(Self {
            moves,
            puzzle: PuzzleMeta {
                disks,
                source: roles.source(),
                auxiliary: roles.auxiliary(),
                destination: roles.destination(),
            },
        })
    }

    pub fn roles(&self) -> Result<Roles, PlanError> {
        self.puzzle.roles()
    }

    pub fn to_toml_string(&self) -> Result<String, TranscriptError> {
        Ok(toml::to_string(self)?)
    }

    pub fn to_json_string(&self) -> Result<String, TranscriptError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parse and validate a transcript.
///
/// Same-peg moves are rejected while decoding; repeated roles are rejected
/// afterwards. Legality of the moves themselves is left to the engine.
pub fn parse_transcript(
    content: &str,
    format: TranscriptFormat,
) -> Result<Transcript, TranscriptError> {
    let transcript: Transcript = match format {
        TranscriptFormat::Toml => toml::from_str(content)?,
        TranscriptFormat::Json => serde_json::from_str(content)?,
    };
    transcript.roles()?;
    Ok(transcript)
}
