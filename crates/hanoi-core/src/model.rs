use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::planner::PlanError;

// ---------------------------------------------------------------------------
// Pegs
// ---------------------------------------------------------------------------

/// One of the three holding locations.
///
/// The labels carry no physical meaning; which peg acts as source,
/// auxiliary or destination is decided per puzzle by [`Roles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Peg {
    A,
    B,
    C,
}

impl Peg {
    /// All pegs in label order.
    pub const ALL: [Peg; 3] = [Peg::A, Peg::B, Peg::C];

    /// Position of this peg in [`Peg::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }
}

impl fmt::Display for Peg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Peg {
    type Err = PegParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            "C" | "c" => Ok(Self::C),
            other => Err(PegParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Peg`] string.
#[derive(Debug, Clone)]
pub struct PegParseError(pub String);

impl fmt::Display for PegParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid peg: {:?} (expected A, B, or C)", self.0)
    }
}

impl std::error::Error for PegParseError {}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Assignment of the three pegs to their roles in one puzzle.
///
/// Always pairwise distinct; construct through [`Roles::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Roles {
    source: Peg,
    auxiliary: Peg,
    destination: Peg,
}

impl Roles {
    /// `A` to `C` using `B`, as in the classic presentation.
    pub const STANDARD: Roles = Roles {
        source: Peg::A,
        auxiliary: Peg::B,
        destination: Peg::C,
    };

    /// Build a role assignment, rejecting any peg used twice.
    pub fn new(source: Peg, auxiliary: Peg, destination: Peg) -> Result<Self, PlanError> {
        if source == auxiliary || source == destination || auxiliary == destination {
            return Err(PlanError::InvalidArgument(format!(
                "pegs must be pairwise distinct (source={source}, auxiliary={auxiliary}, destination={destination})"
            )));
        }
        Ok(Self {
            source,
            auxiliary,
            destination,
        })
    }

    pub const fn source(&self) -> Peg {
        self.source
    }

    pub const fn auxiliary(&self) -> Peg {
        self.auxiliary
    }

    pub const fn destination(&self) -> Peg {
        self.destination
    }

    /// Roles for the first half of a recursive step: move the upper disks
    /// from source to auxiliary, parking on destination.
    pub(crate) const fn toward_auxiliary(self) -> Self {
        Self {
            source: self.source,
            auxiliary: self.destination,
            destination: self.auxiliary,
        }
    }

    /// Roles for the second half: move the upper disks from auxiliary to
    /// destination, parking on source.
    pub(crate) const fn from_auxiliary(self) -> Self {
        Self {
            source: self.auxiliary,
            auxiliary: self.source,
            destination: self.destination,
        }
    }
}

impl Default for Roles {
    fn default() -> Self {
        Self::STANDARD
    }
}

// ---------------------------------------------------------------------------
// Disks
// ---------------------------------------------------------------------------

/// A disk, identified by its size. Larger values are physically larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Disk(u32);

impl Disk {
    pub const fn new(size: u32) -> Self {
        Self(size)
    }

    pub const fn size(self) -> u32 {
        self.0
    }
}

impl From<u32> for Disk {
    fn from(size: u32) -> Self {
        Self(size)
    }
}

impl fmt::Display for Disk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Moves
// ---------------------------------------------------------------------------

/// Intent to transfer the top disk of one peg onto another.
///
/// A move only names pegs; whether it is legal depends on the
/// configuration it is applied to. Serialized as a `[from, to]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "(Peg, Peg)", try_from = "(Peg, Peg)")]
pub struct Move {
    from: Peg,
    to: Peg,
}

/// Errors constructing a [`Move`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("a move needs two different pegs, got {0} -> {0}")]
    SamePeg(Peg),
}

impl Move {
    pub fn new(from: Peg, to: Peg) -> Result<Self, MoveError> {
        if from == to {
            return Err(MoveError::SamePeg(from));
        }
        Ok(Self { from, to })
    }

    /// Callers guarantee `from != to`; every [`Roles`] value does.
    pub(crate) const fn between(from: Peg, to: Peg) -> Self {
        Self { from, to }
    }

    pub const fn from(&self) -> Peg {
        self.from
    }

    pub const fn to(&self) -> Peg {
        self.to
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

impl From<Move> for (Peg, Peg) {
    fn from(mv: Move) -> Self {
        (mv.from, mv.to)
    }
}

impl TryFrom<(Peg, Peg)> for Move {
    type Error = MoveError;

    fn try_from((from, to): (Peg, Peg)) -> Result<Self, Self::Error> {
        Self::new(from, to)
    }
}
