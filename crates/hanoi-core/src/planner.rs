//! Move planner: the minimal move sequence for `n` disks.
//!
//! [`plan`] is the direct recursive formulation. [`Plan::moves`] restates
//! the same recursion with an explicit work stack so the sequence can be
//! consumed lazily, restarted, or produced for counts whose full move list
//! would not fit in memory. Both yield identical sequences.

use thiserror::Error;

use crate::model::{Move, Peg, Roles};

/// Errors raised by the planner before any move is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Validate a disk count coming from a signed source (CLI, config).
pub fn check_disk_count(disks: i64) -> Result<u32, PlanError> {
    if disks < 0 {
        return Err(PlanError::InvalidArgument(format!(
            "disk count must not be negative, got {disks}"
        )));
    }
    u32::try_from(disks).map_err(|_| {
        PlanError::InvalidArgument(format!("disk count {disks} is too large"))
    })
}

/// Number of moves in the optimal solution, `2^n - 1`.
///
/// Returns `None` when the count does not fit in a `u64` (64 disks or more).
pub fn move_count(disks: u32) -> Option<u64> {
    if disks >= u64::BITS {
        return None;
    }
    Some((1u64 << disks) - 1)
}

/// Plan the moves that carry `disks` disks from `source` to `destination`.
///
/// Zero disks is a valid base case and yields no moves. The pegs must be
/// pairwise distinct. The planner does not look at any peg state; legality
/// of the output follows from the construction.
pub fn plan(
    disks: u32,
    source: Peg,
    auxiliary: Peg,
    destination: Peg,
) -> Result<Vec<Move>, PlanError> {
    let roles = Roles::new(source, auxiliary, destination)?;
    let too_many = || {
        PlanError::InvalidArgument(format!(
            "{disks} disks need more moves than can be held in memory; use Plan::moves"
        ))
    };
    let capacity = move_count(disks)
        .and_then(|c| usize::try_from(c).ok())
        .ok_or_else(too_many)?;
    let mut out = Vec::new();
    out.try_reserve_exact(capacity).map_err(|_| too_many())?;
    solve(disks, roles, &mut out);
    Ok(out)
}

fn solve(disks: u32, roles: Roles, out: &mut Vec<Move>) {
    match disks {
        0 => {}
        1 => out.push(Move::between(roles.source(), roles.destination())),
        _ => {
            solve(disks - 1, roles.toward_auxiliary(), out);
            out.push(Move::between(roles.source(), roles.destination()));
            solve(disks - 1, roles.from_auxiliary(), out);
        }
    }
}

// ---------------------------------------------------------------------------
// Lazy planning
// ---------------------------------------------------------------------------

/// A puzzle to be planned: disk count plus peg roles.
///
/// Cheap to copy; every call to [`Plan::moves`] starts the sequence over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    disks: u32,
    roles: Roles,
}

impl Plan {
    pub fn new(disks: u32, roles: Roles) -> Self {
        Self { disks, roles }
    }

    pub fn disks(&self) -> u32 {
        self.disks
    }

    pub fn roles(&self) -> Roles {
        self.roles
    }

    /// Total number of moves, `None` if it overflows a `u64`.
    pub fn len(&self) -> Option<u64> {
        move_count(self.disks)
    }

    pub fn is_empty(&self) -> bool {
        self.disks == 0
    }

    /// A fresh iterator over the planned moves.
    pub fn moves(&self) -> Moves {
        Moves::new(self.disks, self.roles)
    }
}

impl IntoIterator for Plan {
    type Item = Move;
    type IntoIter = Moves;

    fn into_iter(self) -> Moves {
        self.moves()
    }
}

/// A pending unit of work on the explicit stack.
#[derive(Debug, Clone, Copy)]
enum Frame {
    /// Move `disks` disks according to `roles`.
    Solve { disks: u32, roles: Roles },
    /// Emit the move of the largest disk of a sub-problem.
    Emit(Move),
}

/// Iterator over a plan's moves, in the same order as [`plan`].
///
/// The stack never holds more than `2n + 1` frames. Cloning captures the
/// current position, so a clone resumes where the original stood.
#[derive(Debug, Clone)]
pub struct Moves {
    stack: Vec<Frame>,
    remaining: Option<u64>,
}

impl Moves {
    fn new(disks: u32, roles: Roles) -> Self {
        Self {
            stack: vec![Frame::Solve { disks, roles }],
            remaining: move_count(disks),
        }
    }
}

impl Iterator for Moves {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        while let Some(frame) = self.stack.pop() {
            let mv = match frame {
                Frame::Emit(mv) => mv,
                Frame::Solve { disks: 0, .. } => continue,
                Frame::Solve { disks: 1, roles } => {
                    Move::between(roles.source(), roles.destination())
                }
                Frame::Solve { disks, roles } => {
                    // Pushed in reverse: first half runs first.
                    self.stack.push(Frame::Solve {
                        disks: disks - 1,
                        roles: roles.from_auxiliary(),
                    });
                    self.stack
                        .push(Frame::Emit(Move::between(roles.source(), roles.destination())));
                    self.stack.push(Frame::Solve {
                        disks: disks - 1,
                        roles: roles.toward_auxiliary(),
                    });
                    continue;
                }
            };
            if let Some(r) = self.remaining.as_mut() {
                *r -= 1;
            }
            return Some(mv);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining.and_then(|r| usize::try_from(r).ok()) {
            Some(r) => (r, Some(r)),
            None => (usize::MAX, None),
        }
    }
}

impl std::iter::FusedIterator for Moves {}
