//! Peg state engine.
//!
//! Owns the three peg stacks of one puzzle and applies moves one at a time,
//! rejecting any move that would take from an empty peg or put a disk on a
//! smaller one. The rule is enforced on every move, whether it came from the
//! planner or from outside.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Disk, Move, Peg, Roles};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// The stacks of all three pegs at one instant, each bottom to top.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(rename = "A")]
    a: Vec<Disk>,
    #[serde(rename = "B")]
    b: Vec<Disk>,
    #[serde(rename = "C")]
    c: Vec<Disk>,
}

impl Configuration {
    /// Build a configuration from disk sizes, bottom to top per peg.
    ///
    /// No validation happens here; see [`Configuration::check_invariants`].
    pub fn from_sizes(a: &[u32], b: &[u32], c: &[u32]) -> Self {
        let disks = |sizes: &[u32]| -> Vec<Disk> { sizes.iter().copied().map(Disk::new).collect() };
        Self {
            a: disks(a),
            b: disks(b),
            c: disks(c),
        }
    }

    /// The stack on `peg`, bottom to top.
    pub fn stack(&self, peg: Peg) -> &[Disk] {
        match peg {
            Peg::A => &self.a,
            Peg::B => &self.b,
            Peg::C => &self.c,
        }
    }

    fn stack_mut(&mut self, peg: Peg) -> &mut Vec<Disk> {
        match peg {
            Peg::A => &mut self.a,
            Peg::B => &mut self.b,
            Peg::C => &mut self.c,
        }
    }

    /// Disk sizes on `peg`, bottom to top.
    pub fn sizes(&self, peg: Peg) -> Vec<u32> {
        self.stack(peg).iter().map(|d| d.size()).collect()
    }

    /// The top disk of `peg`, if any.
    pub fn top(&self, peg: Peg) -> Option<Disk> {
        self.stack(peg).last().copied()
    }

    /// Total number of disks across all pegs.
    pub fn disk_count(&self) -> usize {
        self.a.len() + self.b.len() + self.c.len()
    }

    /// True when `peg` holds `disks..=1` and the other two pegs are empty.
    pub fn is_complete_on(&self, peg: Peg, disks: u32) -> bool {
        let stack = self.stack(peg);
        stack.len() == disks as usize
            && stack
                .iter()
                .zip((1..=disks).rev())
                .all(|(d, expected)| d.size() == expected)
            && Peg::ALL
                .iter()
                .filter(|p| **p != peg)
                .all(|p| self.stack(*p).is_empty())
    }

    /// Check the stacking rule on every peg and that disks `1..=disks`
    /// each appear exactly once.
    pub fn check_invariants(&self, disks: u32) -> Result<(), InvariantError> {
        let mut seen = vec![false; disks as usize];
        for peg in Peg::ALL {
            let stack = self.stack(peg);
            for pair in stack.windows(2) {
                if pair[0] <= pair[1] {
                    return Err(InvariantError::OutOfOrder {
                        peg,
                        upper: pair[1],
                        lower: pair[0],
                    });
                }
            }
            for disk in stack {
                let size = disk.size();
                if size == 0 || size > disks {
                    return Err(InvariantError::UnknownDisk { peg, disk: *disk });
                }
                let slot = &mut seen[size as usize - 1];
                if *slot {
                    return Err(InvariantError::Duplicate(*disk));
                }
                *slot = true;
            }
        }
        if let Some(missing) = seen.iter().position(|s| !s) {
            return Err(InvariantError::Missing(Disk::new(missing as u32 + 1)));
        }
        Ok(())
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, peg) in Peg::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{peg}:{:?}", self.sizes(*peg))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// A disk transfer that was actually performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub disk: Disk,
    pub from: Peg,
    pub to: Peg,
}

/// Immutable copy of the engine state handed to renderers and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub configuration: Configuration,
    pub moves_applied: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<Transfer>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A configuration that breaks the stacking rule or loses track of a disk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("peg {peg} has disk {upper} resting on disk {lower}")]
    OutOfOrder { peg: Peg, upper: Disk, lower: Disk },

    #[error("peg {peg} holds unknown disk {disk}")]
    UnknownDisk { peg: Peg, disk: Disk },

    #[error("disk {0} appears more than once")]
    Duplicate(Disk),

    #[error("disk {0} is missing")]
    Missing(Disk),
}

/// A move that cannot be applied to the current configuration.
///
/// Both variants carry the configuration as it stood before the move so the
/// caller can report the two pegs involved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("cannot apply {}: peg {} is empty ({})", .mv, .mv.from(), .configuration)]
    EmptySource {
        mv: Move,
        configuration: Configuration,
    },

    #[error(
        "cannot apply {}: disk {} would rest on smaller disk {} ({})",
        .mv, .disk, .top, .configuration
    )]
    IllegalStackOrder {
        mv: Move,
        disk: Disk,
        top: Disk,
        configuration: Configuration,
    },
}

impl EngineError {
    /// The move that was rejected.
    pub fn rejected_move(&self) -> Move {
        match self {
            Self::EmptySource { mv, .. } | Self::IllegalStackOrder { mv, .. } => *mv,
        }
    }

    /// The configuration the move was rejected against.
    pub fn configuration(&self) -> &Configuration {
        match self {
            Self::EmptySource { configuration, .. }
            | Self::IllegalStackOrder { configuration, .. } => configuration,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The peg state machine for one puzzle instance.
#[derive(Debug, Clone)]
pub struct Engine {
    roles: Roles,
    disks: u32,
    configuration: Configuration,
    moves_applied: u64,
    last: Option<Transfer>,
}

impl Engine {
    /// An engine with no disks; call [`Engine::initialize`] to load some.
    pub fn new(roles: Roles) -> Self {
        Self {
            roles,
            disks: 0,
            configuration: Configuration::default(),
            moves_applied: 0,
            last: None,
        }
    }

    /// An engine with `disks` disks stacked on the source peg.
    pub fn with_disks(disks: u32, roles: Roles) -> Self {
        let mut engine = Self::new(roles);
        engine.initialize(disks);
        engine
    }

    /// Reset to the starting configuration: `disks..=1` on the source peg,
    /// largest at the bottom, and a zero move counter.
    pub fn initialize(&mut self, disks: u32) {
        self.disks = disks;
        self.configuration = Configuration::default();
        self.configuration
            .stack_mut(self.roles.source())
            .extend((1..=disks).rev().map(Disk::new));
        self.moves_applied = 0;
        self.last = None;
        tracing::debug!(disks, source = %self.roles.source(), "engine initialized");
    }

    /// Apply one move.
    ///
    /// On error nothing changes: the configuration and the move counter are
    /// exactly as before the call.
    pub fn apply(&mut self, mv: Move) -> Result<Snapshot, EngineError> {
        let Some(disk) = self.configuration.top(mv.from()) else {
            return Err(EngineError::EmptySource {
                mv,
                configuration: self.configuration.clone(),
            });
        };

        if let Some(top) = self.configuration.top(mv.to()) {
            if top < disk {
                return Err(EngineError::IllegalStackOrder {
                    mv,
                    disk,
                    top,
                    configuration: self.configuration.clone(),
                });
            }
        }

        self.configuration.stack_mut(mv.from()).pop();
        self.configuration.stack_mut(mv.to()).push(disk);
        self.moves_applied += 1;
        self.last = Some(Transfer {
            disk,
            from: mv.from(),
            to: mv.to(),
        });

        tracing::debug!(
            step = self.moves_applied,
            disk = disk.size(),
            from = %mv.from(),
            to = %mv.to(),
            "applied move"
        );

        Ok(self.current())
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> Snapshot {
        Snapshot {
            configuration: self.configuration.clone(),
            moves_applied: self.moves_applied,
            last: self.last,
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn moves_applied(&self) -> u64 {
        self.moves_applied
    }

    pub fn disks(&self) -> u32 {
        self.disks
    }

    pub fn roles(&self) -> Roles {
        self.roles
    }

    /// All disks rest in order on the destination peg.
    pub fn is_terminal(&self) -> bool {
        self.configuration
            .is_complete_on(self.roles.destination(), self.disks)
    }
}
