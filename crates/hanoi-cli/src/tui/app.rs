//! TUI application state for a replay in progress.

use hanoi_core::{Disk, Peg, ReplayOutcome, Roles, Snapshot};

/// Where the replay is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Completed,
    Cancelled,
}

/// Application state for the TUI.
pub struct App {
    pub roles: Roles,
    pub disks: u32,
    pub total: Option<u64>,
    pub snapshot: Snapshot,
    pub phase: Phase,
}

impl App {
    pub fn new(roles: Roles, disks: u32, snapshot: Snapshot, total: Option<u64>) -> Self {
        Self {
            roles,
            disks,
            total,
            snapshot,
            phase: Phase::Running,
        }
    }

    pub fn update(&mut self, snapshot: &Snapshot) {
        self.snapshot = snapshot.clone();
    }

    pub fn finish(&mut self, outcome: &ReplayOutcome, snapshot: &Snapshot) {
        self.snapshot = snapshot.clone();
        self.phase = match outcome {
            ReplayOutcome::Completed { .. } => Phase::Completed,
            ReplayOutcome::Cancelled { .. } => Phase::Cancelled,
        };
    }

    /// `Moves: 5/15`, or just the count when the total is unknown.
    pub fn moves_label(&self) -> String {
        match self.total {
            Some(total) => format!("Moves: {}/{total}", self.snapshot.moves_applied),
            None => format!("Moves: {}", self.snapshot.moves_applied),
        }
    }

    /// Panel title naming the peg and its role, e.g. ` A (source) `.
    pub fn peg_title(&self, peg: Peg) -> String {
        let role = if peg == self.roles.source() {
            "source"
        } else if peg == self.roles.destination() {
            "destination"
        } else {
            "auxiliary"
        };
        format!(" {peg} ({role}) ")
    }

    pub fn status_text(&self) -> String {
        let last = match self.snapshot.last {
            Some(t) => format!("last: disk {} {} -> {}", t.disk, t.from, t.to),
            None => "no moves yet".to_string(),
        };
        match self.phase {
            Phase::Running => format!("{last}  |  q/Esc to stop"),
            Phase::Completed => format!("Solved.  {last}  |  q/Esc to exit"),
            Phase::Cancelled => format!("Stopped.  {last}"),
        }
    }
}

/// Bar width for `disk` in a column `max_width` cells wide: each size step
/// gets an equal share of the column, so the largest disk fills it.
pub fn bar_width(disk: Disk, disks: u32, max_width: u16) -> u16 {
    if disks == 0 {
        return 0;
    }
    let unit = (u32::from(max_width) / disks).max(1);
    let width = unit.saturating_mul(disk.size()).min(u32::from(max_width));
    u16::try_from(width).unwrap_or(max_width).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hanoi_core::Engine;

    #[test]
    fn bars_scale_with_size() {
        assert_eq!(bar_width(Disk::new(1), 4, 20), 5);
        assert_eq!(bar_width(Disk::new(4), 4, 20), 20);
        // Too many disks for the column: every bar is at least one cell.
        assert_eq!(bar_width(Disk::new(1), 30, 10), 1);
        assert_eq!(bar_width(Disk::new(30), 30, 10), 10);
    }

    #[test]
    fn labels_follow_the_snapshot() {
        let mut engine = Engine::with_disks(2, Roles::STANDARD);
        let mut app = App::new(Roles::STANDARD, 2, engine.current(), Some(3));
        assert_eq!(app.moves_label(), "Moves: 0/3");
        assert_eq!(app.status_text(), "no moves yet  |  q/Esc to stop");

        let mv = hanoi_core::Move::new(Peg::A, Peg::B).unwrap();
        app.update(&engine.apply(mv).unwrap());
        assert_eq!(app.moves_label(), "Moves: 1/3");
        assert!(app.status_text().starts_with("last: disk 1 A -> B"));

        app.finish(&ReplayOutcome::Cancelled { moves_applied: 1 }, &engine.current());
        assert_eq!(app.phase, Phase::Cancelled);
    }

    #[test]
    fn peg_titles_name_roles() {
        let roles = Roles::new(Peg::C, Peg::A, Peg::B).unwrap();
        let app = App::new(roles, 0, Engine::new(roles).current(), None);
        assert_eq!(app.peg_title(Peg::C), " C (source) ");
        assert_eq!(app.peg_title(Peg::A), " A (auxiliary) ");
        assert_eq!(app.peg_title(Peg::B), " B (destination) ");
        assert_eq!(app.moves_label(), "Moves: 0");
    }
}
