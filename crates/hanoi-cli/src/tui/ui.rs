//! TUI rendering using ratatui.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use hanoi_core::Peg;

use super::app::{App, Phase, bar_width};

const DISK_COLORS: [Color; 6] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
];

/// Render the whole screen.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // move counter
            Constraint::Min(3),    // pegs
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_pegs(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(app.moves_label())
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title(" Tower of Hanoi "));
    f.render_widget(header, area);
}

fn render_pegs(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (peg, column) in Peg::ALL.into_iter().zip(columns.iter()) {
        render_peg(f, app, peg, *column);
    }
}

fn render_peg(f: &mut Frame, app: &App, peg: Peg, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(app.peg_title(peg));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let stack = app.snapshot.configuration.stack(peg);
    let height = usize::from(inner.height);
    let max_width = inner.width.saturating_sub(2);

    // Top of the column first: empty rod, then disks from the top down.
    let mut lines: Vec<Line> = Vec::with_capacity(height);
    let padding = height.saturating_sub(stack.len());
    for _ in 0..padding {
        lines.push(Line::from(Span::styled("│", Style::default().fg(Color::DarkGray))));
    }
    for disk in stack.iter().rev().take(height) {
        let width = usize::from(bar_width(*disk, app.disks, max_width));
        let color = DISK_COLORS[(disk.size() as usize).saturating_sub(1) % DISK_COLORS.len()];
        lines.push(Line::from(Span::styled(
            "█".repeat(width),
            Style::default().fg(color),
        )));
    }

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let (label, color) = match app.phase {
        Phase::Running => ("Running", Color::Blue),
        Phase::Completed => ("Solved", Color::Green),
        Phase::Cancelled => ("Stopped", Color::Red),
    };

    let bar = Line::from(vec![
        Span::styled(
            format!(" {label} "),
            Style::default().bg(color).fg(Color::White),
        ),
        Span::raw("  "),
        Span::raw(app.status_text()),
    ]);

    f.render_widget(Paragraph::new(bar), area);
}
