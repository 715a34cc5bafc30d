//! UI widgets for the token board

pub mod modal;
pub mod table;

use std::time::Instant;

use chrono::Local;
use hypersockets::ConnectionState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::app::{App, FeedStatus};
use super::view::TableView;

/// Draw the main UI layout
pub fn draw(frame: &mut Frame, app: &App) {
    draw_board(frame, &app.view, &app.status(), Instant::now());
}

/// Draw the board from its parts; `now` drives the loading phase and flashes.
pub fn draw_board(frame: &mut Frame, view: &TableView, status: &FeedStatus, now: Instant) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Footer
        ])
        .split(area);

    draw_header(frame, status, chunks[0]);
    table::draw(frame, view, now, chunks[1]);
    draw_footer(frame, chunks[2]);

    if let Some(detail) = view.detail() {
        modal::draw(frame, &detail, area);
    }
}

fn state_color(state: ConnectionState) -> Color {
    match state {
        ConnectionState::Connected => Color::Green,
        ConnectionState::Connecting => Color::Yellow,
        ConnectionState::Disconnected => Color::DarkGray,
        ConnectionState::Error => Color::Red,
    }
}

fn draw_header(frame: &mut Frame, status: &FeedStatus, area: Rect) {
    let color = state_color(status.connection_state);

    let mut spans = vec![
        Span::raw(" Feed: "),
        Span::styled(status.connection_state.to_string(), Style::default().fg(color)),
        Span::raw(format!(" | Updates: {}", status.revision)),
    ];
    if let Some(error) = &status.last_error {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(error.to_string(), Style::default().fg(Color::Red)));
    }

    let clock = format!(" {} ", Local::now().format("%H:%M:%S"));
    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Token Board ")
            .title_top(Line::from(clock).right_aligned()),
    );

    frame.render_widget(header, area);
}

fn draw_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(
        " q=quit j/k=nav 1-5=sort (name/price/change/volume/cap) enter=details esc=close",
    )
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}
