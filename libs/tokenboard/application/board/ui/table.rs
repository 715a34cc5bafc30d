//! Token table widget - sortable rows with price flashes

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::application::board::view::{LoadPhase, RowView, TableView, SKELETON_ROWS};
use crate::domain::{FlashDirection, SortConfig, SortDirection, SortKey};

const COLUMN_WIDTHS: [Constraint; 5] = [
    Constraint::Min(22),
    Constraint::Length(16),
    Constraint::Length(14),
    Constraint::Length(14),
    Constraint::Length(14),
];

/// `↕` for inactive columns, `↑`/`↓` for the active one.
pub fn sort_icon(config: SortConfig, key: SortKey) -> &'static str {
    if config.key != key {
        return "↕";
    }
    match config.direction {
        SortDirection::Asc => "↑",
        SortDirection::Desc => "↓",
    }
}

fn header_row(config: SortConfig) -> Row<'static> {
    let cells = SortKey::ALL.iter().map(|key| {
        let style = if config.key == *key {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Cell::from(format!("{} {}", key.label(), sort_icon(config, *key))).style(style)
    });
    Row::new(cells).height(1)
}

fn flash_style(flash: FlashDirection) -> Style {
    match flash {
        FlashDirection::Up => Style::default().fg(Color::Black).bg(Color::Green),
        FlashDirection::Down => Style::default().fg(Color::Black).bg(Color::Red),
        FlashDirection::None => Style::default(),
    }
}

fn token_row(row: &RowView) -> Row<'static> {
    let change_color = if row.gaining { Color::Green } else { Color::Red };

    let name = Line::from(vec![
        Span::styled(row.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {}", row.symbol), Style::default().fg(Color::DarkGray)),
    ]);

    Row::new(vec![
        Cell::from(name),
        Cell::from(row.price.clone()).style(flash_style(row.flash)),
        Cell::from(row.change.clone()).style(Style::default().fg(change_color)),
        Cell::from(row.volume.clone()),
        Cell::from(row.market_cap.clone()),
    ])
}

fn skeleton_row() -> Row<'static> {
    let bar = Style::default().fg(Color::DarkGray);
    Row::new(vec![
        Cell::from("░░░░░░░░░░░░").style(bar),
        Cell::from("░░░░░░░░").style(bar),
        Cell::from("░░░░░").style(bar),
        Cell::from("░░░░░░").style(bar),
        Cell::from("░░░░░░").style(bar),
    ])
}

/// Draw the token table, or skeleton rows while loading
pub fn draw(frame: &mut Frame, view: &TableView, now: Instant, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Tokens ");
    let header = header_row(view.sort_config());

    if view.phase(now) == LoadPhase::Loading {
        let rows = (0..SKELETON_ROWS).map(|_| skeleton_row());
        let table = Table::new(rows, COLUMN_WIDTHS).header(header).block(block);
        frame.render_widget(table, area);
        return;
    }

    let rows: Vec<Row> = view.rows(now).iter().map(token_row).collect();
    let table = Table::new(rows, COLUMN_WIDTHS)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::Rgb(40, 40, 60)))
        .highlight_symbol("> ");

    let mut state = TableState::default();
    if !view.is_empty() {
        state.select(Some(view.cursor()));
    }

    frame.render_stateful_widget(table, area, &mut state);
}
