//! Token detail modal

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::application::board::view::DetailView;

const MODAL_WIDTH: u16 = 44;
const MODAL_HEIGHT: u16 = 10;

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

fn field(label: &str, value: String, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {:<12}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, style),
    ])
}

/// Draw the detail modal over `area`
pub fn draw(frame: &mut Frame, detail: &DetailView, area: Rect) {
    let popup = centered(area, MODAL_WIDTH, MODAL_HEIGHT);
    let change_color = if detail.gaining { Color::Green } else { Color::Red };

    let mut lines = vec![
        Line::from(""),
        field("Price", detail.price.clone(), Style::default().add_modifier(Modifier::BOLD)),
        field("24h Change", detail.change.clone(), Style::default().fg(change_color)),
        field("Market Cap", detail.market_cap.clone(), Style::default()),
        field("24h Volume", detail.volume.clone(), Style::default()),
    ];
    if let Some(logo) = &detail.logo_url {
        lines.push(field("Logo", logo.clone(), Style::default().fg(Color::DarkGray)));
    }

    let modal = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ({}) ", detail.name, detail.symbol))
            .title_bottom(Line::from(" esc=close ").right_aligned()),
    );

    frame.render_widget(Clear, popup);
    frame.render_widget(modal, popup);
}
