use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::dialogs::centered_rect;

const BINDINGS: &[(&str, &str)] = &[
    ("h, ←", "previous column"),
    ("l, →", "next column"),
    ("j, ↓", "next task"),
    ("k, ↑", "previous task"),
    ("a, n", "add a task"),
    ("s", "start the selected staged task"),
    ("f", "finish the selected active task"),
    ("Enter", "start or finish, by column"),
    ("y", "copy task summary"),
    ("?", "toggle this help"),
    ("q, Ctrl+C", "quit"),
];

/// Render the key binding overlay
pub fn render(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keys (Esc or ? to close) ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Black));

    let mut lines = vec![
        Line::from(Span::styled(
            "Task lifecycle: Staged → Active → Finished",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(BINDINGS.iter().map(|(keys, action)| {
        Line::from(vec![
            Span::styled(format!("{:<12}", keys), Style::default().fg(Color::Cyan)),
            Span::raw(*action),
        ])
    }));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, popup_area);
}
