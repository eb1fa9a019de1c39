use crate::app::{App, Mode};
use crate::scheduler::PersistenceMode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the status bar
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mode_text = match app.mode {
        Mode::Normal => ("NORMAL", Color::Green),
        Mode::Dialog => ("ADD", Color::Magenta),
        Mode::Help => ("HELP", Color::Blue),
    };

    let persistence = match app.scheduler.mode() {
        PersistenceMode::BestEffort => "best-effort",
        PersistenceMode::Strict => "strict",
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode_text.0),
            Style::default()
                .fg(Color::Black)
                .bg(mode_text.1)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " log: {} ({}) | a add · s start · f finish · ? help · q quit ",
            app.scheduler.log().path().display(),
            persistence
        )),
    ]);

    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));

    f.render_widget(paragraph, area);
}
