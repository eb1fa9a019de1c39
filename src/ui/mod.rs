mod board;
pub mod dialogs;
mod help;
mod statusbar;

use crate::app::{App, Mode, Notification, NotificationLevel};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

/// Main render function
pub fn render(f: &mut Frame, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // board
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    board::render(f, main_chunks[0], app);
    statusbar::render(f, main_chunks[1], app);

    if let Some(dialog) = &app.dialog {
        dialogs::render_dialog(f, dialog);
    }

    if app.mode == Mode::Help {
        help::render(f, f.area());
    }

    if let Some(ref notification) = app.notification {
        render_notification(f, f.area(), notification);
    }
}

/// Notification bar across the top three rows
fn render_notification(f: &mut Frame, area: Rect, notification: &Notification) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph};

    let notification_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: area.height.min(3),
    };

    let (bg_color, fg_color, prefix) = match notification.level {
        NotificationLevel::Info => (Color::Blue, Color::White, "ℹ"),
        NotificationLevel::Success => (Color::Green, Color::White, "✓"),
        NotificationLevel::Warning => (Color::Yellow, Color::Black, "⚠"),
        NotificationLevel::Error => (Color::Red, Color::White, "✗"),
    };

    let content = Line::from(vec![
        Span::styled(
            format!(" {} ", prefix),
            Style::default().fg(fg_color).bg(bg_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(notification.message.as_str(), Style::default().fg(fg_color)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(bg_color))
        .style(Style::default().bg(bg_color));

    f.render_widget(Clear, notification_area);
    f.render_widget(Paragraph::new(content).block(block), notification_area);
}
