use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_textarea::{CursorMove, TextArea};

/// Which input of the add-task dialog has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogField {
    Description,
    Estimate,
}

/// Dialog outcome after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogAction {
    Continue,
    Cancel,
    Submit { description: String, estimate: i64 },
}

/// Two-field form collecting a description and an estimate in seconds.
pub struct AddTaskDialog {
    description: TextArea<'static>,
    estimate: TextArea<'static>,
    focus: DialogField,
    error: Option<String>,
}

impl AddTaskDialog {
    pub fn new() -> Self {
        let mut description = single_line("Task description");
        let mut estimate = single_line("Estimate (seconds)");
        description.set_cursor_style(focused_cursor());
        estimate.set_cursor_style(Style::default());

        Self {
            description,
            estimate,
            focus: DialogField::Description,
            error: None,
        }
    }

    pub fn focus(&self) -> DialogField {
        self.focus
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn description_text(&self) -> String {
        self.description.lines().join(" ")
    }

    pub fn estimate_text(&self) -> String {
        self.estimate.lines().join("")
    }

    /// Route a key to the focused field. Enter validates and submits.
    pub fn handle_key(&mut self, key: KeyEvent) -> DialogAction {
        match key.code {
            KeyCode::Esc => return DialogAction::Cancel,
            KeyCode::Enter => return self.submit(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.toggle_focus();
                return DialogAction::Continue;
            }
            _ => {}
        }

        let field = match self.focus {
            DialogField::Description => &mut self.description,
            DialogField::Estimate => &mut self.estimate,
        };
        match key.code {
            KeyCode::Char(c) => field.insert_char(c),
            KeyCode::Backspace => {
                field.delete_char();
            }
            KeyCode::Delete => {
                field.delete_next_char();
            }
            KeyCode::Left => field.move_cursor(CursorMove::Back),
            KeyCode::Right => field.move_cursor(CursorMove::Forward),
            KeyCode::Home => field.move_cursor(CursorMove::Head),
            KeyCode::End => field.move_cursor(CursorMove::End),
            _ => {}
        }
        self.error = None;
        DialogAction::Continue
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            DialogField::Description => DialogField::Estimate,
            DialogField::Estimate => DialogField::Description,
        };
        let (focused, other) = match self.focus {
            DialogField::Description => (&mut self.description, &mut self.estimate),
            DialogField::Estimate => (&mut self.estimate, &mut self.description),
        };
        focused.set_cursor_style(focused_cursor());
        other.set_cursor_style(Style::default());
    }

    /// Empty descriptions and non-integer estimates never reach the scheduler.
    fn submit(&mut self) -> DialogAction {
        let description = self.description_text().trim().to_string();
        if description.is_empty() {
            self.error = Some("Please enter a description".to_string());
            return DialogAction::Continue;
        }

        match self.estimate_text().trim().parse::<i64>() {
            Ok(estimate) => DialogAction::Submit {
                description,
                estimate,
            },
            Err(_) => {
                self.error = Some("Estimate must be a whole number of seconds".to_string());
                DialogAction::Continue
            }
        }
    }
}

impl Default for AddTaskDialog {
    fn default() -> Self {
        Self::new()
    }
}

fn single_line(placeholder: &str) -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_placeholder_text(placeholder.to_string());
    textarea.set_cursor_line_style(Style::default());
    textarea.set_style(
        Style::default()
            .fg(Color::Rgb(236, 239, 244))
            .bg(Color::Rgb(46, 52, 64)),
    );
    textarea
}

fn focused_cursor() -> Style {
    Style::default().bg(Color::Rgb(136, 192, 208)).fg(Color::Rgb(46, 52, 64))
}

/// Render the add-task dialog centered over the board
pub fn render_dialog(f: &mut Frame, dialog: &AddTaskDialog) {
    let area = centered_rect(60, 40, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title("  Add Task  ")
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(76, 86, 106)))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Rgb(46, 52, 64)));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // description
            Constraint::Length(3), // estimate
            Constraint::Length(1), // validation message
            Constraint::Min(1),    // hints
        ])
        .split(inner);

    render_field(
        f,
        chunks[0],
        "Description",
        &dialog.description,
        dialog.focus == DialogField::Description,
    );
    render_field(
        f,
        chunks[1],
        "Estimate (sec)",
        &dialog.estimate,
        dialog.focus == DialogField::Estimate,
    );

    if let Some(error) = dialog.error() {
        let message = Paragraph::new(Line::from(vec![Span::styled(
            format!("✗ {}", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )]));
        f.render_widget(message, chunks[2]);
    }

    let hints = Paragraph::new("Tab switch field · Enter add · Esc cancel")
        .style(Style::default().fg(Color::Rgb(129, 161, 193)));
    f.render_widget(hints, chunks[3]);
}

fn render_field(f: &mut Frame, area: Rect, title: &str, textarea: &TextArea<'static>, focused: bool) {
    let border = if focused {
        Color::Rgb(136, 192, 208)
    } else {
        Color::Rgb(76, 86, 106)
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .border_type(ratatui::widgets::BorderType::Rounded);

    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(textarea, inner);
}

/// A rect of the given percentage size centered inside `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
