use crate::app::App;
use crate::models::{format_elapsed, format_timestamp, Status, Task};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the three stage columns
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let counts = app.scheduler.counts();
    let total = counts.staged + counts.active + counts.finished;
    let title = format!(" Job Scheduler ({}/{}) ", counts.finished, total);

    let block = Block::default()
        .title(title)
        .title_alignment(ratatui::layout::Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .border_type(ratatui::widgets::BorderType::Rounded);

    let inner = block.inner(area);
    f.render_widget(block, area);

    // Staged | Active | Finished
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .split(inner);

    for (status, column) in Status::ALL.into_iter().zip(columns.iter()) {
        render_column(f, *column, status, &app.scheduler.tasks_in(status), app);
    }
}

fn render_column(f: &mut Frame, area: Rect, status: Status, tasks: &[&Task], app: &App) {
    let is_column_focused = app.selected_column == status.column();

    let (border_color, title_style) = if is_column_focused {
        (Color::White, Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
    } else {
        (Color::DarkGray, Style::default().fg(Color::Gray))
    };

    let items: Vec<ListItem> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let is_selected = is_column_focused && i == app.selected_task_index;

            let style = if is_selected {
                Style::default()
                    .bg(Color::Rgb(41, 98, 218))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let selection_indicator = if is_selected {
                Span::styled("▶ ", Style::default().fg(Color::White))
            } else {
                Span::raw("  ")
            };

            let mut lines = vec![Line::from(vec![
                Span::raw(" "),
                selection_indicator,
                Span::styled(format!("#{} ", task.id()), Style::default().fg(stage_color(status))),
                Span::raw(task.description().to_string()),
            ])];
            lines.push(Line::from(Span::styled(
                format!("     {}", detail_line(task)),
                Style::default().fg(Color::Gray),
            )));

            ListItem::new(lines).style(style)
        })
        .collect();

    let title_with_count = format!(" {} ({}) ", status.label(), tasks.len());

    let list = List::new(items).block(
        Block::default()
            .title(title_with_count)
            .title_alignment(ratatui::layout::Alignment::Center)
            .title_style(title_style)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .border_type(ratatui::widgets::BorderType::Rounded),
    );

    f.render_widget(list, area);
}

/// Second line under each task: timing details for its stage
fn detail_line(task: &Task) -> String {
    match task.status() {
        Status::Staged => format!("est {} sec", task.estimated_duration_seconds()),
        Status::Active => format!(
            "est {} sec · started {}",
            task.estimated_duration_seconds(),
            format_timestamp(task.start_time())
        ),
        Status::Finished => format!(
            "est {} sec · actual {} · done {}",
            task.estimated_duration_seconds(),
            format_elapsed(task.actual_duration_seconds()),
            format_timestamp(task.finish_time())
        ),
    }
}

fn stage_color(status: Status) -> Color {
    match status {
        Status::Staged => Color::Cyan,
        Status::Active => Color::Yellow,
        Status::Finished => Color::Green,
    }
}
