use crate::app::{App, Mode, NotificationLevel};
use crate::input::Command;
use crate::models::Status;
use crate::ui::dialogs::{AddTaskDialog, DialogAction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle one key press.
/// Returns false when the application should quit.
pub fn handle_key_input(app: &mut App, key: KeyEvent) -> bool {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return false;
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Dialog => handle_dialog_mode(app, key),
        Mode::Help => handle_help_mode(app, key),
    }
}

/// Map a key in normal mode to a command
pub fn match_key(key: KeyEvent) -> Option<Command> {
    let cmd = match key.code {
        KeyCode::Char('q') => Command::Quit,
        KeyCode::Char('j') | KeyCode::Down => Command::TaskDown,
        KeyCode::Char('k') | KeyCode::Up => Command::TaskUp,
        KeyCode::Char('h') | KeyCode::Left => Command::ColumnLeft,
        KeyCode::Char('l') | KeyCode::Right => Command::ColumnRight,
        KeyCode::Char('a') | KeyCode::Char('n') => Command::NewTask,
        KeyCode::Char('s') => Command::StartTask,
        KeyCode::Char('f') => Command::FinishTask,
        KeyCode::Enter => Command::Advance,
        KeyCode::Char('y') => Command::CopyTask,
        KeyCode::Char('?') => Command::ShowHelp,
        _ => return None,
    };
    Some(cmd)
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) -> bool {
    match match_key(key) {
        Some(Command::Quit) => false,
        Some(cmd) => {
            execute_command(app, cmd);
            true
        }
        None => true,
    }
}

fn handle_dialog_mode(app: &mut App, key: KeyEvent) -> bool {
    let Some(dialog) = app.dialog.as_mut() else {
        app.mode = Mode::Normal;
        return true;
    };

    match dialog.handle_key(key) {
        DialogAction::Continue => {}
        DialogAction::Cancel => close_dialog(app),
        DialogAction::Submit {
            description,
            estimate,
        } => {
            close_dialog(app);
            let id = app.scheduler.add_task(description, estimate);
            app.show_notification(
                format!("Added task [#{}] to staged tasks", id),
                NotificationLevel::Success,
            );
        }
    }
    true
}

fn handle_help_mode(app: &mut App, key: KeyEvent) -> bool {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
        app.mode = Mode::Normal;
    }
    true
}

fn close_dialog(app: &mut App) {
    app.dialog = None;
    app.mode = Mode::Normal;
}

/// Execute a normal-mode command
pub fn execute_command(app: &mut App, cmd: Command) {
    match cmd {
        Command::Quit => {}
        Command::TaskUp => {
            app.selected_task_index = app.selected_task_index.saturating_sub(1);
        }
        Command::TaskDown => {
            app.selected_task_index += 1;
            app.clamp_selection();
        }
        Command::ColumnLeft => {
            app.selected_column = app.selected_column.saturating_sub(1);
            app.clamp_selection();
        }
        Command::ColumnRight => {
            app.selected_column = (app.selected_column + 1).min(Status::ALL.len() - 1);
            app.clamp_selection();
        }
        Command::NewTask => {
            app.dialog = Some(AddTaskDialog::new());
            app.mode = Mode::Dialog;
        }
        Command::StartTask => start_selected(app),
        Command::FinishTask => finish_selected(app),
        Command::Advance => match app.selected_status() {
            Status::Staged => start_selected(app),
            Status::Active => finish_selected(app),
            Status::Finished => {}
        },
        Command::CopyTask => copy_selected(app),
        Command::ShowHelp => app.mode = Mode::Help,
    }
}

fn start_selected(app: &mut App) {
    if app.selected_status() != Status::Staged {
        app.show_notification(
            "Select a staged task to start".to_string(),
            NotificationLevel::Info,
        );
        return;
    }
    let Some(id) = app.selected_task().map(|t| t.id()) else {
        app.show_notification("No staged task selected".to_string(), NotificationLevel::Info);
        return;
    };

    match app.scheduler.start_task(id) {
        Ok(()) => app.show_notification(
            format!("Started task [#{}]", id),
            NotificationLevel::Success,
        ),
        Err(err) => app.show_notification(err.to_string(), NotificationLevel::Error),
    }
    app.clamp_selection();
}

fn finish_selected(app: &mut App) {
    if app.selected_status() != Status::Active {
        app.show_notification(
            "Select an active task to finish".to_string(),
            NotificationLevel::Info,
        );
        return;
    }
    let Some(id) = app.selected_task().map(|t| t.id()) else {
        app.show_notification("No active task selected".to_string(), NotificationLevel::Info);
        return;
    };

    match app.scheduler.finish_task(id) {
        Ok(receipt) => match receipt.log_failure {
            None => app.show_notification(
                format!(
                    "Finished task [#{}], logged to {}",
                    id,
                    app.scheduler.log().path().display()
                ),
                NotificationLevel::Success,
            ),
            Some(reason) => app.show_notification(
                format!("Finished task [#{}] but not logged: {}", id, reason),
                NotificationLevel::Warning,
            ),
        },
        Err(err) => app.show_notification(err.to_string(), NotificationLevel::Error),
    }
    app.clamp_selection();
}

fn copy_selected(app: &mut App) {
    let Some(summary) = app.selected_task().map(|t| t.render_summary()) else {
        app.show_notification("No task selected".to_string(), NotificationLevel::Info);
        return;
    };

    match copy_to_clipboard(&summary) {
        Ok(()) => app.show_notification(
            "Task copied to clipboard".to_string(),
            NotificationLevel::Success,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "clipboard copy failed");
            app.show_notification(format!("Copy failed: {}", e), NotificationLevel::Error)
        }
    }
}

#[cfg(feature = "clipboard")]
fn copy_to_clipboard(text: &str) -> anyhow::Result<()> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_string())?;
    Ok(())
}

#[cfg(not(feature = "clipboard"))]
fn copy_to_clipboard(_text: &str) -> anyhow::Result<()> {
    anyhow::bail!("built without clipboard support")
}
