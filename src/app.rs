use crate::models::{Status, Task};
use crate::scheduler::Scheduler;
use crate::ui::dialogs::AddTaskDialog;
use std::time::{Duration, Instant};

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Notification level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient message shown at the top of the screen
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: Instant,
}

impl Notification {
    /// Notifications disappear after three seconds
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= NOTIFICATION_TTL
    }
}

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigate the columns and run task commands
    Normal,
    /// Add-task dialog is open
    Dialog,
    /// Key binding overlay
    Help,
}

/// Panel shell state. The scheduler is borrowed for the lifetime of the
/// session; everything else here is presentation state.
pub struct App<'a> {
    pub scheduler: &'a mut Scheduler,
    pub mode: Mode,
    /// Focused column (0 = staged, 1 = active, 2 = finished)
    pub selected_column: usize,
    /// Selected row inside the focused column
    pub selected_task_index: usize,
    pub dialog: Option<AddTaskDialog>,
    pub notification: Option<Notification>,
}

impl<'a> App<'a> {
    pub fn new(scheduler: &'a mut Scheduler) -> Self {
        Self {
            scheduler,
            mode: Mode::Normal,
            selected_column: 0,
            selected_task_index: 0,
            dialog: None,
            notification: None,
        }
    }

    /// Handle one key press. Returns false when the app should quit.
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> bool {
        crate::input::handle_key_input(self, key)
    }

    pub fn selected_status(&self) -> Status {
        Status::from_column(self.selected_column).unwrap_or(Status::Staged)
    }

    /// Task under the cursor, if the focused column has any.
    pub fn selected_task(&self) -> Option<&Task> {
        self.scheduler
            .tasks_in(self.selected_status())
            .get(self.selected_task_index)
            .copied()
    }

    /// Keep the row cursor inside the focused column after its length changed.
    pub fn clamp_selection(&mut self) {
        let len = self.scheduler.tasks_in(self.selected_status()).len();
        self.selected_task_index = self.selected_task_index.min(len.saturating_sub(1));
    }

    pub fn show_notification(&mut self, message: String, level: NotificationLevel) {
        self.notification = Some(Notification {
            message,
            level,
            created_at: Instant::now(),
        });
    }

    pub fn clear_expired_notification(&mut self) {
        if let Some(ref notification) = self.notification {
            if notification.is_expired() {
                self.notification = None;
            }
        }
    }
}
