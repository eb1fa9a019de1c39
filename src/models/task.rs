use chrono::{DateTime, Local, SubsecRound};
use mockable::Clock;
use thiserror::Error;

use super::status::Status;

pub type TaskId = u64;

/// Placeholder for an absent timestamp.
pub const NOT_AVAILABLE: &str = "N/A";

/// Calendar layout used by the durable log and the panel views.
const CALENDAR_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// ctime-style layout used by the one-line summary.
const SUMMARY_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// A task was asked to move to a stage it cannot reach from where it is.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Task [#{id}] cannot move from {from} to {to}")]
pub struct TransitionError {
    pub id: TaskId,
    pub from: Status,
    pub to: Status,
}

/// One unit of trackable work.
///
/// Identity, description and estimate are fixed at creation. The status and
/// the two timestamps only change through [`Task::start`] and
/// [`Task::finish`], which the scheduler drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    description: String,
    estimated_duration_seconds: i64,
    status: Status,
    start_time: Option<DateTime<Local>>,
    finish_time: Option<DateTime<Local>>,
}

impl Task {
    pub fn new(id: TaskId, description: String, estimated_duration_seconds: i64) -> Self {
        Self {
            id,
            description,
            estimated_duration_seconds,
            status: Status::Staged,
            start_time: None,
            finish_time: None,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn estimated_duration_seconds(&self) -> i64 {
        self.estimated_duration_seconds
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn start_time(&self) -> Option<DateTime<Local>> {
        self.start_time
    }

    pub fn finish_time(&self) -> Option<DateTime<Local>> {
        self.finish_time
    }

    /// Enter `Active` and record the start time. Only valid from `Staged`.
    pub(crate) fn start(&mut self, clock: &dyn Clock) -> Result<(), TransitionError> {
        self.check_transition(Status::Active)?;
        self.status = Status::Active;
        self.start_time = Some(stamp(clock));
        Ok(())
    }

    /// Enter `Finished` and record the finish time. Only valid from `Active`.
    pub(crate) fn finish(&mut self, clock: &dyn Clock) -> Result<(), TransitionError> {
        self.check_transition(Status::Finished)?;
        self.status = Status::Finished;
        self.finish_time = Some(stamp(clock));
        Ok(())
    }

    /// Undo a finish whose log record could not be written.
    pub(crate) fn reopen(&mut self) {
        if self.status == Status::Finished {
            self.status = Status::Active;
            self.finish_time = None;
        }
    }

    fn check_transition(&self, to: Status) -> Result<(), TransitionError> {
        if to.predecessor() == Some(self.status) {
            Ok(())
        } else {
            Err(TransitionError {
                id: self.id,
                from: self.status,
                to,
            })
        }
    }

    /// Elapsed whole seconds between start and finish, or 0 when either is missing.
    pub fn actual_duration_seconds(&self) -> i64 {
        match (self.start_time, self.finish_time) {
            (Some(start), Some(finish)) => (finish - start).num_seconds(),
            _ => 0,
        }
    }

    /// Fixed-format line with id, description, status, estimate and times.
    pub fn render_summary(&self) -> String {
        format!(
            "[#{}] {} | Status: {} | Estimate: {} sec | Start: {} | Finish: {}",
            self.id,
            self.description,
            self.status,
            self.estimated_duration_seconds,
            format_with(self.start_time, SUMMARY_FORMAT),
            format_with(self.finish_time, SUMMARY_FORMAT),
        )
    }

    #[cfg(test)]
    pub(crate) fn with_times(
        mut self,
        start_time: Option<DateTime<Local>>,
        finish_time: Option<DateTime<Local>>,
    ) -> Self {
        self.status = match (start_time, finish_time) {
            (None, _) => Status::Staged,
            (Some(_), None) => Status::Active,
            (Some(_), Some(_)) => Status::Finished,
        };
        self.start_time = start_time;
        self.finish_time = finish_time;
        self
    }
}

/// Current local time cut to whole seconds, the resolution the log records.
fn stamp(clock: &dyn Clock) -> DateTime<Local> {
    clock.local().trunc_subsecs(0)
}

/// `YYYY-MM-DD HH:MM:SS`, or `N/A` when absent.
pub fn format_timestamp(time: Option<DateTime<Local>>) -> String {
    format_with(time, CALENDAR_FORMAT)
}

/// Seconds plus a minutes/seconds breakdown, e.g. `125 s (2 m 5 s)`.
pub fn format_elapsed(seconds: i64) -> String {
    format!("{} s ({} m {} s)", seconds, seconds / 60, seconds % 60)
}

fn format_with(time: Option<DateTime<Local>>, layout: &str) -> String {
    time.map(|t| t.format(layout).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use crate::models::testing::ScriptedClock;
    use mockable::DefaultClock;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, h, m, s).unwrap()
    }

    #[test]
    fn test_new_task_is_staged_without_times() {
        let task = Task::new(7, "Write report".to_string(), 3600);
        assert_eq!(task.status(), Status::Staged);
        assert_eq!(task.start_time(), None);
        assert_eq!(task.finish_time(), None);
        assert_eq!(task.actual_duration_seconds(), 0);
    }

    #[test]
    fn test_start_then_finish_records_both_times() {
        let clock = DefaultClock;
        let mut task = Task::new(1, "Deploy".to_string(), 60);

        task.start(&clock).unwrap();
        assert_eq!(task.status(), Status::Active);
        assert!(task.start_time().is_some());
        assert!(task.finish_time().is_none());

        task.finish(&clock).unwrap();
        assert_eq!(task.status(), Status::Finished);
        assert!(task.finish_time().unwrap() >= task.start_time().unwrap());
        assert!(task.actual_duration_seconds() >= 0);
    }

    #[test]
    fn test_transitions_reject_reentry_and_skips() {
        let clock = DefaultClock;
        let mut task = Task::new(3, "Skip".to_string(), 10);

        let err = task.finish(&clock).unwrap_err();
        assert_eq!(err.from, Status::Staged);
        assert_eq!(err.to, Status::Finished);

        task.start(&clock).unwrap();
        let first_start = task.start_time();
        assert!(task.start(&clock).is_err());
        assert_eq!(task.start_time(), first_start);
    }

    #[test]
    fn test_reopen_clears_finish_time() {
        let mut task =
            Task::new(2, "Undo".to_string(), 5).with_times(Some(at(9, 0, 0)), Some(at(9, 1, 0)));
        task.reopen();
        assert_eq!(task.status(), Status::Active);
        assert_eq!(task.finish_time(), None);
        assert_eq!(task.start_time(), Some(at(9, 0, 0)));
    }

    #[test]
    fn test_actual_duration() {
        let start = at(10, 0, 0);
        let task = Task::new(1, "Timed".to_string(), 100)
            .with_times(Some(start), Some(start + Duration::seconds(125)));
        assert_eq!(task.actual_duration_seconds(), 125);
        assert_eq!(format_elapsed(task.actual_duration_seconds()), "125 s (2 m 5 s)");
    }

    #[test]
    fn test_stamps_drop_subseconds() {
        let start = at(10, 0, 0) + Duration::milliseconds(900);
        let finish = at(10, 0, 1) + Duration::milliseconds(100);
        let clock = ScriptedClock::new([start, finish]);
        let mut task = Task::new(1, "x".to_string(), 1);

        task.start(&clock).unwrap();
        task.finish(&clock).unwrap();

        assert_eq!(task.start_time(), Some(at(10, 0, 0)));
        assert_eq!(task.finish_time(), Some(at(10, 0, 1)));
        assert_eq!(task.actual_duration_seconds(), 1);
    }

    #[test]
    fn test_render_summary_staged() {
        let task = Task::new(4, "Review PR".to_string(), -30);
        assert_eq!(
            task.render_summary(),
            "[#4] Review PR | Status: Staged | Estimate: -30 sec | Start: N/A | Finish: N/A"
        );
    }

    #[test]
    fn test_render_summary_with_times() {
        let task = Task::new(5, "Ship".to_string(), 10).with_times(Some(at(8, 5, 9)), None);
        let summary = task.render_summary();
        assert!(summary.contains("Status: Active"));
        assert!(summary.contains("Start: Fri Mar 14 08:05:09 2025"));
        assert!(summary.ends_with("Finish: N/A"));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(Some(at(23, 4, 5))), "2025-03-14 23:04:05");
        assert_eq!(format_timestamp(None), "N/A");
    }
}
