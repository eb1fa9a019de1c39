//! Task registry: owns every task, assigns ids and moves tasks between the
//! staged, active and finished collections.

mod error;

pub use error::SchedulerError;

use std::collections::HashMap;

use mockable::{Clock, DefaultClock};

use crate::fs::FinishedLog;
use crate::models::{Status, Task, TaskId};

/// What happens to a finish when its log record cannot be written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PersistenceMode {
    /// Keep the task finished and report the gap.
    #[default]
    BestEffort,
    /// Roll the task back to active and return an error.
    Strict,
}

/// Result of a successful [`Scheduler::finish_task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishReceipt {
    pub id: TaskId,
    pub actual_seconds: i64,
    /// `None` when the record reached the durable log.
    pub log_failure: Option<String>,
}

/// Per-stage task counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub staged: usize,
    pub active: usize,
    pub finished: usize,
}

pub struct Scheduler {
    /// Every task ever created, keyed by id.
    tasks: HashMap<TaskId, Task>,
    staged: Vec<TaskId>,
    active: Vec<TaskId>,
    finished: Vec<TaskId>,
    next_id: TaskId,
    log: FinishedLog,
    mode: PersistenceMode,
    clock: Box<dyn Clock>,
}

impl Scheduler {
    pub fn new(log: FinishedLog) -> Self {
        Self::with_clock(log, Box::new(DefaultClock))
    }

    pub fn with_clock(log: FinishedLog, clock: Box<dyn Clock>) -> Self {
        Self {
            tasks: HashMap::new(),
            staged: Vec::new(),
            active: Vec::new(),
            finished: Vec::new(),
            next_id: 1,
            log,
            mode: PersistenceMode::default(),
            clock,
        }
    }

    pub fn with_mode(mut self, mode: PersistenceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> PersistenceMode {
        self.mode
    }

    pub fn log(&self) -> &FinishedLog {
        &self.log
    }

    /// Create a staged task and return its id. Never fails; the description
    /// and estimate are taken as given.
    pub fn add_task(&mut self, description: impl Into<String>, estimate: i64) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;

        let task = Task::new(id, description.into(), estimate);
        tracing::info!(task_id = id, estimate, "task added to staged");
        self.tasks.insert(id, task);
        self.staged.push(id);
        id
    }

    /// Move a staged task to active and stamp its start time.
    pub fn start_task(&mut self, id: TaskId) -> Result<(), SchedulerError> {
        let position = self.position(Status::Staged, id)?;
        let task = self.tasks.get_mut(&id).ok_or(SchedulerError::NotFound {
            id,
            stage: Status::Staged,
        })?;
        task.start(self.clock.as_ref())?;

        self.staged.remove(position);
        self.active.push(id);
        tracing::info!(task_id = id, "task started");
        Ok(())
    }

    /// Move an active task to finished, stamp its finish time and append it
    /// to the durable log.
    ///
    /// In [`PersistenceMode::BestEffort`] a failed append leaves the task
    /// finished and is reported through [`FinishReceipt::log_failure`]. In
    /// [`PersistenceMode::Strict`] the task goes back to its place in the
    /// active list and [`SchedulerError::Persistence`] is returned.
    ///
    /// The record goes out in a single `write_all`, but a write that fails
    /// part way can still leave a fragment in the file. Rolling back in strict
    /// mode does not remove it, so a retried finish appends a second row.
    pub fn finish_task(&mut self, id: TaskId) -> Result<FinishReceipt, SchedulerError> {
        let position = self.position(Status::Active, id)?;
        let task = self.tasks.get_mut(&id).ok_or(SchedulerError::NotFound {
            id,
            stage: Status::Active,
        })?;
        task.finish(self.clock.as_ref())?;

        let actual_seconds = task.actual_duration_seconds();
        let log_failure = match self.log.append(task) {
            Ok(()) => None,
            Err(err) if self.mode == PersistenceMode::Strict => {
                task.reopen();
                tracing::error!(task_id = id, error = %err, "finish rolled back, log write failed");
                return Err(SchedulerError::Persistence { id, source: err });
            }
            Err(err) => {
                tracing::warn!(task_id = id, error = %err, "task finished but not logged");
                Some(err.to_string())
            }
        };

        self.active.remove(position);
        self.finished.push(id);
        tracing::info!(task_id = id, actual_seconds, "task finished");

        Ok(FinishReceipt {
            id,
            actual_seconds,
            log_failure,
        })
    }

    pub fn staged(&self) -> Vec<&Task> {
        self.collect(&self.staged)
    }

    pub fn active(&self) -> Vec<&Task> {
        self.collect(&self.active)
    }

    pub fn finished(&self) -> Vec<&Task> {
        self.collect(&self.finished)
    }

    pub fn tasks_in(&self, status: Status) -> Vec<&Task> {
        self.collect(self.ids(status))
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn counts(&self) -> Counts {
        Counts {
            staged: self.staged.len(),
            active: self.active.len(),
            finished: self.finished.len(),
        }
    }

    fn ids(&self, status: Status) -> &[TaskId] {
        match status {
            Status::Staged => &self.staged,
            Status::Active => &self.active,
            Status::Finished => &self.finished,
        }
    }

    fn position(&self, status: Status, id: TaskId) -> Result<usize, SchedulerError> {
        self.ids(status)
            .iter()
            .position(|&candidate| candidate == id)
            .ok_or(SchedulerError::NotFound { id, stage: status })
    }

    fn collect(&self, ids: &[TaskId]) -> Vec<&Task> {
        ids.iter().filter_map(|id| self.tasks.get(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::testing::ScriptedClock;
    use chrono::{DateTime, Duration, Local, TimeZone};
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 2, h, m, s).unwrap()
    }

    fn scripted(dir: &TempDir, times: Vec<DateTime<Local>>) -> Scheduler {
        Scheduler::with_clock(
            FinishedLog::new(dir.path().join("finished_tasks.csv")),
            Box::new(ScriptedClock::new(times)),
        )
    }

    fn scheduler(dir: &TempDir) -> Scheduler {
        Scheduler::new(FinishedLog::new(dir.path().join("finished_tasks.csv")))
    }

    fn broken_log(dir: &TempDir) -> FinishedLog {
        FinishedLog::new(dir.path().join("missing").join("finished_tasks.csv"))
    }

    fn ids(tasks: Vec<&Task>) -> Vec<TaskId> {
        tasks.into_iter().map(Task::id).collect()
    }

    fn assert_single_membership(s: &Scheduler) {
        let mut seen = HashSet::new();
        for status in Status::ALL {
            for task in s.tasks_in(status) {
                assert_eq!(task.status(), status);
                assert!(seen.insert(task.id()), "task {} listed twice", task.id());
            }
        }
        assert_eq!(seen.len(), s.tasks.len());
    }

    #[test]
    fn test_ids_increase_and_never_repeat() {
        let dir = TempDir::new().unwrap();
        let mut s = scheduler(&dir);

        let first = s.add_task("a", 1);
        let second = s.add_task("b", 2);
        s.start_task(first).unwrap();
        s.finish_task(first).unwrap();
        let third = s.add_task("c", 3);

        assert_eq!((first, second, third), (1, 2, 3));
    }

    #[test]
    fn test_write_report_scenario() {
        let dir = TempDir::new().unwrap();
        let mut s = scheduler(&dir);

        let id = s.add_task("Write report", 3600);
        assert_eq!(id, 1);
        let staged = s.staged();
        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].status(), Status::Staged);

        s.start_task(1).unwrap();
        assert!(s.staged().is_empty());
        let active = s.active();
        assert_eq!(ids(active.clone()), vec![1]);
        assert!(active[0].start_time().is_some());
        assert!(active[0].finish_time().is_none());

        let receipt = s.finish_task(1).unwrap();
        assert!(receipt.log_failure.is_none());
        assert!(receipt.actual_seconds >= 0);
        let finished = s.finished();
        assert_eq!(ids(finished.clone()), vec![1]);
        assert!(finished[0].start_time().is_some());
        assert!(finished[0].finish_time().is_some());

        let err = s.finish_task(1).unwrap_err();
        assert!(err.is_not_found());

        let content = std::fs::read_to_string(s.log().path()).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.lines().nth(1).unwrap().starts_with("1,Write report,3600,"));
        assert_single_membership(&s);
    }

    #[test]
    fn test_start_unknown_id_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut s = scheduler(&dir);

        let err = s.start_task(999).unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::NotFound {
                id: 999,
                stage: Status::Staged
            }
        ));
        assert_eq!(s.counts(), Counts::default());
    }

    #[test]
    fn test_finish_before_start_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut s = scheduler(&dir);
        let id = s.add_task("not yet", 10);

        let err = s.finish_task(id).unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::NotFound {
                stage: Status::Active,
                ..
            }
        ));
        assert_eq!(ids(s.staged()), vec![id]);
        assert!(s.active().is_empty());
        assert!(s.finished().is_empty());
        assert!(!s.log().path().exists());
    }

    #[test]
    fn test_start_twice_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut s = scheduler(&dir);
        let id = s.add_task("once", 10);
        s.start_task(id).unwrap();
        let started_at = s.get(id).unwrap().start_time();

        assert!(s.start_task(id).unwrap_err().is_not_found());
        assert_eq!(s.get(id).unwrap().start_time(), started_at);
    }

    #[test]
    fn test_lists_keep_insertion_order() {
        let dir = TempDir::new().unwrap();
        let mut s = scheduler(&dir);
        for n in 1..=5 {
            s.add_task(format!("task {}", n), n);
        }
        s.start_task(4).unwrap();
        s.start_task(2).unwrap();
        s.finish_task(2).unwrap();

        assert_eq!(ids(s.staged()), vec![1, 3, 5]);
        assert_eq!(ids(s.active()), vec![4]);
        assert_eq!(ids(s.finished()), vec![2]);
        assert_single_membership(&s);
    }

    #[test]
    fn test_accepts_any_estimate() {
        let dir = TempDir::new().unwrap();
        let mut s = scheduler(&dir);
        let zero = s.add_task("", 0);
        let negative = s.add_task("negative", -5);
        assert_eq!(s.get(zero).unwrap().estimated_duration_seconds(), 0);
        assert_eq!(s.get(negative).unwrap().estimated_duration_seconds(), -5);
    }

    #[test]
    fn test_best_effort_keeps_finish_when_log_fails() {
        let dir = TempDir::new().unwrap();
        let mut s = Scheduler::new(broken_log(&dir));
        let id = s.add_task("unlogged", 5);
        s.start_task(id).unwrap();

        let receipt = s.finish_task(id).unwrap();
        assert!(receipt.log_failure.is_some());
        assert_eq!(ids(s.finished()), vec![id]);
        assert!(s.active().is_empty());
        assert_eq!(s.get(id).unwrap().status(), Status::Finished);
    }

    #[test]
    fn test_strict_rolls_back_when_log_fails() {
        let dir = TempDir::new().unwrap();
        let mut s = Scheduler::new(broken_log(&dir)).with_mode(PersistenceMode::Strict);
        for n in 1..=3 {
            s.add_task(format!("t{}", n), 1);
            s.start_task(n).unwrap();
        }

        let err = s.finish_task(2).unwrap_err();
        assert!(matches!(err, SchedulerError::Persistence { id: 2, .. }));
        assert_eq!(ids(s.active()), vec![1, 2, 3]);
        assert!(s.finished().is_empty());
        let task = s.get(2).unwrap();
        assert_eq!(task.status(), Status::Active);
        assert!(task.finish_time().is_none());
        assert_single_membership(&s);
    }

    #[test]
    fn test_strict_finishes_normally_when_log_works() {
        let dir = TempDir::new().unwrap();
        let mut s = scheduler(&dir).with_mode(PersistenceMode::Strict);
        let id = s.add_task("fine", 1);
        s.start_task(id).unwrap();
        assert!(s.finish_task(id).unwrap().log_failure.is_none());
        assert_eq!(s.log().read_history().unwrap().len(), 1);
    }

    #[test]
    fn test_log_records_follow_finish_order() {
        let dir = TempDir::new().unwrap();
        let mut s = scheduler(&dir);
        for n in 1..=3 {
            s.add_task(format!("job {}", n), 1);
            s.start_task(n).unwrap();
        }
        for id in [3, 1, 2] {
            s.finish_task(id).unwrap();
        }

        let history = s.log().read_history().unwrap();
        let logged: Vec<TaskId> = history.iter().map(|r| r.id).collect();
        assert_eq!(logged, vec![3, 1, 2]);
    }

    #[test]
    fn test_fixed_clock_gives_exact_duration_and_row() {
        let dir = TempDir::new().unwrap();
        let mut s = scripted(&dir, vec![at(14, 30, 0), at(15, 31, 10)]);
        let id = s.add_task("Write report", 3600);
        s.start_task(id).unwrap();

        let receipt = s.finish_task(id).unwrap();
        assert_eq!(receipt.actual_seconds, 3670);

        let content = std::fs::read_to_string(s.log().path()).unwrap();
        assert_eq!(
            content.lines().nth(1),
            Some("1,Write report,3600,2025-06-02 14:30:00,2025-06-02 15:31:10,3670")
        );
    }

    #[test]
    fn test_logged_row_agrees_with_its_timestamps() {
        let dir = TempDir::new().unwrap();
        let mut s = scripted(
            &dir,
            vec![
                at(10, 0, 0) + Duration::milliseconds(900),
                at(10, 0, 1) + Duration::milliseconds(100),
            ],
        );
        let id = s.add_task("x", 1);
        s.start_task(id).unwrap();

        assert_eq!(s.finish_task(id).unwrap().actual_seconds, 1);
        let history = s.log().read_history().unwrap();
        assert_eq!(history[0].start, "2025-06-02 10:00:00");
        assert_eq!(history[0].finish, "2025-06-02 10:00:01");
        assert_eq!(history[0].actual_seconds, 1);
    }

    #[test]
    fn test_strict_rollback_keeps_start_time() {
        let dir = TempDir::new().unwrap();
        let clock = ScriptedClock::new([at(9, 0, 0), at(9, 5, 0)]);
        let mut s =
            Scheduler::with_clock(broken_log(&dir), Box::new(clock)).with_mode(PersistenceMode::Strict);
        let id = s.add_task("flaky", 60);
        s.start_task(id).unwrap();

        assert!(s.finish_task(id).is_err());
        assert_eq!(s.get(id).unwrap().start_time(), Some(at(9, 0, 0)));
        assert_eq!(s.get(id).unwrap().finish_time(), None);
    }

    #[test]
    fn test_ids_continue_past_u32_range() {
        let dir = TempDir::new().unwrap();
        let mut s = scheduler(&dir);
        s.next_id = TaskId::from(u32::MAX);

        assert_eq!(s.add_task("last small id", 1), TaskId::from(u32::MAX));
        assert_eq!(s.add_task("next", 1), TaskId::from(u32::MAX) + 1);
        assert_eq!(s.counts().staged, 2);
    }
}
