//! Line-oriented console menu over the scheduler.

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::models::{format_elapsed, Task, TaskId};
use crate::scheduler::Scheduler;
use crate::shell::Driver;

const MENU: &str = "\n=== Simple Job Scheduler ===
1) Add Task
2) Start Task (by ID)
3) Finish Task (by ID)
4) View Staged Tasks
5) View Active Tasks
6) View Finished Log
0) Exit
";

pub struct MenuShell<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> MenuShell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `text` and read one line. `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt_id(&mut self, text: &str) -> Result<Option<TaskId>> {
        let Some(raw) = self.prompt(text)? else {
            return Ok(None);
        };
        match raw.trim().parse::<TaskId>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                writeln!(self.output, "Invalid id.")?;
                Ok(None)
            }
        }
    }

    fn add(&mut self, scheduler: &mut Scheduler) -> Result<()> {
        let Some(description) = self.prompt("Enter task description: ")? else {
            return Ok(());
        };
        if description.trim().is_empty() {
            writeln!(self.output, "Description cannot be empty. Task not added.")?;
            return Ok(());
        }

        let Some(raw) = self.prompt("Estimated duration (seconds): ")? else {
            return Ok(());
        };
        match raw.trim().parse::<i64>() {
            Ok(estimate) => {
                let id = scheduler.add_task(description, estimate);
                writeln!(self.output, "Added task [#{}] to staged tasks.", id)?;
            }
            Err(_) => writeln!(self.output, "Invalid estimate. Task not added.")?,
        }
        Ok(())
    }

    fn start(&mut self, scheduler: &mut Scheduler) -> Result<()> {
        let Some(id) = self.prompt_id("Enter task id to start: ")? else {
            return Ok(());
        };
        match scheduler.start_task(id) {
            Ok(()) => writeln!(self.output, "Started task [#{}].", id)?,
            Err(err) => writeln!(self.output, "{}.", err)?,
        }
        Ok(())
    }

    fn finish(&mut self, scheduler: &mut Scheduler) -> Result<()> {
        let Some(id) = self.prompt_id("Enter task id to finish: ")? else {
            return Ok(());
        };
        match scheduler.finish_task(id) {
            Ok(receipt) => {
                match &receipt.log_failure {
                    None => writeln!(
                        self.output,
                        "Task logged to {}",
                        scheduler.log().path().display()
                    )?,
                    Some(reason) => writeln!(
                        self.output,
                        "Error: {}. The task is finished but was not logged.",
                        reason
                    )?,
                }
                writeln!(self.output, "Finished task [#{}].", id)?;
            }
            Err(err) if err.is_not_found() => writeln!(self.output, "{}.", err)?,
            Err(err) => writeln!(self.output, "Error: {}", err)?,
        }
        Ok(())
    }

    fn list(&mut self, title: &str, tasks: &[&Task], with_actual: bool) -> Result<()> {
        writeln!(self.output, "--- {} ({}) ---", title, tasks.len())?;
        if tasks.is_empty() {
            writeln!(self.output, "(none)")?;
            return Ok(());
        }
        for task in tasks {
            write!(self.output, "{}", task.render_summary())?;
            if with_actual && task.start_time().is_some() && task.finish_time().is_some() {
                write!(
                    self.output,
                    " | Actual: {}",
                    format_elapsed(task.actual_duration_seconds())
                )?;
            }
            writeln!(self.output)?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Driver for MenuShell<R, W> {
    fn drive(&mut self, scheduler: &mut Scheduler) -> Result<()> {
        loop {
            write!(self.output, "{}", MENU)?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                break;
            };

            match choice.trim().parse::<u32>() {
                Ok(1) => self.add(scheduler)?,
                Ok(2) => self.start(scheduler)?,
                Ok(3) => self.finish(scheduler)?,
                Ok(4) => self.list("Staged Tasks", &scheduler.staged(), false)?,
                Ok(5) => self.list("Active Tasks", &scheduler.active(), false)?,
                Ok(6) => self.list("Finished Tasks Log", &scheduler.finished(), true)?,
                Ok(0) => break,
                Ok(_) => writeln!(self.output, "Unknown option. Try again.")?,
                Err(_) => writeln!(self.output, "Invalid input. Please enter a number.")?,
            }
        }

        writeln!(self.output, "Exiting scheduler. Goodbye.")?;
        self.output.flush()?;
        Ok(())
    }
}
