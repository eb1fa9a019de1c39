pub mod status;
pub mod task;
#[cfg(test)]
pub(crate) mod testing;

pub use status::Status;
pub use task::{format_elapsed, format_timestamp, Task, TaskId, TransitionError};
