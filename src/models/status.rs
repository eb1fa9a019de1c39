use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle position of a task. Progression is `Staged -> Active -> Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Created but not yet started.
    Staged,
    /// Started and in progress.
    Active,
    /// Completed and written to the durable log.
    Finished,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Staged, Status::Active, Status::Finished];

    pub fn label(self) -> &'static str {
        match self {
            Status::Staged => "Staged",
            Status::Active => "Active",
            Status::Finished => "Finished",
        }
    }

    /// The stage a task must be in before it can enter `self`.
    pub fn predecessor(self) -> Option<Status> {
        match self {
            Status::Staged => None,
            Status::Active => Some(Status::Staged),
            Status::Finished => Some(Status::Active),
        }
    }

    /// Column index used by the panel shell.
    pub fn column(self) -> usize {
        match self {
            Status::Staged => 0,
            Status::Active => 1,
            Status::Finished => 2,
        }
    }

    pub fn from_column(column: usize) -> Option<Status> {
        Status::ALL.get(column).copied()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predecessor_chain() {
        assert_eq!(Status::Staged.predecessor(), None);
        assert_eq!(Status::Active.predecessor(), Some(Status::Staged));
        assert_eq!(Status::Finished.predecessor(), Some(Status::Active));
    }

    #[test]
    fn test_column_mapping() {
        for status in Status::ALL {
            assert_eq!(Status::from_column(status.column()), Some(status));
        }
        assert_eq!(Status::from_column(3), None);
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Status::Finished).unwrap();
        assert_eq!(json, "\"finished\"");
    }
}
