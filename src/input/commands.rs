/// Application commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,

    // ===== Navigation =====
    /// Select the previous task in the column
    TaskUp,
    /// Select the next task in the column
    TaskDown,
    /// Focus the column to the left
    ColumnLeft,
    /// Focus the column to the right
    ColumnRight,

    // ===== Task operations =====
    /// Open the add-task dialog
    NewTask,
    /// Start the selected staged task
    StartTask,
    /// Finish the selected active task
    FinishTask,
    /// Start or finish depending on the focused column
    Advance,
    /// Copy the selected task summary to the clipboard
    CopyTask,

    /// Show key bindings
    ShowHelp,
}
