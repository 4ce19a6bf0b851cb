#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Succeeded => "OK",
            TaskStatus::Failed => "FAIL",
        }
    }

    pub fn is_finished(self) -> bool {
        matches!(self, TaskStatus::Succeeded | TaskStatus::Failed)
    }
}

// Messages sent from background task threads back to the controller loop
#[derive(Debug)]
pub enum TaskEvent {
    Log(String),
    Finished {
        index: usize,
        result: anyhow::Result<()>,
    },
}
