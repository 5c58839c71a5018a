use async_trait::async_trait;
use chrono::NaiveDate;
use tasktracker_core::form::TaskFields;
use tasktracker_core::summary::{MonthlySummary, TaskBoard};
use tasktracker_core::task::Task;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Read and write operations over task records.
///
/// The HTTP routes and the CLI program against this trait.
/// `LocalService` wraps an injected `Database`.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Current date in the configured time zone.
    fn today(&self) -> NaiveDate;

    // -- Queries --
    /// Open tasks due today or earlier, by due date.
    async fn pending_tasks(&self) -> Result<Vec<Task>, ServiceError>;
    /// Every carried-forward task, by due date, with no date bound.
    async fn carried_forward_tasks(&self) -> Result<Vec<Task>, ServiceError>;
    /// Both list-view queries evaluated against the same "today".
    async fn task_board(&self) -> Result<TaskBoard, ServiceError>;
    async fn monthly_summary(&self) -> Result<MonthlySummary, ServiceError>;
    async fn get_task(&self, id: i64) -> Result<Task, ServiceError>;

    // -- Mutations --
    async fn create_task(&self, fields: &TaskFields) -> Result<Task, ServiceError>;
    /// Rewrite a task's fields and set `carried_forward = !completed`.
    async fn update_task(
        &self,
        id: i64,
        fields: &TaskFields,
        completed: bool,
    ) -> Result<Task, ServiceError>;
}
