use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::{Clock, DefaultClock};
use tasktracker_core::calendar::{MonthRange, TimeZoneSetting};
use tasktracker_core::form::TaskFields;
use tasktracker_core::summary::{MonthlySummary, TaskBoard};
use tasktracker_core::task::{CreateTask, Task, TaskFilter, UpdateTask};
use tasktracker_db::{Database, DbError};

use crate::{ServiceError, TaskService};

/// Service backed by an injected `Database`.
///
/// "Today" is read from the clock on every call and converted to a date in
/// the configured zone, so a long-running server rolls over at midnight.
#[derive(Clone)]
pub struct LocalService {
    db: Arc<dyn Database>,
    clock: Arc<dyn Clock + Send + Sync>,
    timezone: TimeZoneSetting,
}

impl LocalService {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self {
            db,
            clock: Arc::new(DefaultClock),
            timezone: TimeZoneSetting::Local,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_timezone(mut self, timezone: TimeZoneSetting) -> Self {
        self.timezone = timezone;
        self
    }

    async fn pending_as_of(&self, today: NaiveDate) -> Result<Vec<Task>, ServiceError> {
        let filter = TaskFilter {
            completed: Some(false),
            due_on_or_before: Some(today),
            ..Default::default()
        };
        Ok(self.db.list_tasks(&filter).await?)
    }
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(msg) => ServiceError::NotFound(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

#[async_trait]
impl TaskService for LocalService {
    fn today(&self) -> NaiveDate {
        self.timezone.today(self.clock.utc())
    }

    async fn pending_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        self.pending_as_of(self.today()).await
    }

    async fn carried_forward_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        let filter = TaskFilter {
            carried_forward: Some(true),
            ..Default::default()
        };
        Ok(self.db.list_tasks(&filter).await?)
    }

    async fn task_board(&self) -> Result<TaskBoard, ServiceError> {
        let today = self.today();
        Ok(TaskBoard {
            today,
            pending: self.pending_as_of(today).await?,
            carried_forward: self.carried_forward_tasks().await?,
        })
    }

    async fn monthly_summary(&self) -> Result<MonthlySummary, ServiceError> {
        let month = MonthRange::containing(self.today());
        let in_month = TaskFilter {
            due_on_or_after: Some(month.first),
            due_on_or_before: Some(month.last),
            ..Default::default()
        };
        let completed = self
            .db
            .list_tasks(&TaskFilter {
                completed: Some(true),
                ..in_month.clone()
            })
            .await?;
        let carried_forward = self
            .db
            .list_tasks(&TaskFilter {
                carried_forward: Some(true),
                ..in_month
            })
            .await?;
        Ok(MonthlySummary {
            month,
            completed,
            carried_forward,
        })
    }

    async fn get_task(&self, id: i64) -> Result<Task, ServiceError> {
        Ok(self.db.get_task(id).await?)
    }

    async fn create_task(&self, fields: &TaskFields) -> Result<Task, ServiceError> {
        let input = CreateTask::new(fields.clone(), self.clock.utc());
        let task = self.db.create_task(&input).await?;
        tracing::info!(task_id = task.id, due_date = %task.due_date, "created task");
        Ok(task)
    }

    async fn update_task(
        &self,
        id: i64,
        fields: &TaskFields,
        completed: bool,
    ) -> Result<Task, ServiceError> {
        let update = UpdateTask::with_completion(fields.clone(), completed);
        let task = self.db.update_task(id, &update).await?;
        tracing::info!(task_id = task.id, state = %task.state(), "updated task");
        Ok(task)
    }
}
