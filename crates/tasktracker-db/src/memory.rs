//! In-memory backend, used by tests and `--db-backend memory`.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use tasktracker_core::task::{CreateTask, Task, TaskFilter, UpdateTask};

use crate::{Database, DbError};

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    tasks: BTreeMap<i64, Task>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, DbError> {
        self.state
            .lock()
            .map_err(|_| DbError::Internal("lock poisoned".into()))
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn create_task(&self, input: &CreateTask) -> Result<Task, DbError> {
        let mut state = self.lock()?;
        state.last_id += 1;
        let task = Task {
            id: state.last_id,
            title: input.title.clone(),
            description: input.description.clone(),
            due_date: input.due_date,
            completed: false,
            carried_forward: false,
            created_at: input.created_at,
        };
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: i64) -> Result<Task, DbError> {
        self.lock()?
            .tasks
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::NotFound(format!("task {id}")))
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, DbError> {
        // BTreeMap iterates by id, so the stable sort leaves ties in id order.
        let mut tasks: Vec<Task> = self
            .lock()?
            .tasks
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.due_date);
        Ok(tasks)
    }

    async fn update_task(&self, id: i64, update: &UpdateTask) -> Result<Task, DbError> {
        let mut state = self.lock()?;
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or_else(|| DbError::NotFound(format!("task {id}")))?;
        task.title = update.title.clone();
        task.description = update.description.clone();
        task.due_date = update.due_date;
        task.completed = update.completed;
        task.carried_forward = update.carried_forward;
        Ok(task.clone())
    }
}
