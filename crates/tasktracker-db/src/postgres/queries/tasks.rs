use chrono::{DateTime, NaiveDate, Utc};

use tasktracker_core::task::{CreateTask, Task, TaskFilter, UpdateTask};

use super::super::{pg_err, pg_not_found, PostgresDatabase};
use crate::DbError;

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    description: String,
    due_date: NaiveDate,
    completed: bool,
    carried_forward: bool,
    created_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(r: TaskRow) -> Self {
        Task {
            id: r.id,
            title: r.title,
            description: r.description,
            due_date: r.due_date,
            completed: r.completed,
            carried_forward: r.carried_forward,
            created_at: r.created_at,
        }
    }
}

enum ParamValue {
    Bool(bool),
    Date(NaiveDate),
}

impl PostgresDatabase {
    pub(crate) async fn pg_create_task(&self, input: &CreateTask) -> Result<Task, DbError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "INSERT INTO tasks (title, description, due_date, completed, carried_forward, created_at)
             VALUES ($1, $2, $3, FALSE, FALSE, $4)
             RETURNING *",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.due_date)
        .bind(input.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(pg_err)?;

        Ok(row.into())
    }

    pub(crate) async fn pg_get_task(&self, id: i64) -> Result<Task, DbError> {
        let row = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(pg_err)?
            .ok_or_else(|| pg_not_found(&format!("task {id}")))?;

        Ok(row.into())
    }

    pub(crate) async fn pg_list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, DbError> {
        let mut sql = String::from("SELECT * FROM tasks WHERE 1=1");
        let mut params: Vec<ParamValue> = Vec::new();

        if let Some(completed) = filter.completed {
            params.push(ParamValue::Bool(completed));
            sql.push_str(&format!(" AND completed = ${}", params.len()));
        }
        if let Some(carried_forward) = filter.carried_forward {
            params.push(ParamValue::Bool(carried_forward));
            sql.push_str(&format!(" AND carried_forward = ${}", params.len()));
        }
        if let Some(from) = filter.due_on_or_after {
            params.push(ParamValue::Date(from));
            sql.push_str(&format!(" AND due_date >= ${}", params.len()));
        }
        if let Some(until) = filter.due_on_or_before {
            params.push(ParamValue::Date(until));
            sql.push_str(&format!(" AND due_date <= ${}", params.len()));
        }

        sql.push_str(" ORDER BY due_date ASC, id ASC");

        let mut query = sqlx::query_as::<_, TaskRow>(&sql);
        for param in params {
            query = match param {
                ParamValue::Bool(v) => query.bind(v),
                ParamValue::Date(v) => query.bind(v),
            };
        }

        let rows = query.fetch_all(&self.pool).await.map_err(pg_err)?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    pub(crate) async fn pg_update_task(
        &self,
        id: i64,
        update: &UpdateTask,
    ) -> Result<Task, DbError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "UPDATE tasks
             SET title = $1, description = $2, due_date = $3,
                 completed = $4, carried_forward = $5
             WHERE id = $6
             RETURNING *",
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.due_date)
        .bind(update.completed)
        .bind(update.carried_forward)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(pg_err)?
        .ok_or_else(|| pg_not_found(&format!("task {id}")))?;

        Ok(row.into())
    }
}
