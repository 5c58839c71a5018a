use rusqlite::{params, Row};

use tasktracker_core::task::{CreateTask, Task, TaskFilter, UpdateTask};

use super::super::{SqliteDatabase, SqliteResultExt};
use crate::DbError;

fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        due_date: row.get("due_date")?,
        completed: row.get("completed")?,
        carried_forward: row.get("carried_forward")?,
        created_at: row.get("created_at")?,
    })
}

fn not_found(id: i64) -> impl FnOnce(rusqlite::Error) -> DbError {
    move |e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("task {id}")),
        other => DbError::Internal(other.to_string()),
    }
}

impl SqliteDatabase {
    pub fn create_task_sync(&self, input: &CreateTask) -> Result<Task, DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (title, description, due_date, completed, carried_forward, created_at)
                 VALUES (?1, ?2, ?3, 0, 0, ?4)",
                params![input.title, input.description, input.due_date, input.created_at],
            )
            .to_db()?;
            let id = conn.last_insert_rowid();

            conn.query_row("SELECT * FROM tasks WHERE id = ?1", params![id], row_to_task)
                .to_db()
        })
    }

    pub fn get_task_sync(&self, id: i64) -> Result<Task, DbError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT * FROM tasks WHERE id = ?1", params![id], row_to_task)
                .map_err(not_found(id))
        })
    }

    pub fn list_tasks_sync(&self, filter: &TaskFilter) -> Result<Vec<Task>, DbError> {
        self.with_conn(|conn| {
            let mut sql = String::from("SELECT * FROM tasks WHERE 1=1");
            let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

            if let Some(completed) = filter.completed {
                param_values.push(Box::new(completed));
                sql.push_str(&format!(" AND completed = ?{}", param_values.len()));
            }
            if let Some(carried_forward) = filter.carried_forward {
                param_values.push(Box::new(carried_forward));
                sql.push_str(&format!(" AND carried_forward = ?{}", param_values.len()));
            }
            if let Some(from) = filter.due_on_or_after {
                param_values.push(Box::new(from));
                sql.push_str(&format!(" AND due_date >= ?{}", param_values.len()));
            }
            if let Some(until) = filter.due_on_or_before {
                param_values.push(Box::new(until));
                sql.push_str(&format!(" AND due_date <= ?{}", param_values.len()));
            }

            sql.push_str(" ORDER BY due_date ASC, id ASC");

            let params_ref: Vec<&dyn rusqlite::types::ToSql> =
                param_values.iter().map(|p| p.as_ref()).collect();

            let mut stmt = conn.prepare(&sql).to_db()?;
            let tasks = stmt
                .query_map(params_ref.as_slice(), row_to_task)
                .to_db()?
                .collect::<Result<Vec<_>, _>>()
                .to_db()?;
            Ok(tasks)
        })
    }

    pub fn update_task_sync(&self, id: i64, update: &UpdateTask) -> Result<Task, DbError> {
        self.with_conn(|conn| {
            let changed = conn
                .execute(
                    "UPDATE tasks
                     SET title = ?1, description = ?2, due_date = ?3,
                         completed = ?4, carried_forward = ?5
                     WHERE id = ?6",
                    params![
                        update.title,
                        update.description,
                        update.due_date,
                        update.completed,
                        update.carried_forward,
                        id,
                    ],
                )
                .to_db()?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("task {id}")));
            }

            conn.query_row("SELECT * FROM tasks WHERE id = ?1", params![id], row_to_task)
                .map_err(not_found(id))
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_task(title: &str, due: NaiveDate) -> CreateTask {
        CreateTask {
            title: title.into(),
            description: String::new(),
            due_date: due,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn create_roundtrips_columns() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let created = db.create_task_sync(&make_task("Pay rent", date(2024, 1, 5))).unwrap();
        let fetched = db.get_task_sync(created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.due_date, date(2024, 1, 5));
        assert_eq!(
            fetched.created_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn ids_not_reused_after_max_row_removed() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let first = db.create_task_sync(&make_task("a", date(2024, 1, 5))).unwrap();
        db.with_conn(|conn| {
            conn.execute("DELETE FROM tasks WHERE id = ?1", params![first.id])
                .to_db()
        })
        .unwrap();
        let second = db.create_task_sync(&make_task("b", date(2024, 1, 5))).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn update_missing_row_is_not_found() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let update = UpdateTask {
            title: "x".into(),
            description: String::new(),
            due_date: date(2024, 1, 5),
            completed: true,
            carried_forward: false,
        };
        assert!(matches!(
            db.update_task_sync(42, &update),
            Err(DbError::NotFound(_))
        ));
    }

    #[test]
    fn date_filter_compares_as_dates() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        db.create_task_sync(&make_task("sep", date(2024, 9, 30))).unwrap();
        db.create_task_sync(&make_task("oct", date(2024, 10, 1))).unwrap();
        let filter = TaskFilter {
            due_on_or_before: Some(date(2024, 9, 30)),
            ..Default::default()
        };
        let titles: Vec<String> = db
            .list_tasks_sync(&filter)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["sep"]);
    }
}
