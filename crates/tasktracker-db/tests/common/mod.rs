// Backend-agnostic integration tests for the Database trait.
//
// Each public async function accepts `&dyn Database` so that the same logic
// can be exercised against the SQLite, Postgres and in-memory backends.

use chrono::{NaiveDate, TimeZone, Utc};
use tasktracker_core::task::{CreateTask, TaskFilter, UpdateTask};
use tasktracker_db::{Database, DbError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn make_task(title: &str, due: NaiveDate) -> CreateTask {
    CreateTask {
        title: title.to_string(),
        description: String::new(),
        due_date: due,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
    }
}

fn rewrite(title: &str, due: NaiveDate, completed: bool) -> UpdateTask {
    UpdateTask {
        title: title.to_string(),
        description: "edited".to_string(),
        due_date: due,
        completed,
        carried_forward: !completed,
    }
}

fn titles(tasks: &[tasktracker_core::Task]) -> Vec<&str> {
    tasks.iter().map(|t| t.title.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Task tests
// ---------------------------------------------------------------------------

/// Test basic task CRUD: create, get, update, list.
pub async fn test_task_crud(db: &dyn Database) {
    let task = db
        .create_task(&CreateTask {
            title: "Pay rent".into(),
            description: "to landlord".into(),
            due_date: date(2024, 1, 5),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
        })
        .await
        .unwrap();
    assert_eq!(task.title, "Pay rent");
    assert_eq!(task.description, "to landlord");
    assert_eq!(task.due_date, date(2024, 1, 5));
    assert!(!task.completed);
    assert!(!task.carried_forward);

    // get by id
    let fetched = db.get_task(task.id).await.unwrap();
    assert_eq!(fetched, task);

    // update
    let updated = db
        .update_task(task.id, &rewrite("Pay rent (Feb)", date(2024, 2, 5), true))
        .await
        .unwrap();
    assert_eq!(updated.id, task.id);
    assert_eq!(updated.title, "Pay rent (Feb)");
    assert_eq!(updated.description, "edited");
    assert_eq!(updated.due_date, date(2024, 2, 5));
    assert!(updated.completed);
    assert!(!updated.carried_forward);
    // immutable fields preserved
    assert_eq!(updated.created_at, task.created_at);

    // list
    let all = db.list_tasks(&TaskFilter::default()).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], updated);
}

/// Ids are distinct and increasing.
pub async fn test_ids_unique(db: &dyn Database) {
    let a = db.create_task(&make_task("a", date(2024, 1, 5))).await.unwrap();
    let b = db.create_task(&make_task("b", date(2024, 1, 5))).await.unwrap();
    let c = db.create_task(&make_task("c", date(2024, 1, 5))).await.unwrap();
    assert!(a.id < b.id && b.id < c.id);
}

/// Missing ids surface as NotFound and leave the table untouched.
pub async fn test_not_found(db: &dyn Database) {
    let existing = db.create_task(&make_task("keep", date(2024, 1, 5))).await.unwrap();
    let missing = existing.id + 1000;

    assert!(matches!(db.get_task(missing).await, Err(DbError::NotFound(_))));
    assert!(matches!(
        db.update_task(missing, &rewrite("ghost", date(2024, 1, 5), true))
            .await,
        Err(DbError::NotFound(_))
    ));

    let all = db.list_tasks(&TaskFilter::default()).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], existing);
}

/// Listing orders by due date, then id.
pub async fn test_ordering(db: &dyn Database) {
    db.create_task(&make_task("late", date(2024, 3, 1))).await.unwrap();
    db.create_task(&make_task("early", date(2024, 1, 1))).await.unwrap();
    db.create_task(&make_task("mid-1", date(2024, 2, 1))).await.unwrap();
    db.create_task(&make_task("mid-2", date(2024, 2, 1))).await.unwrap();

    let all = db.list_tasks(&TaskFilter::default()).await.unwrap();
    assert_eq!(titles(&all), ["early", "mid-1", "mid-2", "late"]);
}

/// Flag and date-range filters combine conjunctively.
pub async fn test_filtering(db: &dyn Database) {
    let jan = db.create_task(&make_task("jan", date(2024, 1, 15))).await.unwrap();
    let feb = db.create_task(&make_task("feb", date(2024, 2, 15))).await.unwrap();
    let mar = db.create_task(&make_task("mar", date(2024, 3, 15))).await.unwrap();
    db.create_task(&make_task("untouched", date(2024, 2, 20))).await.unwrap();

    db.update_task(jan.id, &rewrite("jan", jan.due_date, true)).await.unwrap();
    db.update_task(feb.id, &rewrite("feb", feb.due_date, false)).await.unwrap();
    db.update_task(mar.id, &rewrite("mar", mar.due_date, true)).await.unwrap();

    let completed = db
        .list_tasks(&TaskFilter {
            completed: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&completed), ["jan", "mar"]);

    let carried = db
        .list_tasks(&TaskFilter {
            carried_forward: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&carried), ["feb"]);

    let open_until_feb = db
        .list_tasks(&TaskFilter {
            completed: Some(false),
            due_on_or_before: Some(date(2024, 2, 20)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&open_until_feb), ["feb", "untouched"]);

    let february = db
        .list_tasks(&TaskFilter {
            due_on_or_after: Some(date(2024, 2, 1)),
            due_on_or_before: Some(date(2024, 2, 29)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&february), ["feb", "untouched"]);

    let nothing = db
        .list_tasks(&TaskFilter {
            completed: Some(true),
            carried_forward: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(nothing.is_empty());
}

/// Dates at either end of the four-digit year range order and filter by
/// calendar date, not by how they happen to be stored.
pub async fn test_year_bounds(db: &dyn Database) {
    db.create_task(&make_task("far future", date(9999, 12, 31))).await.unwrap();
    db.create_task(&make_task("today", date(2024, 1, 10))).await.unwrap();
    db.create_task(&make_task("ancient", date(1, 1, 1))).await.unwrap();

    let all = db.list_tasks(&TaskFilter::default()).await.unwrap();
    assert_eq!(titles(&all), ["ancient", "today", "far future"]);

    let due = db
        .list_tasks(&TaskFilter {
            completed: Some(false),
            due_on_or_before: Some(date(2024, 1, 10)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&due), ["ancient", "today"]);

    let after = db
        .list_tasks(&TaskFilter {
            due_on_or_after: Some(date(2024, 1, 11)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(titles(&after), ["far future"]);
}
