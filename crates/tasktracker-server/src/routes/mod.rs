pub mod health;
pub mod home;
pub mod tasks;

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Html, Router};
use tasktracker_service::{ServiceError, TaskService};
use tower_http::trace::TraceLayer;

use crate::views::{TemplateError, Views};

pub struct InnerAppState {
    pub service: Arc<dyn TaskService>,
    pub views: Views,
}

pub type AppState = Arc<InnerAppState>;

/// Handler result: a rendered page, or a status with a rendered error page.
pub type PageResult<T = Html<String>> = Result<T, (StatusCode, Html<String>)>;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(home::routes())
        .merge(tasks::routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(State(state): State<AppState>) -> (StatusCode, Html<String>) {
    error_page(&state, StatusCode::NOT_FOUND, "The page you asked for does not exist.")
}

fn page(state: &AppState, rendered: Result<String, TemplateError>) -> PageResult {
    rendered.map(Html).map_err(|e| {
        tracing::error!(error = %e, "failed to render page");
        error_page(state, StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong.")
    })
}

fn to_error(state: &AppState, e: ServiceError) -> (StatusCode, Html<String>) {
    match &e {
        ServiceError::NotFound(_) => {
            error_page(state, StatusCode::NOT_FOUND, "No task matches that id.")
        }
        ServiceError::Internal(_) => {
            tracing::error!(error = %e, "request failed");
            error_page(state, StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong.")
        }
    }
}

fn error_page(state: &AppState, status: StatusCode, message: &str) -> (StatusCode, Html<String>) {
    let label = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    );
    let body = state
        .views
        .error_page(&label, message)
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to render error page");
            label.clone()
        });
    (status, Html(body))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use tasktracker_core::form::TaskFields;
    use tasktracker_core::summary::{MonthlySummary, TaskBoard};
    use tasktracker_core::task::{CreateTask, Task, TaskFilter, UpdateTask};
    use tasktracker_db::{Database, DbError};
    use tasktracker_service::LocalService;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    use super::*;
    use crate::test_helpers::test_router;

    /// Service whose storage is always down.
    struct BrokenService;

    #[async_trait]
    impl TaskService for BrokenService {
        fn today(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        }
        async fn pending_tasks(&self) -> Result<Vec<Task>, ServiceError> {
            Err(ServiceError::Internal("disk on fire".into()))
        }
        async fn carried_forward_tasks(&self) -> Result<Vec<Task>, ServiceError> {
            Err(ServiceError::Internal("disk on fire".into()))
        }
        async fn task_board(&self) -> Result<TaskBoard, ServiceError> {
            Err(ServiceError::Internal("disk on fire".into()))
        }
        async fn monthly_summary(&self) -> Result<MonthlySummary, ServiceError> {
            Err(ServiceError::Internal("disk on fire".into()))
        }
        async fn get_task(&self, _id: i64) -> Result<Task, ServiceError> {
            Err(ServiceError::Internal("disk on fire".into()))
        }
        async fn create_task(&self, _fields: &TaskFields) -> Result<Task, ServiceError> {
            Err(ServiceError::Internal("disk on fire".into()))
        }
        async fn update_task(
            &self,
            _id: i64,
            _fields: &TaskFields,
            _completed: bool,
        ) -> Result<Task, ServiceError> {
            Err(ServiceError::Internal("disk on fire".into()))
        }
    }

    /// Storage whose every call fails.
    struct BrokenDatabase;

    #[async_trait]
    impl Database for BrokenDatabase {
        async fn create_task(&self, _input: &CreateTask) -> Result<Task, DbError> {
            Err(DbError::Internal("disk on fire".into()))
        }
        async fn get_task(&self, _id: i64) -> Result<Task, DbError> {
            Err(DbError::Internal("disk on fire".into()))
        }
        async fn list_tasks(&self, _filter: &TaskFilter) -> Result<Vec<Task>, DbError> {
            Err(DbError::Internal("disk on fire".into()))
        }
        async fn update_task(&self, _id: i64, _update: &UpdateTask) -> Result<Task, DbError> {
            Err(DbError::Internal("disk on fire".into()))
        }
    }

    async fn body_text(resp: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn unknown_path_renders_404_page() {
        let app = test_router().await;
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/nowhere/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body_text(resp).await.contains("404 Not Found"));
    }

    #[tokio::test]
    async fn storage_failure_renders_500_without_details() {
        let state = Arc::new(InnerAppState {
            service: Arc::new(BrokenService),
            views: Views::new().unwrap(),
        });
        let app = build_router(state);
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/tasks/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(resp).await;
        assert!(body.contains("500 Internal Server Error"));
        assert!(!body.contains("disk on fire"));
    }

    #[tokio::test]
    #[traced_test]
    async fn storage_failure_is_logged_once() {
        let service = LocalService::new(Arc::new(BrokenDatabase));
        let state = Arc::new(InnerAppState {
            service: Arc::new(service),
            views: Views::new().unwrap(),
        });
        let app = build_router(state);
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/tasks/monthly-summary/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        logs_assert(|lines: &[&str]| {
            match lines.iter().filter(|line| line.contains("disk on fire")).count() {
                1 => Ok(()),
                n => Err(format!("storage error logged {n} times")),
            }
        });
    }
}
