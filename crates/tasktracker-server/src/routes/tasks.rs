use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use tasktracker_core::form::{FormErrors, TaskForm};

use super::{error_page, page, to_error, AppState, PageResult};

const TASK_LIST: &str = "/tasks/";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tasks/", get(task_list))
        .route("/tasks/add/", get(add_form).post(add_task))
        .route("/tasks/update/{id}/", get(update_form).post(update_task))
        .route("/tasks/monthly-summary/", get(monthly_summary))
}

async fn task_list(State(state): State<AppState>) -> PageResult {
    let board = state
        .service
        .task_board()
        .await
        .map_err(|e| to_error(&state, e))?;
    page(&state, state.views.task_list(&board))
}

async fn add_form(State(state): State<AppState>) -> PageResult {
    page(
        &state,
        state
            .views
            .add_task(&TaskForm::default(), &FormErrors::default()),
    )
}

async fn add_task(State(state): State<AppState>, Form(form): Form<TaskForm>) -> PageResult<Response> {
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            return page(&state, state.views.add_task(&form, &errors)).map(IntoResponse::into_response);
        }
    };
    state
        .service
        .create_task(&fields)
        .await
        .map_err(|e| to_error(&state, e))?;
    Ok(Redirect::to(TASK_LIST).into_response())
}

/// Only plain digit runs name a task; signs and whitespace do not.
fn parse_id(state: &AppState, raw: &str) -> Result<i64, (StatusCode, Html<String>)> {
    let not_found = || error_page(state, StatusCode::NOT_FOUND, "No task matches that id.");
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_found());
    }
    raw.parse::<i64>().map_err(|_| not_found())
}

async fn update_form(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let id = parse_id(&state, &id)?;
    let task = state
        .service
        .get_task(id)
        .await
        .map_err(|e| to_error(&state, e))?;
    page(
        &state,
        state
            .views
            .update_task(&task, &TaskForm::from_task(&task), &FormErrors::default()),
    )
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<TaskForm>,
) -> PageResult<Response> {
    let id = parse_id(&state, &id)?;
    let task = state
        .service
        .get_task(id)
        .await
        .map_err(|e| to_error(&state, e))?;
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            return page(&state, state.views.update_task(&task, &form, &errors))
                .map(IntoResponse::into_response);
        }
    };
    state
        .service
        .update_task(id, &fields, form.is_completed())
        .await
        .map_err(|e| to_error(&state, e))?;
    Ok(Redirect::to(TASK_LIST).into_response())
}

async fn monthly_summary(State(state): State<AppState>) -> PageResult {
    let summary = state
        .service
        .monthly_summary()
        .await
        .map_err(|e| to_error(&state, e))?;
    page(&state, state.views.monthly_summary(&summary))
}
