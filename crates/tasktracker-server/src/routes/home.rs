use axum::{extract::State, response::Html, routing::get, Router};

use super::{page, AppState, PageResult};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(home))
}

async fn home(State(state): State<AppState>) -> PageResult<Html<String>> {
    page(&state, state.views.home())
}
