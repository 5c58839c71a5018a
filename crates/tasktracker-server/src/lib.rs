pub mod config;
mod routes;
pub mod views;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use std::sync::Arc;

use anyhow::Result;
use tasktracker_service::TaskService;
use tokio::net::TcpListener;

use views::Views;

pub async fn serve(listener: TcpListener, service: Arc<dyn TaskService>) -> Result<()> {
    let state = Arc::new(routes::InnerAppState {
        service,
        views: Views::new()?,
    });
    let app = routes::build_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}
