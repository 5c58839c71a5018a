use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use tasktracker_core::calendar::TimeZoneSetting;
use tasktracker_db::MemoryDatabase;
use tasktracker_service::{FixedClock, LocalService};
use tokio::net::TcpListener;

use crate::routes::{build_router, InnerAppState};
use crate::views::Views;

/// Build a test router over an empty in-memory store, with the clock pinned
/// to `now` and "today" evaluated in UTC.
pub async fn test_router_at(now: DateTime<Utc>) -> Router {
    let service = LocalService::new(Arc::new(MemoryDatabase::new()))
        .with_clock(Arc::new(FixedClock::new(now)))
        .with_timezone(TimeZoneSetting::Fixed(chrono::FixedOffset::east_opt(0).unwrap()));
    let state = Arc::new(InnerAppState {
        service: Arc::new(service),
        views: Views::new().unwrap(),
    });
    build_router(state)
}

/// Test router pinned to noon UTC on 2024-01-10.
pub async fn test_router() -> Router {
    test_router_at(Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()).await
}

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn an axum test server on a random port with the clock pinned to `now`.
pub async fn spawn_test_server_at(now: DateTime<Utc>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let app = test_router_at(now).await;
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url,
        _handle: handle,
    }
}
