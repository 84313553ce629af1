//! fieldgrid-api — REST API for FieldGrid.
//!
//! Provides axum route handlers for listing tasks and teams, adding tasks,
//! and triggering scheduling passes.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/` | Liveness |
//! | GET | `/api/tasks` | List tasks with their latest assignment |
//! | POST | `/api/tasks` | Add a task, then schedule |
//! | POST | `/api/add_task` | Same as `POST /api/tasks` |
//! | GET | `/api/resources` | List teams with current load |
//! | POST | `/api/schedule` | Run one scheduling pass |

pub mod handlers;
pub mod request;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use fieldgrid_dispatch::Dispatcher;
use fieldgrid_state::{RecordStore, StateStore};

/// Shared state for API handlers.
pub struct ApiState<S = StateStore> {
    pub dispatcher: Arc<Dispatcher<S>>,
}

impl<S> Clone for ApiState<S> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

/// Build the complete API router.
pub fn build_router<S>(dispatcher: Arc<Dispatcher<S>>) -> Router
where
    S: RecordStore + Clone + 'static,
{
    let state = ApiState { dispatcher };

    let api_routes = Router::new()
        .route(
            "/tasks",
            get(handlers::list_tasks::<S>).post(handlers::add_task::<S>),
        )
        .route("/add_task", post(handlers::add_task::<S>))
        .route("/resources", get(handlers::list_resources::<S>))
        .route("/schedule", post(handlers::run_schedule::<S>))
        .with_state(state);

    Router::new()
        .route("/", get(handlers::liveness))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
