//! REST API handlers.
//!
//! Each handler goes through the shared `Dispatcher` and returns JSON.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use fieldgrid_dispatch::{AssignmentOutcome, DispatchError};
use fieldgrid_state::{RecordStore, TaskId};

use crate::ApiState;
use crate::request::parse_new_task;

/// Error body for every failed request.
#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

fn error_response(msg: &str, status: StatusCode) -> Response {
    (
        status,
        Json(ErrorBody {
            success: false,
            error: msg.to_string(),
        }),
    )
        .into_response()
}

fn dispatch_error_response(e: &DispatchError) -> Response {
    match e {
        DispatchError::Validation(_) => error_response(&e.to_string(), StatusCode::BAD_REQUEST),
        DispatchError::State(_) => {
            error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// One assignment in the schedule response.
#[derive(Debug, Serialize, PartialEq)]
pub struct AssignedEntry {
    pub task: String,
    pub resource: String,
    pub eta: u32,
}

impl From<AssignmentOutcome> for AssignedEntry {
    fn from(outcome: AssignmentOutcome) -> Self {
        Self {
            task: outcome.task_title,
            resource: outcome.resource_name,
            eta: outcome.eta_minutes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub assigned: Vec<AssignedEntry>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct AddTaskResponse {
    pub msg: &'static str,
    pub id: TaskId,
}

// ── Liveness ───────────────────────────────────────────────────

/// GET /
pub async fn liveness() -> &'static str {
    "FieldGrid backend is running"
}

// ── Tasks ──────────────────────────────────────────────────────

/// GET /api/tasks
pub async fn list_tasks<S: RecordStore + Clone>(State(state): State<ApiState<S>>) -> Response {
    match state.dispatcher.task_views() {
        Ok(tasks) => Json(tasks).into_response(),
        Err(e) => dispatch_error_response(&e),
    }
}

/// POST /api/tasks, POST /api/add_task
pub async fn add_task<S: RecordStore + Clone>(
    State(state): State<ApiState<S>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return error_response(&rejection.body_text(), StatusCode::BAD_REQUEST),
    };
    let new_task = match parse_new_task(&body) {
        Ok(task) => task,
        Err(msg) => {
            warn!(error = %msg, "add-task rejected");
            return error_response(&msg, StatusCode::BAD_REQUEST);
        }
    };

    match state.dispatcher.add_task(new_task).await {
        Ok((task, _)) => Json(AddTaskResponse {
            msg: "Task Added & Scheduled",
            id: task.id,
        })
        .into_response(),
        Err(e) => dispatch_error_response(&e),
    }
}

// ── Resources ──────────────────────────────────────────────────

/// GET /api/resources
pub async fn list_resources<S: RecordStore + Clone>(State(state): State<ApiState<S>>) -> Response {
    match state.dispatcher.resource_views() {
        Ok(resources) => Json(resources).into_response(),
        Err(e) => dispatch_error_response(&e),
    }
}

// ── Scheduling ─────────────────────────────────────────────────

/// POST /api/schedule
pub async fn run_schedule<S: RecordStore + Clone>(State(state): State<ApiState<S>>) -> Response {
    match state.dispatcher.schedule().await {
        Ok(outcomes) => {
            let assigned: Vec<AssignedEntry> = outcomes.into_iter().map(AssignedEntry::from).collect();
            Json(ScheduleResponse {
                count: assigned.len(),
                assigned,
            })
            .into_response()
        }
        Err(e) => dispatch_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use fieldgrid_dispatch::{DispatchSettings, Dispatcher};
    use fieldgrid_state::{
        Assignment, Coordinate, ManualClock, NewResource, NewTask, Resource, ResourceId, Snapshot,
        StateError, StateResult, StateStore, Task, TaskStatus,
    };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::build_router;

    fn test_store(capacities: &[u32]) -> StateStore {
        let store = StateStore::open_in_memory().unwrap();
        for (i, capacity) in capacities.iter().enumerate() {
            store
                .insert_resource(NewResource {
                    name: format!("Team {}", (b'A' + i as u8) as char),
                    kind: "maintenance".to_string(),
                    location: Coordinate::new(17.435, 78.444 + i as f64 * 0.01),
                    capacity: *capacity,
                })
                .unwrap();
        }
        store
    }

    fn test_router<S: RecordStore + Clone + 'static>(store: S) -> Router {
        let dispatcher = Dispatcher::new(
            store,
            DispatchSettings::default(),
            Arc::new(ManualClock::new(1000)),
        );
        build_router(Arc::new(dispatcher))
    }

    fn post_task(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn task_body(title: &str, urgency: i64) -> Value {
        json!({
            "title": title,
            "lat": 17.436,
            "lon": 78.445,
            "urgency": urgency
        })
    }

    async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn liveness_string() {
        let router = test_router(test_store(&[]));
        let resp = router.oneshot(get("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"FieldGrid backend is running");
    }

    #[tokio::test]
    async fn add_task_returns_id_and_schedules() {
        let store = test_store(&[1]);
        let router = test_router(store.clone());

        let (status, body) = send(&router, post_task("/api/tasks", task_body("Leak", 8))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"msg": "Task Added & Scheduled", "id": 1}));
        assert_eq!(store.get_task(1).unwrap().unwrap().status, TaskStatus::Assigned);
    }

    #[tokio::test]
    async fn add_task_with_missing_field_is_bad_request() {
        let store = test_store(&[1]);
        let router = test_router(store.clone());

        let body = json!({"title": "Leak", "lat": 1.0, "urgency": 3});
        let (status, json) = send(&router, post_task("/api/add_task", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "missing required field: lon");
        assert!(store.snapshot().unwrap().tasks.is_empty());
    }

    #[tokio::test]
    async fn list_tasks_shows_latest_assignment() {
        let router = test_router(test_store(&[1]));
        send(&router, post_task("/api/tasks", task_body("Leak", 8))).await;
        send(&router, post_task("/api/tasks", task_body("Pothole", 3))).await;

        let (status, json) = send(&router, get("/api/tasks")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json[0]["resource"], "Team A");
        assert_eq!(json[0]["status"], "assigned");
        assert_eq!(json[0]["eta"], 5);
        assert_eq!(json[1]["resource"], Value::Null);
        assert_eq!(json[1]["status"], "pending");
    }

    #[tokio::test]
    async fn list_resources_reports_load() {
        let router = test_router(test_store(&[2, 1]));
        send(&router, post_task("/api/tasks", task_body("Leak", 8))).await;

        let (_, json) = send(&router, get("/api/resources")).await;
        assert_eq!(
            json,
            json!([
                {"id": 1, "name": "Team A", "capacity": 2, "current_load": 1},
                {"id": 2, "name": "Team B", "capacity": 1, "current_load": 0}
            ])
        );
    }

    #[tokio::test]
    async fn schedule_reports_assignments() {
        let store = test_store(&[1, 1]);
        // Insert directly so no pass runs yet.
        for (title, urgency) in [("low", 2), ("high", 9)] {
            store
                .insert_task(
                    NewTask {
                        title: title.to_string(),
                        description: String::new(),
                        location: Coordinate::new(17.436, 78.445),
                        urgency,
                    },
                    1000,
                )
                .unwrap();
        }
        let router = test_router(store.clone());

        let (_, json) = send(&router, post_task("/api/schedule", json!({}))).await;
        assert_eq!(json["count"], 2);
        assert_eq!(json["assigned"][0]["task"], "high");
        assert_eq!(json["assigned"][0]["resource"], "Team A");
        assert_eq!(json["assigned"][1]["task"], "low");
        assert_eq!(json["assigned"][1]["resource"], "Team B");

        // Nothing left to do.
        let (_, json) = send(&router, post_task("/api/schedule", json!({}))).await;
        assert_eq!(json, json!({"assigned": [], "count": 0}));
        assert!(store.list_pending_tasks().unwrap().is_empty());
    }

    /// Delegates to a real store but every commit fails.
    #[derive(Clone)]
    struct BrokenCommits(StateStore);

    impl RecordStore for BrokenCommits {
        fn insert_task(&self, new: NewTask, created_at: u64) -> StateResult<Task> {
            self.0.insert_task(new, created_at)
        }

        fn snapshot(&self) -> StateResult<Snapshot> {
            self.0.snapshot()
        }

        fn list_pending_tasks(&self) -> StateResult<Vec<Task>> {
            self.0.list_pending_tasks()
        }

        fn list_resources(&self) -> StateResult<Vec<Resource>> {
            self.0.list_resources()
        }

        fn count_assignments_for_resource(&self, resource_id: ResourceId) -> StateResult<u32> {
            self.0.count_assignments_for_resource(resource_id)
        }

        fn commit_assignment(&self, _: TaskId, _: ResourceId, _: u32, _: u64) -> StateResult<Assignment> {
            Err(StateError::Write("disk full".to_string()))
        }
    }

    #[tokio::test]
    async fn failed_pass_after_add_is_server_error_and_task_stays_pending() {
        let store = test_store(&[1]);
        let router = test_router(BrokenCommits(store.clone()));

        let (status, json) = send(&router, post_task("/api/tasks", task_body("Leak", 8))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("disk full"));

        let tasks = store.snapshot().unwrap().tasks;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Leak");
        assert_eq!(tasks[0].status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn failed_explicit_pass_is_server_error() {
        let store = test_store(&[1]);
        store
            .insert_task(
                NewTask {
                    title: "Leak".to_string(),
                    description: String::new(),
                    location: Coordinate::new(17.436, 78.445),
                    urgency: 4,
                },
                1000,
            )
            .unwrap();
        let router = test_router(BrokenCommits(store));

        let (status, json) = send(&router, post_task("/api/schedule", json!({}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
    }
}
