use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use examroom_core::{
    apply_view, check_candidate, compute_room_stats, count_orphaned, find_unassigned, Assignment,
    ConflictPolicy, Course, DashboardView, Department, EntityId, Room, RoomStat, ScheduleEntry,
    Snapshot, Student, UtilizationSummary, ViewConfig, Viewable,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::error::AppError;

const OPENAPI_SPEC: &str = include_str!("../../../openapi.yaml");
const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Exam Room API Docs</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            SwaggerUIBundle({
                url: '/openapi.yaml',
                dom_id: '#swagger-ui',
                presets: [SwaggerUIBundle.presets.apis],
                layout: 'BaseLayout',
            });
        };
    </script>
</body>
</html>"#;
const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Exam Room Engine</title>
</head>
<body>
    <h1>Exam Room Engine API</h1>
    <h2>API Endpoints:</h2>
    <ul>
        <li>GET /api/health - Health check</li>
        <li>POST /api/reports/rooms - Per-room utilization</li>
        <li>POST /api/reports/unassigned - Students without a seat</li>
        <li>POST /api/reports/dashboard - Full reports view for a snapshot</li>
        <li>POST /api/schedules/check - Validate a booking and find double bookings</li>
        <li>POST /api/views/{collection} - Search, filter, sort and paginate a table</li>
        <li>GET /docs - API documentation</li>
    </ul>
</body>
</html>"#;

#[derive(Clone)]
pub struct AppState {
    pub conflict_policy: ConflictPolicy,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_ui))
        .route("/api/health", get(health_check))
        .route("/api/reports/rooms", post(room_report))
        .route("/api/reports/unassigned", post(unassigned_report))
        .route("/api/reports/dashboard", post(dashboard))
        .route("/api/schedules/check", post(check_schedule))
        .route("/api/views/:collection", post(view_collection))
        .route("/openapi.yaml", get(serve_openapi_spec))
        .route("/docs", get(serve_swagger_ui))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "examroom-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Deserialize)]
struct RoomReportRequest {
    rooms: Vec<Room>,
    #[serde(default)]
    assignments: Vec<Assignment>,
}

#[derive(Debug, Serialize)]
struct RoomReportResponse {
    room_stats: Vec<RoomStat>,
    summary: UtilizationSummary,
}

async fn room_report(Json(request): Json<RoomReportRequest>) -> Json<RoomReportResponse> {
    info!(
        "Room report for {} rooms and {} assignments",
        request.rooms.len(),
        request.assignments.len()
    );

    let room_stats = compute_room_stats(&request.rooms, &request.assignments);
    let orphaned = count_orphaned(&request.rooms, &request.assignments);
    let summary = UtilizationSummary::from_stats(&room_stats, orphaned, 0);

    Json(RoomReportResponse {
        room_stats,
        summary,
    })
}

#[derive(Debug, Deserialize)]
struct UnassignedRequest {
    students: Vec<Student>,
    #[serde(default)]
    assignments: Vec<Assignment>,
}

async fn unassigned_report(Json(request): Json<UnassignedRequest>) -> Json<Vec<Student>> {
    let unassigned = find_unassigned(&request.students, &request.assignments);
    info!(
        "{} of {} students have no assignment",
        unassigned.len(),
        request.students.len()
    );
    Json(unassigned)
}

async fn dashboard(Json(snapshot): Json<Snapshot>) -> Json<DashboardView> {
    let view = snapshot.dashboard();
    info!(
        "Dashboard: {} rooms, {:.1}% overall utilization, {} over capacity",
        view.summary.total_rooms,
        view.summary.overall_utilization_pct,
        view.summary.over_capacity_rooms
    );
    Json(view)
}

#[derive(Debug, Deserialize)]
struct ScheduleCheckRequest {
    candidate: ScheduleEntry,
    #[serde(default)]
    existing: Vec<ScheduleEntry>,
    /// Id of the stored entry the candidate replaces, when editing
    #[serde(default)]
    exclude_id: Option<EntityId>,
    /// Overrides the server default
    #[serde(default)]
    policy: Option<ConflictPolicy>,
}

#[derive(Debug, Serialize)]
struct ScheduleCheckResponse {
    conflicts: Vec<ScheduleEntry>,
    policy: ConflictPolicy,
}

/// Validates a candidate booking; conflicts block it only under `enforce`.
async fn check_schedule(
    State(state): State<AppState>,
    Json(request): Json<ScheduleCheckRequest>,
) -> Result<Json<ScheduleCheckResponse>, AppError> {
    let policy = request.policy.unwrap_or(state.conflict_policy);
    let conflicts = check_candidate(
        &request.candidate,
        &request.existing,
        request.exclude_id.as_ref(),
        policy,
    )?;

    Ok(Json(ScheduleCheckResponse { conflicts, policy }))
}

#[derive(Debug, Deserialize)]
struct ViewRequest {
    items: Value,
    #[serde(default)]
    config: ViewConfig,
}

async fn view_collection(
    Path(collection): Path<String>,
    Json(request): Json<ViewRequest>,
) -> Result<Json<Value>, AppError> {
    let page = match collection.as_str() {
        "rooms" => view_of::<Room>(request.items, &request.config)?,
        "students" => view_of::<Student>(request.items, &request.config)?,
        "assignments" => view_of::<Assignment>(request.items, &request.config)?,
        "schedules" => view_of::<ScheduleEntry>(request.items, &request.config)?,
        "courses" => view_of::<Course>(request.items, &request.config)?,
        "departments" => view_of::<Department>(request.items, &request.config)?,
        "room-stats" => view_of::<RoomStat>(request.items, &request.config)?,
        other => {
            return Err(AppError::not_found(format!(
                "Unknown collection '{}'",
                other
            )))
        }
    };

    Ok(Json(page))
}

fn view_of<T>(items: Value, config: &ViewConfig) -> Result<Value, AppError>
where
    T: Viewable + Clone + Serialize + DeserializeOwned,
{
    let items: Vec<T> = serde_json::from_value(items)?;
    let page = apply_view(&items, config);
    Ok(serde_json::to_value(page)?)
}

async fn serve_ui() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn serve_openapi_spec() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("Content-Type", "application/yaml")],
        OPENAPI_SPEC,
    )
}

async fn serve_swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app(conflict_policy: ConflictPolicy) -> Router {
        router(AppState { conflict_policy })
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn schedule(id: Option<u32>, start: &str, end: &str) -> Value {
        json!({
            "id": id,
            "title": "CSC108 Final",
            "type": "exam",
            "building_code": "BA",
            "room_number": "101",
            "date": "2025-12-10",
            "start_time": start,
            "end_time": end,
        })
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(ConflictPolicy::Enforce)
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_room_report_flags_overbooked_room() {
        let body = json!({
            "rooms": [{"id": 1, "building_name": "BA", "room_number": "1130", "capacity": 2}],
            "assignments": [
                {"student_id": "a", "room_id": 1, "student_name": "A"},
                {"student_id": "b", "room_id": 1, "student_name": "B"},
                {"student_id": "c", "room_id": 1, "student_name": "C"},
                {"student_id": "d", "room_id": 9, "student_name": "D"}
            ]
        });

        let (status, value) = post_json(app(ConflictPolicy::Enforce), "/api/reports/rooms", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["room_stats"][0]["assigned_count"], 3);
        assert_eq!(value["room_stats"][0]["status"], "over");
        assert_eq!(value["summary"]["orphaned_assignments"], 1);
    }

    #[tokio::test]
    async fn test_unassigned_report() {
        let body = json!({
            "students": [{"id": 1, "first_name": "Ada"}, {"id": 2, "first_name": "Alan"}],
            "assignments": [{"student_id": 2, "room_id": 1}]
        });

        let (status, value) =
            post_json(app(ConflictPolicy::Enforce), "/api/reports/unassigned", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value.as_array().map(|a| a.len()), Some(1));
        assert_eq!(value[0]["first_name"], "Ada");
    }

    #[tokio::test]
    async fn test_schedule_conflict_enforced_by_default() {
        let body = json!({
            "candidate": schedule(None, "09:00", "11:00"),
            "existing": [schedule(Some(4), "10:00", "12:00")]
        });

        let (status, value) =
            post_json(app(ConflictPolicy::Enforce), "/api/schedules/check", body).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert!(value["error"].as_str().unwrap().contains('4'));
    }

    #[tokio::test]
    async fn test_schedule_conflict_advisory_override() {
        let body = json!({
            "candidate": schedule(None, "09:00", "11:00"),
            "existing": [schedule(Some(4), "10:00", "12:00"), schedule(Some(5), "11:00", "12:00")],
            "policy": "advisory"
        });

        let (status, value) =
            post_json(app(ConflictPolicy::Enforce), "/api/schedules/check", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["conflicts"].as_array().map(|a| a.len()), Some(1));
        assert_eq!(value["policy"], "advisory");
    }

    #[tokio::test]
    async fn test_schedule_edit_excludes_stored_entry() {
        let body = json!({
            "candidate": schedule(Some(4), "09:30", "11:00"),
            "existing": [schedule(Some(4), "09:00", "11:00")]
        });
        let (status, _) =
            post_json(app(ConflictPolicy::Enforce), "/api/schedules/check", body.clone()).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let mut editing = body;
        editing["exclude_id"] = json!(4);
        let (status, value) =
            post_json(app(ConflictPolicy::Enforce), "/api/schedules/check", editing).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["conflicts"], json!([]));
    }

    #[tokio::test]
    async fn test_dashboard_reports_orphans_and_unassigned() {
        let body = json!({
            "rooms": [
                {"id": 1, "building_name": "BA", "room_number": "1130", "capacity": 2},
                {"id": 2, "building_name": "SS", "room_number": "2117", "capacity": 100,
                 "testing_capacity": 4}
            ],
            "students": [
                {"id": "a", "first_name": "Ada"},
                {"id": "b", "first_name": "Alan"},
                {"id": "c", "first_name": "Grace"}
            ],
            "assignments": [
                {"student_id": "a", "room_id": 1},
                {"student_id": "b", "room_id": 1},
                {"student_id": "x", "room_id": 9}
            ]
        });

        let (status, value) =
            post_json(app(ConflictPolicy::Enforce), "/api/reports/dashboard", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["room_stats"][0]["status"], "full");
        assert_eq!(value["room_stats"][1]["status"], "free");
        assert_eq!(value["room_stats"][1]["capacity"], 4);
        assert_eq!(value["unassigned_students"][0]["first_name"], "Grace");
        assert_eq!(value["summary"]["orphaned_assignments"], 1);
        assert_eq!(value["summary"]["unassigned_students"], 1);
        assert_eq!(value["summary"]["total_capacity"], 6);
        assert_eq!(value["summary"]["full_rooms"], 1);
    }

    #[tokio::test]
    async fn test_schedule_inverted_range_rejected() {
        let body = json!({ "candidate": schedule(None, "12:00", "11:00") });

        let (status, _) =
            post_json(app(ConflictPolicy::Advisory), "/api/schedules/check", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_view_rooms_page() {
        let body = json!({
            "items": [
                {"id": 1, "building_name": "BA", "room_number": "1130", "capacity": 120},
                {"id": 2, "building_name": "SS", "room_number": "2117", "capacity": 40},
                {"id": 3, "building_name": "BA", "room_number": "2135", "capacity": 40}
            ],
            "config": {"search_term": "ba", "sort_by": "capacity", "per_page": 1, "page": 5}
        });

        let (status, value) = post_json(app(ConflictPolicy::Enforce), "/api/views/rooms", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["total_items"], 2);
        assert_eq!(value["page"], 2);
        assert_eq!(value["items"][0]["room_number"], "1130");
    }

    #[tokio::test]
    async fn test_view_unknown_collection() {
        let body = json!({ "items": [] });
        let (status, _) = post_json(app(ConflictPolicy::Enforce), "/api/views/buildings", body).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_view_rejects_malformed_items() {
        let body = json!({ "items": [{"title": "no room"}] });
        let (status, _) = post_json(app(ConflictPolicy::Enforce), "/api/views/schedules", body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
