//! REST backend
//!
//! Serves both catalogs, protocol field retrieval and report submission
//! under `/api`, backed by a shared `MemoryStore`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use motortest_common::store::{MemoryStore, Stored};
use motortest_common::{
    Error, Motor, NamedOption, ProtocolField, RecordId, StoredReport, TestReport, Tool,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

type AppState = Arc<MemoryStore>;

/// Web server
#[derive(Clone)]
pub struct WebServer {
    store: AppState,
}

impl WebServer {
    pub fn new(store: MemoryStore) -> Self {
        Self::with_store(Arc::new(store))
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<MemoryStore> {
        self.store.clone()
    }

    /// Build the router
    pub fn router(&self) -> Router {
        let api = Router::new()
            .route("/health", get(health_handler))
            .route("/tools", get(list_handler::<Tool>).post(create_handler::<Tool>))
            .route(
                "/tools/:id",
                get(get_handler::<Tool>)
                    .put(update_handler::<Tool>)
                    .delete(delete_handler::<Tool>),
            )
            .route("/motors", get(list_handler::<Motor>).post(create_handler::<Motor>))
            .route(
                "/motors/:id",
                get(get_handler::<Motor>)
                    .put(update_handler::<Motor>)
                    .delete(delete_handler::<Motor>),
            )
            .route("/templates", get(templates_handler))
            .route("/motor-types", get(motor_types_handler))
            .route("/protocol-fields", get(protocol_fields_handler))
            .route("/test-reports", get(list_reports_handler).post(submit_report_handler));

        Router::new()
            .nest("/api", api)
            .fallback(not_found_handler)
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .layer(TraceLayer::new_for_http())
            .with_state(self.store.clone())
    }

    /// Start the web server
    pub async fn serve(self, addr: SocketAddr) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        self.serve_listener(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve_listener(self, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
        info!("MotorTest API listening on http://{}/api", listener.local_addr()?);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

impl Default for WebServer {
    fn default() -> Self {
        Self::new(MemoryStore::seeded())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Store error rendered as a JSON error response
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::InvalidRequest(_) | Error::Serialization(_) => StatusCode::BAD_REQUEST,
            Error::MissingMotor => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        }
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Handlers
// ============================================================================

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "motortest-web",
        "version": motortest_common::VERSION,
    }))
}

async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}

async fn list_handler<R: Stored>(State(store): State<AppState>) -> Json<Vec<R>> {
    Json(store.list::<R>())
}

async fn get_handler<R: Stored>(
    State(store): State<AppState>,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<R>> {
    store
        .list::<R>()
        .into_iter()
        .find(|r| r.id() == id)
        .map(Json)
        .ok_or_else(|| Error::not_found(R::KIND, id).into())
}

async fn create_handler<R: Stored>(
    State(store): State<AppState>,
    Json(draft): Json<R::Draft>,
) -> impl IntoResponse {
    let record = store.insert::<R>(draft);
    info!("Created {} {}", R::KIND, record.id());
    (StatusCode::CREATED, Json(record))
}

async fn update_handler<R: Stored>(
    State(store): State<AppState>,
    Path(id): Path<RecordId>,
    Json(record): Json<R>,
) -> ApiResult<Json<R>> {
    let record = store.replace(id, record)?;
    info!("Updated {} {}", R::KIND, id);
    Ok(Json(record))
}

async fn delete_handler<R: Stored>(
    State(store): State<AppState>,
    Path(id): Path<RecordId>,
) -> ApiResult<StatusCode> {
    store.remove::<R>(id)?;
    info!("Deleted {} {}", R::KIND, id);
    Ok(StatusCode::NO_CONTENT)
}

async fn templates_handler(State(store): State<AppState>) -> Json<Vec<NamedOption>> {
    Json(store.templates())
}

async fn motor_types_handler(State(store): State<AppState>) -> Json<Vec<NamedOption>> {
    Json(store.motor_types())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProtocolFieldsQuery {
    template_id: Option<String>,
    motor_type_id: Option<String>,
}

async fn protocol_fields_handler(
    State(store): State<AppState>,
    Query(query): Query<ProtocolFieldsQuery>,
) -> ApiResult<Json<Vec<ProtocolField>>> {
    let required = |value: Option<String>, name: &str| {
        value
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::InvalidRequest(format!("{} is required", name)))
    };
    let template_id = required(query.template_id, "templateId")?;
    let motor_type_id = required(query.motor_type_id, "motorTypeId")?;

    Ok(Json(store.protocol_fields(&template_id, &motor_type_id)?))
}

async fn submit_report_handler(
    State(store): State<AppState>,
    Json(report): Json<TestReport>,
) -> StatusCode {
    store.record_report(report);
    StatusCode::NO_CONTENT
}

async fn list_reports_handler(State(store): State<AppState>) -> Json<Vec<StoredReport>> {
    Json(store.reports())
}

#[cfg(test)]
mod tests {
    use super::*;
    use motortest_common::NewTool;

    async fn spawn() -> (String, Arc<MemoryStore>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/api", listener.local_addr().unwrap());
        let server = WebServer::default();
        let store = server.store();
        tokio::spawn(server.serve_listener(listener));
        (base, store)
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(ApiError(Error::not_found("tool", 1)).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError(Error::InvalidRequest("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(Error::Transport("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_health() {
        let (base, _) = spawn().await;
        let resp = reqwest::get(format!("{}/health", base)).await.unwrap();
        assert!(resp.status().is_success());
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_returns_created_with_id() {
        let (base, store) = spawn().await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("{}/tools", base))
            .json(&NewTool::new("Multimeter2", "MM099", "Electrical"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

        let tool: Tool = resp.json().await.unwrap();
        assert_eq!(tool.id, 7);
        assert_eq!(store.list::<Tool>().last(), Some(&tool));
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let (base, _) = spawn().await;
        let client = reqwest::Client::new();

        let resp = client.delete(format!("{}/motors/77", base)).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        let resp = client.delete(format!("{}/motors/6", base)).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_update_id_mismatch_is_bad_request() {
        let (base, _) = spawn().await;
        let client = reqwest::Client::new();
        let tool = motortest_common::seed::tools().remove(0);

        let resp = client
            .put(format!("{}/tools/2", base))
            .json(&tool)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_templates_and_motor_types() {
        let (base, _) = spawn().await;

        let templates: Vec<NamedOption> = reqwest::get(format!("{}/templates", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let ids: Vec<_> = templates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["template1", "template2", "template3"]);

        let types: Vec<NamedOption> = reqwest::get(format!("{}/motor-types", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(types[1].name, "DC Motor");
    }

    #[tokio::test]
    async fn test_protocol_fields_query() {
        let (base, _) = spawn().await;

        let resp = reqwest::get(format!("{}/protocol-fields?templateId=template2&motorTypeId=type3", base))
            .await
            .unwrap();
        assert!(resp.status().is_success());
        let fields: Vec<ProtocolField> = resp.json().await.unwrap();
        assert_eq!(fields.last().map(ProtocolField::name), Some("Power Factor"));

        let resp = reqwest::get(format!("{}/protocol-fields?templateId=template2", base))
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

        let resp = reqwest::get(format!("{}/protocol-fields?templateId=nope&motorTypeId=type1", base))
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
