//! Web API module for CableTray.
//!
//! This module provides a REST API over the project workspace, enabling a
//! web-based frontend to edit cables, cable types and trays, manage
//! support-spacing overrides, and display the tray loading analysis.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/projects` - List projects in the workspace
//! - `GET /api/projects/{project}` - Load a project snapshot
//! - `PUT /api/projects/{project}` - Create or replace a project snapshot
//! - `GET /api/projects/{project}/analysis` - Tray-type and per-tray analysis
//! - `GET /api/projects/{project}/weights` - Per-tray weights
//! - `GET /api/projects/{project}/overrides` - Support-spacing overrides
//! - `PUT /api/projects/{project}/overrides/{type}` - Set an override
//! - `DELETE /api/projects/{project}/overrides/{type}` - Remove an override
//! - `POST /api/projects/{project}/{cables|cable-types|trays}` - Create a record
//! - `PUT /api/projects/{project}/{cables|cable-types|trays}/{id}` - Replace a record
//! - `DELETE /api/projects/{project}/{cables|cable-types|trays}/{id}` - Delete a record

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::models::{
    Cable, CableId, CableType, CableTypeId, Measurement, OverrideMap, ProjectSnapshot, Tray,
    TrayId,
};
use crate::services::projects::{validate_project_key, ProjectEntry};
use crate::services::weights::{resolve_weights, WeightReport};
use crate::services::{analyze_project, EditError, ProjectAnalysis, ProjectStore};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web API.
#[derive(Clone)]
pub struct AppState {
    /// Project workspace. Clones share its write lock.
    store: ProjectStore,
}

impl AppState {
    /// Creates a new application state over a workspace directory.
    #[must_use]
    pub fn new(workspace_root: PathBuf) -> Self {
        Self {
            store: ProjectStore::new(workspace_root),
        }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Project list response.
#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    /// Projects in the workspace, sorted by key.
    pub projects: Vec<ProjectEntry>,
}

/// Override update request.
#[derive(Debug, Deserialize)]
pub struct OverrideRequest {
    /// Support spacing for the tray type.
    pub spacing: f64,
}

/// Response for record creation.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    /// Identifier assigned to the new record.
    pub id: u64,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Error half of every handler result.
type ApiFailure = (StatusCode, Json<ApiError>);

/// Result type for handlers.
type ApiResult<T> = Result<T, ApiFailure>;

fn bad_request(error: &str, details: impl Into<String>) -> ApiFailure {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError::with_details(error, details)),
    )
}

fn internal(error: &str, details: impl Into<String>) -> ApiFailure {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::with_details(error, details)),
    )
}

fn not_found(error: String) -> ApiFailure {
    (StatusCode::NOT_FOUND, Json(ApiError::new(error)))
}

/// Maps a failed store edit to a response.
fn edit_failure(error: EditError) -> ApiFailure {
    match error {
        EditError::NotFound(key) => not_found(format!("Project not found: {key}")),
        EditError::Rejected(e) => bad_request("Edit rejected", e.to_string()),
        EditError::Storage(e) => internal("Failed to update project", format!("{e:#}")),
    }
}

// ============================================================================
// Store Access
// ============================================================================

/// Validates the project key from the path.
fn project_key(key: &str) -> ApiResult<&str> {
    validate_project_key(key).map_err(|e| bad_request("Invalid project name", e.to_string()))
}

/// Loads a project, mapping a missing file to 404.
fn load_project(state: &AppState, key: &str) -> ApiResult<ProjectSnapshot> {
    let key = project_key(key)?;
    if !state.store.exists(key) {
        return Err(not_found(format!("Project not found: {key}")));
    }
    state
        .store
        .load(key)
        .map_err(|e| internal("Failed to load project", format!("{e:#}")))
}

fn load_overrides(state: &AppState, key: &str) -> ApiResult<OverrideMap> {
    state
        .store
        .load_overrides(key)
        .map_err(|e| internal("Failed to load overrides", format!("{e:#}")))
}

/// Applies an edit to a stored project under the store lock.
///
/// Edit failures are client errors and leave the file untouched.
fn edit_project<T>(
    state: &AppState,
    key: &str,
    edit: impl FnOnce(&mut ProjectSnapshot) -> anyhow::Result<T>,
) -> ApiResult<T> {
    let key = project_key(key)?;
    state.store.update(key, edit).map_err(edit_failure)
}

/// Deserializes a record body, filling in `id` when the client left it out.
fn record_with_id<T: DeserializeOwned>(mut body: Value, id: u64) -> anyhow::Result<T> {
    let Some(object) = body.as_object_mut() else {
        anyhow::bail!("Record must be a JSON object");
    };
    object.insert("id".to_string(), Value::from(id));
    serde_json::from_value(body).map_err(|e| anyhow::anyhow!("Invalid record: {e}"))
}

/// Parses a record body for an existing id, outside the store lock.
fn parse_record<T: DeserializeOwned>(body: Value, id: u64) -> ApiResult<T> {
    record_with_id(body, id).map_err(|e| bad_request("Invalid record", e.to_string()))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /health - Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/projects - List all projects in the workspace.
async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<ProjectListResponse>> {
    if !state.store.root().exists() {
        return Ok(Json(ProjectListResponse {
            projects: Vec::new(),
        }));
    }
    let projects = state
        .store
        .list()
        .map_err(|e| internal("Failed to read workspace directory", format!("{e:#}")))?;
    Ok(Json(ProjectListResponse { projects }))
}

/// GET /api/projects/{project} - Load a project snapshot.
async fn get_project(
    State(state): State<AppState>,
    Path(project): Path<String>,
) -> ApiResult<Json<ProjectSnapshot>> {
    load_project(&state, &project).map(Json)
}

/// PUT /api/projects/{project} - Create or replace a project snapshot.
async fn save_project(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Json(snapshot): Json<ProjectSnapshot>,
) -> ApiResult<StatusCode> {
    let key = project_key(&project)?;
    snapshot
        .validate()
        .map_err(|e| bad_request("Invalid project", e.to_string()))?;
    state
        .store
        .save(key, &snapshot)
        .map_err(|e| internal("Failed to save project", format!("{e:#}")))?;
    info!(project = key, "Saved project");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/projects/{project}/analysis - Full tray loading analysis.
async fn get_analysis(
    State(state): State<AppState>,
    Path(project): Path<String>,
) -> ApiResult<Json<ProjectAnalysis>> {
    let snapshot = load_project(&state, &project)?;
    let overrides = load_overrides(&state, &project)?;
    Ok(Json(analyze_project(&snapshot, &overrides)))
}

/// GET /api/projects/{project}/weights - Per-tray weights.
async fn get_weights(
    State(state): State<AppState>,
    Path(project): Path<String>,
) -> ApiResult<Json<WeightReport>> {
    let snapshot = load_project(&state, &project)?;
    Ok(Json(resolve_weights(
        &snapshot.cables,
        &snapshot.cable_types,
        &snapshot.trays,
    )))
}

/// GET /api/projects/{project}/overrides - Support-spacing overrides.
async fn get_overrides(
    State(state): State<AppState>,
    Path(project): Path<String>,
) -> ApiResult<Json<OverrideMap>> {
    // Overrides may be declared before the project has any data
    let key = project_key(&project)?;
    load_overrides(&state, key).map(Json)
}

/// PUT /api/projects/{project}/overrides/{type} - Set an override.
async fn set_override(
    State(state): State<AppState>,
    Path((project, type_name)): Path<(String, String)>,
    Json(request): Json<OverrideRequest>,
) -> ApiResult<Json<Option<Measurement>>> {
    let key = project_key(&project)?;
    let previous = state
        .store
        .update_overrides(key, |o| o.set(&type_name, request.spacing))
        .map_err(|e| match e {
            EditError::Rejected(e) => bad_request("Invalid override", e.to_string()),
            other => edit_failure(other),
        })?;
    info!(project = key, tray_type = %type_name, spacing = request.spacing, "Set override");
    Ok(Json(previous))
}

/// DELETE /api/projects/{project}/overrides/{type} - Remove an override.
async fn delete_override(
    State(state): State<AppState>,
    Path((project, type_name)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let key = project_key(&project)?;
    state
        .store
        .update_overrides(key, |o| {
            o.remove(&type_name)
                .ok_or_else(|| anyhow::anyhow!("No override for tray type '{type_name}'"))
        })
        .map_err(|e| match e {
            EditError::Rejected(e) => not_found(e.to_string()),
            other => edit_failure(other),
        })?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/projects/{project}/cable-types - Create a cable type.
async fn create_cable_type(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let id = edit_project(&state, &project, |p| {
        let cable_type: CableType = record_with_id(body, p.next_cable_type_id()?)?;
        let id = cable_type.id;
        p.add_cable_type(cable_type)?;
        Ok(id)
    })?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// PUT /api/projects/{project}/cable-types/{id} - Replace a cable type.
async fn update_cable_type(
    State(state): State<AppState>,
    Path((project, id)): Path<(String, CableTypeId)>,
    Json(body): Json<Value>,
) -> ApiResult<StatusCode> {
    let cable_type: CableType = parse_record(body, id)?;
    edit_project(&state, &project, |p| p.update_cable_type(cable_type))?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/projects/{project}/cable-types/{id} - Delete an unused cable type.
async fn delete_cable_type(
    State(state): State<AppState>,
    Path((project, id)): Path<(String, CableTypeId)>,
) -> ApiResult<StatusCode> {
    edit_project(&state, &project, |p| p.remove_cable_type(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/projects/{project}/cables - Create a cable.
async fn create_cable(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let id = edit_project(&state, &project, |p| {
        let cable: Cable = record_with_id(body, p.next_cable_id()?)?;
        let id = cable.id;
        p.add_cable(cable)?;
        Ok(id)
    })?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// PUT /api/projects/{project}/cables/{id} - Replace a cable.
async fn update_cable(
    State(state): State<AppState>,
    Path((project, id)): Path<(String, CableId)>,
    Json(body): Json<Value>,
) -> ApiResult<StatusCode> {
    let cable: Cable = parse_record(body, id)?;
    edit_project(&state, &project, |p| p.update_cable(cable))?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/projects/{project}/cables/{id} - Delete a cable.
async fn delete_cable(
    State(state): State<AppState>,
    Path((project, id)): Path<(String, CableId)>,
) -> ApiResult<StatusCode> {
    edit_project(&state, &project, |p| p.remove_cable(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/projects/{project}/trays - Create a tray.
async fn create_tray(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let id = edit_project(&state, &project, |p| {
        let tray: Tray = record_with_id(body, p.next_tray_id()?)?;
        let id = tray.id;
        p.add_tray(tray)?;
        Ok(id)
    })?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// PUT /api/projects/{project}/trays/{id} - Replace a tray.
async fn update_tray(
    State(state): State<AppState>,
    Path((project, id)): Path<(String, TrayId)>,
    Json(body): Json<Value>,
) -> ApiResult<StatusCode> {
    let tray: Tray = parse_record(body, id)?;
    edit_project(&state, &project, |p| p.update_tray(tray))?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/projects/{project}/trays/{id} - Delete a tray and detach its cables.
async fn delete_tray(
    State(state): State<AppState>,
    Path((project, id)): Path<(String, TrayId)>,
) -> ApiResult<StatusCode> {
    let detached = edit_project(&state, &project, |p| p.remove_tray(id).map(|(_, n)| n))?;
    if detached > 0 {
        warn!(project = %project, tray = id, detached, "Detached cables from deleted tray");
    }
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    // The server is meant to run next to a local frontend; restrict origins
    // before exposing it on a shared network.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Project endpoints
        .route("/api/projects", get(list_projects))
        .route("/api/projects/{project}", get(get_project).put(save_project))
        .route("/api/projects/{project}/analysis", get(get_analysis))
        .route("/api/projects/{project}/weights", get(get_weights))
        // Override endpoints
        .route("/api/projects/{project}/overrides", get(get_overrides))
        .route(
            "/api/projects/{project}/overrides/{type_name}",
            put(set_override).delete(delete_override),
        )
        // Record endpoints
        .route(
            "/api/projects/{project}/cable-types",
            post(create_cable_type),
        )
        .route(
            "/api/projects/{project}/cable-types/{id}",
            put(update_cable_type).delete(delete_cable_type),
        )
        .route("/api/projects/{project}/cables", post(create_cable))
        .route(
            "/api/projects/{project}/cables/{id}",
            put(update_cable).delete(delete_cable),
        )
        .route("/api/projects/{project}/trays", post(create_tray))
        .route(
            "/api/projects/{project}/trays/{id}",
            put(update_tray).delete(delete_tray),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the web server.
///
/// # Arguments
///
/// * `workspace_root` - Directory containing project files
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(workspace_root: PathBuf, addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(workspace_root);
    let app = create_router(state);

    info!("Starting CableTray web server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
