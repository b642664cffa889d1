use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{Method, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::{
    error::AppError,
    export::export_projects,
    project::{Project, next_id},
    state::AppState,
    stats::{Statistics, compute},
    utils::{get_fields_from_body, now_timestamp},
};

/// Envelope shared by every successful response.
#[derive(Serialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok() -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data: None,
            filename: None,
        }
    }

    fn with_data(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::ok()
        }
    }

    fn message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

pub async fn list_projects(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Project>> {
    let _guard = state.store_lock.lock().await;
    let projects = state.store.load()?;

    Ok(Json(ApiResponse {
        count: Some(projects.len()),
        ..ApiResponse::with_data(projects)
    }))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Project> {
    let _guard = state.store_lock.lock().await;

    let project = state
        .store
        .load()?
        .into_iter()
        .find(|project| project.matches_id(&id))
        .ok_or(AppError::ProjectNotFound)?;

    Ok(Json(ApiResponse::with_data(project)))
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<Project>>), AppError> {
    let fields = get_fields_from_body(&body)?;

    let _guard = state.store_lock.lock().await;
    let mut projects = state.store.load()?;

    let project = Project::create(next_id(&projects)?, fields, now_timestamp());
    projects.push(project.clone());
    state.store.save(&projects)?;

    info!(
        "Created project {} ({})",
        project.id,
        project.title().unwrap_or("untitled")
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data(project).message("Project created successfully")),
    ))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Project> {
    let fields = get_fields_from_body(&body)?;

    let _guard = state.store_lock.lock().await;
    let mut projects = state.store.load()?;

    let project = projects
        .iter_mut()
        .find(|project| project.matches_id(&id))
        .ok_or(AppError::ProjectNotFound)?;

    project.merge(fields, now_timestamp());
    let project = project.clone();
    state.store.save(&projects)?;

    info!("Updated project {}", project.id);

    Ok(Json(
        ApiResponse::with_data(project).message("Project updated successfully"),
    ))
}

/// Succeeds whether or not the id exists.
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let _guard = state.store_lock.lock().await;
    let mut projects = state.store.load()?;

    let before = projects.len();
    projects.retain(|project| !project.matches_id(&id));
    state.store.save(&projects)?;

    info!("Deleted {} project(s) with id {id}", before - projects.len());

    Ok(Json(
        ApiResponse::ok().message("Project deleted successfully"),
    ))
}

pub async fn stats_handler(State(state): State<Arc<AppState>>) -> ApiResult<Statistics> {
    let _guard = state.store_lock.lock().await;
    let projects = state.store.load()?;

    Ok(Json(ApiResponse::with_data(compute(&projects))))
}

pub async fn export_handler(State(state): State<Arc<AppState>>) -> ApiResult<()> {
    let _guard = state.store_lock.lock().await;
    let projects = state.store.load()?;

    let filename = export_projects(&projects, &state.config.export_dir, Local::now())?;

    Ok(Json(ApiResponse {
        filename: Some(filename),
        ..ApiResponse::ok().message("Projects exported successfully")
    }))
}

/// Catches unknown paths and unsupported methods. Bare OPTIONS requests always succeed.
pub async fn fallback_handler(method: Method) -> Response {
    if method == Method::OPTIONS {
        return (StatusCode::OK, [(CONTENT_TYPE, "application/json")]).into_response();
    }

    AppError::RouteNotFound.into_response()
}
