use axum::Json;
use axum::extract::{Path, State};
use serde_json::Value;
use tracing::debug;
use ydocs_common::Record;

use crate::into_http::HttpError;
use crate::startup::AppState;

#[tracing::instrument(name = "documents.list", skip(app))]
pub async fn documents(State(app): State<AppState>) -> Result<Json<Vec<Record>>, HttpError> {
    let documents = app.load_all().await?;
    debug!(count = documents.len());

    Ok(Json(
        documents
            .into_iter()
            .map(|document| document.record)
            .collect(),
    ))
}

#[tracing::instrument(name = "documents.names", skip(app))]
pub async fn document_names(State(app): State<AppState>) -> Result<Json<Vec<String>>, HttpError> {
    let documents = app.load_all().await?;

    Ok(Json(
        documents
            .into_iter()
            .map(|document| document.name)
            .collect(),
    ))
}

#[tracing::instrument(name = "documents.fetch", skip(app))]
pub async fn document(
    Path(document): Path<String>,
    State(app): State<AppState>,
) -> Result<Json<Record>, HttpError> {
    let document = app.load_named(&document).await?;
    Ok(Json(document.record))
}

#[tracing::instrument(name = "documents.sections", skip(app))]
pub async fn document_sections(
    Path(document): Path<String>,
    State(app): State<AppState>,
) -> Result<Json<Vec<String>>, HttpError> {
    let document = app.load_named(&document).await?;
    Ok(Json(document.sections()))
}

#[tracing::instrument(name = "documents.metadata", skip(app))]
pub async fn document_metadata(
    Path(document): Path<String>,
    State(app): State<AppState>,
) -> Result<Json<Record>, HttpError> {
    let document = app.load_named(&document).await?;
    let metadata = document
        .metadata()
        .map_err(|key| HttpError::missing_section(&document.name, key))?;

    Ok(Json(metadata))
}

#[tracing::instrument(name = "documents.document_control", skip(app))]
pub async fn document_control(
    Path(document): Path<String>,
    State(app): State<AppState>,
) -> Result<Json<Record>, HttpError> {
    let document = app.load_named(&document).await?;
    let control = document
        .document_control()
        .map_err(|key| HttpError::missing_section(&document.name, key))?;

    Ok(Json(control))
}

#[tracing::instrument(name = "documents.section", skip(app))]
pub async fn document_section(
    Path((document, section)): Path<(String, String)>,
    State(app): State<AppState>,
) -> Result<Json<Value>, HttpError> {
    let document = app.load_named(&document).await?;

    match document.section(&section) {
        Some(content) => Ok(Json(content.clone())),
        None => Err(HttpError::missing_section(&document.name, &section)),
    }
}
