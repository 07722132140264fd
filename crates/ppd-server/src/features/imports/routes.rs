//! Import routes
//!
//! - `POST /` — multipart upload, runs the ingestion pipeline synchronously
//! - `GET /` — list recent import jobs (status/uploader filters)
//! - `GET /:id` — one job plus a bounded sample of its records

use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::features::FeatureState;
use crate::ingest::IngestError;
use crate::models::{ImportSource, ModuleKind};

use super::commands::upload::{
    handle as handle_upload, UploadImportCommand, UploadImportError,
};
use super::queries::get_import::{handle as handle_get_import, GetImportError, GetImportQuery};
use super::queries::list_imports::{
    handle as handle_list_imports, ListImportsError, ListImportsQuery,
};

/// Create import routes
pub fn imports_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(upload_import).get(list_imports))
        .route("/:id", get(get_import))
}

/// Upload a performance-record file
///
/// POST / (multipart: file, source, module, uploaded_by)
async fn upload_import(
    State(state): State<FeatureState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let command = command_from_multipart(multipart).await?;

    match handle_upload(state.pipeline.clone(), state.db.clone(), command).await {
        Ok(response) => Ok(Json(response).into_response()),
        Err(err) => Err(map_upload_error(err)),
    }
}

/// List recent import jobs
///
/// GET /?status=failed&uploaded_by=admin&limit=50
async fn list_imports(
    State(state): State<FeatureState>,
    Query(query): Query<ListImportsQuery>,
) -> Result<Response, AppError> {
    match handle_list_imports(state.db.clone(), query).await {
        Ok(response) => Ok(Json(response).into_response()),
        Err(ListImportsError::InvalidStatus(status)) => {
            Err(AppError::BadRequest(format!("Invalid status filter: {}", status)))
        },
        Err(err) => {
            tracing::error!("Failed to list imports: {:?}", err);
            Err(AppError::Internal("Failed to list imports".to_string()))
        },
    }
}

/// Get a specific import job with sample records
///
/// GET /:id
async fn get_import(
    State(state): State<FeatureState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    match handle_get_import(state.db.clone(), GetImportQuery { id }).await {
        Ok(response) => Ok(Json(response).into_response()),
        Err(GetImportError::NotFound(_)) => {
            Err(AppError::NotFound("Import job not found".to_string()))
        },
        Err(err) => {
            tracing::error!("Failed to fetch import: {:?}", err);
            Err(AppError::Internal("Failed to fetch import".to_string()))
        },
    }
}

/// Assemble the upload command from the multipart form
async fn command_from_multipart(mut multipart: Multipart) -> Result<UploadImportCommand, AppError> {
    let mut filename: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;
    let mut source: Option<String> = None;
    let mut module: Option<String> = None;
    let mut uploaded_by: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("file") => {
                filename = field.file_name().map(|f| f.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?;
                content = Some(bytes.to_vec());
            },
            Some("source") => {
                source = Some(read_text_field(field).await?);
            },
            Some("module") => {
                module = Some(read_text_field(field).await?);
            },
            Some("uploaded_by") => {
                uploaded_by = Some(read_text_field(field).await?);
            },
            _ => {},
        }
    }

    let content = content.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let filename =
        filename.ok_or_else(|| AppError::BadRequest("Uploaded file has no filename".to_string()))?;

    let (source, module) = match (source, module) {
        (Some(source), Some(module)) => (source, module),
        _ => return Err(AppError::BadRequest("Source and module are required".to_string())),
    };
    let uploaded_by = uploaded_by
        .ok_or_else(|| AppError::BadRequest("Uploader identity is required".to_string()))?;

    let source: ImportSource = source
        .parse()
        .map_err(|e: anyhow::Error| AppError::BadRequest(e.to_string()))?;
    let module: ModuleKind = module
        .parse()
        .map_err(|e: anyhow::Error| AppError::BadRequest(e.to_string()))?;

    Ok(UploadImportCommand {
        filename,
        source,
        module,
        uploaded_by,
        content,
    })
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form field: {}", e)))
}

/// Map upload failures onto HTTP-facing errors
///
/// Job-level parsing failures are the caller's fault (bad file) and map to
/// 400; store failures stay opaque 500s.
fn map_upload_error(err: UploadImportError) -> AppError {
    match err {
        UploadImportError::Ingest(IngestError::UnsupportedFormat(ext)) => {
            AppError::BadRequest(format!("Unsupported file format: {}", ext))
        },
        UploadImportError::Ingest(IngestError::Parse(message)) => {
            AppError::BadRequest(format!("Failed to parse file: {}", message))
        },
        UploadImportError::Ingest(IngestError::Store(store_err)) => {
            tracing::error!("Store failure during ingestion: {:?}", store_err);
            AppError::Internal("Failed to process file upload".to_string())
        },
        validation => AppError::BadRequest(validation.to_string()),
    }
}
