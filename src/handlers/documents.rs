use std::path::Path;

use axum::{
    extract::{Multipart, State},
    response::{Html, Redirect},
};
use chrono::Utc;
use model::entities::document;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::render_page;
use crate::context::AuthContext;
use crate::error::{AppError, AppResult};
use crate::forms::optional_text;
use crate::schemas::AppState;
use crate::session::Flash;
use crate::uploads::{file_type, secure_filename, store_file};
use crate::views::{DocumentRow, DocumentsView, DOCUMENT_CATEGORIES};

pub const DEFAULT_CATEGORY: &str = "other";

#[derive(Debug, Error)]
pub enum UploadError {
    /// No file part, an empty or unusable file name, or no content.
    #[error("No file selected")]
    MissingFile,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A file as received from the upload form.
#[derive(Debug, Default)]
pub struct NewDocument {
    /// File name as sent by the browser, before sanitizing.
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub category: Option<String>,
}

pub async fn list_documents(db: &DatabaseConnection) -> Result<Vec<document::Model>, DbErr> {
    document::Entity::find()
        .order_by_desc(document::Column::UploadDate)
        .order_by_desc(document::Column::Id)
        .all(db)
        .await
}

/// Writes the file into `upload_dir` under its sanitized name and records it.
/// An existing file with the same name is overwritten.
#[instrument(skip(db, upload), fields(filename = %upload.filename, size = upload.bytes.len()))]
pub async fn upload_document(
    db: &DatabaseConnection,
    upload_dir: &Path,
    user_id: i32,
    upload: NewDocument,
) -> Result<document::Model, UploadError> {
    if upload.bytes.is_empty() {
        return Err(UploadError::MissingFile);
    }

    let filename = secure_filename(&upload.filename);
    if filename.is_empty() {
        return Err(UploadError::MissingFile);
    }

    let path = store_file(upload_dir, &filename, &upload.bytes).await?;

    let stored = document::ActiveModel {
        file_type: Set(file_type(&filename, upload.content_type.as_deref())),
        filepath: Set(path.to_string_lossy().into_owned()),
        filename: Set(filename),
        category: Set(optional_text(upload.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string())),
        upload_date: Set(Utc::now()),
        user_id: Set(Some(user_id)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(document_id = stored.id, path = %stored.filepath, "Document stored");
    Ok(stored)
}

#[instrument(skip_all, fields(user = %ctx.identity.username))]
pub async fn documents_page(State(state): State<AppState>, ctx: AuthContext) -> AppResult<Html<String>> {
    let documents = list_documents(&ctx.db).await?;
    debug!("Listing {} documents", documents.len());

    let body = DocumentsView {
        documents: documents.into_iter().map(DocumentRow::from).collect(),
        categories: DOCUMENT_CATEGORIES,
    };
    render_page(&state, &ctx, "documents", "Documents", body).await
}

#[instrument(skip_all, fields(user = %ctx.identity.username))]
pub async fn upload(
    State(state): State<AppState>,
    ctx: AuthContext,
    mut multipart: Multipart,
) -> AppResult<Redirect> {
    let mut upload = NewDocument::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                upload.filename = field.file_name().unwrap_or_default().to_string();
                upload.content_type = field.content_type().map(str::to_string);
                upload.bytes = field.bytes().await?.to_vec();
            }
            "category" => {
                upload.category = Some(field.text().await?);
            }
            other => debug!(field = other, "Ignoring unexpected form field"),
        }
    }

    let flash = match upload_document(&ctx.db, &state.upload_dir, ctx.identity.user_id, upload).await {
        Ok(document) => Flash::success(format!("Uploaded {}", document.filename)),
        Err(UploadError::MissingFile) => {
            warn!("Upload without a usable file");
            Flash::error(UploadError::MissingFile.to_string())
        }
        Err(UploadError::Io(e)) => return Err(AppError::Io(e)),
        Err(UploadError::Database(e)) => return Err(AppError::Database(e)),
    };

    if !state.sessions.push_flash(&ctx.session_id, flash).await {
        debug!("Session ended before the flash could be stored");
    }
    Ok(Redirect::to("/documents"))
}
