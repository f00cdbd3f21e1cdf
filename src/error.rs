use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Infrastructure failures that abort a request with a 500 page.
///
/// User mistakes (bad credentials, duplicate registration, empty upload) are
/// not represented here; handlers turn those into flash messages.
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Error from rendering a Handlebars view
    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// Error from reading or writing files on disk
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while reading a multipart request body
    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    /// Error from bcrypt
    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self, "Request failed");

        let status = match &self {
            // Malformed multipart bodies are the client's fault.
            AppError::Multipart(e) => e.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = format!(
            "<!DOCTYPE html><html><head><title>Error</title></head>\
             <body><h1>{}</h1><p>Something went wrong while handling the request.</p>\
             <p><a href=\"/dashboard\">Back to dashboard</a></p></body></html>",
            status
        );

        (status, Html(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
