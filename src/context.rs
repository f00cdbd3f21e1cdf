//! Per-request session resolution.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};
use sea_orm::DatabaseConnection;
use std::convert::Infallible;
use tracing::debug;

use crate::schemas::AppState;
use crate::session::{Identity, Session};

/// The logged-in user of the current request together with the database
/// handle the handler should use.
///
/// Extracting it from a request without a valid authenticated session
/// rejects with a redirect to the login page.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub session_id: String,
    pub identity: Identity,
    pub db: DatabaseConnection,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(session_id) = state.sessions.session_id_from_headers(&parts.headers) else {
            debug!(path = %parts.uri.path(), "No session cookie, redirecting to login");
            return Err(Redirect::to("/login"));
        };

        match state.sessions.get(&session_id).await {
            Some(Session { identity: Some(identity), .. }) => Ok(Self {
                session_id,
                identity,
                db: state.db.clone(),
            }),
            _ => {
                debug!(path = %parts.uri.path(), "Session is anonymous or expired, redirecting to login");
                Err(Redirect::to("/login"))
            }
        }
    }
}

/// Whatever session the request carries, authenticated or not.
#[derive(Debug, Clone, Default)]
pub struct MaybeSession {
    pub session_id: Option<String>,
    pub session: Option<Session>,
}

impl MaybeSession {
    pub fn identity(&self) -> Option<&Identity> {
        self.session.as_ref().and_then(|s| s.identity.as_ref())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(session_id) = state.sessions.session_id_from_headers(&parts.headers) else {
            return Ok(Self::default());
        };

        let session = state.sessions.get(&session_id).await;
        Ok(Self { session_id: session.as_ref().map(|_| session_id), session })
    }
}
