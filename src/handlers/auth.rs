use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::auth::{authenticate, AuthError};
use crate::context::MaybeSession;
use crate::error::AppResult;
use crate::schemas::AppState;
use crate::session::{Flash, Session, SessionStore};
use crate::views::{LoginView, Page};

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// `/` sends visitors to the dashboard or the login form.
#[instrument(skip_all)]
pub async fn index(session: MaybeSession) -> Redirect {
    if session.identity().is_some() {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/login")
    }
}

#[instrument(skip_all)]
pub async fn login_page(State(state): State<AppState>, session: MaybeSession) -> AppResult<Response> {
    if session.identity().is_some() {
        debug!("Already logged in");
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let flashes = match &session.session_id {
        Some(id) => state.sessions.take_flashes(id).await,
        None => Vec::new(),
    };

    let page = Page {
        title: "Log in",
        nav: "login",
        user: None,
        flashes,
        body: LoginView {},
    };
    Ok(state.views.render("login", &page)?.into_response())
}

#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: MaybeSession,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    match authenticate(&state.db, &form.username, &form.password).await {
        Ok(identity) => {
            if let Some(previous) = &session.session_id {
                state.sessions.remove(previous).await;
            }
            info!(user_id = identity.user_id, "Login successful");

            let id = state.sessions.create(Session::authenticated(identity)).await;
            Ok((
                [(header::SET_COOKIE, state.sessions.cookie(&id))],
                Redirect::to("/dashboard"),
            )
                .into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            warn!("Login failed");
            let flash = Flash::error(AuthError::InvalidCredentials.to_string());

            if let Some(id) = &session.session_id {
                if state.sessions.push_flash(id, flash.clone()).await {
                    return Ok(Redirect::to("/login").into_response());
                }
            }

            let id = state
                .sessions
                .create(Session { identity: None, flashes: vec![flash] })
                .await;
            Ok((
                [(header::SET_COOKIE, state.sessions.cookie(&id))],
                Redirect::to("/login"),
            )
                .into_response())
        }
        Err(AuthError::Database(e)) => Err(e.into()),
        Err(AuthError::Hash(e)) => Err(e.into()),
    }
}

/// Drops the session, if any, and returns to the login form.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, session: MaybeSession) -> impl IntoResponse {
    if let Some(id) = &session.session_id {
        state.sessions.remove(id).await;
        info!("Logged out");
    }

    (
        [(header::SET_COOKIE, SessionStore::removal_cookie())],
        Redirect::to("/login"),
    )
}
