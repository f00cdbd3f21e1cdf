use axum::response::Html;
use serde::Serialize;

use crate::context::AuthContext;
use crate::error::AppResult;
use crate::schemas::AppState;
use crate::views::Page;

pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod fleet;
pub mod health;
pub mod hr;
pub mod trips;

/// Renders an authenticated page, consuming the session's pending flashes.
/// The template name doubles as the highlighted navigation entry.
pub(crate) async fn render_page<T: Serialize>(
    state: &AppState,
    ctx: &AuthContext,
    template: &str,
    title: &str,
    body: T,
) -> AppResult<Html<String>> {
    let flashes = state.sessions.take_flashes(&ctx.session_id).await;
    let page = Page {
        title,
        nav: template,
        user: Some(&ctx.identity),
        flashes,
        body,
    };
    state.views.render(template, &page)
}
