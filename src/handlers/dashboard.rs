use axum::{extract::State, response::Html};
use model::entities::{document, hr_record, trip, vehicle};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};
use tracing::instrument;

use super::render_page;
use crate::context::AuthContext;
use crate::error::AppResult;
use crate::schemas::AppState;
use crate::views::{DashboardView, VehicleRow};

const RECENT_VEHICLES: u64 = 5;

/// Row counts of every domain table plus the latest vehicles.
pub async fn dashboard_summary(db: &DatabaseConnection) -> Result<DashboardView, DbErr> {
    let recent_vehicles = vehicle::Entity::find()
        .order_by_desc(vehicle::Column::Id)
        .limit(RECENT_VEHICLES)
        .all(db)
        .await?;

    Ok(DashboardView {
        document_count: document::Entity::find().count(db).await?,
        vehicle_count: vehicle::Entity::find().count(db).await?,
        trip_count: trip::Entity::find().count(db).await?,
        hr_count: hr_record::Entity::find().count(db).await?,
        recent_vehicles: recent_vehicles.into_iter().map(VehicleRow::from).collect(),
    })
}

#[instrument(skip_all, fields(user = %ctx.identity.username))]
pub async fn dashboard(State(state): State<AppState>, ctx: AuthContext) -> AppResult<Html<String>> {
    let summary = dashboard_summary(&ctx.db).await?;
    render_page(&state, &ctx, "dashboard", "Dashboard", summary).await
}
