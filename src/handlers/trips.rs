use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use chrono::Utc;
use model::entities::{trip, vehicle};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::fleet::list_vehicles;
use super::render_page;
use crate::context::AuthContext;
use crate::error::AppResult;
use crate::forms::{optional_f64, optional_i32, optional_text};
use crate::schemas::AppState;
use crate::session::Flash;
use crate::views::{TripRow, TripsView, VehicleRow};

/// Form body of `POST /add_trip`
#[derive(Debug, Default, Deserialize)]
pub struct NewTrip {
    pub vehicle_id: Option<String>,
    pub driver: String,
    pub date: String,
    pub distance: Option<String>,
    pub fuel_used: Option<String>,
    pub destination: String,
    pub purpose: Option<String>,
}

/// Trips with their vehicle, latest date first. A trip whose vehicle does not
/// exist comes back with `None`.
pub async fn list_trips(
    db: &DatabaseConnection,
) -> Result<Vec<(trip::Model, Option<vehicle::Model>)>, DbErr> {
    trip::Entity::find()
        .find_also_related(vehicle::Entity)
        .order_by_desc(trip::Column::Date)
        .order_by_desc(trip::Column::Id)
        .all(db)
        .await
}

/// Logs a trip. The vehicle id is stored as given, even if no such vehicle exists.
#[instrument(skip(db, form), fields(vehicle_id = ?form.vehicle_id))]
pub async fn add_trip(db: &DatabaseConnection, form: NewTrip) -> Result<trip::Model, DbErr> {
    let trip = trip::ActiveModel {
        vehicle_id: Set(optional_i32(form.vehicle_id.as_deref())),
        driver: Set(form.driver.trim().to_string()),
        date: Set(form.date.trim().to_string()),
        distance: Set(optional_f64(form.distance.as_deref())),
        fuel_used: Set(optional_f64(form.fuel_used.as_deref())),
        destination: Set(form.destination.trim().to_string()),
        purpose: Set(optional_text(form.purpose)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(trip_id = trip.id, "Trip logged");
    Ok(trip)
}

#[instrument(skip_all, fields(user = %ctx.identity.username))]
pub async fn trips_page(State(state): State<AppState>, ctx: AuthContext) -> AppResult<Html<String>> {
    let trips = list_trips(&ctx.db).await?;
    let vehicles = list_vehicles(&ctx.db).await?;
    debug!("Listing {} trips", trips.len());

    let body = TripsView {
        trips: trips.into_iter().map(TripRow::from).collect(),
        vehicles: vehicles.into_iter().map(VehicleRow::from).collect(),
    };
    render_page(&state, &ctx, "trips", "Trips", body).await
}

#[instrument(skip_all, fields(user = %ctx.identity.username))]
pub async fn create_trip(
    State(state): State<AppState>,
    ctx: AuthContext,
    Form(form): Form<NewTrip>,
) -> AppResult<Redirect> {
    add_trip(&ctx.db, form).await?;

    if !state.sessions.push_flash(&ctx.session_id, Flash::success("Trip added")).await {
        debug!("Session ended before the flash could be stored");
    }
    Ok(Redirect::to("/trips"))
}
