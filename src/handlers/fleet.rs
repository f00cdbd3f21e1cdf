use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use chrono::Utc;
use model::entities::vehicle;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set, SqlErr};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::render_page;
use crate::context::AuthContext;
use crate::error::AppResult;
use crate::forms::{optional_f64, optional_text};
use crate::schemas::AppState;
use crate::session::Flash;
use crate::views::{FleetView, VehicleRow};

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("A vehicle with registration {0} already exists")]
    DuplicateRegistration(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Form body of `POST /add_vehicle`
#[derive(Debug, Default, Deserialize)]
pub struct NewVehicle {
    pub name: String,
    pub registration: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub fuel_counter: Option<String>,
    pub service_date: Option<String>,
    pub insurance_date: Option<String>,
    pub notes: Option<String>,
}

/// Newest first.
pub async fn list_vehicles(db: &DatabaseConnection) -> Result<Vec<vehicle::Model>, DbErr> {
    vehicle::Entity::find()
        .order_by_desc(vehicle::Column::Id)
        .all(db)
        .await
}

/// Inserts a vehicle. The store's unique index on `registration` decides
/// conflicts, so concurrent duplicates are rejected for all but one request.
#[instrument(skip(db, form), fields(registration = %form.registration))]
pub async fn add_vehicle(db: &DatabaseConnection, form: NewVehicle) -> Result<vehicle::Model, FleetError> {
    let registration = form.registration.trim().to_string();

    let result = vehicle::ActiveModel {
        name: Set(form.name.trim().to_string()),
        registration: Set(registration.clone()),
        vehicle_type: Set(form.vehicle_type.trim().to_string()),
        fuel_counter: Set(optional_f64(form.fuel_counter.as_deref())),
        service_date: Set(optional_text(form.service_date)),
        insurance_date: Set(optional_text(form.insurance_date)),
        notes: Set(optional_text(form.notes)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await;

    match result {
        Ok(vehicle) => {
            info!(vehicle_id = vehicle.id, "Vehicle added");
            Ok(vehicle)
        }
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            warn!("Registration already taken");
            Err(FleetError::DuplicateRegistration(registration))
        }
        Err(err) => Err(err.into()),
    }
}

#[instrument(skip_all, fields(user = %ctx.identity.username))]
pub async fn fleet_page(State(state): State<AppState>, ctx: AuthContext) -> AppResult<Html<String>> {
    let vehicles = list_vehicles(&ctx.db).await?;
    debug!("Listing {} vehicles", vehicles.len());

    let body = FleetView {
        vehicles: vehicles.into_iter().map(VehicleRow::from).collect(),
    };
    render_page(&state, &ctx, "fleet", "Fleet", body).await
}

#[instrument(skip_all, fields(user = %ctx.identity.username))]
pub async fn create_vehicle(
    State(state): State<AppState>,
    ctx: AuthContext,
    Form(form): Form<NewVehicle>,
) -> AppResult<Redirect> {
    let flash = match add_vehicle(&ctx.db, form).await {
        Ok(_) => Flash::success("Vehicle added"),
        Err(err @ FleetError::DuplicateRegistration(_)) => Flash::error(err.to_string()),
        Err(FleetError::Database(e)) => return Err(e.into()),
    };

    if !state.sessions.push_flash(&ctx.session_id, flash).await {
        debug!("Session ended before the flash could be stored");
    }
    Ok(Redirect::to("/fleet"))
}
