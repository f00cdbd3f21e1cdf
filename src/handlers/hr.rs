use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use chrono::Utc;
use model::entities::hr_record;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::render_page;
use crate::context::AuthContext;
use crate::error::AppResult;
use crate::forms::{optional_decimal, optional_text};
use crate::schemas::AppState;
use crate::session::Flash;
use crate::views::{HrRow, HrView};

/// Form body of `POST /add_hr`
#[derive(Debug, Default, Deserialize)]
pub struct NewHrRecord {
    pub employee_name: String,
    /// `advance` or `leave`, not enforced.
    #[serde(rename = "type")]
    pub record_type: String,
    pub amount: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

pub async fn list_hr_records(db: &DatabaseConnection) -> Result<Vec<hr_record::Model>, DbErr> {
    hr_record::Entity::find()
        .order_by_desc(hr_record::Column::CreatedAt)
        .order_by_desc(hr_record::Column::Id)
        .all(db)
        .await
}

/// New records always start as pending.
#[instrument(skip(db, form), fields(record_type = %form.record_type))]
pub async fn add_hr_record(db: &DatabaseConnection, form: NewHrRecord) -> Result<hr_record::Model, DbErr> {
    let record = hr_record::ActiveModel {
        employee_name: Set(form.employee_name.trim().to_string()),
        record_type: Set(form.record_type.trim().to_string()),
        amount: Set(optional_decimal(form.amount.as_deref())),
        date_from: Set(optional_text(form.date_from)),
        date_to: Set(optional_text(form.date_to)),
        status: Set(hr_record::STATUS_PENDING.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(record_id = record.id, "HR record added");
    Ok(record)
}

#[instrument(skip_all, fields(user = %ctx.identity.username))]
pub async fn hr_page(State(state): State<AppState>, ctx: AuthContext) -> AppResult<Html<String>> {
    let records = list_hr_records(&ctx.db).await?;
    debug!("Listing {} HR records", records.len());

    let body = HrView {
        records: records.into_iter().map(HrRow::from).collect(),
    };
    render_page(&state, &ctx, "hr", "HR", body).await
}

#[instrument(skip_all, fields(user = %ctx.identity.username))]
pub async fn create_hr_record(
    State(state): State<AppState>,
    ctx: AuthContext,
    Form(form): Form<NewHrRecord>,
) -> AppResult<Redirect> {
    add_hr_record(&ctx.db, form).await?;

    if !state.sessions.push_flash(&ctx.session_id, Flash::success("HR record added")).await {
        debug!("Session ended before the flash could be stored");
    }
    Ok(Redirect::to("/hr"))
}
