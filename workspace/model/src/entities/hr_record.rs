use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// Status every new HR record starts with. Nothing moves a record out of it.
pub const STATUS_PENDING: &str = "pending";

/// A salary advance or leave request.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "hr_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_name: String,
    /// "advance" or "leave".
    #[sea_orm(column_name = "type")]
    pub record_type: String,
    /// Advance amount. Usually empty for leave.
    #[sea_orm(column_type = "Decimal(Some((16, 2)))", nullable)]
    pub amount: Option<Decimal>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    #[sea_orm(default_value = "pending")]
    pub status: String,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
