use sea_orm::entity::prelude::*;

/// One entry of the trip log.
///
/// `vehicle_id` is not checked against `vehicles`; a trip may point at a
/// vehicle that never existed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vehicle_id: Option<i32>,
    pub driver: String,
    /// Trip date as entered (`YYYY-MM-DD` from the form).
    pub date: String,
    /// Kilometres driven.
    pub distance: Option<f64>,
    /// Litres of fuel used.
    pub fuel_used: Option<f64>,
    pub destination: String,
    pub purpose: Option<String>,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vehicle::Entity",
        from = "Column::VehicleId",
        to = "super::vehicle::Column::Id"
    )]
    Vehicle,
}

impl Related<super::vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicle.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
