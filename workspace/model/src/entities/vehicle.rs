use sea_orm::entity::prelude::*;

/// A company vehicle.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Registration plate. Unique across the fleet.
    #[sea_orm(unique)]
    pub registration: String,
    /// Kind of vehicle as entered by the user (car, van, bus, ...).
    #[sea_orm(column_name = "type")]
    pub vehicle_type: String,
    /// Odometer reading used for fuel bookkeeping.
    pub fuel_counter: Option<f64>,
    pub service_date: Option<String>,
    pub insurance_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::trip::Entity")]
    Trip,
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
