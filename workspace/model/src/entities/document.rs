use sea_orm::entity::prelude::*;

/// Metadata for an uploaded file. The bytes live on disk at `filepath`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Sanitized file name, also the storage key inside the upload directory.
    pub filename: String,
    pub filepath: String,
    pub file_type: String,
    pub category: String,
    pub upload_date: ChronoDateTimeUtc,
    /// The user who submitted the file.
    pub user_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
