use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(string(Users::Role).default("user"))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create documents table. user_id refers to users.id but carries no
        // database constraint.
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(pk_auto(Documents::Id))
                    .col(string(Documents::Filename))
                    .col(string(Documents::Filepath))
                    .col(string(Documents::FileType).default(""))
                    .col(string(Documents::Category))
                    .col(timestamp_with_time_zone(Documents::UploadDate))
                    .col(integer_null(Documents::UserId))
                    .to_owned(),
            )
            .await?;

        // Create vehicles table
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(pk_auto(Vehicles::Id))
                    .col(string(Vehicles::Name))
                    .col(string(Vehicles::Registration).unique_key())
                    .col(string(Vehicles::Type))
                    .col(double_null(Vehicles::FuelCounter))
                    .col(string_null(Vehicles::ServiceDate))
                    .col(string_null(Vehicles::InsuranceDate))
                    .col(text_null(Vehicles::Notes))
                    .col(timestamp_with_time_zone(Vehicles::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create trips table. vehicle_id is deliberately unconstrained so a
        // trip may reference a vehicle that does not exist.
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(pk_auto(Trips::Id))
                    .col(integer_null(Trips::VehicleId))
                    .col(string(Trips::Driver))
                    .col(string(Trips::Date))
                    .col(double_null(Trips::Distance))
                    .col(double_null(Trips::FuelUsed))
                    .col(string(Trips::Destination))
                    .col(text_null(Trips::Purpose))
                    .col(timestamp_with_time_zone(Trips::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create hr_records table
        manager
            .create_table(
                Table::create()
                    .table(HrRecords::Table)
                    .if_not_exists()
                    .col(pk_auto(HrRecords::Id))
                    .col(string(HrRecords::EmployeeName))
                    .col(string(HrRecords::Type))
                    .col(decimal_len_null(HrRecords::Amount, 16, 2))
                    .col(string_null(HrRecords::DateFrom))
                    .col(string_null(HrRecords::DateTo))
                    .col(string(HrRecords::Status).default("pending"))
                    .col(timestamp_with_time_zone(HrRecords::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trips_vehicle_id")
                    .table(Trips::Table)
                    .col(Trips::VehicleId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HrRecords::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Documents {
    Table,
    Id,
    Filename,
    Filepath,
    FileType,
    Category,
    UploadDate,
    UserId,
}

#[derive(DeriveIden)]
enum Vehicles {
    Table,
    Id,
    Name,
    Registration,
    Type,
    FuelCounter,
    ServiceDate,
    InsuranceDate,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Trips {
    Table,
    Id,
    VehicleId,
    Driver,
    Date,
    Distance,
    FuelUsed,
    Destination,
    Purpose,
    CreatedAt,
}

#[derive(DeriveIden)]
enum HrRecords {
    Table,
    Id,
    EmployeeName,
    Type,
    Amount,
    DateFrom,
    DateTo,
    Status,
    CreatedAt,
}
