//! SeaORM entities for the ALMID administration database.
//! Five independent tables: users, documents, vehicles, trips and HR records.

pub mod document;
pub mod hr_record;
pub mod trip;
pub mod user;
pub mod vehicle;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::document::Entity as Document;
    pub use super::hr_record::Entity as HrRecord;
    pub use super::trip::Entity as Trip;
    pub use super::user::Entity as User;
    pub use super::vehicle::Entity as Vehicle;
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, Database, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set,
        SqlErr,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    fn new_vehicle(name: &str, registration: &str) -> vehicle::ActiveModel {
        vehicle::ActiveModel {
            name: Set(name.to_string()),
            registration: Set(registration.to_string()),
            vehicle_type: Set("bus".to_string()),
            fuel_counter: Set(None),
            service_date: Set(None),
            insurance_date: Set(None),
            notes: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let admin = user::ActiveModel {
            username: Set("admin".to_string()),
            password_hash: Set("not-a-real-hash".to_string()),
            role: Set("admin".to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let sprinter = new_vehicle("Sprinter", "WA12345").insert(&db).await?;

        let trip = trip::ActiveModel {
            vehicle_id: Set(Some(sprinter.id)),
            driver: Set("Jan Kowalski".to_string()),
            date: Set("2026-03-01".to_string()),
            distance: Set(Some(120.5)),
            fuel_used: Set(None),
            destination: Set("Kraków".to_string()),
            purpose: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let document = document::ActiveModel {
            filename: Set("invoice.pdf".to_string()),
            filepath: Set("/tmp/uploads/invoice.pdf".to_string()),
            file_type: Set("pdf".to_string()),
            category: Set("invoice".to_string()),
            upload_date: Set(Utc::now()),
            user_id: Set(Some(admin.id)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let leave = hr_record::ActiveModel {
            employee_name: Set("Anna Nowak".to_string()),
            record_type: Set("advance".to_string()),
            amount: Set(Some(Decimal::new(150000, 2))),
            date_from: Set(None),
            date_to: Set(None),
            status: Set(hr_record::STATUS_PENDING.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        assert_eq!(User::find().count(&db).await?, 1);
        assert_eq!(Vehicle::find().count(&db).await?, 1);
        assert_eq!(Document::find().count(&db).await?, 1);
        assert_eq!(HrRecord::find().count(&db).await?, 1);

        let (found_trip, found_vehicle) = Trip::find_by_id(trip.id)
            .find_also_related(Vehicle)
            .one(&db)
            .await?
            .expect("trip should exist");
        assert_eq!(found_trip.distance, Some(120.5));
        assert_eq!(found_vehicle.map(|v| v.registration), Some("WA12345".to_string()));

        let owner = Document::find_by_id(document.id)
            .find_also_related(User)
            .one(&db)
            .await?
            .and_then(|(_, user)| user);
        assert_eq!(owner.map(|u| u.username), Some("admin".to_string()));

        let stored = HrRecord::find_by_id(leave.id).one(&db).await?.unwrap();
        assert_eq!(stored.amount, Some(Decimal::new(150000, 2)));
        assert_eq!(stored.status, "pending");

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_unique_violation() -> Result<(), DbErr> {
        let db = setup_db().await?;

        new_vehicle("Sprinter", "WA12345").insert(&db).await?;
        let err = new_vehicle("Other", "WA12345")
            .insert(&db)
            .await
            .expect_err("second insert must violate uniqueness");

        assert!(matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))));
        assert_eq!(Vehicle::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_trip_accepts_dangling_vehicle() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let trip = trip::ActiveModel {
            vehicle_id: Set(Some(999)),
            driver: Set("Piotr".to_string()),
            date: Set("2026-01-15".to_string()),
            distance: Set(None),
            fuel_used: Set(None),
            destination: Set("Gdańsk".to_string()),
            purpose: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let (_, vehicle) = Trip::find_by_id(trip.id)
            .find_also_related(Vehicle)
            .one(&db)
            .await?
            .unwrap();
        assert!(vehicle.is_none());
        Ok(())
    }
}
