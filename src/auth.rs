use std::sync::OnceLock;

use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::Utc;
use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::DEFAULT_ADMIN_PASSWORD;
use crate::session::Identity;

pub const ROLE_ADMIN: &str = "admin";

const DUMMY_PASSWORD: &str = "almid-dummy-password";

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Hash checked for unknown usernames so they cost as much as a wrong password.
fn dummy_hash() -> &'static str {
    DUMMY_HASH.get_or_init(|| hash_password(DUMMY_PASSWORD).unwrap_or_default())
}

/// Authentication-related errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user or wrong password. The two cases are not distinguished.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Checks a username/password pair against the users table.
#[instrument(skip(db, password))]
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<Identity, AuthError> {
    let Some(user) = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?
    else {
        debug!("No user with this username");
        let _ = verify(password, dummy_hash());
        return Err(AuthError::InvalidCredentials);
    };

    if !verify(password, &user.password_hash)? {
        debug!("Password mismatch");
        return Err(AuthError::InvalidCredentials);
    }

    info!(user_id = user.id, "User authenticated");
    Ok(Identity {
        user_id: user.id,
        username: user.username,
        role: user.role,
    })
}

/// Creates the admin account unless a user with that name already exists.
/// Returns whether a row was inserted.
#[instrument(skip(db, password))]
pub async fn seed_admin(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<bool, AuthError> {
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;

    if existing.is_some() {
        debug!("Admin account already present");
        return Ok(false);
    }

    if password == DEFAULT_ADMIN_PASSWORD {
        warn!("Seeding admin account with the default password");
    }

    user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(hash_password(password)?),
        role: Set(ROLE_ADMIN.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Admin account created");
    Ok(true)
}
