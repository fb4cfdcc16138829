use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use uuid::Uuid;

use quill_db::Database;
use quill_types::models::{PublicProfile, User};

use crate::convert::{parse_uuid, user_from_row};
use crate::error::{CoreError, CoreResult};

/// The one place plaintext becomes a stored credential. Registration,
/// profile updates, and seeding all hash through here.
pub fn hash_password(plaintext: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| CoreError::Store(anyhow::anyhow!("password hashing failed: {e}")))?
        .to_string();
    Ok(hash)
}

pub fn register(db: &Database, username: &str, email: &str, password: &str) -> CoreResult<User> {
    if db.get_user_by_username(username)?.is_some() {
        return Err(CoreError::DuplicateKey("username"));
    }
    if db.get_user_by_email(email)?.is_some() {
        return Err(CoreError::DuplicateKey("email"));
    }

    let password_hash = hash_password(password)?;
    let id = Uuid::new_v4();
    db.create_user(&id.to_string(), username, email, &password_hash)?;

    // Re-read for the store-assigned created_at.
    let row = db
        .get_user_by_id(&id.to_string())?
        .ok_or(CoreError::NotFound)?;
    Ok(user_from_row(row))
}

/// Login check. Wrong email and wrong password are indistinguishable to
/// the caller; the stored hash is never compared as plaintext.
pub fn verify(db: &Database, email: &str, password: &str) -> CoreResult<User> {
    let row = db
        .get_user_by_email(email)?
        .ok_or(CoreError::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&row.password)
        .map_err(|e| CoreError::Store(anyhow::anyhow!("stored hash unparseable: {e}")))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| CoreError::InvalidCredentials)?;

    Ok(user_from_row(row))
}

pub fn public_profile(db: &Database, user_id: Uuid) -> CoreResult<PublicProfile> {
    let row = db
        .get_user_by_id(&user_id.to_string())?
        .ok_or(CoreError::NotFound)?;
    Ok(PublicProfile {
        id: parse_uuid(&row.id),
        username: row.username,
    })
}
