//! Staff PIN authentication
//!
//! PINs are hashed with Argon2 like any other credential; the stored
//! session is keyed by an opaque random token.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::Rng;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{AccessType, Session};
use crate::storage::Database;

pub const PIN_MIN_DIGITS: usize = 4;
pub const PIN_MAX_DIGITS: usize = 8;

/// Session lifetime for operational staff
pub const SESSION_TTL_HOURS: i64 = 8;

const TOKEN_LENGTH: usize = 32;

/// Check PIN shape: digits only, 4 to 8 of them.
///
/// Runs before any database access so malformed input never reaches a query.
pub fn validate_pin_format(pin: &str) -> Result<()> {
    if pin.len() < PIN_MIN_DIGITS || pin.len() > PIN_MAX_DIGITS {
        return Err(Error::Validation(format!(
            "PIN must be {PIN_MIN_DIGITS} to {PIN_MAX_DIGITS} digits"
        )));
    }
    if !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::Validation("PIN must contain only digits".into()));
    }
    Ok(())
}

/// Hash a PIN for storage
pub fn hash_pin(pin: &str) -> Result<String> {
    validate_pin_format(pin)?;

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(pin.as_bytes(), &salt)
        .map_err(|e| Error::Authentication(format!("PIN hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a PIN against a stored hash
pub fn verify_pin(pin: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(pin.as_bytes(), &parsed)
        .is_ok()
}

/// Generate an opaque session token
fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Authenticate a staff member of a hotel by PIN and open a session.
///
/// Wrong PIN and inactive staff produce the same generic failure so the
/// caller cannot tell which condition failed.
#[instrument(skip(db, pin))]
pub fn login_with_pin(db: &Database, hotel_id: Uuid, pin: &str) -> Result<Session> {
    validate_pin_format(pin)?;

    let staff = db.staff().list_active(hotel_id)?;
    let member = staff
        .iter()
        .find(|member| {
            member
                .pin_hash
                .as_deref()
                .is_some_and(|hash| verify_pin(pin, hash))
        })
        .ok_or_else(|| Error::Authentication("invalid credentials".into()))?;

    let session = Session::new(
        member,
        generate_session_token(),
        AccessType::Pin,
        SESSION_TTL_HOURS,
    );
    db.sessions().create(&session)?;

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Hotel, Staff, StaffRole};

    #[test]
    fn test_pin_format() {
        assert!(validate_pin_format("1234").is_ok());
        assert!(validate_pin_format("12345678").is_ok());
        assert!(validate_pin_format("123").is_err());
        assert!(validate_pin_format("123456789").is_err());
        assert!(validate_pin_format("12a4").is_err());
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_pin("4812").unwrap();
        assert!(verify_pin("4812", &hash));
        assert!(!verify_pin("4813", &hash));
        assert!(!verify_pin("4812", "not-a-hash"));
    }

    #[test]
    fn test_login_creates_session_with_claims() {
        let db = Database::open_in_memory().unwrap();
        let hotel = Hotel::new("Test Hotel".into(), "UTC".into());
        db.hotels().create(&hotel).unwrap();

        let staff = Staff::new(hotel.id, "Ana".into(), StaffRole::Housekeeper);
        db.staff().create(&staff).unwrap();
        db.staff()
            .set_pin_hash(staff.id, &hash_pin("4812").unwrap())
            .unwrap();

        let session = login_with_pin(&db, hotel.id, "4812").unwrap();
        assert_eq!(session.staff_id, staff.id);
        assert_eq!(session.hotel_id, hotel.id);
        assert_eq!(session.role, StaffRole::Housekeeper);
        assert_eq!(session.access_type, AccessType::Pin);
        assert_eq!(session.display_name, "Ana");
        assert!(session.is_valid());

        let stored = db.sessions().find_valid(&session.token).unwrap().unwrap();
        assert_eq!(stored.staff_id, staff.id);
    }

    #[test]
    fn test_wrong_pin_is_generic_failure() {
        let db = Database::open_in_memory().unwrap();
        let hotel = Hotel::new("Test Hotel".into(), "UTC".into());
        db.hotels().create(&hotel).unwrap();

        let mut staff = Staff::new(hotel.id, "Ana".into(), StaffRole::Housekeeper);
        staff.pin_hash = Some(hash_pin("4812").unwrap());
        db.staff().create(&staff).unwrap();

        let err = login_with_pin(&db, hotel.id, "9999").unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[test]
    fn test_inactive_staff_cannot_login() {
        let db = Database::open_in_memory().unwrap();
        let hotel = Hotel::new("Test Hotel".into(), "UTC".into());
        db.hotels().create(&hotel).unwrap();

        let mut staff = Staff::new(hotel.id, "Ana".into(), StaffRole::Housekeeper);
        staff.pin_hash = Some(hash_pin("4812").unwrap());
        staff.active = false;
        db.staff().create(&staff).unwrap();

        let err = login_with_pin(&db, hotel.id, "4812").unwrap_err();
        // Same failure as a wrong PIN
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[test]
    fn test_overlong_pin_rejected_before_lookup() {
        // No hotel or staff exist; format validation must reject first
        let db = Database::open_in_memory().unwrap();
        let err = login_with_pin(&db, Uuid::new_v4(), "123456789").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
