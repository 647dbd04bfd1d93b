//! Staff session storage

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_access_type, parse_datetime, parse_staff_role, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::Session;

const SESSION_COLUMNS: &str =
    "token, staff_id, hotel_id, role, access_type, display_name, created_at, expires_at";

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        token: row.get(0)?,
        staff_id: parse_uuid(&row.get::<_, String>(1)?)?,
        hotel_id: parse_uuid(&row.get::<_, String>(2)?)?,
        role: parse_staff_role(&row.get::<_, String>(3)?)?,
        access_type: parse_access_type(&row.get::<_, String>(4)?)?,
        display_name: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?)?,
        expires_at: parse_datetime(&row.get::<_, String>(7)?)?,
    })
}

pub struct SessionStore<'a> {
    conn: &'a Connection,
}

impl<'a> SessionStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a session
    #[instrument(skip(self, session), fields(staff_id = %session.staff_id))]
    pub fn create(&self, session: &Session) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sessions (token, staff_id, hotel_id, role, access_type, display_name, \
             created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                session.token,
                session.staff_id.to_string(),
                session.hotel_id.to_string(),
                session.role.as_str(),
                session.access_type.as_str(),
                session.display_name,
                session.created_at.to_rfc3339(),
                session.expires_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find a valid (non-expired) session by token
    #[instrument(skip(self, token))]
    pub fn find_valid(&self, token: &str) -> Result<Option<Session>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE token = ?1 AND expires_at > ?2"
        ))?;

        let now = Utc::now().to_rfc3339();
        let session = stmt
            .query_row(params![token, now], session_from_row)
            .optional()?;

        Ok(session)
    }

    /// Delete a session (logout)
    pub fn delete(&self, token: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
        Ok(())
    }

    /// Delete all sessions for a staff member
    pub fn delete_for_staff(&self, staff_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM sessions WHERE staff_id = ?1",
            params![staff_id.to_string()],
        )?;
        Ok(())
    }

    /// Clean up expired sessions
    pub fn cleanup_expired(&self) -> Result<u64> {
        let count = self.conn.execute(
            "DELETE FROM sessions WHERE expires_at < ?1",
            params![Utc::now().to_rfc3339()],
        )?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccessType, Hotel, Staff, StaffRole};
    use crate::storage::Database;

    fn setup() -> (Database, Staff) {
        let db = Database::open_in_memory().unwrap();
        let hotel = Hotel::new("Test Hotel".into(), "UTC".into());
        db.hotels().create(&hotel).unwrap();
        let staff = Staff::new(hotel.id, "Ana".into(), StaffRole::Reception);
        db.staff().create(&staff).unwrap();
        (db, staff)
    }

    #[test]
    fn test_session_roundtrip_and_expiry() {
        let (db, staff) = setup();

        let session = Session::new(&staff, "token-a".into(), AccessType::Pin, 8);
        db.sessions().create(&session).unwrap();
        assert!(db.sessions().find_valid("token-a").unwrap().is_some());

        // An already-expired session is never returned
        let expired = Session::new(&staff, "token-b".into(), AccessType::Pin, -1);
        db.sessions().create(&expired).unwrap();
        assert!(db.sessions().find_valid("token-b").unwrap().is_none());

        assert_eq!(db.sessions().cleanup_expired().unwrap(), 1);
        assert!(db.sessions().find_valid("token-a").unwrap().is_some());
    }

    #[test]
    fn test_delete_for_staff() {
        let (db, staff) = setup();

        for token in ["t1", "t2"] {
            let session = Session::new(&staff, token.into(), AccessType::Pin, 8);
            db.sessions().create(&session).unwrap();
        }

        db.sessions().delete_for_staff(staff.id).unwrap();
        assert!(db.sessions().find_valid("t1").unwrap().is_none());
        assert!(db.sessions().find_valid("t2").unwrap().is_none());
    }
}
