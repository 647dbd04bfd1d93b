//! Guest request storage operations

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{
    parse_datetime, parse_datetime_opt, parse_priority, parse_request_status, parse_service_kind,
    parse_uuid, parse_uuid_opt, OptionalExt,
};
use crate::error::Result;
use crate::models::GuestRequest;

const REQUEST_COLUMNS: &str = "id, hotel_id, room_id, kind, status, priority, quantity, \
     created_at, completed_at, completed_by";

fn request_from_row(row: &Row<'_>) -> rusqlite::Result<GuestRequest> {
    Ok(GuestRequest {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        hotel_id: parse_uuid(&row.get::<_, String>(1)?)?,
        room_id: parse_uuid(&row.get::<_, String>(2)?)?,
        kind: parse_service_kind(&row.get::<_, String>(3)?)?,
        status: parse_request_status(&row.get::<_, String>(4)?)?,
        priority: parse_priority(&row.get::<_, String>(5)?)?,
        quantity: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?)?,
        completed_at: parse_datetime_opt(row.get::<_, Option<String>>(8)?)?,
        completed_by: parse_uuid_opt(row.get::<_, Option<String>>(9)?)?,
    })
}

pub struct RequestStore<'a> {
    conn: &'a Connection,
}

impl<'a> RequestStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new guest request
    #[instrument(skip(self, request), fields(room_id = %request.room_id, kind = ?request.kind))]
    pub fn create(&self, request: &GuestRequest) -> Result<()> {
        self.conn.execute(
            "INSERT INTO requests (id, hotel_id, room_id, kind, status, priority, quantity, \
             created_at, completed_at, completed_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                request.id.to_string(),
                request.hotel_id.to_string(),
                request.room_id.to_string(),
                request.kind.as_str(),
                request.status.as_str(),
                request.priority.as_str(),
                request.quantity,
                request.created_at.to_rfc3339(),
                request.completed_at.map(|t| t.to_rfc3339()),
                request.completed_by.map(|s| s.to_string()),
            ],
        )?;
        Ok(())
    }

    /// Find request by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<GuestRequest>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE id = ?1"
        ))?;

        let request = stmt
            .query_row(params![id.to_string()], request_from_row)
            .optional()?;

        Ok(request)
    }

    /// List pending requests for a hotel, high priority first, oldest first
    #[instrument(skip(self))]
    pub fn list_pending(&self, hotel_id: Uuid) -> Result<Vec<GuestRequest>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests
             WHERE hotel_id = ?1 AND status = 'pending'
             ORDER BY CASE priority WHEN 'high' THEN 0 ELSE 1 END, created_at"
        ))?;

        let requests = stmt
            .query_map(params![hotel_id.to_string()], request_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(requests)
    }

    /// Mark a pending request completed by the given staff member.
    ///
    /// Returns false when the request was not pending (already completed).
    #[instrument(skip(self))]
    pub fn complete(&self, request_id: Uuid, staff_id: Uuid) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE requests SET status = 'completed', completed_at = ?1, completed_by = ?2
             WHERE id = ?3 AND status = 'pending'",
            params![
                Utc::now().to_rfc3339(),
                staff_id.to_string(),
                request_id.to_string()
            ],
        )?;
        Ok(updated > 0)
    }
}
