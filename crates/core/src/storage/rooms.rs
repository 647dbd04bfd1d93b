//! Room storage operations

use std::collections::HashMap;

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{
    parse_datetime, parse_datetime_opt, parse_priority, parse_room_status, parse_uuid,
    parse_uuid_opt, OptionalExt,
};
use crate::error::Result;
use crate::models::{Room, RoomStatus};

const ROOM_COLUMNS: &str = "id, hotel_id, number, floor, room_type, status, priority, \
     last_status_change, assigned_to, last_cleaned, cleaning_started_at, checkout_at, \
     needs_cleaning, version, created_at";

fn room_from_row(row: &Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        hotel_id: parse_uuid(&row.get::<_, String>(1)?)?,
        number: row.get(2)?,
        floor: row.get(3)?,
        room_type: row.get(4)?,
        status: parse_room_status(&row.get::<_, String>(5)?)?,
        priority: parse_priority(&row.get::<_, String>(6)?)?,
        last_status_change: parse_datetime(&row.get::<_, String>(7)?)?,
        assigned_to: parse_uuid_opt(row.get::<_, Option<String>>(8)?)?,
        last_cleaned: parse_datetime_opt(row.get::<_, Option<String>>(9)?)?,
        cleaning_started_at: parse_datetime_opt(row.get::<_, Option<String>>(10)?)?,
        checkout_at: parse_datetime_opt(row.get::<_, Option<String>>(11)?)?,
        needs_cleaning_flag: row.get::<_, i32>(12)? != 0,
        version: row.get(13)?,
        created_at: parse_datetime(&row.get::<_, String>(14)?)?,
    })
}

pub struct RoomStore<'a> {
    conn: &'a Connection,
}

impl<'a> RoomStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new room (onboarding)
    #[instrument(skip(self, room), fields(hotel_id = %room.hotel_id, number = %room.number))]
    pub fn create(&self, room: &Room) -> Result<()> {
        self.conn.execute(
            "INSERT INTO rooms (id, hotel_id, number, floor, room_type, status, priority, \
             last_status_change, assigned_to, last_cleaned, cleaning_started_at, checkout_at, \
             needs_cleaning, version, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                room.id.to_string(),
                room.hotel_id.to_string(),
                room.number,
                room.floor,
                room.room_type,
                room.status.as_str(),
                room.priority.as_str(),
                room.last_status_change.to_rfc3339(),
                room.assigned_to.map(|s| s.to_string()),
                room.last_cleaned.map(|t| t.to_rfc3339()),
                room.cleaning_started_at.map(|t| t.to_rfc3339()),
                room.checkout_at.map(|t| t.to_rfc3339()),
                room.needs_cleaning_flag as i32,
                room.version,
                room.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find room by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Room>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = ?1"))?;

        let room = stmt
            .query_row(params![id.to_string()], room_from_row)
            .optional()?;

        Ok(room)
    }

    /// List all rooms for a hotel, ordered by number
    #[instrument(skip(self))]
    pub fn list_for_hotel(&self, hotel_id: Uuid) -> Result<Vec<Room>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE hotel_id = ?1 ORDER BY number"
        ))?;

        let rooms = stmt
            .query_map(params![hotel_id.to_string()], room_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rooms)
    }

    /// List rooms for a hotel currently in any of the given statuses
    #[instrument(skip(self, statuses))]
    pub fn list_by_statuses(&self, hotel_id: Uuid, statuses: &[RoomStatus]) -> Result<Vec<Room>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = (0..statuses.len())
            .map(|i| format!("?{}", i + 2))
            .collect::<Vec<_>>()
            .join(", ");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms
             WHERE hotel_id = ?1 AND status IN ({placeholders})
             ORDER BY number"
        ))?;

        let mut values: Vec<String> = vec![hotel_id.to_string()];
        for status in statuses {
            values.push(status.as_str().to_string());
        }

        let rooms = stmt
            .query_map(rusqlite::params_from_iter(values.iter()), room_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rooms)
    }

    /// Write back a mutated room, guarded by the version it was read at.
    ///
    /// Returns false when the row moved underneath the caller (version
    /// mismatch) and nothing was written. The stored version becomes
    /// `expected_version + 1`.
    #[instrument(skip(self, room), fields(room_id = %room.id))]
    pub fn update_checked(&self, room: &Room, expected_version: i64) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE rooms SET number = ?1, floor = ?2, room_type = ?3, status = ?4, \
             priority = ?5, last_status_change = ?6, assigned_to = ?7, last_cleaned = ?8, \
             cleaning_started_at = ?9, checkout_at = ?10, needs_cleaning = ?11, \
             version = ?12 WHERE id = ?13 AND version = ?14",
            params![
                room.number,
                room.floor,
                room.room_type,
                room.status.as_str(),
                room.priority.as_str(),
                room.last_status_change.to_rfc3339(),
                room.assigned_to.map(|s| s.to_string()),
                room.last_cleaned.map(|t| t.to_rfc3339()),
                room.cleaning_started_at.map(|t| t.to_rfc3339()),
                room.checkout_at.map(|t| t.to_rfc3339()),
                room.needs_cleaning_flag as i32,
                expected_version + 1,
                room.id.to_string(),
                expected_version,
            ],
        )?;
        Ok(updated > 0)
    }

    /// Count open assignments per staff member: rooms still assigned and
    /// in a cleaning or needs-cleaning state
    #[instrument(skip(self))]
    pub fn open_assignment_counts(&self, hotel_id: Uuid) -> Result<HashMap<Uuid, usize>> {
        let mut stmt = self.conn.prepare(
            "SELECT assigned_to, COUNT(*) FROM rooms
             WHERE hotel_id = ?1 AND assigned_to IS NOT NULL
               AND status IN ('need_cleaning', 'dirty_occupied', 'checkout',
                              'cleaning_occupied', 'cleaning_checkout', 'cleaning_touch')
             GROUP BY assigned_to",
        )?;

        let rows = stmt.query_map(params![hotel_id.to_string()], |row| {
            let staff_id = parse_uuid(&row.get::<_, String>(0)?)?;
            let count: i64 = row.get(1)?;
            Ok((staff_id, count as usize))
        })?;

        let mut counts = HashMap::new();
        for row in rows {
            let (staff_id, count) = row?;
            counts.insert(staff_id, count);
        }
        Ok(counts)
    }
}
