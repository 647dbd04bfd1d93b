//! Status history storage
//!
//! Append-only: this store exposes no update or delete.

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_room_status, parse_uuid, parse_uuid_opt};
use crate::error::Result;
use crate::models::StatusHistoryEntry;

const HISTORY_COLUMNS: &str =
    "id, hotel_id, room_id, previous_status, new_status, recorded_at, staff_id, note";

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<StatusHistoryEntry> {
    Ok(StatusHistoryEntry {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        hotel_id: parse_uuid(&row.get::<_, String>(1)?)?,
        room_id: parse_uuid(&row.get::<_, String>(2)?)?,
        previous_status: parse_room_status(&row.get::<_, String>(3)?)?,
        new_status: parse_room_status(&row.get::<_, String>(4)?)?,
        recorded_at: parse_datetime(&row.get::<_, String>(5)?)?,
        staff_id: parse_uuid_opt(row.get::<_, Option<String>>(6)?)?,
        note: row.get(7)?,
    })
}

pub struct HistoryStore<'a> {
    conn: &'a Connection,
}

impl<'a> HistoryStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Append one audit entry
    #[instrument(skip(self, entry), fields(room_id = %entry.room_id))]
    pub fn append(&self, entry: &StatusHistoryEntry) -> Result<()> {
        self.conn.execute(
            "INSERT INTO status_history (id, hotel_id, room_id, previous_status, new_status, \
             recorded_at, staff_id, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                entry.id.to_string(),
                entry.hotel_id.to_string(),
                entry.room_id.to_string(),
                entry.previous_status.as_str(),
                entry.new_status.as_str(),
                entry.recorded_at.to_rfc3339(),
                entry.staff_id.map(|s| s.to_string()),
                entry.note,
            ],
        )?;
        Ok(())
    }

    /// List entries for a room, newest first
    #[instrument(skip(self))]
    pub fn list_for_room(&self, room_id: Uuid, limit: u32) -> Result<Vec<StatusHistoryEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {HISTORY_COLUMNS} FROM status_history
             WHERE room_id = ?1
             ORDER BY recorded_at DESC
             LIMIT ?2"
        ))?;

        let entries = stmt
            .query_map(params![room_id.to_string(), limit], entry_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Count entries for a room
    pub fn count_for_room(&self, room_id: Uuid) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM status_history WHERE room_id = ?1",
            params![room_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Count entries for a whole hotel
    pub fn count_for_hotel(&self, hotel_id: Uuid) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM status_history WHERE hotel_id = ?1",
            params![hotel_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
