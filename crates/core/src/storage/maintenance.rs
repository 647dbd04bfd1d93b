//! Maintenance record storage operations

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{
    parse_datetime, parse_datetime_opt, parse_maintenance_category, parse_maintenance_status,
    parse_priority, parse_uuid, OptionalExt,
};
use crate::error::Result;
use crate::models::{MaintenanceRecord, MaintenanceStatus};

const MAINTENANCE_COLUMNS: &str = "id, hotel_id, room_id, reported_by, category, priority, \
     status, scheduled_for, started_at, completed_at, elapsed_minutes, images, created_at";

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<MaintenanceRecord> {
    let images: String = row.get(11)?;
    Ok(MaintenanceRecord {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        hotel_id: parse_uuid(&row.get::<_, String>(1)?)?,
        room_id: parse_uuid(&row.get::<_, String>(2)?)?,
        reported_by: parse_uuid(&row.get::<_, String>(3)?)?,
        category: parse_maintenance_category(&row.get::<_, String>(4)?)?,
        priority: parse_priority(&row.get::<_, String>(5)?)?,
        status: parse_maintenance_status(&row.get::<_, String>(6)?)?,
        scheduled_for: parse_datetime_opt(row.get::<_, Option<String>>(7)?)?,
        started_at: parse_datetime_opt(row.get::<_, Option<String>>(8)?)?,
        completed_at: parse_datetime_opt(row.get::<_, Option<String>>(9)?)?,
        elapsed_minutes: row.get(10)?,
        images: images
            .split('\n')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        created_at: parse_datetime(&row.get::<_, String>(12)?)?,
    })
}

pub struct MaintenanceStore<'a> {
    conn: &'a Connection,
}

impl<'a> MaintenanceStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new maintenance record (report)
    #[instrument(skip(self, record), fields(room_id = %record.room_id, category = ?record.category))]
    pub fn create(&self, record: &MaintenanceRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO maintenance (id, hotel_id, room_id, reported_by, category, priority, \
             status, scheduled_for, started_at, completed_at, elapsed_minutes, images, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                record.id.to_string(),
                record.hotel_id.to_string(),
                record.room_id.to_string(),
                record.reported_by.to_string(),
                record.category.as_str(),
                record.priority.as_str(),
                record.status.as_str(),
                record.scheduled_for.map(|t| t.to_rfc3339()),
                record.started_at.map(|t| t.to_rfc3339()),
                record.completed_at.map(|t| t.to_rfc3339()),
                record.elapsed_minutes,
                record.images.join("\n"),
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find record by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<MaintenanceRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MAINTENANCE_COLUMNS} FROM maintenance WHERE id = ?1"
        ))?;

        let record = stmt
            .query_row(params![id.to_string()], record_from_row)
            .optional()?;

        Ok(record)
    }

    /// List records for a hotel in one status, oldest first
    #[instrument(skip(self))]
    pub fn list_by_status(
        &self,
        hotel_id: Uuid,
        status: MaintenanceStatus,
    ) -> Result<Vec<MaintenanceRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MAINTENANCE_COLUMNS} FROM maintenance
             WHERE hotel_id = ?1 AND status = ?2
             ORDER BY created_at"
        ))?;

        let records = stmt
            .query_map(
                params![hotel_id.to_string(), status.as_str()],
                record_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Move a pending record to in_progress, stamping the start time.
    ///
    /// Returns false when the record was not pending.
    #[instrument(skip(self))]
    pub fn start(&self, record_id: Uuid) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE maintenance SET status = 'in_progress', started_at = ?1
             WHERE id = ?2 AND status = 'pending'",
            params![Utc::now().to_rfc3339(), record_id.to_string()],
        )?;
        Ok(updated > 0)
    }

    /// Complete an in-progress record, stamping completion and elapsed time.
    ///
    /// Returns false when the record was not in progress.
    #[instrument(skip(self))]
    pub fn complete(&self, record_id: Uuid, elapsed_minutes: u32) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE maintenance SET status = 'completed', completed_at = ?1, elapsed_minutes = ?2
             WHERE id = ?3 AND status = 'in_progress'",
            params![
                Utc::now().to_rfc3339(),
                elapsed_minutes,
                record_id.to_string()
            ],
        )?;
        Ok(updated > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Hotel, MaintenanceCategory, Priority, Room, Staff, StaffRole};
    use crate::storage::Database;

    fn setup() -> (Database, Room, Staff) {
        let db = Database::open_in_memory().unwrap();
        let hotel = Hotel::new("Test Hotel".into(), "UTC".into());
        db.hotels().create(&hotel).unwrap();
        let room = Room::new(hotel.id, "101".into(), 1, "double".into());
        db.rooms().create(&room).unwrap();
        let staff = Staff::new(hotel.id, "Max".into(), StaffRole::Maintenance);
        db.staff().create(&staff).unwrap();
        (db, room, staff)
    }

    #[test]
    fn test_lifecycle_pending_in_progress_completed() {
        let (db, room, staff) = setup();

        let mut record = MaintenanceRecord::new(
            room.hotel_id,
            room.id,
            staff.id,
            MaintenanceCategory::Plumbing,
            Priority::High,
        );
        record.images = vec!["leak.jpg".into(), "pipe.jpg".into()];
        db.maintenance().create(&record).unwrap();

        // Cannot complete a record that was never started
        assert!(!db.maintenance().complete(record.id, 10).unwrap());

        assert!(db.maintenance().start(record.id).unwrap());
        // Starting twice reports no change
        assert!(!db.maintenance().start(record.id).unwrap());

        assert!(db.maintenance().complete(record.id, 45).unwrap());

        let stored = db.maintenance().find_by_id(record.id).unwrap().unwrap();
        assert_eq!(stored.status, MaintenanceStatus::Completed);
        assert_eq!(stored.elapsed_minutes, Some(45));
        assert!(stored.started_at.is_some());
        assert!(stored.completed_at.is_some());
        assert_eq!(stored.images, vec!["leak.jpg", "pipe.jpg"]);
    }

    #[test]
    fn test_list_by_status() {
        let (db, room, staff) = setup();

        let pending = MaintenanceRecord::new(
            room.hotel_id,
            room.id,
            staff.id,
            MaintenanceCategory::Electrical,
            Priority::Normal,
        );
        db.maintenance().create(&pending).unwrap();

        let started = MaintenanceRecord::new(
            room.hotel_id,
            room.id,
            staff.id,
            MaintenanceCategory::Hvac,
            Priority::Normal,
        );
        db.maintenance().create(&started).unwrap();
        db.maintenance().start(started.id).unwrap();

        let pending_list = db
            .maintenance()
            .list_by_status(room.hotel_id, MaintenanceStatus::Pending)
            .unwrap();
        assert_eq!(pending_list.len(), 1);
        assert_eq!(pending_list[0].id, pending.id);

        let in_progress = db
            .maintenance()
            .list_by_status(room.hotel_id, MaintenanceStatus::InProgress)
            .unwrap();
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].id, started.id);
    }
}
