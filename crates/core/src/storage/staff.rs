//! Staff storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{
    floors_to_string, parse_datetime, parse_floors, parse_staff_role, parse_uuid, OptionalExt,
};
use crate::error::Result;
use crate::models::{Staff, StaffRole};

const STAFF_COLUMNS: &str = "id, hotel_id, name, role, active, pin_hash, email, floors, \
     cleanings_completed, cleaning_minutes_total, created_at";

fn staff_from_row(row: &Row<'_>) -> rusqlite::Result<Staff> {
    Ok(Staff {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        hotel_id: parse_uuid(&row.get::<_, String>(1)?)?,
        name: row.get(2)?,
        role: parse_staff_role(&row.get::<_, String>(3)?)?,
        active: row.get::<_, i32>(4)? != 0,
        pin_hash: row.get(5)?,
        email: row.get(6)?,
        floors: parse_floors(&row.get::<_, String>(7)?),
        cleanings_completed: row.get(8)?,
        cleaning_minutes_total: row.get(9)?,
        created_at: parse_datetime(&row.get::<_, String>(10)?)?,
    })
}

pub struct StaffStore<'a> {
    conn: &'a Connection,
}

impl<'a> StaffStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new staff member
    #[instrument(skip(self, staff), fields(hotel_id = %staff.hotel_id, name = %staff.name))]
    pub fn create(&self, staff: &Staff) -> Result<()> {
        self.conn.execute(
            "INSERT INTO staff (id, hotel_id, name, role, active, pin_hash, email, floors, \
             cleanings_completed, cleaning_minutes_total, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                staff.id.to_string(),
                staff.hotel_id.to_string(),
                staff.name,
                staff.role.as_str(),
                staff.active as i32,
                staff.pin_hash,
                staff.email,
                floors_to_string(&staff.floors),
                staff.cleanings_completed,
                staff.cleaning_minutes_total,
                staff.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find staff member by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Staff>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {STAFF_COLUMNS} FROM staff WHERE id = ?1"))?;

        let staff = stmt
            .query_row(params![id.to_string()], staff_from_row)
            .optional()?;

        Ok(staff)
    }

    /// List active staff for a hotel
    #[instrument(skip(self))]
    pub fn list_active(&self, hotel_id: Uuid) -> Result<Vec<Staff>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff WHERE hotel_id = ?1 AND active = 1 ORDER BY name"
        ))?;

        let staff = stmt
            .query_map(params![hotel_id.to_string()], staff_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(staff)
    }

    /// List active staff of one role for a hotel
    #[instrument(skip(self))]
    pub fn list_active_by_role(&self, hotel_id: Uuid, role: StaffRole) -> Result<Vec<Staff>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff
             WHERE hotel_id = ?1 AND role = ?2 AND active = 1
             ORDER BY name"
        ))?;

        let staff = stmt
            .query_map(params![hotel_id.to_string(), role.as_str()], staff_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(staff)
    }

    /// Set or replace the PIN hash
    pub fn set_pin_hash(&self, staff_id: Uuid, pin_hash: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE staff SET pin_hash = ?1 WHERE id = ?2",
            params![pin_hash, staff_id.to_string()],
        )?;
        Ok(())
    }

    /// Activate or deactivate a staff member
    #[instrument(skip(self))]
    pub fn set_active(&self, staff_id: Uuid, active: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE staff SET active = ?1 WHERE id = ?2",
            params![active as i32, staff_id.to_string()],
        )?;
        Ok(())
    }

    /// Record one completed cleaning: bumps the count and total minutes
    #[instrument(skip(self))]
    pub fn record_cleaning(&self, staff_id: Uuid, minutes: u32) -> Result<()> {
        self.conn.execute(
            "UPDATE staff SET cleanings_completed = cleanings_completed + 1, \
             cleaning_minutes_total = cleaning_minutes_total + ?1 WHERE id = ?2",
            params![minutes, staff_id.to_string()],
        )?;
        Ok(())
    }
}
