//! SQLite storage layer for Innkeep

mod history;
mod hotels;
mod maintenance;
mod migrations;
mod notifications;
mod parse;
mod push;
mod requests;
mod rooms;
mod sessions;
mod staff;
mod traits;

use std::collections::HashMap;
use std::path::Path;

use rusqlite::Connection;
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Hotel, Room, RoomStatus, Staff, StaffRole, StatusHistoryEntry};

pub use history::HistoryStore;
pub use hotels::HotelStore;
pub use maintenance::MaintenanceStore;
pub use notifications::NotificationStore;
pub use push::PushStore;
pub use requests::RequestStore;
pub use rooms::RoomStore;
pub use sessions::SessionStore;
pub use staff::StaffStore;
pub use traits::{HistoryRepository, HotelRepository, RoomRepository, StaffRepository, Storage};

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    /// Borrow the raw connection for multi-store transactions
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Get hotel store
    pub fn hotels(&self) -> HotelStore<'_> {
        HotelStore::new(&self.conn)
    }

    /// Get room store
    pub fn rooms(&self) -> RoomStore<'_> {
        RoomStore::new(&self.conn)
    }

    /// Get staff store
    pub fn staff(&self) -> StaffStore<'_> {
        StaffStore::new(&self.conn)
    }

    /// Get status history store
    pub fn history(&self) -> HistoryStore<'_> {
        HistoryStore::new(&self.conn)
    }

    /// Get guest request store
    pub fn requests(&self) -> RequestStore<'_> {
        RequestStore::new(&self.conn)
    }

    /// Get maintenance store
    pub fn maintenance(&self) -> MaintenanceStore<'_> {
        MaintenanceStore::new(&self.conn)
    }

    /// Get session store
    pub fn sessions(&self) -> SessionStore<'_> {
        SessionStore::new(&self.conn)
    }

    /// Get push subscription store
    pub fn push(&self) -> PushStore<'_> {
        PushStore::new(&self.conn)
    }

    /// Get notification outbox store
    pub fn notifications(&self) -> NotificationStore<'_> {
        NotificationStore::new(&self.conn)
    }
}

// Implement repository traits for Database
// This enables using Database through the trait interface

impl HotelRepository for Database {
    fn create_hotel(&self, hotel: &Hotel) -> Result<()> {
        self.hotels().create(hotel)
    }

    fn find_hotel_by_id(&self, id: Uuid) -> Result<Option<Hotel>> {
        self.hotels().find_by_id(id)
    }

    fn list_operational_hotels(&self) -> Result<Vec<Hotel>> {
        self.hotels().list_operational()
    }
}

impl RoomRepository for Database {
    fn create_room(&self, room: &Room) -> Result<()> {
        self.rooms().create(room)
    }

    fn find_room_by_id(&self, id: Uuid) -> Result<Option<Room>> {
        self.rooms().find_by_id(id)
    }

    fn list_rooms_for_hotel(&self, hotel_id: Uuid) -> Result<Vec<Room>> {
        self.rooms().list_for_hotel(hotel_id)
    }

    fn list_rooms_by_statuses(
        &self,
        hotel_id: Uuid,
        statuses: &[RoomStatus],
    ) -> Result<Vec<Room>> {
        self.rooms().list_by_statuses(hotel_id, statuses)
    }

    fn update_room_checked(&self, room: &Room, expected_version: i64) -> Result<bool> {
        self.rooms().update_checked(room, expected_version)
    }

    fn open_assignment_counts(&self, hotel_id: Uuid) -> Result<HashMap<Uuid, usize>> {
        self.rooms().open_assignment_counts(hotel_id)
    }
}

impl StaffRepository for Database {
    fn create_staff(&self, staff: &Staff) -> Result<()> {
        self.staff().create(staff)
    }

    fn find_staff_by_id(&self, id: Uuid) -> Result<Option<Staff>> {
        self.staff().find_by_id(id)
    }

    fn list_active_staff_by_role(&self, hotel_id: Uuid, role: StaffRole) -> Result<Vec<Staff>> {
        self.staff().list_active_by_role(hotel_id, role)
    }

    fn record_cleaning(&self, staff_id: Uuid, minutes: u32) -> Result<()> {
        self.staff().record_cleaning(staff_id, minutes)
    }
}

impl HistoryRepository for Database {
    fn append_history(&self, entry: &StatusHistoryEntry) -> Result<()> {
        self.history().append(entry)
    }

    fn list_history_for_room(&self, room_id: Uuid, limit: u32) -> Result<Vec<StatusHistoryEntry>> {
        self.history().list_for_room(room_id, limit)
    }

    fn count_history_for_room(&self, room_id: Uuid) -> Result<u64> {
        self.history().count_for_room(room_id)
    }
}
