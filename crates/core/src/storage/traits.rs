//! Storage repository traits
//!
//! These traits define the storage interface for the central entities,
//! allowing for different implementations (SQLite, mock).

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::Result;
use crate::models::{Hotel, Room, RoomStatus, Staff, StaffRole, StatusHistoryEntry};

/// Hotel repository operations
pub trait HotelRepository {
    /// Create a new hotel
    fn create_hotel(&self, hotel: &Hotel) -> Result<()>;

    /// Find hotel by ID
    fn find_hotel_by_id(&self, id: Uuid) -> Result<Option<Hotel>>;

    /// List hotels with an active or trial subscription
    fn list_operational_hotels(&self) -> Result<Vec<Hotel>>;
}

/// Room repository operations
pub trait RoomRepository {
    /// Create a new room
    fn create_room(&self, room: &Room) -> Result<()>;

    /// Find room by ID
    fn find_room_by_id(&self, id: Uuid) -> Result<Option<Room>>;

    /// List all rooms for a hotel
    fn list_rooms_for_hotel(&self, hotel_id: Uuid) -> Result<Vec<Room>>;

    /// List rooms for a hotel in any of the given statuses
    fn list_rooms_by_statuses(&self, hotel_id: Uuid, statuses: &[RoomStatus])
        -> Result<Vec<Room>>;

    /// Version-guarded write-back; false means the row moved underneath
    fn update_room_checked(&self, room: &Room, expected_version: i64) -> Result<bool>;

    /// Open assignments per staff member
    fn open_assignment_counts(&self, hotel_id: Uuid) -> Result<HashMap<Uuid, usize>>;
}

/// Staff repository operations
pub trait StaffRepository {
    /// Create a new staff member
    fn create_staff(&self, staff: &Staff) -> Result<()>;

    /// Find staff member by ID
    fn find_staff_by_id(&self, id: Uuid) -> Result<Option<Staff>>;

    /// List active staff of one role for a hotel
    fn list_active_staff_by_role(&self, hotel_id: Uuid, role: StaffRole) -> Result<Vec<Staff>>;

    /// Record one completed cleaning
    fn record_cleaning(&self, staff_id: Uuid, minutes: u32) -> Result<()>;
}

/// Status history repository operations (append-only)
pub trait HistoryRepository {
    /// Append one audit entry
    fn append_history(&self, entry: &StatusHistoryEntry) -> Result<()>;

    /// List entries for a room, newest first
    fn list_history_for_room(&self, room_id: Uuid, limit: u32) -> Result<Vec<StatusHistoryEntry>>;

    /// Count entries for a room
    fn count_history_for_room(&self, room_id: Uuid) -> Result<u64>;
}

/// Combined storage interface
///
/// Provides access to all central repository operations.
pub trait Storage: HotelRepository + RoomRepository + StaffRepository + HistoryRepository {}

// Blanket implementation: any type implementing all traits implements Storage
impl<T> Storage for T where
    T: HotelRepository + RoomRepository + StaffRepository + HistoryRepository
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Hotel;
    use crate::storage::Database;

    // Callers can stay generic over the storage backend
    fn onboard<S: Storage>(storage: &S, name: &str) -> Result<Hotel> {
        let hotel = Hotel::new(name.into(), "UTC".into());
        storage.create_hotel(&hotel)?;
        Ok(hotel)
    }

    #[test]
    fn test_database_satisfies_storage() {
        let db = Database::open_in_memory().unwrap();
        let hotel = onboard(&db, "Trait Hotel").unwrap();

        let found = db.find_hotel_by_id(hotel.id).unwrap().unwrap();
        assert_eq!(found.name, "Trait Hotel");
        assert!(db.list_rooms_for_hotel(hotel.id).unwrap().is_empty());
    }
}
