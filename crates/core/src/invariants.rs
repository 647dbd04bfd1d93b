//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use uuid::Uuid;

use crate::models::{Room, Staff, StatusHistoryEntry};

/// Validate that a Room's state is internally consistent
pub fn assert_room_invariants(room: &Room) {
    // An open cleaning timer implies a cleaning status
    debug_assert!(
        room.cleaning_started_at.is_none() || room.status.is_cleaning(),
        "Room {} has an open cleaning timer but status {}",
        room.id,
        room.status
    );

    // Number must not be empty
    debug_assert!(
        !room.number.trim().is_empty(),
        "Room {} has empty number",
        room.id
    );

    debug_assert!(room.version >= 0, "Room {} has negative version", room.id);
}

/// Validate a history entry produced by the transition recorder
pub fn assert_transition_entry_invariants(entry: &StatusHistoryEntry) {
    debug_assert!(
        entry.previous_status != entry.new_status,
        "History entry {} records a no-op transition {}",
        entry.id,
        entry.new_status
    );

    debug_assert!(
        entry.room_id != Uuid::nil(),
        "History entry {} has nil room_id",
        entry.id
    );
}

/// Validate staff metrics consistency
pub fn assert_staff_metrics_invariants(staff: &Staff) {
    // No recorded minutes without a completed cleaning
    debug_assert!(
        staff.cleanings_completed > 0 || staff.cleaning_minutes_total == 0,
        "Staff {} has {} cleaning minutes but no completed cleanings",
        staff.id,
        staff.cleaning_minutes_total
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RoomStatus, StaffRole};

    #[test]
    fn test_valid_room() {
        let room = Room::new(Uuid::new_v4(), "101".into(), 1, "double".into());
        assert_room_invariants(&room);
    }

    #[test]
    fn test_room_with_timer() {
        let mut room = Room::new(Uuid::new_v4(), "101".into(), 1, "double".into());
        room.status = RoomStatus::CleaningOccupied;
        room.cleaning_started_at = Some(chrono::Utc::now());
        assert_room_invariants(&room);
    }

    #[test]
    #[should_panic(expected = "open cleaning timer")]
    fn test_timer_without_cleaning_status() {
        let mut room = Room::new(Uuid::new_v4(), "101".into(), 1, "double".into());
        room.cleaning_started_at = Some(chrono::Utc::now());
        assert_room_invariants(&room);
    }

    #[test]
    fn test_valid_transition_entry() {
        let entry = StatusHistoryEntry::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            RoomStatus::Occupied,
            RoomStatus::Checkout,
            Some(Uuid::new_v4()),
            None,
        );
        assert_transition_entry_invariants(&entry);
    }

    #[test]
    fn test_staff_metrics() {
        let mut staff = Staff::new(Uuid::new_v4(), "Ana".into(), StaffRole::Housekeeper);
        assert_staff_metrics_invariants(&staff);
        staff.cleanings_completed = 1;
        staff.cleaning_minutes_total = 25;
        assert_staff_metrics_invariants(&staff);
    }
}
