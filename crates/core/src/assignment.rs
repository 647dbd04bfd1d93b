//! Housekeeping auto-assignment
//!
//! Distributes rooms needing cleaning across the active housekeeping
//! staff, least-loaded first. The planning itself is pure; `auto_assign`
//! binds it to storage.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Room, RoomStatus, Staff, StatusHistoryEntry};
use crate::storage::{Database, HistoryStore, RoomStore};

/// One planned room-to-staff pairing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub room_id: Uuid,
    pub room_number: String,
    pub staff_id: Uuid,
    pub staff_name: String,
}

/// Outcome of one auto-assignment run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentReport {
    pub success: bool,
    pub message: String,
    pub assignments_created: usize,
    pub assignments: Vec<Assignment>,
}

impl AssignmentReport {
    fn empty(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            assignments_created: 0,
            assignments: Vec::new(),
        }
    }
}

/// Plan room-to-staff pairings without touching storage.
///
/// Rooms already assigned to one of the given housekeepers keep their
/// assignment (no double-booking); the rest are distributed least-loaded
/// first, rooms in ascending number order. Ties between staff go to the
/// member with fewer completed cleanings, then by name.
pub fn plan_assignments(
    rooms: &[Room],
    staff: &[Staff],
    initial_loads: &HashMap<Uuid, usize>,
) -> Vec<Assignment> {
    if staff.is_empty() {
        return Vec::new();
    }

    let staff_ids: Vec<Uuid> = staff.iter().map(|s| s.id).collect();

    let mut pending: Vec<&Room> = rooms
        .iter()
        .filter(|room| {
            room.assigned_to
                .map_or(true, |assignee| !staff_ids.contains(&assignee))
        })
        .collect();
    pending.sort_by_key(|room| room.number_sort_key());

    let mut loads: HashMap<Uuid, usize> = staff
        .iter()
        .map(|s| (s.id, initial_loads.get(&s.id).copied().unwrap_or(0)))
        .collect();

    let mut assignments = Vec::with_capacity(pending.len());
    for room in pending {
        let chosen = staff
            .iter()
            .min_by_key(|s| (loads[&s.id], s.cleanings_completed, s.name.clone()))
            .expect("staff list checked non-empty");

        *loads.get_mut(&chosen.id).expect("load seeded for all staff") += 1;
        assignments.push(Assignment {
            room_id: room.id,
            room_number: room.number.clone(),
            staff_id: chosen.id,
            staff_name: chosen.name.clone(),
        });
    }

    assignments
}

/// Assign every room needing cleaning to the hotel's active housekeepers.
///
/// Having nothing to assign is a reported outcome (`success: false`), not
/// an error; only data access failures surface as `Err`.
#[instrument(skip(db))]
pub fn auto_assign(db: &Database, hotel_id: Uuid) -> Result<AssignmentReport> {
    db.hotels()
        .find_by_id(hotel_id)?
        .ok_or_else(|| Error::NotFound(format!("hotel {hotel_id}")))?;

    let rooms = db
        .rooms()
        .list_by_statuses(hotel_id, RoomStatus::NEEDS_CLEANING)?;
    if rooms.is_empty() {
        return Ok(AssignmentReport::empty("No rooms need cleaning"));
    }

    let housekeepers = db
        .staff()
        .list_active_by_role(hotel_id, crate::models::StaffRole::Housekeeper)?;
    if housekeepers.is_empty() {
        return Ok(AssignmentReport::empty(
            "No active housekeeping staff available",
        ));
    }

    let loads = db.rooms().open_assignment_counts(hotel_id)?;
    let assignments = plan_assignments(&rooms, &housekeepers, &loads);
    if assignments.is_empty() {
        return Ok(AssignmentReport::empty(
            "All rooms needing cleaning are already assigned",
        ));
    }

    let tx = db.conn().unchecked_transaction()?;
    let room_store = RoomStore::new(&tx);
    let history = HistoryStore::new(&tx);

    for assignment in &assignments {
        let mut room = rooms
            .iter()
            .find(|r| r.id == assignment.room_id)
            .expect("assignment refers to a swept room")
            .clone();
        let expected_version = room.version;
        room.assigned_to = Some(assignment.staff_id);

        if !room_store.update_checked(&room, expected_version)? {
            return Err(Error::Conflict(format!(
                "room {} was updated concurrently",
                room.number
            )));
        }

        history.append(&StatusHistoryEntry::new(
            hotel_id,
            room.id,
            room.status,
            room.status,
            Some(assignment.staff_id),
            Some(format!("auto-assigned to {}", assignment.staff_name)),
        ))?;
    }

    tx.commit()?;

    info!(
        hotel_id = %hotel_id,
        assignments = assignments.len(),
        "Auto-assignment complete"
    );

    Ok(AssignmentReport {
        success: true,
        message: format!("Assigned {} rooms", assignments.len()),
        assignments_created: assignments.len(),
        assignments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Hotel, StaffRole};

    fn setup_hotel(db: &Database) -> Hotel {
        let hotel = Hotel::new("Test Hotel".into(), "UTC".into());
        db.hotels().create(&hotel).unwrap();
        hotel
    }

    fn add_room(db: &Database, hotel_id: Uuid, number: &str, status: RoomStatus) -> Room {
        let mut room = Room::new(hotel_id, number.into(), 1, "double".into());
        db.rooms().create(&room).unwrap();
        let version = room.version;
        room.status = status;
        assert!(db.rooms().update_checked(&room, version).unwrap());
        room.version += 1;
        room
    }

    fn add_housekeeper(db: &Database, hotel_id: Uuid, name: &str) -> Staff {
        let staff = Staff::new(hotel_id, name.into(), StaffRole::Housekeeper);
        db.staff().create(&staff).unwrap();
        staff
    }

    #[test]
    fn test_plan_balances_load() {
        let hotel_id = Uuid::new_v4();
        let rooms: Vec<Room> = ["103", "101", "102", "104"]
            .iter()
            .map(|n| {
                let mut r = Room::new(hotel_id, (*n).into(), 1, "double".into());
                r.status = RoomStatus::NeedCleaning;
                r
            })
            .collect();
        let staff = vec![
            Staff::new(hotel_id, "Ana".into(), StaffRole::Housekeeper),
            Staff::new(hotel_id, "Bea".into(), StaffRole::Housekeeper),
        ];

        let plan = plan_assignments(&rooms, &staff, &HashMap::new());
        assert_eq!(plan.len(), 4);

        // Rooms are walked in ascending number order
        let numbers: Vec<&str> = plan.iter().map(|a| a.room_number.as_str()).collect();
        assert_eq!(numbers, vec!["101", "102", "103", "104"]);

        // Two rooms each
        let ana = plan.iter().filter(|a| a.staff_name == "Ana").count();
        let bea = plan.iter().filter(|a| a.staff_name == "Bea").count();
        assert_eq!(ana, 2);
        assert_eq!(bea, 2);
    }

    #[test]
    fn test_plan_prefers_least_loaded() {
        let hotel_id = Uuid::new_v4();
        let mut room = Room::new(hotel_id, "101".into(), 1, "double".into());
        room.status = RoomStatus::NeedCleaning;

        let busy = Staff::new(hotel_id, "Ana".into(), StaffRole::Housekeeper);
        let idle = Staff::new(hotel_id, "Bea".into(), StaffRole::Housekeeper);

        let mut loads = HashMap::new();
        loads.insert(busy.id, 3);

        let plan = plan_assignments(
            std::slice::from_ref(&room),
            &[busy, idle.clone()],
            &loads,
        );
        assert_eq!(plan[0].staff_id, idle.id);
    }

    #[test]
    fn test_plan_skips_rooms_assigned_to_housekeepers() {
        let hotel_id = Uuid::new_v4();
        let keeper = Staff::new(hotel_id, "Ana".into(), StaffRole::Housekeeper);

        let mut taken = Room::new(hotel_id, "101".into(), 1, "double".into());
        taken.status = RoomStatus::NeedCleaning;
        taken.assigned_to = Some(keeper.id);

        let mut free = Room::new(hotel_id, "102".into(), 1, "double".into());
        free.status = RoomStatus::NeedCleaning;

        let plan = plan_assignments(&[taken, free], std::slice::from_ref(&keeper), &HashMap::new());
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].room_number, "102");
    }

    #[test]
    fn test_auto_assign_no_rooms_is_reported_not_error() {
        let db = Database::open_in_memory().unwrap();
        let hotel = setup_hotel(&db);
        add_housekeeper(&db, hotel.id, "Ana");

        let report = auto_assign(&db, hotel.id).unwrap();
        assert!(!report.success);
        assert_eq!(report.assignments_created, 0);
    }

    #[test]
    fn test_auto_assign_no_staff_is_reported_not_error() {
        let db = Database::open_in_memory().unwrap();
        let hotel = setup_hotel(&db);
        add_room(&db, hotel.id, "101", RoomStatus::NeedCleaning);

        let report = auto_assign(&db, hotel.id).unwrap();
        assert!(!report.success);
        assert!(report.message.contains("staff"));
    }

    #[test]
    fn test_auto_assign_writes_assignments_and_audit() {
        let db = Database::open_in_memory().unwrap();
        let hotel = setup_hotel(&db);
        let room = add_room(&db, hotel.id, "101", RoomStatus::Checkout);
        add_room(&db, hotel.id, "102", RoomStatus::DirtyOccupied);
        let keeper = add_housekeeper(&db, hotel.id, "Ana");

        let report = auto_assign(&db, hotel.id).unwrap();
        assert!(report.success);
        assert_eq!(report.assignments_created, 2);

        let stored = db.rooms().find_by_id(room.id).unwrap().unwrap();
        assert_eq!(stored.assigned_to, Some(keeper.id));
        assert_eq!(db.history().count_for_room(room.id).unwrap(), 1);
    }

    #[test]
    fn test_auto_assign_twice_does_not_double_book() {
        let db = Database::open_in_memory().unwrap();
        let hotel = setup_hotel(&db);
        add_room(&db, hotel.id, "101", RoomStatus::NeedCleaning);
        add_housekeeper(&db, hotel.id, "Ana");

        let first = auto_assign(&db, hotel.id).unwrap();
        assert!(first.success);
        assert_eq!(first.assignments_created, 1);

        let second = auto_assign(&db, hotel.id).unwrap();
        assert!(!second.success);
        assert_eq!(second.assignments_created, 0);
    }

    #[test]
    fn test_auto_assign_unknown_hotel_is_error() {
        let db = Database::open_in_memory().unwrap();
        let err = auto_assign(&db, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
