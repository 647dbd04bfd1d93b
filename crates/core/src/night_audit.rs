//! Night audit
//!
//! The daily batch that marks every still-occupied room as needing
//! cleaning for the new hotel day. Each hotel is one atomic batch; a
//! failing hotel is counted and skipped, never aborting the run.

use chrono::Utc;
use tracing::{error, info, instrument};

use crate::error::{Error, Result};
use crate::models::{Hotel, RoomStatus, StatusHistoryEntry};
use crate::storage::{Database, HistoryStore, RoomStore};

/// Audit note stamped on every system transition
pub const NIGHT_AUDIT_NOTE: &str = "automatic day-change transition";

/// Statuses the audit rolls over. DirtyOccupied is deliberately absent,
/// which makes a repeated run a no-op.
const ROLLOVER_STATUSES: &[RoomStatus] = &[RoomStatus::Occupied, RoomStatus::CleanOccupied];

/// Aggregate outcome of one audit run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NightAuditReport {
    pub hotels_processed: usize,
    pub hotels_failed: usize,
    pub rooms_updated: usize,
}

/// Run the audit over every hotel with an active or trial subscription.
#[instrument(skip(db))]
pub fn run_night_audit(db: &Database) -> Result<NightAuditReport> {
    let hotels = db.hotels().list_operational()?;
    let mut report = NightAuditReport::default();

    for hotel in hotels {
        match audit_hotel(db, &hotel) {
            Ok(updated) => {
                report.hotels_processed += 1;
                report.rooms_updated += updated;
                info!(hotel_id = %hotel.id, rooms = updated, "Night audit applied");
            }
            Err(e) => {
                report.hotels_failed += 1;
                error!(hotel_id = %hotel.id, error = %e, "Night audit failed for hotel");
            }
        }
    }

    info!(
        hotels = report.hotels_processed,
        failed = report.hotels_failed,
        rooms = report.rooms_updated,
        "Night audit run complete"
    );

    Ok(report)
}

/// Roll one hotel's occupied rooms over to dirty_occupied, atomically.
fn audit_hotel(db: &Database, hotel: &Hotel) -> Result<usize> {
    let tx = db.conn().unchecked_transaction()?;
    let room_store = RoomStore::new(&tx);
    let history = HistoryStore::new(&tx);

    let rooms = room_store.list_by_statuses(hotel.id, ROLLOVER_STATUSES)?;
    let count = rooms.len();
    let now = Utc::now();

    for mut room in rooms {
        let previous = room.status;
        let expected_version = room.version;

        room.status = RoomStatus::DirtyOccupied;
        room.last_status_change = now;

        if !room_store.update_checked(&room, expected_version)? {
            return Err(Error::Conflict(format!(
                "room {} was updated concurrently",
                room.number
            )));
        }

        // System actor: no staff id on the audit entry
        history.append(&StatusHistoryEntry::new(
            hotel.id,
            room.id,
            previous,
            RoomStatus::DirtyOccupied,
            None,
            Some(NIGHT_AUDIT_NOTE.to_string()),
        ))?;
    }

    tx.commit()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Room, SubscriptionStatus};
    use uuid::Uuid;

    fn add_hotel(db: &Database, name: &str, subscription: SubscriptionStatus) -> Hotel {
        let hotel = Hotel::new(name.into(), "UTC".into());
        db.hotels().create(&hotel).unwrap();
        db.hotels().set_subscription(hotel.id, subscription).unwrap();
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

    #[test]
    fn test_rollover_and_per_room_history() {
        let db = Database::open_in_memory().unwrap();
        let hotel_a = add_hotel(&db, "A", SubscriptionStatus::Active);
        let hotel_b = add_hotel(&db, "B", SubscriptionStatus::Trial);

        add_room(&db, hotel_a.id, "101", RoomStatus::Occupied);
        add_room(&db, hotel_a.id, "102", RoomStatus::Occupied);
        add_room(&db, hotel_a.id, "103", RoomStatus::CleanOccupied);
        // Not a rollover state: untouched
        let available = add_room(&db, hotel_a.id, "104", RoomStatus::Available);

        let report = run_night_audit(&db).unwrap();
        assert_eq!(report.hotels_processed, 2);
        assert_eq!(report.hotels_failed, 0);
        assert_eq!(report.rooms_updated, 3);

        for room in db.rooms().list_for_hotel(hotel_a.id).unwrap() {
            if room.id == available.id {
                assert_eq!(room.status, RoomStatus::Available);
                assert_eq!(db.history().count_for_room(room.id).unwrap(), 0);
            } else {
                assert_eq!(room.status, RoomStatus::DirtyOccupied);
                assert_eq!(db.history().count_for_room(room.id).unwrap(), 1);

                let entries = db.history().list_for_room(room.id, 10).unwrap();
                assert_eq!(entries[0].staff_id, None);
                assert_eq!(entries[0].note.as_deref(), Some(NIGHT_AUDIT_NOTE));
            }
        }

        assert_eq!(db.history().count_for_hotel(hotel_b.id).unwrap(), 0);
    }

    #[test]
    fn test_second_run_is_noop() {
        let db = Database::open_in_memory().unwrap();
        let hotel = add_hotel(&db, "A", SubscriptionStatus::Active);
        add_room(&db, hotel.id, "101", RoomStatus::Occupied);

        let first = run_night_audit(&db).unwrap();
        assert_eq!(first.rooms_updated, 1);

        let second = run_night_audit(&db).unwrap();
        assert_eq!(second.rooms_updated, 0);
        assert_eq!(second.hotels_processed, 1);

        // Still exactly one history entry
        assert_eq!(db.history().count_for_hotel(hotel.id).unwrap(), 1);
    }

    #[test]
    fn test_non_operational_hotels_skipped() {
        let db = Database::open_in_memory().unwrap();
        let hotel = add_hotel(&db, "Gone", SubscriptionStatus::Cancelled);
        add_room(&db, hotel.id, "101", RoomStatus::Occupied);

        let report = run_night_audit(&db).unwrap();
        assert_eq!(report.hotels_processed, 0);
        assert_eq!(report.rooms_updated, 0);

        let rooms = db.rooms().list_for_hotel(hotel.id).unwrap();
        assert_eq!(rooms[0].status, RoomStatus::Occupied);
    }
}
