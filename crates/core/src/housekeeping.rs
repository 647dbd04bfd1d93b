//! Room status transition recorder
//!
//! The one path through which a staff member changes a room's status.
//! Validates the actor and the target, writes the room, the audit entry,
//! staff metrics and any queued notification as a single transaction.

use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::invariants;
use crate::models::{Notification, Priority, Room, RoomStatus, StatusHistoryEntry};
use crate::storage::{Database, HistoryStore, NotificationStore, RoomStore, StaffStore};
use crate::transitions::TransitionMatrix;

/// Topic housekeeping notifications are queued under
pub const HOUSEKEEPING_TOPIC: &str = "housekeeping";

/// What an accepted transition changed
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub room: Room,
    pub entry: StatusHistoryEntry,
    /// Set when this transition closed a cleaning timer
    pub cleaning_minutes: Option<u32>,
    pub notification: Option<Notification>,
}

/// Apply a status transition to a room on behalf of a staff member.
///
/// Rejects without mutating anything when the room is missing, the staff
/// member is inactive, the target is not allowed for the actor's role, or
/// the room was updated concurrently (version mismatch).
#[instrument(skip_all, fields(room_id = %room_id, staff_id = %staff_id, target = %new_status))]
pub fn apply_transition(
    db: &Database,
    room_id: Uuid,
    new_status: RoomStatus,
    staff_id: Uuid,
    note: Option<String>,
) -> Result<TransitionOutcome> {
    let staff = db
        .staff()
        .find_by_id(staff_id)?
        .ok_or_else(|| Error::NotFound(format!("staff member {staff_id}")))?;

    if !staff.active {
        return Err(Error::PermissionDenied(
            "staff member is not active".into(),
        ));
    }

    let mut room = db
        .rooms()
        .find_by_id(room_id)?
        .ok_or_else(|| Error::NotFound(format!("room {room_id}")))?;

    if room.hotel_id != staff.hotel_id {
        return Err(Error::PermissionDenied(
            "staff and room belong to different hotels".into(),
        ));
    }

    if room.status == new_status {
        return Err(Error::InvalidOperation(format!(
            "room {} is already {}",
            room.number, new_status
        )));
    }

    if !TransitionMatrix::can_transition(staff.role, new_status) {
        return Err(Error::PermissionDenied(format!(
            "role {} may not move a room to {}",
            staff.role.as_str(),
            new_status
        )));
    }

    let now = Utc::now();
    let previous = room.status;
    let expected_version = room.version;

    // Close an open cleaning timer before switching state
    let mut cleaning_minutes = None;
    if previous.is_cleaning() && new_status.closes_cleaning() {
        if let Some(started) = room.cleaning_started_at {
            let minutes = (now - started).num_minutes().max(0) as u32;
            cleaning_minutes = Some(minutes);
            room.last_cleaned = Some(now);
        }
        room.cleaning_started_at = None;
    }

    // Entering a cleaning state opens the timer, unless one is running
    if new_status.is_cleaning() && !previous.is_cleaning() {
        room.cleaning_started_at = Some(now);
    }

    room.status = new_status;
    room.last_status_change = now;
    room.assigned_to = Some(staff.id);

    let mut notification = None;
    match new_status {
        RoomStatus::Checkout => {
            room.checkout_at = Some(now);
            room.needs_cleaning_flag = true;
            room.priority = Priority::Normal;
            notification = Some(Notification::new(
                room.hotel_id,
                Some(room.id),
                HOUSEKEEPING_TOPIC.to_string(),
                format!("Room {} checked out and needs cleaning", room.number),
                Priority::Normal,
            ));
        }
        RoomStatus::InHouse => {
            room.priority = Priority::High;
            notification = Some(Notification::new(
                room.hotel_id,
                Some(room.id),
                HOUSEKEEPING_TOPIC.to_string(),
                format!("Room {} has an in-house guest, priority cleaning", room.number),
                Priority::High,
            ));
        }
        _ => {}
    }

    let tx = db.conn().unchecked_transaction()?;

    if !RoomStore::new(&tx).update_checked(&room, expected_version)? {
        return Err(Error::Conflict(format!(
            "room {} was updated concurrently",
            room.number
        )));
    }
    room.version = expected_version + 1;

    let entry = StatusHistoryEntry::new(
        room.hotel_id,
        room.id,
        previous,
        new_status,
        Some(staff.id),
        note,
    );
    HistoryStore::new(&tx).append(&entry)?;

    if let Some(minutes) = cleaning_minutes {
        StaffStore::new(&tx).record_cleaning(staff.id, minutes)?;
    }

    if let Some(notification) = &notification {
        NotificationStore::new(&tx).enqueue(notification)?;
    }

    tx.commit()?;

    invariants::assert_room_invariants(&room);
    invariants::assert_transition_entry_invariants(&entry);

    Ok(TransitionOutcome {
        room,
        entry,
        cleaning_minutes,
        notification,
    })
}
