//! Status history audit records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::room::RoomStatus;

/// One immutable audit record of a room status change.
///
/// Write-once: the storage layer exposes no update or delete for these.
/// `staff_id` is None when the change was performed by the system actor
/// (night audit).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub room_id: Uuid,
    pub previous_status: RoomStatus,
    pub new_status: RoomStatus,
    pub recorded_at: DateTime<Utc>,
    pub staff_id: Option<Uuid>,
    pub note: Option<String>,
}

impl StatusHistoryEntry {
    pub fn new(
        hotel_id: Uuid,
        room_id: Uuid,
        previous_status: RoomStatus,
        new_status: RoomStatus,
        staff_id: Option<Uuid>,
        note: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            hotel_id,
            room_id,
            previous_status,
            new_status,
            recorded_at: Utc::now(),
            staff_id,
            note,
        }
    }
}
