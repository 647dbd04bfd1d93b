//! Room model and status set

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The full set of states a room can occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Occupied,
    NeedCleaning,
    CleaningOccupied,
    CleanOccupied,
    CleaningCheckout,
    CleaningTouch,
    Inspection,
    Maintenance,
    PublicAreas,
    DirtyOccupied,
    Checkout,
    InHouse,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
            RoomStatus::NeedCleaning => "need_cleaning",
            RoomStatus::CleaningOccupied => "cleaning_occupied",
            RoomStatus::CleanOccupied => "clean_occupied",
            RoomStatus::CleaningCheckout => "cleaning_checkout",
            RoomStatus::CleaningTouch => "cleaning_touch",
            RoomStatus::Inspection => "inspection",
            RoomStatus::Maintenance => "maintenance",
            RoomStatus::PublicAreas => "public_areas",
            RoomStatus::DirtyOccupied => "dirty_occupied",
            RoomStatus::Checkout => "checkout",
            RoomStatus::InHouse => "in_house",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(RoomStatus::Available),
            "occupied" => Some(RoomStatus::Occupied),
            "need_cleaning" => Some(RoomStatus::NeedCleaning),
            "cleaning_occupied" => Some(RoomStatus::CleaningOccupied),
            "clean_occupied" => Some(RoomStatus::CleanOccupied),
            "cleaning_checkout" => Some(RoomStatus::CleaningCheckout),
            "cleaning_touch" => Some(RoomStatus::CleaningTouch),
            "inspection" => Some(RoomStatus::Inspection),
            "maintenance" => Some(RoomStatus::Maintenance),
            "public_areas" => Some(RoomStatus::PublicAreas),
            "dirty_occupied" => Some(RoomStatus::DirtyOccupied),
            "checkout" => Some(RoomStatus::Checkout),
            "in_house" => Some(RoomStatus::InHouse),
            _ => None,
        }
    }

    /// States during which a cleaning timer is running
    pub fn is_cleaning(&self) -> bool {
        matches!(
            self,
            RoomStatus::CleaningOccupied
                | RoomStatus::CleaningCheckout
                | RoomStatus::CleaningTouch
        )
    }

    /// States the housekeeping sweep picks up for assignment
    pub const NEEDS_CLEANING: &'static [RoomStatus] = &[
        RoomStatus::NeedCleaning,
        RoomStatus::DirtyOccupied,
        RoomStatus::Checkout,
    ];

    /// Member of the needs-cleaning family?
    pub fn needs_cleaning(&self) -> bool {
        Self::NEEDS_CLEANING.contains(self)
    }

    /// Targets that close an open cleaning timer
    pub fn closes_cleaning(&self) -> bool {
        matches!(
            self,
            RoomStatus::Available | RoomStatus::Inspection | RoomStatus::CleanOccupied
        )
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priority of pending housekeeping work on a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Normal,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Priority::Normal),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// A guest room. Created at onboarding, mutated on every transition,
/// never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub number: String,
    pub floor: i32,
    pub room_type: String,
    pub status: RoomStatus,
    pub priority: Priority,
    pub last_status_change: DateTime<Utc>,
    pub assigned_to: Option<Uuid>,
    pub last_cleaned: Option<DateTime<Utc>>,
    /// Set while a cleaning is in progress; cleared when the timer closes
    pub cleaning_started_at: Option<DateTime<Utc>>,
    pub checkout_at: Option<DateTime<Utc>>,
    pub needs_cleaning_flag: bool,
    /// Optimistic concurrency counter, bumped on every write
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn new(hotel_id: Uuid, number: String, floor: i32, room_type: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            hotel_id,
            number,
            floor,
            room_type,
            status: RoomStatus::Available,
            priority: Priority::Normal,
            last_status_change: now,
            assigned_to: None,
            last_cleaned: None,
            cleaning_started_at: None,
            checkout_at: None,
            needs_cleaning_flag: false,
            version: 0,
            created_at: now,
        }
    }

    /// Numeric sort key for room numbers; non-numeric numbers sort last,
    /// then lexicographically
    pub fn number_sort_key(&self) -> (u32, String) {
        (
            self.number.parse::<u32>().unwrap_or(u32::MAX),
            self.number.clone(),
        )
    }
}
