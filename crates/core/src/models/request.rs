//! Guest self-service requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::room::Priority;

/// Services a guest can request from their room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Towels,
    Cleaning,
    Amenities,
    RoomService,
    Maintenance,
    Other,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Towels => "towels",
            ServiceKind::Cleaning => "cleaning",
            ServiceKind::Amenities => "amenities",
            ServiceKind::RoomService => "room_service",
            ServiceKind::Maintenance => "maintenance",
            ServiceKind::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "towels" => Some(ServiceKind::Towels),
            "cleaning" => Some(ServiceKind::Cleaning),
            "amenities" => Some(ServiceKind::Amenities),
            "room_service" => Some(ServiceKind::RoomService),
            "maintenance" => Some(ServiceKind::Maintenance),
            "other" => Some(ServiceKind::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Completed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RequestStatus::Pending),
            "completed" => Some(RequestStatus::Completed),
            _ => None,
        }
    }
}

/// A request created by a guest, completed by staff, never deleted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestRequest {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub room_id: Uuid,
    pub kind: ServiceKind,
    pub status: RequestStatus,
    pub priority: Priority,
    /// Item count for countable services (e.g. towels)
    pub quantity: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub completed_by: Option<Uuid>,
}

impl GuestRequest {
    pub fn new(hotel_id: Uuid, room_id: Uuid, kind: ServiceKind, priority: Priority) -> Self {
        Self {
            id: Uuid::new_v4(),
            hotel_id,
            room_id,
            kind,
            status: RequestStatus::Pending,
            priority,
            quantity: None,
            created_at: Utc::now(),
            completed_at: None,
            completed_by: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }
}
