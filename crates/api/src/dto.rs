//! Wire types for the HTTP surface
//!
//! JSON bodies use camelCase field names and plain strings for enums,
//! decoupled from the core models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use innkeep_core::{Assignment, AssignmentReport, Room, Session};

/// Staff PIN login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinLoginRequest {
    pub pin: String,
    pub hotel_id: Uuid,
}

/// Session claims returned on login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub token: String,
    pub hotel_id: Uuid,
    pub name: String,
    pub role: String,
    pub access_type: String,
    pub expires_at: DateTime<Utc>,
}

impl From<Session> for SessionClaims {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            hotel_id: session.hotel_id,
            name: session.display_name,
            role: session.role.as_str().to_string(),
            access_type: session.access_type.as_str().to_string(),
            expires_at: session.expires_at,
        }
    }
}

/// Auto-assignment trigger request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoAssignRequest {
    /// Must match the session's hotel when present
    #[serde(default)]
    pub hotel_id: Option<Uuid>,
    /// Accepted for compatibility; the sweep always works on current state
    #[serde(default)]
    pub date: Option<String>,
}

/// One room-to-staff pairing on the wire
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDto {
    pub room_id: Uuid,
    pub room_number: String,
    pub staff_id: Uuid,
    pub staff_name: String,
}

impl From<Assignment> for AssignmentDto {
    fn from(a: Assignment) -> Self {
        Self {
            room_id: a.room_id,
            room_number: a.room_number,
            staff_id: a.staff_id,
            staff_name: a.staff_name,
        }
    }
}

/// Auto-assignment response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoAssignResponse {
    pub success: bool,
    pub message: String,
    pub assignments_created: usize,
    pub assignments: Vec<AssignmentDto>,
}

impl From<AssignmentReport> for AutoAssignResponse {
    fn from(report: AssignmentReport) -> Self {
        Self {
            success: report.success,
            message: report.message,
            assignments_created: report.assignments_created,
            assignments: report.assignments.into_iter().map(Into::into).collect(),
        }
    }
}

/// Push subscribe/unsubscribe request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushRequest {
    pub token: String,
    pub topic: String,
    #[serde(default)]
    pub hotel_id: Option<Uuid>,
}

/// Generic acknowledgement
#[derive(Debug, Clone, Serialize)]
pub struct Ack {
    pub success: bool,
}

/// Room status transition request (staff action, session required)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    pub room_id: Uuid,
    pub new_status: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Room state on the wire
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: Uuid,
    pub number: String,
    pub floor: i32,
    pub status: String,
    pub priority: String,
    pub assigned_to: Option<Uuid>,
    pub last_status_change: DateTime<Utc>,
    pub last_cleaned: Option<DateTime<Utc>>,
}

impl From<Room> for RoomDto {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            number: room.number,
            floor: room.floor,
            status: room.status.as_str().to_string(),
            priority: room.priority.as_str().to_string(),
            assigned_to: room.assigned_to,
            last_status_change: room.last_status_change,
            last_cleaned: room.last_cleaned,
        }
    }
}

/// Guest request creation body (no session; guest self-service)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuestRequest {
    pub hotel_id: Uuid,
    pub room_id: Uuid,
    pub kind: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Guest request completion body (staff action, session required)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteGuestRequest {
    pub request_id: Uuid,
}

/// Guest request on the wire
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestRequestDto {
    pub id: Uuid,
    pub room_id: Uuid,
    pub kind: String,
    pub status: String,
    pub priority: String,
    pub quantity: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl From<innkeep_core::GuestRequest> for GuestRequestDto {
    fn from(request: innkeep_core::GuestRequest) -> Self {
        Self {
            id: request.id,
            room_id: request.room_id,
            kind: request.kind.as_str().to_string(),
            status: request.status.as_str().to_string(),
            priority: request.priority.as_str().to_string(),
            quantity: request.quantity,
            created_at: request.created_at,
        }
    }
}

/// Maintenance report body (staff action, session required)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceRequest {
    pub room_id: Uuid,
    pub category: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Maintenance start/complete body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceActionRequest {
    pub record_id: Uuid,
}

/// Maintenance record on the wire
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceDto {
    pub id: Uuid,
    pub room_id: Uuid,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub elapsed_minutes: Option<u32>,
}

impl From<innkeep_core::MaintenanceRecord> for MaintenanceDto {
    fn from(record: innkeep_core::MaintenanceRecord) -> Self {
        Self {
            id: record.id,
            room_id: record.room_id,
            category: record.category.as_str().to_string(),
            priority: record.priority.as_str().to_string(),
            status: record.status.as_str().to_string(),
            scheduled_for: record.scheduled_for,
            started_at: record.started_at,
            completed_at: record.completed_at,
            elapsed_minutes: record.elapsed_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_wire_shape() {
        let body = r#"{"pin": "4812", "hotelId": "7f2c1a7e-52f5-4b8e-9a44-d94cf21a7b01"}"#;
        let parsed: PinLoginRequest = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.pin, "4812");
    }

    #[test]
    fn test_assign_response_field_names() {
        let response = AutoAssignResponse {
            success: true,
            message: "Assigned 1 rooms".into(),
            assignments_created: 1,
            assignments: vec![],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("assignmentsCreated"));
    }
}
