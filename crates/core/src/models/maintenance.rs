//! Maintenance reports and their lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::room::Priority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceCategory {
    Plumbing,
    Electrical,
    Furniture,
    Appliance,
    Hvac,
    Other,
}

impl MaintenanceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceCategory::Plumbing => "plumbing",
            MaintenanceCategory::Electrical => "electrical",
            MaintenanceCategory::Furniture => "furniture",
            MaintenanceCategory::Appliance => "appliance",
            MaintenanceCategory::Hvac => "hvac",
            MaintenanceCategory::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "plumbing" => Some(MaintenanceCategory::Plumbing),
            "electrical" => Some(MaintenanceCategory::Electrical),
            "furniture" => Some(MaintenanceCategory::Furniture),
            "appliance" => Some(MaintenanceCategory::Appliance),
            "hvac" => Some(MaintenanceCategory::Hvac),
            "other" => Some(MaintenanceCategory::Other),
            _ => None,
        }
    }
}

/// pending -> in_progress -> completed; no other moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Pending,
    InProgress,
    Completed,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Pending => "pending",
            MaintenanceStatus::InProgress => "in_progress",
            MaintenanceStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MaintenanceStatus::Pending),
            "in_progress" => Some(MaintenanceStatus::InProgress),
            "completed" => Some(MaintenanceStatus::Completed),
            _ => None,
        }
    }
}

/// A maintenance issue reported against a room. Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub room_id: Uuid,
    pub reported_by: Uuid,
    pub category: MaintenanceCategory,
    pub priority: Priority,
    pub status: MaintenanceStatus,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub elapsed_minutes: Option<u32>,
    /// Blob-store references to attached images
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl MaintenanceRecord {
    pub fn new(
        hotel_id: Uuid,
        room_id: Uuid,
        reported_by: Uuid,
        category: MaintenanceCategory,
        priority: Priority,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            hotel_id,
            room_id,
            reported_by,
            category,
            priority,
            status: MaintenanceStatus::Pending,
            scheduled_for: None,
            started_at: None,
            completed_at: None,
            elapsed_minutes: None,
            images: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn scheduled(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled_for = Some(at);
        self
    }
}
