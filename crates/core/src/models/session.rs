//! Staff session model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::staff::{Staff, StaffRole};

/// How the session was established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    Pin,
    Email,
}

impl AccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessType::Pin => "pin",
            AccessType::Email => "email",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pin" => Some(AccessType::Pin),
            "email" => Some(AccessType::Email),
            _ => None,
        }
    }
}

/// Server-side session for a logged-in staff member.
///
/// The opaque token doubles as the primary key; the claims are whatever
/// the HTTP layer needs to authorize without re-reading the staff row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub staff_id: Uuid,
    pub hotel_id: Uuid,
    pub role: StaffRole,
    pub access_type: AccessType,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(staff: &Staff, token: String, access_type: AccessType, ttl_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            token,
            staff_id: staff.id,
            hotel_id: staff.hotel_id,
            role: staff.role,
            access_type,
            display_name: staff.name.clone(),
            created_at: now,
            expires_at: now + chrono::Duration::hours(ttl_hours),
        }
    }

    pub fn is_valid(&self) -> bool {
        Utc::now() < self.expires_at
    }
}
