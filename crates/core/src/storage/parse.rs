//! Database value parsing utilities
//!
//! Error-safe parsing of stored values. Unknown enum text is a hard
//! conversion failure rather than a silent fallback, so malformed rows
//! surface at the store boundary.

use chrono::{DateTime, Utc};
use rusqlite::Error as SqlError;
use uuid::Uuid;

use crate::models::{
    AccessType, MaintenanceCategory, MaintenanceStatus, Priority, RequestStatus, RoomStatus,
    ServiceKind, StaffRole, SubscriptionStatus,
};

fn conversion_failure<E>(e: E) -> SqlError
where
    E: std::error::Error + Send + Sync + 'static,
{
    SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
}

#[derive(Debug)]
struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl std::fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} value '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

fn unknown(kind: &'static str, value: &str) -> SqlError {
    conversion_failure(UnknownVariant {
        kind,
        value: value.to_string(),
    })
}

/// Parse a UUID from a database string column
pub fn parse_uuid(s: &str) -> Result<Uuid, SqlError> {
    Uuid::parse_str(s).map_err(conversion_failure)
}

/// Parse an optional UUID from a database string column
pub fn parse_uuid_opt(s: Option<String>) -> Result<Option<Uuid>, SqlError> {
    s.map(|s| parse_uuid(&s)).transpose()
}

/// Parse a DateTime from an RFC3339 string
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, SqlError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(conversion_failure)
}

/// Parse an optional DateTime from an RFC3339 string
pub fn parse_datetime_opt(s: Option<String>) -> Result<Option<DateTime<Utc>>, SqlError> {
    s.map(|s| parse_datetime(&s)).transpose()
}

pub fn parse_room_status(s: &str) -> Result<RoomStatus, SqlError> {
    RoomStatus::parse(s).ok_or_else(|| unknown("room status", s))
}

pub fn parse_staff_role(s: &str) -> Result<StaffRole, SqlError> {
    StaffRole::parse(s).ok_or_else(|| unknown("staff role", s))
}

pub fn parse_priority(s: &str) -> Result<Priority, SqlError> {
    Priority::parse(s).ok_or_else(|| unknown("priority", s))
}

pub fn parse_subscription(s: &str) -> Result<SubscriptionStatus, SqlError> {
    SubscriptionStatus::parse(s).ok_or_else(|| unknown("subscription status", s))
}

pub fn parse_service_kind(s: &str) -> Result<ServiceKind, SqlError> {
    ServiceKind::parse(s).ok_or_else(|| unknown("service kind", s))
}

pub fn parse_request_status(s: &str) -> Result<RequestStatus, SqlError> {
    RequestStatus::parse(s).ok_or_else(|| unknown("request status", s))
}

pub fn parse_maintenance_category(s: &str) -> Result<MaintenanceCategory, SqlError> {
    MaintenanceCategory::parse(s).ok_or_else(|| unknown("maintenance category", s))
}

pub fn parse_maintenance_status(s: &str) -> Result<MaintenanceStatus, SqlError> {
    MaintenanceStatus::parse(s).ok_or_else(|| unknown("maintenance status", s))
}

pub fn parse_access_type(s: &str) -> Result<AccessType, SqlError> {
    AccessType::parse(s).ok_or_else(|| unknown("access type", s))
}

/// Parse a comma-separated floor list ("1,2,5"); empty means none
pub fn parse_floors(s: &str) -> Vec<i32> {
    s.split(',')
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

/// Render a floor list back to its stored form
pub fn floors_to_string(floors: &[i32]) -> String {
    floors
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_fails() {
        assert!(parse_room_status("available").is_ok());
        assert!(parse_room_status("vacant").is_err());
    }

    #[test]
    fn test_floor_list_roundtrip() {
        let floors = vec![1, 2, 5];
        assert_eq!(parse_floors(&floors_to_string(&floors)), floors);
        assert!(parse_floors("").is_empty());
    }
}
