//! Staff and role models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operational staff roles
///
/// One unified set of names: `manager` covers what some deployments call
/// "supervisor", `reception` covers "receptionist".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Housekeeper,
    Maintenance,
    Manager,
    Reception,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Housekeeper => "housekeeper",
            StaffRole::Maintenance => "maintenance",
            StaffRole::Manager => "manager",
            StaffRole::Reception => "reception",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "housekeeper" => Some(StaffRole::Housekeeper),
            "maintenance" => Some(StaffRole::Maintenance),
            "manager" | "supervisor" => Some(StaffRole::Manager),
            "reception" | "receptionist" => Some(StaffRole::Reception),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StaffRole::Housekeeper => "Housekeeper",
            StaffRole::Maintenance => "Maintenance",
            StaffRole::Manager => "Manager",
            StaffRole::Reception => "Reception",
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A staff member of one hotel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub name: String,
    pub role: StaffRole,
    pub active: bool,
    /// Argon2 hash of the numeric PIN, when PIN login is enabled
    pub pin_hash: Option<String>,
    pub email: Option<String>,
    /// Floors this member is assigned to; empty means anywhere
    pub floors: Vec<i32>,
    pub cleanings_completed: u32,
    pub cleaning_minutes_total: u32,
    pub created_at: DateTime<Utc>,
}

impl Staff {
    pub fn new(hotel_id: Uuid, name: String, role: StaffRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            hotel_id,
            name,
            role,
            active: true,
            pin_hash: None,
            email: None,
            floors: Vec::new(),
            cleanings_completed: 0,
            cleaning_minutes_total: 0,
            created_at: Utc::now(),
        }
    }

    /// Running average over completed cleanings, in minutes
    pub fn average_cleaning_minutes(&self) -> Option<f64> {
        if self.cleanings_completed == 0 {
            None
        } else {
            Some(f64::from(self.cleaning_minutes_total) / f64::from(self.cleanings_completed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_aliases_unify() {
        assert_eq!(StaffRole::parse("supervisor"), Some(StaffRole::Manager));
        assert_eq!(StaffRole::parse("receptionist"), Some(StaffRole::Reception));
        assert_eq!(StaffRole::parse("butler"), None);
    }

    #[test]
    fn test_average_cleaning_minutes() {
        let mut s = Staff::new(Uuid::new_v4(), "Ana".into(), StaffRole::Housekeeper);
        assert_eq!(s.average_cleaning_minutes(), None);
        s.cleanings_completed = 4;
        s.cleaning_minutes_total = 90;
        assert_eq!(s.average_cleaning_minutes(), Some(22.5));
    }
}
