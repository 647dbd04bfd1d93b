//! Hotel model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription status of a hotel account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trial,
    Suspended,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Trial => "trial",
            SubscriptionStatus::Suspended => "suspended",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(SubscriptionStatus::Active),
            "trial" => Some(SubscriptionStatus::Trial),
            "suspended" => Some(SubscriptionStatus::Suspended),
            "cancelled" => Some(SubscriptionStatus::Cancelled),
            _ => None,
        }
    }

    /// Hotels in these states are included in scheduled processing
    pub fn is_operational(&self) -> bool {
        matches!(self, SubscriptionStatus::Active | SubscriptionStatus::Trial)
    }
}

/// A hotel tenant. Every other record carries a reference to one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    pub id: Uuid,
    pub name: String,
    /// IANA timezone name, informational; scheduling uses the deployment offset
    pub timezone: String,
    pub subscription: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
}

impl Hotel {
    pub fn new(name: String, timezone: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            timezone,
            subscription: SubscriptionStatus::Trial,
            created_at: Utc::now(),
        }
    }
}
