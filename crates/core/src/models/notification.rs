//! Push subscriptions and the notification outbox
//!
//! Delivery itself is handled by external messaging providers; this side
//! only stores device subscriptions and the messages that would be pushed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::room::Priority;

/// Topics are plain identifiers: letters, digits, underscore, dash
pub fn is_valid_topic(topic: &str) -> bool {
    !topic.is_empty()
        && topic
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// A device token subscribed to one topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushSubscription {
    pub id: Uuid,
    pub hotel_id: Option<Uuid>,
    pub device_token: String,
    pub topic: String,
    pub created_at: DateTime<Utc>,
}

impl PushSubscription {
    pub fn new(hotel_id: Option<Uuid>, device_token: String, topic: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            hotel_id,
            device_token,
            topic,
            created_at: Utc::now(),
        }
    }
}

/// An outbound notification, queued for the external sender
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub room_id: Option<Uuid>,
    pub topic: String,
    pub body: String,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        hotel_id: Uuid,
        room_id: Option<Uuid>,
        topic: String,
        body: String,
        priority: Priority,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            hotel_id,
            room_id,
            topic,
            body,
            priority,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_validation() {
        assert!(is_valid_topic("housekeeping"));
        assert!(is_valid_topic("hotel-42_staff"));
        assert!(!is_valid_topic(""));
        assert!(!is_valid_topic("front desk"));
        assert!(!is_valid_topic("café"));
    }
}
