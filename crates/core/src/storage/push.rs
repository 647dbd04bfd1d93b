//! Push subscription storage

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_uuid, parse_uuid_opt};
use crate::error::Result;
use crate::models::PushSubscription;

fn subscription_from_row(row: &Row<'_>) -> rusqlite::Result<PushSubscription> {
    Ok(PushSubscription {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        hotel_id: parse_uuid_opt(row.get::<_, Option<String>>(1)?)?,
        device_token: row.get(2)?,
        topic: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?)?,
    })
}

pub struct PushStore<'a> {
    conn: &'a Connection,
}

impl<'a> PushStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Subscribe a device token to a topic. Re-subscribing is a no-op.
    #[instrument(skip(self, subscription), fields(topic = %subscription.topic))]
    pub fn subscribe(&self, subscription: &PushSubscription) -> Result<()> {
        self.conn.execute(
            "INSERT INTO push_subscriptions (id, hotel_id, device_token, topic, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(device_token, topic) DO NOTHING",
            params![
                subscription.id.to_string(),
                subscription.hotel_id.map(|h| h.to_string()),
                subscription.device_token,
                subscription.topic,
                subscription.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Remove a device token from a topic.
    ///
    /// Returns false when no such subscription existed.
    #[instrument(skip(self, device_token))]
    pub fn unsubscribe(&self, device_token: &str, topic: &str) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM push_subscriptions WHERE device_token = ?1 AND topic = ?2",
            params![device_token, topic],
        )?;
        Ok(deleted > 0)
    }

    /// List subscriptions for a topic
    #[instrument(skip(self))]
    pub fn list_for_topic(&self, topic: &str) -> Result<Vec<PushSubscription>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, hotel_id, device_token, topic, created_at
             FROM push_subscriptions WHERE topic = ?1",
        )?;

        let subscriptions = stmt
            .query_map(params![topic], subscription_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(subscriptions)
    }

    /// Count subscriptions for a hotel across topics
    pub fn count_for_hotel(&self, hotel_id: Uuid) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM push_subscriptions WHERE hotel_id = ?1",
            params![hotel_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
