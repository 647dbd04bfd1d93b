//! Notification outbox storage
//!
//! The external messaging providers drain this; nothing in-process sends.

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_priority, parse_uuid, parse_uuid_opt};
use crate::error::Result;
use crate::models::Notification;

fn notification_from_row(row: &Row<'_>) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        hotel_id: parse_uuid(&row.get::<_, String>(1)?)?,
        room_id: parse_uuid_opt(row.get::<_, Option<String>>(2)?)?,
        topic: row.get(3)?,
        body: row.get(4)?,
        priority: parse_priority(&row.get::<_, String>(5)?)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?)?,
    })
}

pub struct NotificationStore<'a> {
    conn: &'a Connection,
}

impl<'a> NotificationStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Queue one outbound notification
    #[instrument(skip(self, notification), fields(topic = %notification.topic, priority = ?notification.priority))]
    pub fn enqueue(&self, notification: &Notification) -> Result<()> {
        self.conn.execute(
            "INSERT INTO notifications (id, hotel_id, room_id, topic, body, priority, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                notification.id.to_string(),
                notification.hotel_id.to_string(),
                notification.room_id.map(|r| r.to_string()),
                notification.topic,
                notification.body,
                notification.priority.as_str(),
                notification.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// List queued notifications for a hotel, newest first
    #[instrument(skip(self))]
    pub fn list_for_hotel(&self, hotel_id: Uuid, limit: u32) -> Result<Vec<Notification>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, hotel_id, room_id, topic, body, priority, created_at
             FROM notifications WHERE hotel_id = ?1
             ORDER BY created_at DESC LIMIT ?2",
        )?;

        let notifications = stmt
            .query_map(params![hotel_id.to_string(), limit], notification_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(notifications)
    }
}
