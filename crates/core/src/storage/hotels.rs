//! Hotel storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_subscription, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::{Hotel, SubscriptionStatus};

const HOTEL_COLUMNS: &str = "id, name, timezone, subscription, created_at";

fn hotel_from_row(row: &Row<'_>) -> rusqlite::Result<Hotel> {
    Ok(Hotel {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        name: row.get(1)?,
        timezone: row.get(2)?,
        subscription: parse_subscription(&row.get::<_, String>(3)?)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?)?,
    })
}

pub struct HotelStore<'a> {
    conn: &'a Connection,
}

impl<'a> HotelStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new hotel
    #[instrument(skip(self, hotel), fields(name = %hotel.name))]
    pub fn create(&self, hotel: &Hotel) -> Result<()> {
        self.conn.execute(
            "INSERT INTO hotels (id, name, timezone, subscription, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                hotel.id.to_string(),
                hotel.name,
                hotel.timezone,
                hotel.subscription.as_str(),
                hotel.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find hotel by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Hotel>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {HOTEL_COLUMNS} FROM hotels WHERE id = ?1"))?;

        let hotel = stmt
            .query_row(params![id.to_string()], hotel_from_row)
            .optional()?;

        Ok(hotel)
    }

    /// List hotels with an active or trial subscription
    #[instrument(skip(self))]
    pub fn list_operational(&self) -> Result<Vec<Hotel>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {HOTEL_COLUMNS} FROM hotels
             WHERE subscription IN ('active', 'trial')
             ORDER BY name"
        ))?;

        let hotels = stmt
            .query_map([], hotel_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(hotels)
    }

    /// Change a hotel's subscription status
    #[instrument(skip(self))]
    pub fn set_subscription(&self, hotel_id: Uuid, subscription: SubscriptionStatus) -> Result<()> {
        self.conn.execute(
            "UPDATE hotels SET subscription = ?1 WHERE id = ?2",
            params![subscription.as_str(), hotel_id.to_string()],
        )?;
        Ok(())
    }
}
