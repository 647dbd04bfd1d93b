//! Database migration system
//!
//! Tracks schema versions and applies migrations in order.

use rusqlite::Connection;
use tracing::{info, instrument};

use crate::error::Result;

/// A database migration
pub struct Migration {
    /// Version number (must be sequential starting from 1)
    pub version: u32,
    /// Description of what this migration does
    pub description: &'static str,
    /// SQL to run for this migration
    pub sql: &'static str,
}

/// All migrations in order
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema",
        sql: r#"
            -- Hotels table (tenancy root)
            CREATE TABLE IF NOT EXISTS hotels (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                timezone TEXT NOT NULL DEFAULT 'UTC',
                subscription TEXT NOT NULL DEFAULT 'trial',
                created_at TEXT NOT NULL
            );

            -- Staff table
            CREATE TABLE IF NOT EXISTS staff (
                id TEXT PRIMARY KEY,
                hotel_id TEXT NOT NULL,
                name TEXT NOT NULL,
                role TEXT NOT NULL,
                active INTEGER NOT NULL DEFAULT 1,
                pin_hash TEXT,
                email TEXT,
                floors TEXT NOT NULL DEFAULT '',
                cleanings_completed INTEGER NOT NULL DEFAULT 0,
                cleaning_minutes_total INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                FOREIGN KEY (hotel_id) REFERENCES hotels(id) ON DELETE CASCADE
            );

            -- Rooms table
            CREATE TABLE IF NOT EXISTS rooms (
                id TEXT PRIMARY KEY,
                hotel_id TEXT NOT NULL,
                number TEXT NOT NULL,
                floor INTEGER NOT NULL DEFAULT 0,
                room_type TEXT NOT NULL DEFAULT 'standard',
                status TEXT NOT NULL DEFAULT 'available',
                priority TEXT NOT NULL DEFAULT 'normal',
                last_status_change TEXT NOT NULL,
                assigned_to TEXT,
                last_cleaned TEXT,
                cleaning_started_at TEXT,
                checkout_at TEXT,
                needs_cleaning INTEGER NOT NULL DEFAULT 0,
                version INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                FOREIGN KEY (hotel_id) REFERENCES hotels(id) ON DELETE CASCADE,
                FOREIGN KEY (assigned_to) REFERENCES staff(id),
                UNIQUE(hotel_id, number)
            );

            -- Status history: append-only audit trail, one row per change.
            -- staff_id is NULL for system-performed changes.
            CREATE TABLE IF NOT EXISTS status_history (
                id TEXT PRIMARY KEY,
                hotel_id TEXT NOT NULL,
                room_id TEXT NOT NULL,
                previous_status TEXT NOT NULL,
                new_status TEXT NOT NULL,
                recorded_at TEXT NOT NULL,
                staff_id TEXT,
                note TEXT,
                FOREIGN KEY (room_id) REFERENCES rooms(id) ON DELETE CASCADE,
                FOREIGN KEY (staff_id) REFERENCES staff(id)
            );

            -- Guest requests table
            CREATE TABLE IF NOT EXISTS requests (
                id TEXT PRIMARY KEY,
                hotel_id TEXT NOT NULL,
                room_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                priority TEXT NOT NULL DEFAULT 'normal',
                quantity INTEGER,
                created_at TEXT NOT NULL,
                completed_at TEXT,
                completed_by TEXT,
                FOREIGN KEY (hotel_id) REFERENCES hotels(id) ON DELETE CASCADE,
                FOREIGN KEY (room_id) REFERENCES rooms(id) ON DELETE CASCADE,
                FOREIGN KEY (completed_by) REFERENCES staff(id)
            );

            -- Maintenance records table
            CREATE TABLE IF NOT EXISTS maintenance (
                id TEXT PRIMARY KEY,
                hotel_id TEXT NOT NULL,
                room_id TEXT NOT NULL,
                reported_by TEXT NOT NULL,
                category TEXT NOT NULL,
                priority TEXT NOT NULL DEFAULT 'normal',
                status TEXT NOT NULL DEFAULT 'pending',
                scheduled_for TEXT,
                started_at TEXT,
                completed_at TEXT,
                elapsed_minutes INTEGER,
                images TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                FOREIGN KEY (hotel_id) REFERENCES hotels(id) ON DELETE CASCADE,
                FOREIGN KEY (room_id) REFERENCES rooms(id) ON DELETE CASCADE,
                FOREIGN KEY (reported_by) REFERENCES staff(id)
            );
        "#,
    },
    Migration {
        version: 2,
        description: "Add staff sessions",
        sql: r#"
            -- Server-side sessions, keyed by opaque token
            CREATE TABLE IF NOT EXISTS sessions (
                token TEXT PRIMARY KEY,
                staff_id TEXT NOT NULL,
                hotel_id TEXT NOT NULL,
                role TEXT NOT NULL,
                access_type TEXT NOT NULL,
                display_name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                FOREIGN KEY (staff_id) REFERENCES staff(id) ON DELETE CASCADE,
                FOREIGN KEY (hotel_id) REFERENCES hotels(id) ON DELETE CASCADE
            );
        "#,
    },
    Migration {
        version: 3,
        description: "Add push subscriptions and notification outbox",
        sql: r#"
            -- Device tokens subscribed per topic
            CREATE TABLE IF NOT EXISTS push_subscriptions (
                id TEXT PRIMARY KEY,
                hotel_id TEXT,
                device_token TEXT NOT NULL,
                topic TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(device_token, topic)
            );

            -- Outbound notifications; the external sender drains these
            CREATE TABLE IF NOT EXISTS notifications (
                id TEXT PRIMARY KEY,
                hotel_id TEXT NOT NULL,
                room_id TEXT,
                topic TEXT NOT NULL,
                body TEXT NOT NULL,
                priority TEXT NOT NULL DEFAULT 'normal',
                created_at TEXT NOT NULL,
                FOREIGN KEY (hotel_id) REFERENCES hotels(id) ON DELETE CASCADE
            );
        "#,
    },
    Migration {
        version: 4,
        description: "Add indexes for query performance",
        sql: r#"
            -- Room lookups by hotel and status drive every sweep
            CREATE INDEX IF NOT EXISTS idx_rooms_hotel ON rooms(hotel_id);
            CREATE INDEX IF NOT EXISTS idx_rooms_hotel_status ON rooms(hotel_id, status);
            CREATE INDEX IF NOT EXISTS idx_rooms_assigned ON rooms(assigned_to);

            -- History is read per room, newest first
            CREATE INDEX IF NOT EXISTS idx_history_room ON status_history(room_id, recorded_at);
            CREATE INDEX IF NOT EXISTS idx_history_hotel ON status_history(hotel_id);

            -- Staff lookups by hotel and role
            CREATE INDEX IF NOT EXISTS idx_staff_hotel ON staff(hotel_id);
            CREATE INDEX IF NOT EXISTS idx_staff_hotel_role ON staff(hotel_id, role);

            -- Pending request and maintenance boards
            CREATE INDEX IF NOT EXISTS idx_requests_hotel_status ON requests(hotel_id, status);
            CREATE INDEX IF NOT EXISTS idx_maintenance_hotel_status ON maintenance(hotel_id, status);

            -- Session expiry sweeps
            CREATE INDEX IF NOT EXISTS idx_sessions_staff ON sessions(staff_id);
            CREATE INDEX IF NOT EXISTS idx_sessions_expires ON sessions(expires_at);

            -- Subscriptions per topic
            CREATE INDEX IF NOT EXISTS idx_push_topic ON push_subscriptions(topic);
        "#,
    },
];

/// Initialize the migrations table
fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version
fn get_current_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .unwrap_or(None);
    Ok(version.unwrap_or(0))
}

/// Record that a migration was applied
fn record_migration(conn: &Connection, migration: &Migration) -> Result<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.version,
            migration.description,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Run all pending migrations
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<()> {
    init_migrations_table(conn)?;

    let current_version = get_current_version(conn)?;
    info!(current_version, "Checking for pending migrations");

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                description = migration.description,
                "Applying migration"
            );

            conn.execute_batch(migration.sql)?;
            record_migration(conn, migration)?;

            info!(version = migration.version, "Migration complete");
        }
    }

    let new_version = get_current_version(conn)?;
    if new_version > current_version {
        info!(
            from = current_version,
            to = new_version,
            "Database schema updated"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Get the latest migration version (test helper)
    fn latest_version() -> u32 {
        MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
    }

    #[test]
    fn test_migrations_run() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let version = get_current_version(&conn).unwrap();
        assert_eq!(version, latest_version());
    }

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        // Run twice
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version = get_current_version(&conn).unwrap();
        assert_eq!(version, latest_version());
    }

    #[test]
    fn test_migrations_sequential() {
        // Verify migrations are numbered sequentially
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(
                migration.version as usize,
                i + 1,
                "Migration {} should have version {}",
                migration.description,
                i + 1
            );
        }
    }
}
