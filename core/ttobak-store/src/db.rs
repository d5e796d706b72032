//! SQLite-backed record database: profiles, daily usage and device state.

use crate::device::DeviceState;
use crate::error::{StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use ttobak_entitlement::{EntitlementResult, RecordStore};
use ttobak_types::{DeviceId, PeriodKey, UserId};

/// Profile, usage, and device state in a single SQLite database.
///
/// Cloning is cheap; clones share the connection.
#[derive(Debug, Clone)]
pub struct RecordDb {
    conn: Arc<Mutex<Connection>>,
}

impl RecordDb {
    /// Opens (or creates) a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "Opened record database");
        Self::with_connection(conn)
    }

    /// Opens an in-memory database (for testing and demos).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> StoreResult<()> {
        self.lock()?.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS profiles (
                id TEXT PRIMARY KEY,
                email TEXT,
                is_pro INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS usage (
                user_id TEXT NOT NULL,
                period_key TEXT NOT NULL,
                count INTEGER NOT NULL DEFAULT 0,
                UNIQUE(user_id, period_key)
            );

            CREATE TABLE IF NOT EXISTS checkout_claims (
                checkout_id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS device_state (
                device_id TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                UNIQUE(device_id, key)
            );
            ",
        )?;
        Ok(())
    }

    pub(crate) fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Returns the device-scoped state view for an anonymous device.
    pub fn device(&self, device_id: DeviceId) -> DeviceState<'_> {
        DeviceState::new(self, device_id)
    }

    /// Returns the email recorded on a user's profile.
    pub fn profile_email(&self, user: &UserId) -> StoreResult<Option<String>> {
        let conn = self.lock()?;
        let email = conn
            .query_row(
                "SELECT email FROM profiles WHERE id = ?1",
                params![user.to_string()],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;
        Ok(email.flatten())
    }

    fn read_usage(conn: &Connection, user: &UserId, period: &PeriodKey) -> StoreResult<u32> {
        let count = conn
            .query_row(
                "SELECT count FROM usage WHERE user_id = ?1 AND period_key = ?2",
                params![user.to_string(), period.to_string()],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .unwrap_or(0);
        u32::try_from(count)
            .map_err(|_| StoreError::InvalidData(format!("usage count out of range: {count}")))
    }

    fn ensure_profile_row(&self, user: &UserId, email: Option<&str>) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO profiles (id, email, is_pro) VALUES (?1, ?2, 0)
             ON CONFLICT(id) DO UPDATE SET email = COALESCE(excluded.email, profiles.email)",
            params![user.to_string(), email],
        )?;
        Ok(())
    }

    fn read_pro(&self, user: &UserId) -> StoreResult<bool> {
        let conn = self.lock()?;
        let flag = conn
            .query_row(
                "SELECT is_pro FROM profiles WHERE id = ?1",
                params![user.to_string()],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(flag.is_some_and(|v| v != 0))
    }

    fn write_pro(&self, user: &UserId, is_pro: bool) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO profiles (id, is_pro) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET is_pro = excluded.is_pro",
            params![user.to_string(), is_pro as i64],
        )?;
        Ok(())
    }

    fn bump_usage(&self, user: &UserId, period: &PeriodKey) -> StoreResult<u32> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO usage (user_id, period_key, count) VALUES (?1, ?2, 1)
             ON CONFLICT(user_id, period_key) DO UPDATE SET count = usage.count + 1",
            params![user.to_string(), period.to_string()],
        )?;
        Self::read_usage(&conn, user, period)
    }

    fn claim_checkout_row(&self, checkout_id: &str, user: &UserId) -> StoreResult<bool> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO checkout_claims (checkout_id, user_id) VALUES (?1, ?2)
             ON CONFLICT(checkout_id) DO NOTHING",
            params![checkout_id, user.to_string()],
        )?;
        let owner: String = conn.query_row(
            "SELECT user_id FROM checkout_claims WHERE checkout_id = ?1",
            params![checkout_id],
            |row| row.get(0),
        )?;
        Ok(owner == user.to_string())
    }
}

impl RecordStore for RecordDb {
    fn ensure_profile(&self, user: &UserId, email: Option<&str>) -> EntitlementResult<()> {
        Ok(self.ensure_profile_row(user, email)?)
    }

    fn is_pro(&self, user: &UserId) -> EntitlementResult<bool> {
        Ok(self.read_pro(user)?)
    }

    fn set_pro(&self, user: &UserId, is_pro: bool) -> EntitlementResult<()> {
        Ok(self.write_pro(user, is_pro)?)
    }

    fn usage(&self, user: &UserId, period: &PeriodKey) -> EntitlementResult<u32> {
        let conn = self.lock()?;
        Ok(Self::read_usage(&conn, user, period)?)
    }

    fn increment_usage(&self, user: &UserId, period: &PeriodKey) -> EntitlementResult<u32> {
        Ok(self.bump_usage(user, period)?)
    }

    fn claim_checkout(&self, checkout_id: &str, user: &UserId) -> EntitlementResult<bool> {
        Ok(self.claim_checkout_row(checkout_id, user)?)
    }
}
