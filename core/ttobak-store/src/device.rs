//! Per-device key/value view over the record database.

use crate::db::RecordDb;
use crate::error::StoreResult;
use rusqlite::{params, OptionalExtension};
use ttobak_entitlement::{EntitlementResult, LocalEntitlementStore, StateKey};
use ttobak_types::DeviceId;

/// Key/value state of one anonymous device.
pub struct DeviceState<'a> {
    db: &'a RecordDb,
    device_id: DeviceId,
}

impl<'a> DeviceState<'a> {
    pub(crate) fn new(db: &'a RecordDb, device_id: DeviceId) -> Self {
        Self { db, device_id }
    }

    /// The device this view is scoped to.
    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    /// Lists the keys currently set for this device.
    pub fn keys(&self) -> StoreResult<Vec<StateKey>> {
        let conn = self.db.lock()?;
        let mut stmt =
            conn.prepare("SELECT key FROM device_state WHERE device_id = ?1 ORDER BY key")?;
        let names = stmt
            .query_map(params![self.device_id.to_string()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names.iter().filter_map(|n| StateKey::from_name(n)).collect())
    }

    fn read(&self, key: StateKey) -> StoreResult<Option<String>> {
        let conn = self.db.lock()?;
        Ok(conn
            .query_row(
                "SELECT value FROM device_state WHERE device_id = ?1 AND key = ?2",
                params![self.device_id.to_string(), key.as_str()],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn write(&self, key: StateKey, value: &str) -> StoreResult<()> {
        let conn = self.db.lock()?;
        conn.execute(
            "INSERT INTO device_state (device_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(device_id, key) DO UPDATE SET value = excluded.value",
            params![self.device_id.to_string(), key.as_str(), value],
        )?;
        Ok(())
    }

    fn delete(&self, key: StateKey) -> StoreResult<()> {
        let conn = self.db.lock()?;
        conn.execute(
            "DELETE FROM device_state WHERE device_id = ?1 AND key = ?2",
            params![self.device_id.to_string(), key.as_str()],
        )?;
        Ok(())
    }
}

impl LocalEntitlementStore for DeviceState<'_> {
    fn get(&self, key: StateKey) -> EntitlementResult<Option<String>> {
        Ok(self.read(key)?)
    }

    fn set(&self, key: StateKey, value: &str) -> EntitlementResult<()> {
        Ok(self.write(key, value)?)
    }

    fn remove(&self, key: StateKey) -> EntitlementResult<()> {
        Ok(self.delete(key)?)
    }
}
