//! Repository for the `devices` table.

use sqlx::PgPool;

use crate::models::device::Device;

const COLUMNS: &str = "id, name, device_type, ip_address, status, last_seen, created_at";

/// Provides query operations for devices.
pub struct DeviceRepo;

impl DeviceRepo {
    /// List all devices, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Device>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM devices ORDER BY id ASC");
        sqlx::query_as::<_, Device>(&query).fetch_all(pool).await
    }
}
