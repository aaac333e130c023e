//! Devices known to the home network.

use pulse_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `devices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Device {
    pub id: DbId,
    pub name: String,
    pub device_type: String,
    pub ip_address: Option<String>,
    pub status: String,
    pub last_seen: Option<Timestamp>,
    pub created_at: Timestamp,
}
