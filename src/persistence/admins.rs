use std::fs;
use std::path::Path;

use serde::Deserialize;

/// The externally managed admin record.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminRecord {
    #[serde(default)]
    pub admin_ids: Vec<i64>,
}

/// Reads the admin record. A missing, empty or corrupt file yields no admins.
pub fn load_admins(path: impl AsRef<Path>) -> AdminRecord {
    let path = path.as_ref();
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(path = %path.display(), "admin record not readable: {e}");
            return AdminRecord::default();
        }
    };
    if raw.trim().is_empty() {
        return AdminRecord::default();
    }
    match serde_json::from_str(&raw) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(path = %path.display(), "admin record corrupt: {e}");
            AdminRecord::default()
        }
    }
}
