use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use crate::persistence::admins::AdminRecord;

/// The set of users with administrative privilege.
#[derive(Debug, Clone, Default)]
pub struct AdminSet {
    ids: HashSet<i64>,
}

impl AdminSet {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// User ids are numeric strings; anything else is never an admin.
    pub fn is_admin(&self, user: &str) -> bool {
        user.trim()
            .parse::<i64>()
            .map(|id| self.ids.contains(&id))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl From<AdminRecord> for AdminSet {
    fn from(record: AdminRecord) -> Self {
        Self::new(record.admin_ids)
    }
}

/// Source of human-readable names for user ids.
pub trait UserDirectory: Send + Sync {
    fn display_name(&self, user: &str) -> Option<String>;
}

/// A directory that knows nobody.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDirectory;

impl UserDirectory for NoDirectory {
    fn display_name(&self, _user: &str) -> Option<String> {
        None
    }
}

/// Names reported by clients as they connect.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    names: RwLock<HashMap<String, String>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remember(&self, user: &str, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        self.names
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user.to_string(), name.to_string());
    }
}

impl UserDirectory for MemoryDirectory {
    fn display_name(&self, user: &str) -> Option<String> {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user)
            .cloned()
    }
}

/// The directory name for `user`, or a label built from the id.
pub fn display_label(directory: &dyn UserDirectory, user: &str) -> String {
    directory
        .display_name(user)
        .unwrap_or_else(|| format!("User ID: {user}"))
}
