use std::collections::BTreeMap;

use serde::Serialize;

use crate::store::topic::TopicId;

pub type UserId = String;

/// Maximum number of topics a single user may hold at once.
pub const MAX_SELECTION_LIMIT: usize = 2;

pub const DEFAULT_SELECTION_LIMIT: usize = MAX_SELECTION_LIMIT;

/// Per (user, topic) state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    Unselected,
    Selected,
}

/// Owns every user's selection set.
///
/// Entries are created lazily on first interaction and never removed; a user
/// who deselects everything keeps an empty entry. Within a user the topics
/// stay in the order they were selected.
#[derive(Debug, Clone, Default)]
pub struct Selections {
    users: BTreeMap<UserId, Vec<TopicId>>,
}

impl Selections {
    pub fn from_map(users: BTreeMap<UserId, Vec<TopicId>>) -> Self {
        Self { users }
    }

    /// Creates an empty entry for `user`. Returns true if the entry is new.
    pub fn ensure_user(&mut self, user: &str) -> bool {
        if self.users.contains_key(user) {
            return false;
        }
        self.users.insert(user.to_string(), Vec::new());
        true
    }

    pub fn of(&self, user: &str) -> &[TopicId] {
        self.users.get(user).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_selected(&self, user: &str, topic: TopicId) -> bool {
        self.of(user).contains(&topic)
    }

    pub fn select(&mut self, user: &str, topic: TopicId) {
        let entry = self.users.entry(user.to_string()).or_default();
        if !entry.contains(&topic) {
            entry.push(topic);
        }
    }

    pub fn deselect(&mut self, user: &str, topic: TopicId) {
        if let Some(entry) = self.users.get_mut(user) {
            entry.retain(|t| *t != topic);
        }
    }

    /// Removes `topic` from every user. Returns how many users lost it.
    pub fn remove_topic(&mut self, topic: TopicId) -> usize {
        let mut removed = 0;
        for entry in self.users.values_mut() {
            let before = entry.len();
            entry.retain(|t| *t != topic);
            removed += before - entry.len();
        }
        removed
    }

    /// Number of users currently holding `topic`.
    pub fn occupancy(&self, topic: TopicId) -> usize {
        self.users.values().filter(|s| s.contains(&topic)).count()
    }

    /// Users holding `topic`, ordered by user id.
    pub fn users_of(&self, topic: TopicId) -> Vec<UserId> {
        self.users
            .iter()
            .filter(|(_, s)| s.contains(&topic))
            .map(|(u, _)| u.clone())
            .collect()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &Vec<TopicId>)> {
        self.users.iter()
    }

    pub fn as_map(&self) -> &BTreeMap<UserId, Vec<TopicId>> {
        &self.users
    }

    pub(crate) fn as_map_mut(&mut self) -> &mut BTreeMap<UserId, Vec<TopicId>> {
        &mut self.users
    }
}
