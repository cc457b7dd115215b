use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::service::conversation::{ConversationState, Conversations};
use crate::service::directory::{AdminSet, UserDirectory, display_label};
use crate::store::admin::parse_topic_payload;
use crate::store::engine::{ToggleOutcome, TopicView, UserSelections};
use crate::store::stats::Stats;
use crate::store::{Topic, TopicId, TopicStore, UserId};
use crate::utils::error::ServiceError;

/// Something a user asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Start,
    ListTopics,
    MySelections,
    Toggle { topic_id: TopicId },
    AdminPanel,
    BeginAddTopic,
    Cancel,
    Text { text: String },
    DeleteTopic { topic_id: TopicId },
    Stats,
    UsersOf { topic_id: TopicId },
}

impl Action {
    fn requires_admin(&self) -> bool {
        matches!(
            self,
            Action::AdminPanel
                | Action::BeginAddTopic
                | Action::DeleteTopic { .. }
                | Action::Stats
                | Action::UsersOf { .. }
        )
    }
}

/// A user who picked a topic, with the best name available for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserEntry {
    pub user_id: UserId,
    pub label: String,
}

/// Structured result of an action, for the transport to render.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    Menu {
        is_admin: bool,
        selection_limit: usize,
    },
    Topics {
        topics: Vec<TopicView>,
        selected: usize,
        limit: usize,
    },
    MySelections(UserSelections),
    Toggled(ToggleOutcome),
    AdminPanel,
    AwaitingTopicPayload,
    TopicAdded {
        topic: Topic,
    },
    TopicDeleted {
        topic: Topic,
    },
    Stats(Stats),
    UsersOf {
        topic: Topic,
        users: Vec<UserEntry>,
    },
    /// Free text that no conversation was waiting for.
    Ignored,
}

/// Dispatches actions against the store.
pub struct Handler {
    store: Arc<TopicStore>,
    admins: AdminSet,
    conversations: Conversations,
    directory: Arc<dyn UserDirectory>,
}

impl Handler {
    pub fn new(store: Arc<TopicStore>, admins: AdminSet, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            store,
            admins,
            conversations: Conversations::new(),
            directory,
        }
    }

    pub fn store(&self) -> &Arc<TopicStore> {
        &self.store
    }

    pub fn is_admin(&self, user: &str) -> bool {
        self.admins.is_admin(user)
    }

    pub fn conversation(&self, user: &str) -> ConversationState {
        self.conversations.get(user)
    }

    pub fn handle(&self, user: &str, action: Action) -> Result<Reply, ServiceError> {
        if action.requires_admin() && !self.is_admin(user) {
            tracing::warn!(user = %user, ?action, "admin action refused");
            return Err(ServiceError::Forbidden);
        }
        tracing::debug!(user = %user, ?action, "handling action");

        match action {
            Action::Start => {
                self.conversations.reset(user);
                self.store.ensure_user(user)?;
                Ok(self.menu(user))
            }
            Action::Cancel => {
                self.conversations.reset(user);
                Ok(self.menu(user))
            }
            Action::ListTopics => {
                let topics = self.store.topic_views(user);
                let selected = topics.iter().filter(|t| t.selected).count();
                Ok(Reply::Topics {
                    topics,
                    selected,
                    limit: self.store.selection_limit(),
                })
            }
            Action::MySelections => Ok(Reply::MySelections(self.store.my_selections(user))),
            Action::Toggle { topic_id } => Ok(Reply::Toggled(self.store.toggle(user, topic_id)?)),
            Action::AdminPanel => {
                self.conversations.reset(user);
                Ok(Reply::AdminPanel)
            }
            Action::BeginAddTopic => {
                self.conversations
                    .set(user, ConversationState::AwaitingTopicPayload);
                Ok(Reply::AwaitingTopicPayload)
            }
            Action::Text { text } => self.handle_text(user, &text),
            Action::DeleteTopic { topic_id } => {
                let topic = self.store.delete_topic(topic_id)?;
                Ok(Reply::TopicDeleted { topic })
            }
            Action::Stats => Ok(Reply::Stats(self.store.statistics().stats())),
            Action::UsersOf { topic_id } => {
                let view = self.store.statistics();
                let topic = view.topic(topic_id)?.clone();
                let users = view
                    .users_of(topic_id)?
                    .into_iter()
                    .map(|user_id| UserEntry {
                        label: display_label(self.directory.as_ref(), &user_id),
                        user_id,
                    })
                    .collect();
                Ok(Reply::UsersOf { topic, users })
            }
        }
    }

    /// Feeds free text to the user's conversation.
    ///
    /// An invalid payload keeps the conversation waiting so the admin can retry.
    fn handle_text(&self, user: &str, text: &str) -> Result<Reply, ServiceError> {
        match self.conversations.get(user) {
            ConversationState::Idle => Ok(Reply::Ignored),
            ConversationState::AwaitingTopicPayload => {
                if !self.is_admin(user) {
                    self.conversations.reset(user);
                    return Err(ServiceError::Forbidden);
                }
                let (name, capacity) = parse_topic_payload(text)?;
                let topic = self.store.add_topic(&name, capacity)?;
                self.conversations.reset(user);
                Ok(Reply::TopicAdded { topic })
            }
        }
    }

    fn menu(&self, user: &str) -> Reply {
        Reply::Menu {
            is_admin: self.is_admin(user),
            selection_limit: self.store.selection_limit(),
        }
    }
}
