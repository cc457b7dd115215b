use std::sync::Arc;

use serde_json::json;

use super::{
    Action, AdminSet, ConversationState, Handler, MemoryDirectory, NoDirectory, Reply,
    UserDirectory, display_label,
};
use crate::persistence::JsonFileStorage;
use crate::store::{SelectionState, StoreOptions, TopicStore};
use crate::utils::error::{ServiceError, StoreError};

const ADMIN: &str = "42";

fn setup() -> (Handler, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonFileStorage::new(dir.path().join("bot_data.json"));
    let store = Arc::new(TopicStore::open(Box::new(storage), StoreOptions::default()));
    let directory = Arc::new(MemoryDirectory::new());
    directory.remember("1001", "Ali Valiyev (@ali)");
    let handler = Handler::new(store, AdminSet::new([42]), directory);
    (handler, dir)
}

fn add_topic(handler: &Handler, payload: &str) -> u64 {
    handler.handle(ADMIN, Action::BeginAddTopic).unwrap();
    match handler
        .handle(
            ADMIN,
            Action::Text {
                text: payload.into(),
            },
        )
        .unwrap()
    {
        Reply::TopicAdded { topic } => topic.id,
        other => panic!("expected TopicAdded, got {other:?}"),
    }
}

#[test]
fn test_start_registers_user() {
    let (handler, _dir) = setup();
    let reply = handler.handle("1001", Action::Start).unwrap();
    assert!(matches!(
        reply,
        Reply::Menu {
            is_admin: false,
            selection_limit: 2
        }
    ));
    assert_eq!(handler.store().statistics().total_users(), 1);

    let reply = handler.handle(ADMIN, Action::Start).unwrap();
    assert!(matches!(reply, Reply::Menu { is_admin: true, .. }));
}

#[test]
fn test_admin_actions_are_gated() {
    let (handler, _dir) = setup();
    for action in [
        Action::AdminPanel,
        Action::BeginAddTopic,
        Action::DeleteTopic { topic_id: 1 },
        Action::Stats,
        Action::UsersOf { topic_id: 1 },
    ] {
        assert!(matches!(
            handler.handle("1001", action),
            Err(ServiceError::Forbidden)
        ));
    }
    assert_eq!(handler.conversation("1001"), ConversationState::Idle);
}

#[test]
fn test_add_topic_conversation() {
    let (handler, _dir) = setup();
    assert!(matches!(
        handler.handle(ADMIN, Action::BeginAddTopic).unwrap(),
        Reply::AwaitingTopicPayload
    ));
    assert_eq!(
        handler.conversation(ADMIN),
        ConversationState::AwaitingTopicPayload
    );

    // A bad payload keeps the conversation open.
    let err = handler
        .handle(
            ADMIN,
            Action::Text {
                text: "Bad | 0".into(),
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Store(StoreError::InvalidInput(_))
    ));
    assert_eq!(
        handler.conversation(ADMIN),
        ConversationState::AwaitingTopicPayload
    );

    let reply = handler
        .handle(
            ADMIN,
            Action::Text {
                text: "Python dasturlash | 30".into(),
            },
        )
        .unwrap();
    match reply {
        Reply::TopicAdded { topic } => {
            assert_eq!(topic.name, "Python dasturlash");
            assert_eq!(topic.capacity, 30);
        }
        other => panic!("expected TopicAdded, got {other:?}"),
    }
    assert_eq!(handler.conversation(ADMIN), ConversationState::Idle);
}

#[test]
fn test_text_while_idle_is_ignored() {
    let (handler, _dir) = setup();
    let reply = handler
        .handle(
            "1001",
            Action::Text {
                text: "Rust | 3".into(),
            },
        )
        .unwrap();
    assert!(matches!(reply, Reply::Ignored));
    assert!(handler.store().list_topics().is_empty());
}

#[test]
fn test_cancel_leaves_conversation() {
    let (handler, _dir) = setup();
    handler.handle(ADMIN, Action::BeginAddTopic).unwrap();
    handler.handle(ADMIN, Action::Cancel).unwrap();
    let reply = handler
        .handle(
            ADMIN,
            Action::Text {
                text: "Rust | 3".into(),
            },
        )
        .unwrap();
    assert!(matches!(reply, Reply::Ignored));
}

#[test]
fn test_toggle_and_list() {
    let (handler, _dir) = setup();
    let id = add_topic(&handler, "Rust | 1");

    match handler.handle("1001", Action::Toggle { topic_id: id }).unwrap() {
        Reply::Toggled(outcome) => {
            assert_eq!(outcome.state, SelectionState::Selected);
            assert_eq!(outcome.selections, vec![id]);
        }
        other => panic!("expected Toggled, got {other:?}"),
    }

    match handler.handle("1002", Action::ListTopics).unwrap() {
        Reply::Topics {
            topics,
            selected,
            limit,
        } => {
            assert_eq!(selected, 0);
            assert_eq!(limit, 2);
            assert!(topics[0].full);
        }
        other => panic!("expected Topics, got {other:?}"),
    }

    let err = handler
        .handle("1002", Action::Toggle { topic_id: id })
        .unwrap_err();
    assert_eq!(err.kind(), "capacity_full");

    match handler.handle("1001", Action::MySelections).unwrap() {
        Reply::MySelections(sel) => assert_eq!(sel.topics[0].name, "Rust"),
        other => panic!("expected MySelections, got {other:?}"),
    }
}

#[test]
fn test_users_of_uses_directory_labels() {
    let (handler, _dir) = setup();
    let id = add_topic(&handler, "Rust | 5");
    handler.handle("1001", Action::Toggle { topic_id: id }).unwrap();
    handler.handle("1002", Action::Toggle { topic_id: id }).unwrap();

    match handler.handle(ADMIN, Action::UsersOf { topic_id: id }).unwrap() {
        Reply::UsersOf { topic, users } => {
            assert_eq!(topic.id, id);
            let labels: Vec<_> = users.iter().map(|u| u.label.as_str()).collect();
            assert_eq!(labels, vec!["Ali Valiyev (@ali)", "User ID: 1002"]);
        }
        other => panic!("expected UsersOf, got {other:?}"),
    }

    let err = handler
        .handle(ADMIN, Action::UsersOf { topic_id: 99 })
        .unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[test]
fn test_delete_and_stats() {
    let (handler, _dir) = setup();
    let a = add_topic(&handler, "A | 2");
    let b = add_topic(&handler, "B | 2");
    handler.handle("1001", Action::Toggle { topic_id: a }).unwrap();
    handler.handle("1001", Action::Toggle { topic_id: b }).unwrap();

    match handler.handle(ADMIN, Action::DeleteTopic { topic_id: a }).unwrap() {
        Reply::TopicDeleted { topic } => assert_eq!(topic.name, "A"),
        other => panic!("expected TopicDeleted, got {other:?}"),
    }

    match handler.handle(ADMIN, Action::Stats).unwrap() {
        Reply::Stats(stats) => {
            assert_eq!(stats.total_topics, 1);
            assert_eq!(stats.total_users, 1);
            assert_eq!(stats.topics[0].topic.id, b);
            assert_eq!(stats.topics[0].occupancy, 1);
        }
        other => panic!("expected Stats, got {other:?}"),
    }
}

#[test]
fn test_action_wire_format() {
    let action: Action = serde_json::from_value(json!({"type": "toggle", "topic_id": 3})).unwrap();
    assert_eq!(action, Action::Toggle { topic_id: 3 });
    let action: Action = serde_json::from_value(json!({"type": "begin_add_topic"})).unwrap();
    assert_eq!(action, Action::BeginAddTopic);

    let reply = serde_json::to_value(Reply::Menu {
        is_admin: false,
        selection_limit: 2,
    })
    .unwrap();
    assert_eq!(
        reply,
        json!({"type": "menu", "is_admin": false, "selection_limit": 2})
    );
}

#[test]
fn test_admin_set() {
    let admins = AdminSet::new([7, 42]);
    assert!(admins.is_admin("42"));
    assert!(admins.is_admin(" 7 "));
    assert!(!admins.is_admin("8"));
    assert!(!admins.is_admin("alice"));
    assert_eq!(admins.len(), 2);
}

#[test]
fn test_display_label_fallback() {
    assert_eq!(display_label(&NoDirectory, "55"), "User ID: 55");
    let dir = MemoryDirectory::new();
    dir.remember("55", "   ");
    assert_eq!(dir.display_name("55"), None);
    dir.remember("55", "Nodira");
    assert_eq!(display_label(&dir, "55"), "Nodira");
}
