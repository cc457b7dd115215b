use serde::Deserialize;

use crate::store::selection::DEFAULT_SELECTION_LIMIT;

/// Top-level configuration settings for the application.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub limits: LimitSettings,
    pub logging: LoggingSettings,
}

/// Configuration settings for the server.
///
/// Defines the host and port the WebSocket transport will bind to.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Which durable backend holds the topic and selection records.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Json,
    Sled,
}

/// Where state lives on disk.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StoreSettings {
    pub backend: StorageBackend,
    /// JSON document path, or sled database directory.
    pub data_path: String,
    pub admin_path: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LimitSettings {
    pub max_selections_per_user: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values are filled from defaults.
#[derive(Debug, Deserialize, Default)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub store: Option<PartialStoreSettings>,
    pub limits: Option<PartialLimitSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialStoreSettings {
    pub backend: Option<StorageBackend>,
    pub data_path: Option<String>,
    pub admin_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLimitSettings {
    pub max_selections_per_user: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

/// Provides default values for `Settings`.
impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            store: StoreSettings {
                backend: StorageBackend::Json,
                data_path: "bot_data.json".to_string(),
                admin_path: "admins.json".to_string(),
            },
            limits: LimitSettings {
                max_selections_per_user: DEFAULT_SELECTION_LIMIT,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}
