mod settings;

use config::{Config, ConfigError, Environment, File};

use settings::PartialSettings;

pub use settings::{
    LimitSettings, LoggingSettings, ServerSettings, Settings, StorageBackend, StoreSettings,
};

const DEFAULT_CONFIG_FILE: &str = "config/default";
const ENV_PREFIX: &str = "TOPICSEAT";

/// Loads the configuration from the default file and environment variables.
///
/// Environment variables look like `TOPICSEAT__SERVER__PORT=9000`.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from(DEFAULT_CONFIG_FILE)
}

/// Loads configuration from `file` (extension optional, may be absent) and
/// the environment, merged over `Settings::default()`.
pub fn load_config_from(file: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(file).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(merge(partial, Settings::default()))
}

fn merge(partial: PartialSettings, default: Settings) -> Settings {
    let server = partial.server;
    let store = partial.store;

    // Range checks happen in `TopicStore::open`, after logging is up.
    let max_selections = partial
        .limits
        .and_then(|l| l.max_selections_per_user)
        .unwrap_or(default.limits.max_selections_per_user);

    Settings {
        server: ServerSettings {
            host: server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
        },
        store: StoreSettings {
            backend: store
                .as_ref()
                .and_then(|s| s.backend)
                .unwrap_or(default.store.backend),
            data_path: store
                .as_ref()
                .and_then(|s| s.data_path.clone())
                .unwrap_or(default.store.data_path),
            admin_path: store
                .as_ref()
                .and_then(|s| s.admin_path.clone())
                .unwrap_or(default.store.admin_path),
        },
        limits: LimitSettings {
            max_selections_per_user: max_selections,
        },
        logging: LoggingSettings {
            level: partial
                .logging
                .and_then(|l| l.level)
                .unwrap_or(default.logging.level),
        },
    }
}
