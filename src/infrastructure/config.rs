use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub datastore: DatastoreSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            title: default_title(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatastoreSettings {
    #[serde(default = "default_uri")]
    pub uri: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_selection_timeout")]
    pub server_selection_timeout_secs: u64,
    /// JSON trip fixture; when set the in-memory backend replaces MongoDB
    #[serde(default)]
    pub fixture: Option<PathBuf>,
}

impl Default for DatastoreSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            database: default_database(),
            collection: default_collection(),
            server_selection_timeout_secs: default_selection_timeout(),
            fixture: None,
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_title() -> String {
    "NYC Taxi Trip Analytics Dashboard".to_string()
}

fn default_uri() -> String {
    "mongodb://localhost:27017/".to_string()
}

fn default_database() -> String {
    "taxis".to_string()
}

fn default_collection() -> String {
    "taxi_data".to_string()
}

fn default_selection_timeout() -> u64 {
    5
}

/// `config/dashboard.toml` (optional) overlaid with `TAXI__SECTION__KEY` env vars
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_from("config/dashboard", config::Environment::with_prefix("TAXI").separator("__"))
}

fn load_from(file: &str, env: config::Environment) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(file).required(false))
        .add_source(env)
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("TAXI")
            .separator("__")
            .source(Some(source))
    }

    #[test]
    fn test_defaults_without_file() {
        let config = load_from("config/does-not-exist", env(&[])).unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.datastore.uri, "mongodb://localhost:27017/");
        assert_eq!(config.datastore.database, "taxis");
        assert_eq!(config.datastore.collection, "taxi_data");
        assert_eq!(config.datastore.server_selection_timeout_secs, 5);
        assert!(config.datastore.fixture.is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let config = load_from(
            "config/does-not-exist",
            env(&[
                ("TAXI__DATASTORE__URI", "mongodb://db.internal:27017/"),
                ("TAXI__DATASTORE__FIXTURE", "data/sample_trips.json"),
            ]),
        )
        .unwrap();

        assert_eq!(config.datastore.uri, "mongodb://db.internal:27017/");
        assert_eq!(
            config.datastore.fixture,
            Some(PathBuf::from("data/sample_trips.json"))
        );
        assert_eq!(config.datastore.database, "taxis");
    }
}
