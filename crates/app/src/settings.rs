//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and `BANK__*` environment variables, e.g.
//! `BANK__SERVER__PORT=8080`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_source(File::with_name("settings").required(false))
    }

    fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.port", 5000)?
            .set_default("server.database.sqlite", "bank.db")?
            .add_source(source)
            .add_source(Environment::with_prefix("BANK").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn defaults_apply_without_file() {
        let settings = Settings::from_source(File::from_str("", FileFormat::Toml)).unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.port, 5000);
        assert!(settings.server.bind.is_none());
        assert!(matches!(settings.server.database, Database::Sqlite(ref path) if path == "bank.db"));
    }

    #[test]
    fn file_overrides_defaults() {
        let toml = r#"
            [app]
            level = "debug"

            [server]
            bind = "0.0.0.0"
            port = 8080
            database = "memory"
        "#;
        let settings = Settings::from_source(File::from_str(toml, FileFormat::Toml)).unwrap();
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.server.bind.as_deref(), Some("0.0.0.0"));
        assert_eq!(settings.server.port, 8080);
        assert!(matches!(settings.server.database, Database::Memory));
    }
}
