use config::{Config, ConfigError, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Settings{
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub orders: OrderSettings
}

#[derive(Deserialize, Debug, Clone)]
pub struct ApplicationSettings{
    pub host: String,
    pub port: u16
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend{
    Postgres,
    Memory
}

#[derive(Deserialize, Debug)]
pub struct DatabaseSettings{
    pub backend: Backend,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub name: String,
    pub pool_size: u32,
    pub connection_timeout_secs: u64,
    pub run_migrations: bool
}

impl DatabaseSettings {
    // Url of the server without a database, used to create test databases
    pub fn get_server_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port
        )
    }

    pub fn get_database_url(&self) -> String {
        format!("{}/{}", self.get_server_url(), self.name)
    }
}

/// Where the distinct station lookup of a new order runs.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StationLookup{
    #[default]
    InTransaction,
    AfterCommit
}

#[derive(Deserialize, Debug, Clone, Copy, Default)]
pub struct OrderSettings{
    #[serde(default)]
    pub station_lookup: StationLookup
}

impl Settings{
    // configuration/base.yaml, overridden by APP_* variables, e.g. APP_DATABASE__HOST
    pub fn get() -> Result<Self, ConfigError>{
        Config::builder()
            .add_source(File::with_name("configuration/base.yaml"))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?
            .try_deserialize::<Settings>()
    }
}
