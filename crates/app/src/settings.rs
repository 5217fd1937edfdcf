//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` next to the binary and can be overridden with
//! `WALLET__<SECTION>__<KEY>` environment variables.
//!
//! See `settings.toml` for an example.
use config::{
    Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    #[default]
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Wallet {
    pub initial_allowance: f64,
    pub member_role: String,
    pub admin_role: String,
}

impl Default for Wallet {
    fn default() -> Self {
        let policy = engine::WalletPolicy::default();
        Self {
            initial_allowance: policy.initial_allowance,
            member_role: policy.member_role,
            admin_role: policy.admin_role,
        }
    }
}

impl From<Wallet> for engine::WalletPolicy {
    fn from(value: Wallet) -> Self {
        Self {
            initial_allowance: value.initial_allowance,
            member_role: value.member_role,
            admin_role: value.admin_role,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Intake {
    pub capacity: usize,
    pub user_data_queue: String,
    pub general_data_queue: String,
    pub general_request_queue: String,
    pub transaction_queue: String,
}

impl Default for Intake {
    fn default() -> Self {
        let queues = intake::Queues::default();
        Self {
            capacity: 256,
            user_data_queue: queues.user_data,
            general_data_queue: queues.general_data,
            general_request_queue: queues.general_request,
            transaction_queue: queues.transaction,
        }
    }
}

impl Intake {
    pub fn queues(&self) -> intake::Queues {
        intake::Queues {
            user_data: self.user_data_queue.clone(),
            general_data: self.general_data_queue.clone(),
            general_request: self.general_request_queue.clone(),
            transaction: self.transaction_queue.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub database: Database,
    pub server: Option<Server>,
    #[serde(default)]
    pub wallet: Wallet,
    /// Missing section means the bus intake is not started.
    pub intake: Option<Intake>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(
            Config::builder()
                .add_source(File::with_name("settings").required(false))
                .add_source(Environment::with_prefix("WALLET").separator("__")),
        )
    }

    fn from_config(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
