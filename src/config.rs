use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::BuddyError;

pub const DEFAULT_CLIENT_NAME: &str = "Money Buddy";
pub const DEFAULT_STORE_URL: &str = "sqlite:money_buddy.sqlite";
pub const DEFAULT_PORT: u16 = 3001;

/// Environment variables recognised by [`Config::figment`].
const ENV_KEYS: &[&str] = &[
    "PLAID_CLIENT_ID",
    "PLAID_SECRET",
    "PLAID_ENV",
    "PLAID_BASE_URL",
    "PLAID_CLIENT_NAME",
    "SUPABASE_URL",
    "SUPABASE_SERVICE_KEY",
    "PORT",
    "LOGLEVEL",
    "PROXY",
];

/// Plaid deployment the server talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaidEnvironment {
    #[default]
    Sandbox,
    Development,
    Production,
}

impl PlaidEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://sandbox.plaid.com",
            Self::Development => "https://development.plaid.com",
            Self::Production => "https://production.plaid.com",
        }
    }
}

impl fmt::Display for PlaidEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaidEnvironment {
    type Err = BuddyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(BuddyError::Config(format!(
                "unknown PLAID_ENV `{other}`; expected sandbox, development or production"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub plaid_client_id: String,
    pub plaid_secret: String,
    pub plaid_env: String,
    pub plaid_base_url: Option<Url>,
    pub plaid_client_name: String,
    #[serde(rename = "supabase_url")]
    pub store_url: String,
    #[serde(rename = "supabase_service_key")]
    pub store_service_key: String,
    pub port: u16,
    pub loglevel: String,
    pub proxy: Option<Url>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plaid_client_id: String::new(),
            plaid_secret: String::new(),
            plaid_env: PlaidEnvironment::default().as_str().to_string(),
            plaid_base_url: None,
            plaid_client_name: DEFAULT_CLIENT_NAME.to_string(),
            store_url: DEFAULT_STORE_URL.to_string(),
            store_service_key: String::new(),
            port: DEFAULT_PORT,
            loglevel: "info".to_string(),
            proxy: None,
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::raw().only(ENV_KEYS))
    }

    /// Load from the process environment and validate the provider environment name.
    pub fn load() -> Result<Self, BuddyError> {
        let cfg: Config = Self::figment()
            .extract()
            .map_err(|e| BuddyError::Config(e.to_string()))?;
        cfg.environment()?;
        Ok(cfg)
    }

    pub fn environment(&self) -> Result<PlaidEnvironment, BuddyError> {
        self.plaid_env.parse()
    }

    /// Explicit override wins over the environment's canonical host.
    pub fn plaid_base_url(&self) -> Result<Url, BuddyError> {
        match &self.plaid_base_url {
            Some(url) => Ok(url.clone()),
            None => Ok(Url::parse(self.environment()?.base_url())?),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
