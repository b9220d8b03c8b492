use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Settings exactly as read from the environment, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvSettings {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    pub nft_contract_address: Option<String>,
    pub proxy_contract_address: Option<String>,
    pub opensea_api_key: Option<String>,

    #[serde(default = "default_opensea_base_url")]
    pub opensea_base_url: String,
    #[serde(default = "default_chain")]
    pub chain: String,
    #[serde(default = "default_order_protocol")]
    pub order_protocol: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    // Politeness delays
    #[serde(default = "default_item_delay_ms")]
    pub item_delay_ms: u64,
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    #[serde(default)]
    pub dry_run: bool,
}

fn default_backend_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_opensea_base_url() -> String {
    "https://api.opensea.io/api/v2".to_string()
}

fn default_chain() -> String {
    "ethereum".to_string()
}

fn default_order_protocol() -> String {
    "seaport".to_string()
}

fn default_page_size() -> usize {
    50
}

fn default_item_delay_ms() -> u64 {
    200
}

fn default_page_delay_ms() -> u64 {
    500
}

/// Immutable run configuration, captured once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub backend_url: String,
    pub collection_address: String,
    pub marketplace_contract: Option<String>,
    pub api_key: String,
    pub opensea_base_url: String,
    pub chain: String,
    pub order_protocol: String,
    pub page_size: usize,
    pub item_delay: Duration,
    pub page_delay: Duration,
    pub dry_run: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let c = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;
        let raw: EnvSettings = c.try_deserialize()?;
        raw.validate()
    }
}

impl EnvSettings {
    pub fn validate(self) -> Result<Settings, ConfigError> {
        let collection_address = required(self.nft_contract_address, "NFT_CONTRACT_ADDRESS")?;
        let api_key = required(self.opensea_api_key, "OPENSEA_API_KEY")?;

        if self.page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "PAGE_SIZE",
                reason: "must be at least 1".to_string(),
            });
        }
        let backend_url = self.backend_url.trim().trim_end_matches('/').to_string();
        if backend_url.is_empty() {
            return Err(ConfigError::Invalid {
                key: "BACKEND_URL",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Settings {
            backend_url,
            collection_address,
            marketplace_contract: non_empty(self.proxy_contract_address),
            api_key,
            opensea_base_url: self.opensea_base_url.trim().trim_end_matches('/').to_string(),
            chain: self.chain.trim().to_string(),
            order_protocol: self.order_protocol.trim().to_string(),
            page_size: self.page_size,
            item_delay: Duration::from_millis(self.item_delay_ms),
            page_delay: Duration::from_millis(self.page_delay_ms),
            dry_run: self.dry_run,
        })
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|x| !x.trim().is_empty())
}

fn required(v: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    non_empty(v).ok_or(ConfigError::Missing(key))
}
