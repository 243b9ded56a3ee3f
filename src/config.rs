//! Configuration - passed from higher layers or read from the environment

use std::time::Duration;

use crate::ledger::units::MAX_DECIMALS;
use crate::ledger::DevnetLedger;

pub const ENV_APP: &str = "WALLETSTORE_APP";
pub const ENV_PORT: &str = "WALLETSTORE_PORT";
pub const ENV_FUND_AMOUNT: &str = "WALLETSTORE_FUND_AMOUNT";
pub const ENV_NETWORK: &str = "WALLETSTORE_NETWORK";
pub const ENV_DECIMALS: &str = "WALLETSTORE_DECIMALS";
pub const ENV_FAUCET_CAP: &str = "WALLETSTORE_FAUCET_CAP";
pub const ENV_LATENCY_MS: &str = "WALLETSTORE_LATENCY_MS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Store behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Decimal amount requested from the faucet by `fund_wallet`.
    pub fund_amount: String,
}

impl StoreConfig {
    pub const DEFAULT_FUND_AMOUNT: &'static str = "10";

    pub fn with_fund_amount(mut self, amount: impl Into<String>) -> Self { self.fund_amount = amount.into(); self }
}

impl Default for StoreConfig {
    fn default() -> Self { Self { fund_amount: Self::DEFAULT_FUND_AMOUNT.into() } }
}

/// Settings for the bundled devnet ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub network: String,
    pub decimals: u32,
    pub faucet_cap: Option<u64>,
    pub latency: Option<Duration>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { network: "devnet".into(), decimals: DevnetLedger::DEFAULT_DECIMALS, faucet_cap: None, latency: None }
    }
}

impl LedgerConfig {
    pub fn build(&self) -> DevnetLedger {
        let mut ledger = DevnetLedger::new(self.network.clone()).with_decimals(self.decimals);
        if let Some(cap) = self.faucet_cap { ledger = ledger.with_faucet_cap(cap); }
        if let Some(latency) = self.latency { ledger = ledger.with_latency(latency); }
        ledger
    }
}

/// Top-level configuration for the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub app: String,
    pub port: u16,
    pub store: StoreConfig,
    pub ledger: LedgerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { app: "walletstore".into(), port: 8080, store: StoreConfig::default(), ledger: LedgerConfig::default() }
    }
}

impl AppConfig {
    pub fn new(app: impl Into<String>) -> Self { Self { app: app.into(), ..Default::default() } }
    pub fn with_port(mut self, port: u16) -> Self { self.port = port; self }
    pub fn with_store(mut self, store: StoreConfig) -> Self { self.store = store; self }
    pub fn with_ledger(mut self, ledger: LedgerConfig) -> Self { self.ledger = ledger; self }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(app) = get(ENV_APP) { config.app = app; }
        if let Some(port) = get(ENV_PORT) { config.port = parse(ENV_PORT, port)?; }
        if let Some(amount) = get(ENV_FUND_AMOUNT) { config.store.fund_amount = amount; }
        if let Some(network) = get(ENV_NETWORK) { config.ledger.network = network; }
        if let Some(decimals) = get(ENV_DECIMALS) {
            let parsed: u32 = parse(ENV_DECIMALS, decimals.clone())?;
            if parsed > MAX_DECIMALS {
                return Err(ConfigError::Invalid { key: ENV_DECIMALS, value: decimals });
            }
            config.ledger.decimals = parsed;
        }
        if let Some(cap) = get(ENV_FAUCET_CAP) { config.ledger.faucet_cap = Some(parse(ENV_FAUCET_CAP, cap)?); }
        if let Some(ms) = get(ENV_LATENCY_MS) {
            config.ledger.latency = Some(Duration::from_millis(parse(ENV_LATENCY_MS, ms)?));
        }
        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.store.fund_amount, "10");
        assert_eq!(config.ledger.decimals, 6);
    }

    #[test]
    fn reads_every_key() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_APP, "demo"),
            (ENV_PORT, "9000"),
            (ENV_FUND_AMOUNT, "2.5"),
            (ENV_NETWORK, "testnet"),
            (ENV_DECIMALS, "8"),
            (ENV_FAUCET_CAP, "100"),
            (ENV_LATENCY_MS, "25"),
        ]))
        .unwrap();
        assert_eq!(config.app, "demo");
        assert_eq!(config.port, 9000);
        assert_eq!(config.store.fund_amount, "2.5");
        assert_eq!(config.ledger.network, "testnet");
        assert_eq!(config.ledger.decimals, 8);
        assert_eq!(config.ledger.faucet_cap, Some(100));
        assert_eq!(config.ledger.latency, Some(Duration::from_millis(25)));
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_PORT, "  ")])).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = AppConfig::from_lookup(lookup(&[(ENV_PORT, "eighty")])).unwrap_err();
        assert!(err.to_string().contains(ENV_PORT));
    }

    #[test]
    fn rejects_precision_beyond_u64_scale() {
        let err = AppConfig::from_lookup(lookup(&[(ENV_DECIMALS, "20")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_DECIMALS, .. }));
        let config = AppConfig::from_lookup(lookup(&[(ENV_DECIMALS, "19")])).unwrap();
        assert_eq!(config.ledger.decimals, 19);
    }

    #[test]
    fn ledger_config_builds_devnet() {
        let ledger = LedgerConfig { network: "localnet".into(), decimals: 2, ..Default::default() }.build();
        assert_eq!(ledger.network(), "localnet");
        assert_eq!(ledger.decimals(), 2);
    }
}
