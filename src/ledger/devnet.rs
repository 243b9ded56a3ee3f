//! DevnetLedger - in-memory ledger client with a faucet

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::units::{format_units, parse_units, MAX_DECIMALS};
use super::{LedgerClient, LedgerError, LedgerResult};

/// Account handle issued by [`DevnetLedger`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DevnetAccount {
    label: String,
}

/// Ledger living entirely in process memory.
///
/// Addresses are `sha256(network || label)` truncated to 20 bytes, hex-encoded.
pub struct DevnetLedger {
    network: String,
    decimals: u32,
    faucet_cap: Option<u64>,
    latency: Option<Duration>,
    offline: AtomicBool,
    balances: Mutex<HashMap<String, u64>>,
}

impl Default for DevnetLedger {
    fn default() -> Self { Self::new("devnet") }
}

impl DevnetLedger {
    pub const DEFAULT_DECIMALS: u32 = 6;

    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            decimals: Self::DEFAULT_DECIMALS,
            faucet_cap: None,
            latency: None,
            offline: AtomicBool::new(false),
            balances: Mutex::new(HashMap::new()),
        }
    }

    /// Precision is capped at [`MAX_DECIMALS`].
    pub fn with_decimals(mut self, decimals: u32) -> Self { self.decimals = decimals.min(MAX_DECIMALS); self }
    /// Largest raw amount a single faucet request may ask for.
    pub fn with_faucet_cap(mut self, cap: u64) -> Self { self.faucet_cap = Some(cap); self }
    /// Delay every async call, to make in-flight states visible.
    pub fn with_latency(mut self, latency: Duration) -> Self { self.latency = Some(latency); self }

    pub fn network(&self) -> &str { &self.network }
    pub fn decimals(&self) -> u32 { self.decimals }

    /// While offline every async call fails with [`LedgerError::Unavailable`].
    pub fn set_offline(&self, offline: bool) { self.offline.store(offline, Ordering::SeqCst); }

    /// Overwrite the raw balance held by `account`.
    pub fn set_balance(&self, account: &DevnetAccount, raw: u64) -> LedgerResult<()> {
        let address = self.derive_address(&account.label);
        self.lock()?.insert(address, raw);
        Ok(())
    }

    fn derive_address(&self, label: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.network.as_bytes());
        hasher.update([0u8]);
        hasher.update(label.as_bytes());
        hex::encode_upper(&hasher.finalize()[..20])
    }

    fn lock(&self) -> LedgerResult<std::sync::MutexGuard<'_, HashMap<String, u64>>> {
        self.balances.lock().map_err(|_| LedgerError::Other("balances lock poisoned".into()))
    }

    async fn round_trip(&self) -> LedgerResult<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable(format!("{} is offline", self.network)));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for DevnetLedger {
    type Account = DevnetAccount;

    async fn default_account(&self) -> LedgerResult<DevnetAccount> {
        self.round_trip().await?;
        let account = DevnetAccount { label: "default".into() };
        self.lock()?.entry(self.derive_address(&account.label)).or_insert(0);
        tracing::debug!(network = %self.network, "issued default account");
        Ok(account)
    }

    async fn address_of(&self, account: &DevnetAccount) -> LedgerResult<String> {
        self.round_trip().await?;
        Ok(self.derive_address(&account.label))
    }

    async fn balance_of(&self, account: &DevnetAccount) -> LedgerResult<u64> {
        self.round_trip().await?;
        let address = self.derive_address(&account.label);
        self.lock()?
            .get(&address)
            .copied()
            .ok_or(LedgerError::UnknownAccount(address))
    }

    fn format_currency(&self, raw: u64) -> LedgerResult<String> {
        Ok(format_units(raw, self.decimals))
    }

    fn parse_currency(&self, amount: &str) -> LedgerResult<u64> {
        parse_units(amount, self.decimals)
    }

    async fn fund_from_faucet(&self, account: &DevnetAccount, raw: u64) -> LedgerResult<()> {
        self.round_trip().await?;
        if let Some(cap) = self.faucet_cap {
            if raw > cap {
                return Err(LedgerError::Faucet(format!("requested {} exceeds cap {}", raw, cap)));
            }
        }
        let address = self.derive_address(&account.label);
        let mut balances = self.lock()?;
        let balance = balances.entry(address.clone()).or_insert(0);
        *balance = balance
            .checked_add(raw)
            .ok_or_else(|| LedgerError::Faucet("balance overflow".into()))?;
        tracing::info!(%address, raw, "faucet funded account");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_account_is_stable_and_starts_empty() {
        let ledger = DevnetLedger::default();
        let a = ledger.default_account().await.unwrap();
        let b = ledger.default_account().await.unwrap();
        assert_eq!(a, b);
        assert_eq!(ledger.balance_of(&a).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn address_depends_on_network() {
        let dev = DevnetLedger::new("devnet");
        let test = DevnetLedger::new("testnet");
        let acc = dev.default_account().await.unwrap();
        let dev_addr = dev.address_of(&acc).await.unwrap();
        let test_addr = test.address_of(&acc).await.unwrap();
        assert_eq!(dev_addr.len(), 40);
        assert_ne!(dev_addr, test_addr);
    }

    #[tokio::test]
    async fn faucet_credits_balance() {
        let ledger = DevnetLedger::default();
        let acc = ledger.default_account().await.unwrap();
        let raw = ledger.parse_currency("10").unwrap();
        ledger.fund_from_faucet(&acc, raw).await.unwrap();
        ledger.fund_from_faucet(&acc, raw).await.unwrap();
        assert_eq!(ledger.balance_of(&acc).await.unwrap(), 20_000_000);
        assert_eq!(ledger.format_currency(20_000_000).unwrap(), "20.0");
    }

    #[tokio::test]
    async fn faucet_cap_rejects_large_requests() {
        let ledger = DevnetLedger::default().with_faucet_cap(1_000_000);
        let acc = ledger.default_account().await.unwrap();
        let err = ledger.fund_from_faucet(&acc, 2_000_000).await.unwrap_err();
        assert!(matches!(err, LedgerError::Faucet(_)));
        assert_eq!(ledger.balance_of(&acc).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn offline_ledger_fails_async_calls() {
        let ledger = DevnetLedger::default();
        let acc = ledger.default_account().await.unwrap();
        ledger.set_offline(true);
        assert!(matches!(ledger.balance_of(&acc).await, Err(LedgerError::Unavailable(_))));
        assert!(matches!(ledger.default_account().await, Err(LedgerError::Unavailable(_))));
        // formatting is local and keeps working
        assert_eq!(ledger.format_currency(1).unwrap(), "0.000001");
        ledger.set_offline(false);
        assert!(ledger.balance_of(&acc).await.is_ok());
    }

    #[tokio::test]
    async fn oversized_precision_is_capped() {
        let ledger = DevnetLedger::default().with_decimals(40);
        assert_eq!(ledger.decimals(), MAX_DECIMALS);
        let acc = ledger.default_account().await.unwrap();
        let raw = ledger.parse_currency("1").unwrap();
        ledger.fund_from_faucet(&acc, raw).await.unwrap();
        assert_eq!(ledger.format_currency(ledger.balance_of(&acc).await.unwrap()).unwrap(), "1.0");
    }

    #[tokio::test]
    async fn unknown_account_has_no_balance() {
        let ledger = DevnetLedger::default();
        let stranger = DevnetAccount { label: "stranger".into() };
        assert!(matches!(ledger.balance_of(&stranger).await, Err(LedgerError::UnknownAccount(_))));
        ledger.set_balance(&stranger, 7).unwrap();
        assert_eq!(ledger.balance_of(&stranger).await.unwrap(), 7);
    }
}
