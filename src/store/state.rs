//! WalletState - the observable snapshot

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Payload committed by a successful connect: handle and address together.
#[derive(Debug, Clone)]
pub struct Connection<A> {
    pub account: A,
    pub address: String,
}

/// Payload committed by a successful refresh. `display` is the ledger's
/// rendering of `raw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub raw: u64,
    pub display: String,
}

/// Wallet/account/balance state as seen by UI layers.
///
/// Only [`WalletStore`](crate::WalletStore) mutates it; everyone else gets
/// clones through `snapshot()` or a watch receiver.
#[derive(Debug, Clone)]
pub struct WalletState<A> {
    account: Option<A>,
    address: Option<String>,
    balance: Option<Balance>,
    balance_updated_at: Option<DateTime<Utc>>,
    fundings_in_flight: usize,
}

impl<A> Default for WalletState<A> {
    fn default() -> Self {
        Self { account: None, address: None, balance: None, balance_updated_at: None, fundings_in_flight: 0 }
    }
}

impl<A> WalletState<A> {
    pub fn account(&self) -> Option<&A> { self.account.as_ref() }
    pub fn address(&self) -> Option<&str> { self.address.as_deref() }
    pub fn is_connected(&self) -> bool { self.account.is_some() }
    pub fn balance(&self) -> Option<&Balance> { self.balance.as_ref() }
    pub fn balance_raw(&self) -> Option<u64> { self.balance.as_ref().map(|b| b.raw) }
    pub fn balance_display(&self) -> Option<&str> { self.balance.as_ref().map(|b| b.display.as_str()) }
    pub fn balance_updated_at(&self) -> Option<DateTime<Utc>> { self.balance_updated_at }
    /// True while at least one funding request is outstanding.
    pub fn is_balance_loading(&self) -> bool { self.fundings_in_flight > 0 }

    pub(crate) fn set_connection(&mut self, connection: Connection<A>) {
        self.account = Some(connection.account);
        self.address = Some(connection.address);
    }

    pub(crate) fn set_balance(&mut self, balance: Balance) {
        self.balance = Some(balance);
        self.balance_updated_at = Some(Utc::now());
    }

    pub(crate) fn begin_funding(&mut self) { self.fundings_in_flight += 1; }

    pub(crate) fn end_funding(&mut self) { self.fundings_in_flight = self.fundings_in_flight.saturating_sub(1); }
}

// The account handle is opaque to readers and never serialized.
impl<A> Serialize for WalletState<A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("WalletState", 6)?;
        s.serialize_field("connected", &self.is_connected())?;
        s.serialize_field("address", &self.address)?;
        s.serialize_field("balance_raw", &self.balance_raw())?;
        s.serialize_field("balance_display", &self.balance_display())?;
        s.serialize_field("is_balance_loading", &self.is_balance_loading())?;
        s.serialize_field("balance_updated_at", &self.balance_updated_at)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn starts_empty() {
        let state = WalletState::<u8>::default();
        assert!(!state.is_connected());
        assert!(state.address().is_none());
        assert!(state.balance().is_none());
        assert!(!state.is_balance_loading());
    }

    #[test]
    fn connection_sets_account_and_address_together() {
        let mut state = WalletState::default();
        state.set_connection(Connection { account: 7u8, address: "ADDR".into() });
        assert_eq!(state.account(), Some(&7));
        assert_eq!(state.address(), Some("ADDR"));
    }

    #[test]
    fn overlapping_fundings_keep_flag_raised() {
        let mut state = WalletState::<u8>::default();
        state.begin_funding();
        state.begin_funding();
        state.end_funding();
        assert!(state.is_balance_loading());
        state.end_funding();
        assert!(!state.is_balance_loading());
        state.end_funding();
        assert!(!state.is_balance_loading());
    }

    #[test]
    fn serializes_without_account_handle() {
        let mut state = WalletState::default();
        state.set_connection(Connection { account: 1u8, address: "ADDR123".into() });
        state.set_balance(Balance { raw: 5_000_000, display: "5.0".into() });
        let mut value = serde_json::to_value(&state).unwrap();
        assert!(value["balance_updated_at"].is_string());
        value.as_object_mut().unwrap().remove("balance_updated_at");
        assert_eq!(
            value,
            json!({
                "connected": true,
                "address": "ADDR123",
                "balance_raw": 5_000_000,
                "balance_display": "5.0",
                "is_balance_loading": false
            })
        );
    }
}
