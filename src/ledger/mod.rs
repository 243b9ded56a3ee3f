//! Ledger boundary - the external SDK the store delegates to
//!
//! The store never talks to a chain directly. Everything that touches the
//! ledger (account discovery, address derivation, balance query, currency
//! formatting, faucet funding) goes through [`LedgerClient`].
//!
//! # Operations
//!
//! | Method | Input | Output | Used by |
//! |--------|-------|--------|---------|
//! | `default_account` | - | account handle | connect |
//! | `address_of` | account | address | connect |
//! | `balance_of` | account | raw `u64` | refresh |
//! | `format_currency` | raw `u64` | display string | refresh |
//! | `parse_currency` | decimal string | raw `u64` | fund |
//! | `fund_from_faucet` | account, raw `u64` | - | fund |

mod devnet;
pub mod units;

pub use devnet::{DevnetAccount, DevnetLedger};

use async_trait::async_trait;

/// Failure reported by a ledger client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
    #[error("unknown account: {0}")]
    UnknownAccount(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("faucet rejected request: {0}")]
    Faucet(String),
    #[error("{0}")]
    Other(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Capability handed to a [`WalletStore`](crate::WalletStore).
///
/// `Account` is the opaque handle the ledger issues for a connected wallet.
/// The store keeps it verbatim and passes it back on later calls.
#[async_trait]
pub trait LedgerClient: Send + Sync + 'static {
    type Account: Clone + Send + Sync + 'static;

    async fn default_account(&self) -> LedgerResult<Self::Account>;
    async fn address_of(&self, account: &Self::Account) -> LedgerResult<String>;
    async fn balance_of(&self, account: &Self::Account) -> LedgerResult<u64>;
    fn format_currency(&self, raw: u64) -> LedgerResult<String>;
    fn parse_currency(&self, amount: &str) -> LedgerResult<u64>;
    async fn fund_from_faucet(&self, account: &Self::Account, raw: u64) -> LedgerResult<()>;
}
