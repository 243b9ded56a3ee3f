//! Walletstore: observable wallet state over a ledger client.
//!
//! # Architecture
//!
//! ```text
//! UI / HTTP (server, optional)
//!   │
//!   ├── reads: snapshot(), subscribe()  ──► WalletState
//!   │
//!   └── actions ──► WalletStore
//!                     ├── connect_wallet
//!                     ├── refresh_balance
//!                     └── fund_wallet / fund_wallet_amount
//!                            │
//!                            ▼
//!                     LedgerClient (trait)
//!                            └── DevnetLedger (in-memory, faucet)
//! ```
//!
//! # Features
//!
//! - `server` (default) - axum router and the `walletstore` binary
//!
//! # Usage
//!
//! ```ignore
//! use walletstore::{DevnetLedger, WalletStore};
//!
//! let store = WalletStore::with_defaults(DevnetLedger::default());
//! store.connect_wallet().await?;
//! store.fund_wallet().await?;
//!
//! let state = store.snapshot();
//! println!("{} holds {}", state.address().unwrap(), state.balance_display().unwrap());
//! ```

pub mod config;
pub mod ledger;
pub mod logging;
pub mod runtime;
pub mod store;

#[cfg(feature = "server")]
pub mod server;

pub use config::{AppConfig, ConfigError, LedgerConfig, StoreConfig};
pub use ledger::{DevnetAccount, DevnetLedger, LedgerClient, LedgerError, LedgerResult};
pub use store::{Balance, Connection, StoreError, StoreResult, WalletState, WalletStore};

#[cfg(feature = "server")]
pub use server::{create_router, create_router_with_name};
