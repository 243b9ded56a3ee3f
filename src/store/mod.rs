//! Store - single source of truth for wallet display state
//!
//! # Flow
//!
//! ```text
//! UI action
//!     │
//!     ├── connect_wallet ──► default_account ──► address_of ──► commit Connection
//!     │                                                               │
//!     │                                                               ▼
//!     ├── refresh_balance ─► balance_of ──► format_currency ──► commit Balance
//!     │                                                               ▲
//!     └── fund_wallet ─────► [loading] parse_currency ──► fund_from_faucet
//! ```
//!
//! Each commit is one `watch::Sender::send_modify`, so subscribers never see
//! an address without its account or a display string without its raw value.
//! Failed operations commit nothing.

mod state;
mod wallet;

pub use state::{Balance, Connection, WalletState};
pub use wallet::{StoreError, StoreResult, WalletStore};
