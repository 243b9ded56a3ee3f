//! HTTP surface for front-ends
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | `/health` | GET | `{status, service}` |
//! | `/wallet` | GET | Current state snapshot |
//! | `/wallet/connect` | POST | Connect default account, refresh balance |
//! | `/wallet/refresh` | POST | Re-read balance |
//! | `/wallet/fund` | POST | Faucet request, optional `{"amount": "2.5"}` |
//!
//! Not connected → `409`, ledger failure → `502`.

mod routes;

pub use routes::{create_router, create_router_with_name, ServerState};

pub mod paths {
    pub const HEALTH: &str = "/health";
    pub const WALLET: &str = "/wallet";
    pub const CONNECT: &str = "/wallet/connect";
    pub const REFRESH: &str = "/wallet/refresh";
    pub const FUND: &str = "/wallet/fund";
}
