//! HTTP routes for wallet state and actions

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::{get, post}, Json, Router};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::paths;
use crate::ledger::LedgerClient;
use crate::store::{StoreError, WalletStore};

pub struct ServerState<L: LedgerClient> {
    pub store: Arc<WalletStore<L>>,
    pub app_name: String,
}

impl<L: LedgerClient> Clone for ServerState<L> {
    fn clone(&self) -> Self { Self { store: self.store.clone(), app_name: self.app_name.clone() } }
}

#[derive(Deserialize)]
pub struct FundRequest { amount: Option<String> }

type ApiResult = Result<Json<Value>, (StatusCode, String)>;

pub fn create_router<L: LedgerClient>(store: Arc<WalletStore<L>>) -> Router { create_router_with_name(store, "walletstore") }

pub fn create_router_with_name<L: LedgerClient>(store: Arc<WalletStore<L>>, app_name: &str) -> Router {
    Router::new()
        .route(paths::HEALTH, get(health::<L>))
        .route(paths::WALLET, get(wallet_state::<L>))
        .route(paths::CONNECT, post(connect::<L>))
        .route(paths::REFRESH, post(refresh::<L>))
        .route(paths::FUND, post(fund::<L>))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(ServerState { store, app_name: app_name.into() })
}

fn snapshot<L: LedgerClient>(s: &ServerState<L>) -> ApiResult {
    serde_json::to_value(s.store.snapshot())
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

fn reject(e: StoreError) -> (StatusCode, String) {
    let status = match e {
        StoreError::NotConnected => StatusCode::CONFLICT,
        StoreError::Ledger(_) => StatusCode::BAD_GATEWAY,
    };
    (status, e.to_string())
}

async fn health<L: LedgerClient>(State(s): State<ServerState<L>>) -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok", "service": s.app_name}))
}

async fn wallet_state<L: LedgerClient>(State(s): State<ServerState<L>>) -> ApiResult {
    snapshot(&s)
}

async fn connect<L: LedgerClient>(State(s): State<ServerState<L>>) -> ApiResult {
    s.store.connect_wallet().await.map_err(reject)?;
    snapshot(&s)
}

async fn refresh<L: LedgerClient>(State(s): State<ServerState<L>>) -> ApiResult {
    s.store.refresh_balance().await.map_err(reject)?;
    snapshot(&s)
}

async fn fund<L: LedgerClient>(State(s): State<ServerState<L>>, body: Option<Json<FundRequest>>) -> ApiResult {
    let funded = match body.and_then(|Json(req)| req.amount) {
        Some(amount) => s.store.fund_wallet_amount(&amount).await,
        None => s.store.fund_wallet().await,
    };
    funded.map_err(reject)?;
    snapshot(&s)
}
