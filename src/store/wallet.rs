//! WalletStore - connect, refresh, fund

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::state::{Balance, Connection, WalletState};
use crate::config::StoreConfig;
use crate::ledger::{LedgerClient, LedgerError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no wallet connected")]
    NotConnected,
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub struct WalletStore<L: LedgerClient> {
    ledger: L,
    config: StoreConfig,
    state: watch::Sender<WalletState<L::Account>>,
}

impl<L: LedgerClient> WalletStore<L> {
    pub fn new(ledger: L, config: StoreConfig) -> Self {
        let (state, _) = watch::channel(WalletState::default());
        Self { ledger, config, state }
    }

    pub fn with_defaults(ledger: L) -> Self { Self::new(ledger, StoreConfig::default()) }

    pub fn ledger(&self) -> &L { &self.ledger }
    pub fn config(&self) -> &StoreConfig { &self.config }

    pub fn snapshot(&self) -> WalletState<L::Account> { self.state.borrow().clone() }

    /// Receiver notified after every committed mutation.
    pub fn subscribe(&self) -> watch::Receiver<WalletState<L::Account>> { self.state.subscribe() }

    /// Connect the ledger's default account, then refresh its balance.
    ///
    /// The refresh is a follow-up step: if it fails the wallet stays connected
    /// with its previous balance and the error is only logged.
    pub async fn connect_wallet(&self) -> StoreResult<String> {
        let connection = self.fetch_connection().await.map_err(|e| {
            warn!(error = %e, "connect_wallet failed");
            StoreError::from(e)
        })?;
        let address = connection.address.clone();
        self.state.send_modify(|s| s.set_connection(connection));
        info!(%address, "wallet connected");

        if let Err(e) = self.refresh_balance().await {
            debug!(error = %e, "balance refresh after connect did not complete");
        }
        Ok(address)
    }

    async fn fetch_connection(&self) -> Result<Connection<L::Account>, LedgerError> {
        let account = self.ledger.default_account().await?;
        let address = self.ledger.address_of(&account).await?;
        Ok(Connection { account, address })
    }

    /// Re-read the balance of the connected account.
    ///
    /// Without a connected account this returns [`StoreError::NotConnected`]
    /// and never reaches the ledger.
    pub async fn refresh_balance(&self) -> StoreResult<Balance> {
        let account = self.connected_account().map_err(|e| {
            warn!(error = %e, "refresh_balance skipped");
            e
        })?;
        let balance = self.fetch_balance(&account).await.map_err(|e| {
            warn!(error = %e, "refresh_balance failed");
            StoreError::from(e)
        })?;
        debug!(raw = balance.raw, display = %balance.display, "balance committed");
        self.state.send_modify(|s| s.set_balance(balance.clone()));
        Ok(balance)
    }

    async fn fetch_balance(&self, account: &L::Account) -> Result<Balance, LedgerError> {
        let raw = self.ledger.balance_of(account).await?;
        let display = self.ledger.format_currency(raw)?;
        Ok(Balance { raw, display })
    }

    /// Request the configured amount from the faucet, then refresh.
    pub async fn fund_wallet(&self) -> StoreResult<()> {
        let amount = self.config.fund_amount.clone();
        self.fund_wallet_amount(&amount).await
    }

    /// Request `amount` (decimal, whole units) from the faucet, then refresh.
    ///
    /// `is_balance_loading` is raised for the duration of the call and lowered
    /// on every exit path, including when the future is dropped.
    pub async fn fund_wallet_amount(&self, amount: &str) -> StoreResult<()> {
        let _loading = FundingGuard::begin(&self.state);

        let result = async {
            let account = self.connected_account()?;
            let raw = self.ledger.parse_currency(amount)?;
            self.ledger.fund_from_faucet(&account, raw).await?;
            info!(amount, raw, "faucet request completed");
            Ok::<_, StoreError>(())
        }
        .await;

        if let Err(e) = &result {
            warn!(error = %e, amount, "fund_wallet failed");
            return result;
        }

        if let Err(e) = self.refresh_balance().await {
            debug!(error = %e, "balance refresh after funding did not complete");
        }
        Ok(())
    }

    fn connected_account(&self) -> StoreResult<L::Account> {
        self.state.borrow().account().cloned().ok_or(StoreError::NotConnected)
    }
}

/// Holds `is_balance_loading` up until dropped.
struct FundingGuard<'a, A> {
    state: &'a watch::Sender<WalletState<A>>,
}

impl<'a, A> FundingGuard<'a, A> {
    fn begin(state: &'a watch::Sender<WalletState<A>>) -> Self {
        state.send_modify(|s| s.begin_funding());
        Self { state }
    }
}

impl<A> Drop for FundingGuard<'_, A> {
    fn drop(&mut self) { self.state.send_modify(|s| s.end_funding()); }
}
