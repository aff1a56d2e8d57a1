use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("Please install a wallet provider to continue")]
    NoProvider,
    #[error("Failed to connect to your wallet: {0}")]
    ConnectionFailed(String),
}

/// Optional wallet capability. Unrelated to the donation wizard.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts the user authorises; the first one becomes the connected address.
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError>;
    async fn chain_id(&self) -> Result<u64, WalletError>;
}

/// Provider backed by an address stored in the user's configuration.
#[derive(Debug, Clone)]
pub struct ConfiguredWallet {
    address: Option<String>,
    chain_id: u64,
}

impl ConfiguredWallet {
    pub const MAINNET: u64 = 1;

    pub fn new(address: Option<String>) -> Self {
        Self {
            address: address.filter(|value| !value.trim().is_empty()),
            chain_id: Self::MAINNET,
        }
    }
}

#[async_trait]
impl WalletProvider for ConfiguredWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        match &self.address {
            Some(address) => Ok(vec![address.clone()]),
            None => Err(WalletError::ConnectionFailed(
                "no wallet address configured (try `config set wallet_address <address>`)".into(),
            )),
        }
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.chain_id)
    }
}

/// Injected wallet-connection state with connect/disconnect/current address.
#[derive(Default)]
pub struct WalletContext {
    provider: Option<Arc<dyn WalletProvider>>,
    address: Option<String>,
    chain_id: Option<u64>,
}

impl WalletContext {
    pub fn new(provider: Option<Arc<dyn WalletProvider>>) -> Self {
        Self {
            provider,
            address: None,
            chain_id: None,
        }
    }

    pub fn set_provider(&mut self, provider: Option<Arc<dyn WalletProvider>>) {
        self.provider = provider;
    }

    pub async fn connect(&mut self) -> Result<&str, WalletError> {
        let provider = self.provider.clone().ok_or(WalletError::NoProvider)?;
        let accounts = provider.request_accounts().await?;
        let address = accounts
            .into_iter()
            .next()
            .ok_or_else(|| WalletError::ConnectionFailed("provider returned no accounts".into()))?;
        self.chain_id = Some(provider.chain_id().await?);
        tracing::info!(%address, "wallet connected");
        Ok(self.address.insert(address).as_str())
    }

    pub fn disconnect(&mut self) {
        if self.address.take().is_some() {
            tracing::info!("wallet disconnected");
        }
        self.chain_id = None;
    }

    pub fn current_address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connecting_without_provider_fails() {
        let mut wallet = WalletContext::default();
        let err = wallet.connect().await.unwrap_err();
        assert_eq!(err.to_string(), "Please install a wallet provider to continue");
        assert!(!wallet.is_connected());
    }

    #[tokio::test]
    async fn configured_wallet_connects_and_disconnects() {
        let provider: Arc<dyn WalletProvider> =
            Arc::new(ConfiguredWallet::new(Some("0xabc".into())));
        let mut wallet = WalletContext::new(Some(provider));
        assert_eq!(wallet.connect().await.unwrap(), "0xabc");
        assert_eq!(wallet.chain_id(), Some(ConfiguredWallet::MAINNET));
        wallet.disconnect();
        assert_eq!(wallet.current_address(), None);
        assert_eq!(wallet.chain_id(), None);
    }

    #[tokio::test]
    async fn blank_configured_address_cannot_connect() {
        let provider: Arc<dyn WalletProvider> = Arc::new(ConfiguredWallet::new(Some("  ".into())));
        let mut wallet = WalletContext::new(Some(provider));
        assert!(matches!(
            wallet.connect().await,
            Err(WalletError::ConnectionFailed(_))
        ));
    }
}
