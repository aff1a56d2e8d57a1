use std::sync::Arc;

use dialoguer::theme::ColorfulTheme;
use tokio::runtime::Runtime;

use crate::{
    config::{Config, ConfigManager},
    core::services::{
        AuthContext, ConfiguredWallet, DonationService, NgoService, WalletContext, WalletProvider,
    },
    storage::Backend,
    wizard::DonationWizard,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Everything a command handler can reach. Services are async; handlers drive
/// them to completion on `runtime`.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub runtime: Runtime,
    pub donations: DonationService,
    pub ngos: NgoService,
    pub auth: AuthContext,
    pub wallet: WalletContext,
    pub config_manager: ConfigManager,
    pub config: Config,
    /// Draft in progress; dropped on submit or cancel.
    pub wizard: Option<DonationWizard>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub(crate) fn assemble(
        mode: CliMode,
        registry: CommandRegistry,
        runtime: Runtime,
        backend: Backend,
        config_manager: ConfigManager,
        config: Config,
    ) -> Self {
        let wallet = WalletContext::new(Some(wallet_provider(&config)));
        Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            runtime,
            donations: DonationService::new(&backend),
            ngos: NgoService::new(backend.ngos.clone()),
            auth: AuthContext::new(backend.auth.clone()),
            wallet,
            config_manager,
            config,
            wizard: None,
            last_command: None,
            running: true,
        }
    }

    pub fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub fn prompt(&self) -> String {
        let who = self
            .auth
            .user()
            .map(|user| user.email.as_str())
            .unwrap_or("guest");
        match &self.wizard {
            Some(wizard) => format!("donation[{} | step {}/6]> ", who, wizard.step().index()),
            None => format!("donation[{}]> ", who),
        }
    }

    /// Rebuilds the wallet provider after the configured address changes.
    pub fn refresh_wallet_provider(&mut self) {
        self.wallet.disconnect();
        self.wallet.set_provider(Some(wallet_provider(&self.config)));
    }
}

fn wallet_provider(config: &Config) -> Arc<dyn WalletProvider> {
    Arc::new(ConfiguredWallet::new(config.wallet_address.clone()))
}
