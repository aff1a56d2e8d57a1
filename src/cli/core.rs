//! Shell context construction, dispatch, and error reporting.

use std::{io, sync::Arc};

use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::{ConfigError, ConfigManager},
    core::services::WalletError,
    domain::ParseChoiceError,
    errors::{DonationError, AUTH_ROUTE},
    storage::{Backend, JsonStore, StoreError},
    wizard::{DonationWizard, ValidationError},
};

use super::commands;
use super::io as cli_io;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failures that end the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Command failed: {0}")]
    Command(String),
}

/// Failures of a single command; reported and the shell keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Donation(#[from] DonationError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        CommandError::Donation(DonationError::Validation(err))
    }
}

impl From<ParseChoiceError> for CommandError {
    fn from(err: ParseChoiceError) -> Self {
        CommandError::InvalidArguments(err.to_string())
    }
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let store = Arc::new(JsonStore::new_default()?);
        let backend = Backend::from_store(store);
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;

        let color = config.ui_color_enabled && mode == CliMode::Interactive;
        output::set_color_enabled(color);

        let registry = CommandRegistry::with_entries(commands::all_definitions());
        let mut context = Self::assemble(mode, registry, runtime, backend, config_manager, config);

        let restored = context
            .runtime
            .block_on(context.auth.initialize())
            .map_err(|err| CliError::Command(err.to_string()))?
            .map(|user| user.email.clone());
        if let (Some(email), CliMode::Interactive) = (restored, mode) {
            cli_io::print_info(format!("Signed in as {}.", email));
        }
        Ok(context)
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true)
            .map_err(|err| CliError::Command(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::Donation(DonationError::Validation(err)) => {
                cli_io::print_error(format!("{}: {}", err.title, err.message));
            }
            CommandError::Donation(err @ DonationError::Unauthenticated) => {
                cli_io::print_error(
                    "Login required: Please login or create an account to continue",
                );
                cli_io::print_hint("Sign in with `signin <email> <password>` or `signup`.");
                if let Some(route) = err.redirect_path() {
                    cli_io::print_hint(format!("Redirecting to {}", route));
                }
            }
            other => cli_io::print_error(other.to_string()),
        }
        Ok(())
    }

    pub(crate) fn persist_config(&self) -> Result<(), CommandError> {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Starts a fresh draft prefilled from the session and the NGO directory.
    pub(crate) fn start_wizard(&mut self) -> Result<&mut DonationWizard, CommandError> {
        let mut wizard = match self.auth.user() {
            Some(user) => DonationWizard::for_user(user),
            None => DonationWizard::new(),
        };
        let ngos = self.runtime.block_on(self.ngos.list())?;
        wizard.preselect_ngo(&ngos);
        Ok(self.wizard.insert(wizard))
    }

    pub(crate) fn wizard_mut(&mut self) -> Result<&mut DonationWizard, CommandError> {
        self.wizard.as_mut().ok_or_else(|| {
            CommandError::InvalidArguments(
                "No donation in progress. Use `donate` to start one.".into(),
            )
        })
    }

    pub(crate) fn require_signed_in_hint(&self) {
        if !self.auth.is_authenticated() {
            cli_io::print_hint(format!(
                "You are not signed in; submitting will redirect to {}.",
                AUTH_ROUTE
            ));
        }
    }
}
