use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::field;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "wallet",
        "Connect or disconnect a wallet",
        "wallet <connect|disconnect|status>",
        cmd_wallet,
    )]
}

fn cmd_wallet(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_lowercase()).as_deref() {
        Some("connect") => {
            let address = context
                .runtime
                .block_on(context.wallet.connect())?
                .to_string();
            io::print_success(format!("Wallet connected: {}", address));
        }
        Some("disconnect") => {
            if context.wallet.is_connected() {
                context.wallet.disconnect();
                io::print_success("Wallet disconnected");
            } else {
                io::print_info("No wallet connected.");
            }
        }
        Some("status") | None => match context.wallet.current_address() {
            Some(address) => {
                field("Address", address);
                if let Some(chain) = context.wallet.chain_id() {
                    field("Chain", chain);
                }
            }
            None => io::print_info("No wallet connected."),
        },
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "Unknown wallet action `{}`",
                other
            )))
        }
    }
    Ok(())
}
