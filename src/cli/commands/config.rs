use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, field, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::config::Config;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change preferences",
        "config <show|set <key> <value>>",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            output_section("Configuration");
            for (key, value) in context.config.entries() {
                field(key, value);
            }
            field("file", context.config_manager.path().display());
            Ok(())
        }
        ["set", key, value @ ..] => set_value(context, key, &value.join(" ")),
        _ => Err(CommandError::InvalidArguments(format!(
            "usage: config <show|set <key> <value>> (keys: {})",
            Config::KEYS.join(", ")
        ))),
    }
}

fn set_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    context.config.set(key, value)?;
    context.persist_config()?;
    match key {
        "wallet_address" => context.refresh_wallet_provider(),
        "ui_color_enabled" => output::set_color_enabled(
            context.config.ui_color_enabled && context.can_prompt(),
        ),
        _ => {}
    }
    io::print_success(format!("Updated {}.", key));
    Ok(())
}
