pub mod auth;
pub mod config;
pub mod donate;
pub mod ngo;
pub mod system;
pub mod tracker;
pub mod wallet;

use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(auth::definitions());
    commands.extend(ngo::definitions());
    commands.extend(donate::definitions());
    commands.extend(tracker::definitions());
    commands.extend(wallet::definitions());
    commands.extend(config::definitions());
    commands
}
