use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{field, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::config::Config;
use crate::core::services::{StatusFilter, TrackedDonation};
use crate::domain::{parse_choice, DonationStatus};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "track",
            "Look up a donation by transaction ID",
            "track <transaction-id>",
            cmd_track,
        ),
        CommandEntry::new(
            "my-donations",
            "List your donations, newest first",
            "my-donations [all|pending|processing|completed]",
            cmd_my_donations,
        ),
        CommandEntry::new(
            "donation-status",
            "Advance a donation through its lifecycle",
            "donation-status <transaction-id> <processing|completed>",
            cmd_donation_status,
        ),
    ]
}

fn cmd_track(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let input = args.first().copied().unwrap_or_default();
    let tracked = context.runtime.block_on(context.donations.track(input))?;
    print_tracked(&tracked, &context.config);
    Ok(())
}

fn cmd_my_donations(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let filter = match args.first() {
        Some(value) => value.parse::<StatusFilter>()?,
        None => StatusFilter::All,
    };
    let donations = context
        .runtime
        .block_on(context.donations.my_donations(filter))?;
    if donations.is_empty() {
        io::print_info(filter.empty_message());
        return Ok(());
    }
    output_section(format!("My donations ({})", donations.len()));
    let symbol = &context.config.currency_symbol;
    let date_format = context.config.date_format();
    for tracked in &donations {
        let donation = &tracked.donation;
        io::print_info(format!(
            "{}  {}  {}  {}  {}",
            donation.created_at.format(date_format),
            donation.transaction_id,
            donation.amount_label(symbol),
            tracked.ngo_label(),
            tracked.status_line()
        ));
    }
    Ok(())
}

fn cmd_donation_status(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [transaction_id, status] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: donation-status <transaction-id> <status>".into(),
        ));
    };
    let status = parse_choice::<DonationStatus>(status)?;
    let donation = context
        .runtime
        .block_on(context.donations.advance_status(transaction_id, status))?;
    io::print_success(format!(
        "{} is now {}.",
        donation.transaction_id, donation.status
    ));
    Ok(())
}

fn print_tracked(tracked: &TrackedDonation, config: &Config) {
    let donation = &tracked.donation;
    output_section("Donation Details");
    field("Transaction ID", &donation.transaction_id);
    field("Status", tracked.status_line());
    field("Amount", donation.amount_label(&config.currency_symbol));
    field("NGO", tracked.ngo_label());
    let date_time = format!("{} %H:%M UTC", config.date_format());
    field("Date", donation.created_at.format(&date_time));
    match donation.subcategory {
        Some(subcategory) => field("Category", format!("{} / {}", donation.category, subcategory)),
        None => field("Category", donation.category),
    }
    field("Type", donation.donation_type);
    field("Mode", donation.donation_mode);
    if let Some(address) = &donation.delivery_address {
        field("Delivery address", address);
    }
    if let Some(details) = &donation.other_details {
        field("Details", details);
    }
    if let Some(report) = &donation.impact_report {
        field("Impact", report);
    }
}
