use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{field, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::wizard_flow;
use crate::domain::{
    parse_choice, AnimalSubcategory, Category, Choice, DonationMode, DonationType,
};
use crate::errors::DonationError;
use crate::wizard::{DonationWizard, PersonalField, Step};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "donate",
            "Start a donation (guided in interactive mode)",
            "donate",
            cmd_donate,
        ),
        CommandEntry::new(
            "wizard",
            "Drive the donation form step by step",
            "wizard <status|set <field> <value>|category <c>|animal <a>|type <t>|mode <m>|amount <n>|details <text>|ngo <id|name>|next|back|submit|cancel>",
            cmd_wizard,
        ),
    ]
}

fn cmd_donate(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.can_prompt() {
        return wizard_flow::run(context);
    }
    context.start_wizard()?;
    io::print_success("Started a new donation.");
    context.require_signed_in_hint();
    print_step(context)
}

fn cmd_wizard(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((sub, rest)) = args.split_first() else {
        return print_status(context);
    };
    let joined = rest.join(" ");
    match sub.to_lowercase().as_str() {
        "status" => return print_status(context),
        "set" => {
            let (name, value) = rest.split_first().ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "usage: wizard set <field> <value> (fields: {})",
                    keys::<PersonalField>()
                ))
            })?;
            let field = name.parse::<PersonalField>()?;
            context.wizard_mut()?.set_field(field, &value.join(" "))?;
            io::print_success(format!("{} updated.", field.label()));
        }
        "category" => {
            let category = require_choice::<Category>(&joined)?;
            context.wizard_mut()?.select_category(category);
            io::print_success(format!("Category: {}", category));
        }
        "animal" | "subcategory" => {
            let subcategory = require_choice::<AnimalSubcategory>(&joined)?;
            context.wizard_mut()?.select_subcategory(subcategory)?;
            io::print_success(format!("Animal type: {}", subcategory));
        }
        "type" => {
            let donation_type = require_choice::<DonationType>(&joined)?;
            context.wizard_mut()?.select_donation_type(donation_type);
            io::print_success(format!("Donation type: {}", donation_type));
            if donation_type.is_monetary() {
                io::print_hint("Money donations are made online.");
            }
        }
        "mode" => {
            let mode = require_choice::<DonationMode>(&joined)?;
            context.wizard_mut()?.select_mode(mode)?;
            io::print_success(format!("Donation mode: {}", mode));
        }
        "amount" => {
            context.wizard_mut()?.set_amount(&joined)?;
            io::print_success("Amount updated.");
        }
        "details" => {
            context.wizard_mut()?.set_other_details(&joined);
            io::print_success("Details updated.");
        }
        "ngo" => {
            if joined.trim().is_empty() {
                return Err(CommandError::InvalidArguments(
                    "usage: wizard ngo <id|name>".into(),
                ));
            }
            context.wizard_mut()?;
            let ngo = context.runtime.block_on(context.ngos.find(&joined))?;
            context.wizard_mut()?.select_ngo(ngo.id);
            io::print_success(format!("Recipient: {}", ngo.name));
        }
        "next" => {
            context.wizard_mut()?.next()?;
            return print_step(context);
        }
        "back" => {
            context.wizard_mut()?.back();
            return print_step(context);
        }
        "submit" => return submit_current(context),
        "cancel" => {
            if context.wizard.take().is_some() {
                io::print_info("Donation discarded.");
            } else {
                io::print_info("No donation in progress.");
            }
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "Unknown wizard action `{}`. See `help wizard`.",
                other
            )))
        }
    }
    Ok(())
}

fn require_choice<T: Choice>(input: &str) -> Result<T, CommandError> {
    if input.trim().is_empty() {
        return Err(CommandError::InvalidArguments(format!(
            "Missing {} (options: {})",
            T::KIND,
            keys::<T>()
        )));
    }
    Ok(parse_choice::<T>(input)?)
}

pub(crate) fn keys<T: Choice>() -> String {
    T::all()
        .iter()
        .map(|choice| choice.key())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Submits the draft in progress. On failure the draft is kept for a retry.
pub(crate) fn submit_current(context: &mut ShellContext) -> CommandResult {
    let wizard = context.wizard.as_ref().ok_or_else(|| {
        CommandError::InvalidArguments("No donation in progress. Use `donate` to start one.".into())
    })?;
    if !wizard.step().is_last() {
        return Err(CommandError::InvalidArguments(format!(
            "Complete the remaining steps before submitting (currently {}).",
            wizard.step()
        )));
    }
    io::print_info("Processing...");
    let outcome = context
        .runtime
        .block_on(context.donations.submit(wizard.draft()));
    match outcome {
        Ok(receipt) => {
            context.wizard = None;
            io::print_success(
                "Donation successful! Your donation has been recorded. Thank you for your generosity!",
            );
            field("Transaction ID", &receipt.transaction_id);
            field("Status", receipt.status);
            field("Track at", &receipt.tracking_route);
            Ok(())
        }
        Err(DonationError::Persistence(err)) => Err(CommandError::Message(format!(
            "Donation failed: {}",
            err
        ))),
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn print_step(context: &ShellContext) -> CommandResult {
    let Some(wizard) = context.wizard.as_ref() else {
        io::print_info("No donation in progress. Use `donate` to start one.");
        return Ok(());
    };
    let step = wizard.step();
    output_section(step);
    match step {
        Step::PersonalInfo => {
            let missing = wizard.draft().personal.missing_fields();
            if missing.is_empty() {
                io::print_hint("All personal details are filled in. Use `wizard next`.");
            } else {
                let names: Vec<&str> = missing.iter().map(|field| field.key()).collect();
                io::print_hint(format!(
                    "Use `wizard set <field> <value>` for: {}",
                    names.join(", ")
                ));
            }
        }
        Step::Category => io::print_hint(format!(
            "Use `wizard category <{}>`, then `wizard next`.",
            keys::<Category>().replace(", ", "|")
        )),
        Step::AnimalType if !wizard.draft().is_animal_welfare() => {
            io::print_hint("No animal type applies to this category. Use `wizard next`.")
        }
        Step::AnimalType => io::print_hint(format!(
            "Use `wizard animal <{}>`, then `wizard next`.",
            keys::<AnimalSubcategory>().replace(", ", "|")
        )),
        Step::DonationType => io::print_hint(format!(
            "Use `wizard type <{}>`, then `wizard next`.",
            keys::<DonationType>().replace(", ", "|")
        )),
        Step::DonationMode => io::print_hint(
            "Use `wizard mode <online|offline>`, then `wizard next`.",
        ),
        Step::Details => {
            if wizard.draft().is_monetary() {
                io::print_hint("Set `wizard amount <n>`, optionally `wizard details <text>`.");
            } else {
                io::print_hint("Optionally describe the donation with `wizard details <text>`.");
            }
            io::print_hint("Choose a recipient with `wizard ngo <id|name>`, then `wizard submit`.");
        }
    }
    Ok(())
}

fn print_status(context: &mut ShellContext) -> CommandResult {
    let Some(wizard) = context.wizard.as_ref() else {
        io::print_info("No donation in progress. Use `donate` to start one.");
        return Ok(());
    };
    let ngo_name = match wizard.draft().selected_ngo_id {
        Some(id) => context
            .runtime
            .block_on(context.ngos.list())?
            .into_iter()
            .find(|ngo| ngo.id == id)
            .map(|ngo| ngo.name),
        None => None,
    };
    print_summary(wizard, ngo_name.as_deref(), &context.config.currency_symbol);
    Ok(())
}

pub(crate) fn print_summary(
    wizard: &DonationWizard,
    ngo_name: Option<&str>,
    currency_symbol: &str,
) {
    let draft = wizard.draft();
    output_section(format!("Donation summary ({})", wizard.step()));
    for personal in PersonalField::all() {
        let value = draft.personal.value(*personal);
        field(personal.label(), if value.is_empty() { "-".into() } else { value });
    }
    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".into());
    field("Category", or_dash(draft.category.map(|c| c.to_string())));
    if draft.is_animal_welfare() {
        field("Animal type", or_dash(draft.subcategory.map(|s| s.to_string())));
    }
    field("Donation type", or_dash(draft.donation_type.map(|t| t.to_string())));
    field("Donation mode", or_dash(draft.donation_mode.map(|m| m.to_string())));
    if draft.is_monetary() {
        field(
            "Amount",
            or_dash(draft.amount.map(|a| format!("{}{:.2}", currency_symbol, a))),
        );
    }
    if !draft.other_details.trim().is_empty() {
        field("Details", draft.other_details.trim());
    }
    field("NGO", ngo_name.unwrap_or("-"));
}
