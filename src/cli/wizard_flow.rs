//! Guided, prompt-driven walk through the donation form.

use crate::cli::commands::donate::{print_summary, submit_current};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::domain::{AnimalSubcategory, Category, Choice, DonationMode, DonationType};
use crate::errors::DonationError;
use crate::wizard::{PersonalField, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nav {
    Next,
    Back,
    Submit,
    Cancel,
}

impl Nav {
    fn label(&self) -> &'static str {
        match self {
            Nav::Next => "Next",
            Nav::Back => "Back",
            Nav::Submit => "Submit donation",
            Nav::Cancel => "Cancel",
        }
    }
}

pub(crate) fn run(context: &mut ShellContext) -> CommandResult {
    let resume = context.wizard.is_some()
        && io::confirm_action(&context.theme, "Resume the donation in progress?", true)?;
    if !resume {
        context.start_wizard()?;
    }
    context.require_signed_in_hint();

    loop {
        let step = context.wizard_mut()?.step();
        if step == Step::AnimalType && !context.wizard_mut()?.draft().is_animal_welfare() {
            // Back from Donation Type lands here; the category has no animal types.
            context.wizard_mut()?.next()?;
            continue;
        }
        output_section(step);
        match step {
            Step::PersonalInfo => fill_personal(context)?,
            Step::Category => {
                let current = context.wizard_mut()?.draft().category;
                let category = choose::<Category>(context, "Choose a cause", current)?;
                context.wizard_mut()?.select_category(category);
            }
            Step::AnimalType => {
                let current = context.wizard_mut()?.draft().subcategory;
                let animal = choose::<AnimalSubcategory>(context, "Which animals?", current)?;
                if let Err(err) = context.wizard_mut()?.select_subcategory(animal) {
                    io::print_error(err);
                }
            }
            Step::DonationType => {
                let current = context.wizard_mut()?.draft().donation_type;
                let kind =
                    choose::<DonationType>(context, "What would you like to give?", current)?;
                context.wizard_mut()?.select_donation_type(kind);
            }
            Step::DonationMode => {
                let current = context.wizard_mut()?.draft().donation_mode;
                let mode = choose::<DonationMode>(context, "How will you donate?", current)?;
                if let Err(err) = context.wizard_mut()?.select_mode(mode) {
                    io::print_error(err);
                }
            }
            Step::Details => fill_details(context)?,
        }

        match navigate(context, step)? {
            Nav::Next => {
                if let Err(err) = context.wizard_mut()?.next() {
                    io::print_error(err);
                }
            }
            Nav::Back => {
                context.wizard_mut()?.back();
            }
            Nav::Cancel => {
                if io::confirm_action(&context.theme, "Discard this donation?", false)? {
                    context.wizard = None;
                    io::print_info("Donation discarded.");
                } else {
                    io::print_info("Draft kept. Run `donate` to resume.");
                }
                return Ok(());
            }
            Nav::Submit => match submit_current(context) {
                Ok(()) => return Ok(()),
                Err(err @ CommandError::Donation(DonationError::Unauthenticated)) => {
                    report(context, err)?;
                    io::print_hint("Your draft is kept. Run `donate` again after signing in.");
                    return Ok(());
                }
                Err(err) => report(context, err)?,
            },
        }
    }
}

fn report(context: &ShellContext, err: CommandError) -> CommandResult {
    context
        .report_error(err)
        .map_err(|err| CommandError::Message(err.to_string()))
}

fn navigate(context: &ShellContext, step: Step) -> Result<Nav, CommandError> {
    let mut options = Vec::new();
    options.push(if step.is_last() { Nav::Submit } else { Nav::Next });
    if step != Step::PersonalInfo {
        options.push(Nav::Back);
    }
    options.push(Nav::Cancel);
    let labels: Vec<&str> = options.iter().map(|nav| nav.label()).collect();
    let index = io::select_index(&context.theme, "Continue", &labels, 0)?;
    Ok(options.get(index).copied().unwrap_or(Nav::Cancel))
}

fn choose<T: Choice>(
    context: &ShellContext,
    prompt: &str,
    current: Option<T>,
) -> Result<T, CommandError> {
    let options = T::all();
    let labels: Vec<&str> = options.iter().map(|option| option.label()).collect();
    let default = current
        .and_then(|value| options.iter().position(|option| *option == value))
        .unwrap_or(0);
    let index = io::select_index(&context.theme, prompt, &labels, default)?;
    options
        .get(index)
        .copied()
        .ok_or_else(|| CommandError::Message(format!("No {} selected", T::KIND)))
}

fn fill_personal(context: &mut ShellContext) -> CommandResult {
    for field in PersonalField::all().iter().copied() {
        loop {
            let current = context.wizard_mut()?.draft().personal.value(field);
            let prompt = match field {
                PersonalField::DateOfBirth => format!("{} (YYYY-MM-DD) *", field.label()),
                _ => format!("{} *", field.label()),
            };
            let value = io::prompt_text(&context.theme, &prompt, Some(&current))?;
            match context.wizard_mut()?.set_field(field, &value) {
                Ok(()) => break,
                Err(err) => io::print_error(err),
            }
        }
    }
    Ok(())
}

fn fill_details(context: &mut ShellContext) -> CommandResult {
    let draft = context.wizard_mut()?.draft().clone();
    if draft.is_monetary() {
        loop {
            let current = draft.amount.map(|amount| amount.to_string());
            let prompt = format!("Amount ({}) *", context.config.currency_symbol);
            let value = io::prompt_text(&context.theme, &prompt, current.as_deref())?;
            match context.wizard_mut()?.set_amount(&value) {
                Ok(()) => break,
                Err(err) => io::print_error(err),
            }
        }
    }
    let details_prompt = if draft.donation_type == Some(DonationType::Other) {
        "Describe what you would like to donate *"
    } else {
        "Additional details (optional)"
    };
    let details = io::prompt_text(&context.theme, details_prompt, Some(&draft.other_details))?;
    context.wizard_mut()?.set_other_details(&details);

    let ngos = context.runtime.block_on(context.ngos.list())?;
    if ngos.is_empty() {
        io::print_warning("No NGOs are available to receive this donation.");
    } else {
        let labels: Vec<String> = ngos
            .iter()
            .map(|ngo| {
                if ngo.categories.is_empty() {
                    ngo.name.clone()
                } else {
                    format!("{} [{}]", ngo.name, ngo.categories.join(", "))
                }
            })
            .collect();
        let default = draft
            .selected_ngo_id
            .and_then(|id| ngos.iter().position(|ngo| ngo.id == id))
            .unwrap_or(0);
        let index = io::select_index(&context.theme, "Recipient NGO", &labels, default)?;
        if let Some(ngo) = ngos.get(index) {
            context.wizard_mut()?.select_ngo(ngo.id);
        }
    }

    let ngo_name = context
        .wizard
        .as_ref()
        .and_then(|wizard| wizard.draft().selected_ngo_id)
        .and_then(|id| ngos.iter().find(|ngo| ngo.id == id))
        .map(|ngo| ngo.name.as_str());
    if let Some(wizard) = context.wizard.as_ref() {
        print_summary(wizard, ngo_name, &context.config.currency_symbol);
    }
    Ok(())
}
