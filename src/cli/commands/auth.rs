use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::field;
use crate::cli::registry::CommandEntry;
use crate::core::services::SignUpRequest;
use crate::domain::Displayable;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "signup",
            "Create an account and sign in",
            "signup <email> <password> <confirm> <name> [--accept-terms] [--age <n>] [--profession <text>]",
            cmd_signup,
        ),
        CommandEntry::new(
            "signin",
            "Sign in with email and password",
            "signin <email> <password>",
            cmd_signin,
        ),
        CommandEntry::new("signout", "Sign out of the current session", "signout", cmd_signout),
        CommandEntry::new("whoami", "Show the signed-in user", "whoami", cmd_whoami),
    ]
}

fn cmd_signup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let request = if args.is_empty() && context.can_prompt() {
        prompt_sign_up(context)?
    } else {
        parse_sign_up(args)?
    };
    let user = context.runtime.block_on(context.auth.sign_up(request))?;
    remember_email(context, &user.email)?;
    io::print_success(format!("Registration Successful. Welcome, {}!", user.display_label()));
    Ok(())
}

fn cmd_signin(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (email, password) = match args {
        [email, password, ..] => (email.to_string(), password.to_string()),
        [] if context.can_prompt() => {
            let email = io::prompt_text(
                &context.theme,
                "Email",
                context.config.last_email.as_deref(),
            )?;
            let password = io::prompt_password(&context.theme, "Password")?;
            (email, password)
        }
        [email] => (email.to_string(), String::new()),
        [] => (String::new(), String::new()),
    };
    let user = context
        .runtime
        .block_on(context.auth.sign_in(&email, &password))?;
    remember_email(context, &user.email)?;
    io::print_success(format!("Login Successful. Signed in as {}.", user.email));
    Ok(())
}

fn cmd_signout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.auth.is_authenticated() {
        io::print_info("Not signed in.");
        return Ok(());
    }
    context.runtime.block_on(context.auth.sign_out())?;
    io::print_success("Signed out.");
    Ok(())
}

fn cmd_whoami(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.auth.user() {
        Some(user) => {
            field("Email", &user.email);
            if !user.metadata.name.is_empty() {
                field("Name", &user.metadata.name);
            }
            if let Some(age) = user.metadata.age {
                field("Age", age);
            }
            if let Some(profession) = &user.metadata.profession {
                field("Profession", profession);
            }
            field(
                "Member since",
                user.created_at.format(context.config.date_format()),
            );
        }
        None => io::print_info("Not signed in."),
    }
    Ok(())
}

fn remember_email(context: &mut ShellContext, email: &str) -> CommandResult {
    context.config.last_email = Some(email.to_string());
    context.persist_config()
}

fn parse_sign_up(args: &[&str]) -> Result<SignUpRequest, CommandError> {
    let mut positional = Vec::new();
    let mut request = SignUpRequest::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match *arg {
            "--accept-terms" => request.accept_terms = true,
            "--age" => {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments("`--age` expects a number".into())
                })?;
                let age = value.parse::<u8>().map_err(|_| {
                    CommandError::InvalidArguments(format!("`{}` is not a valid age", value))
                })?;
                request.age = Some(age);
            }
            "--profession" => {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments("`--profession` expects a value".into())
                })?;
                request.profession = Some(value.to_string());
            }
            other => positional.push(other),
        }
    }
    let mut positional = positional.into_iter().map(str::to_string);
    request.email = positional.next().unwrap_or_default();
    request.password = positional.next().unwrap_or_default();
    request.confirm_password = positional.next().unwrap_or_default();
    let name: Vec<String> = positional.collect();
    request.name = name.join(" ");
    Ok(request)
}

fn prompt_sign_up(context: &ShellContext) -> Result<SignUpRequest, CommandError> {
    let theme = &context.theme;
    let name = io::prompt_text(theme, "Full name", None)?;
    let email = io::prompt_text(theme, "Email", None)?;
    let password = io::prompt_password(theme, "Password")?;
    let confirm_password = io::prompt_password(theme, "Confirm password")?;
    let profession = io::prompt_text(theme, "Profession (optional)", None)?;
    let accept_terms = io::confirm_action(theme, "I agree to the Terms of Service", false)?;
    Ok(SignUpRequest {
        email,
        password,
        confirm_password,
        name,
        age: None,
        profession: Some(profession),
        accept_terms,
    })
}
