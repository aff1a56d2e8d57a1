use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{field, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::core::services::NgoQuery;
use crate::domain::{Displayable, Ngo};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "ngos",
            "List or search the NGO directory",
            "ngos [query...] [--verified] [--category <tag>]",
            cmd_ngos,
        ),
        CommandEntry::new("ngo", "Show one NGO in detail", "ngo <id|name>", cmd_ngo),
    ]
}

fn parse_query(args: &[&str]) -> Result<NgoQuery, CommandError> {
    let mut query = NgoQuery::default();
    let mut words = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match *arg {
            "--verified" => query.verified_only = true,
            "--category" => {
                let tag = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments("`--category` expects a tag".into())
                })?;
                query.category = Some(tag.to_string());
            }
            word => words.push(word),
        }
    }
    query.text = words.join(" ");
    Ok(query)
}

fn cmd_ngos(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let query = parse_query(args)?;
    let ngos = context.runtime.block_on(context.ngos.search(&query))?;
    if ngos.is_empty() {
        io::print_info("No NGOs found matching your search criteria.");
        return Ok(());
    }
    output_section(format!("NGOs ({})", ngos.len()));
    for ngo in &ngos {
        let short_id: String = ngo.id.to_string().chars().take(8).collect();
        let tags = if ngo.categories.is_empty() {
            String::new()
        } else {
            format!(" [{}]", ngo.categories.join(", "))
        };
        io::print_info(format!("{}  {}{}", short_id, ngo.display_label(), tags));
    }
    Ok(())
}

fn cmd_ngo(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments("usage: ngo <id|name>".into()));
    }
    let reference = args.join(" ");
    let ngo = context.runtime.block_on(context.ngos.find(&reference))?;
    print_ngo(&ngo);
    Ok(())
}

fn print_ngo(ngo: &Ngo) {
    output_section(&ngo.name);
    field("ID", ngo.id);
    field("Verified", if ngo.is_verified() { "yes" } else { "pending" });
    if !ngo.description.is_empty() {
        field("About", &ngo.description);
    }
    if !ngo.categories.is_empty() {
        field("Categories", ngo.categories.join(", "));
    }
    if let Some(location) = &ngo.location {
        field("Location", location);
    }
    if let Some(rating) = ngo.rating {
        field("Rating", format!("{:.1}", rating));
    }
    if let Some(year) = ngo.year_founded {
        field("Founded", year);
    }
    if let Some(website) = &ngo.website {
        field("Website", website);
    }
    if let Some(wallet) = &ngo.wallet_address {
        field("Wallet", wallet);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_flags_are_separated_from_text() {
        let query =
            parse_query(&["animal", "--verified", "rescue", "--category", "animals"]).unwrap();
        assert_eq!(query.text, "animal rescue");
        assert!(query.verified_only);
        assert_eq!(query.category.as_deref(), Some("animals"));
        assert!(parse_query(&["--category"]).is_err());
    }
}
