//! Shared traits and the parsing contract for enumerated choices.

use thiserror::Error;

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// A closed set of options presented to the user as a single choice.
///
/// `key` is the stable machine value persisted in records; `label` is what the
/// shell shows. Parsing accepts either, ignoring case.
pub trait Choice: Copy + PartialEq + 'static {
    const KIND: &'static str;

    fn all() -> &'static [Self];
    fn key(&self) -> &'static str;
    fn label(&self) -> &'static str;

    /// Additional spellings accepted by [`parse_choice`].
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} `{value}` (options: {options})")]
pub struct ParseChoiceError {
    pub kind: &'static str,
    pub value: String,
    pub options: String,
}

pub fn parse_choice<T: Choice>(input: &str) -> Result<T, ParseChoiceError> {
    let needle = input.trim().to_ascii_lowercase();
    T::all()
        .iter()
        .copied()
        .find(|candidate| {
            candidate.key().to_ascii_lowercase() == needle
                || candidate.label().to_ascii_lowercase() == needle
                || candidate.aliases().iter().any(|alias| *alias == needle)
        })
        .ok_or_else(|| ParseChoiceError {
            kind: T::KIND,
            value: input.trim().to_string(),
            options: T::all()
                .iter()
                .map(|choice| choice.key())
                .collect::<Vec<_>>()
                .join(", "),
        })
}
