//! Shared helpers for command handlers.

use uuid::Uuid;

use crate::error::CliError;

/// Fail with `message` unless `count` lies within `min..=max`.
pub fn check_arity(
    command: &str,
    count: usize,
    min: usize,
    max: Option<usize>,
    message: &str,
) -> Result<(), CliError> {
    if count < min || max.is_some_and(|max| count > max) {
        return Err(CliError::usage(command, message));
    }
    Ok(())
}

/// Parse a UUID flag value, naming what it identifies on failure.
pub fn parse_uuid(value: &str, what: &str) -> Result<Uuid, CliError> {
    Uuid::parse_str(value).map_err(|_| CliError::Invalid {
        message: format!("{value} is not a valid {what}"),
    })
}
