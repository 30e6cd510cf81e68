//! Catalog codec: migration file names to records and back.
//!
//! A catalog stem is `<number>_<name tokens...>_<up|down>`:
//!
//! - the leading token is the sequence number, ASCII digits only, at least 1
//!   (written zero-padded to six digits, any width is accepted when parsing)
//! - zero or more name tokens, re-joined with `_`
//! - the trailing token is exactly `up` or `down`
//!
//! Parsing never guesses. A stem that does not fit the grammar is a
//! [`CoreError::InvalidFileName`].

use crate::direction::Direction;
use crate::error::{CoreError, CoreResult};
use crate::migration::{sanitize_name, Migration};
use std::path::Path;

/// Separator between stem tokens
pub const TOKEN_SEPARATOR: char = '_';

/// Parse a file stem (file name without extension) into a migration record.
pub fn parse_stem(stem: &str) -> CoreResult<Migration> {
    let tokens: Vec<&str> = stem.split(TOKEN_SEPARATOR).collect();
    if tokens.len() < 2 {
        return Err(invalid(stem, "expected '<number>_<name>_<up|down>'"));
    }

    let number = parse_number(stem, tokens[0])?;

    let last = tokens[tokens.len() - 1];
    let direction: Direction = last.parse().map_err(|reason: String| invalid(stem, &reason))?;

    let name = tokens[1..tokens.len() - 1].join("_");
    if name.chars().any(char::is_whitespace) {
        return Err(invalid(stem, "name must not contain whitespace"));
    }

    Ok(Migration {
        number,
        name,
        direction,
        file_path: None,
        query: String::new(),
        created_at: None,
    })
}

/// Format `(number, name, direction)` as a catalog stem.
///
/// The name is sanitized first, so an unnamed migration yields a double
/// underscore: `000004__up`.
pub fn format_stem(number: u32, name: &str, direction: Direction) -> String {
    format!(
        "{:06}{sep}{}{sep}{}",
        number,
        sanitize_name(name),
        direction,
        sep = TOKEN_SEPARATOR
    )
}

/// Full file name for a migration with the given dialect extension.
pub fn file_name(migration: &Migration, extension: &str) -> String {
    format!(
        "{}.{}",
        format_stem(migration.number, &migration.name, migration.direction),
        extension.trim_start_matches('.')
    )
}

/// Stem of a path as UTF-8, if it has one.
pub fn stem_of(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

/// Trailing token of a stem, used to decide whether a file claims to be a
/// migration of a given direction before it is fully parsed.
pub fn direction_token(stem: &str) -> Option<&str> {
    stem.rsplit_once(TOKEN_SEPARATOR).map(|(_, last)| last)
}

fn parse_number(stem: &str, token: &str) -> CoreResult<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(stem, "leading token must be a number"));
    }
    let number: u32 = token
        .parse()
        .map_err(|_| invalid(stem, "number is out of range"))?;
    if number == 0 {
        return Err(invalid(stem, "number must be at least 1"));
    }
    Ok(number)
}

fn invalid(stem: &str, reason: &str) -> CoreError {
    CoreError::InvalidFileName {
        stem: stem.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
