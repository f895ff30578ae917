//! File and folder name validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted item name, in characters.
pub const MAX_NAME_LEN: usize = 255;

const FORBIDDEN_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const RESERVED_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Why a proposed item name was refused. Meant to be shown to the user as-is.
pub enum NameValidationError {
    #[error("name cannot be empty")]
    Empty,
    #[error("name is {len} characters long; the limit is 255")]
    TooLong { len: usize },
    #[error("name cannot contain `{0}`")]
    ForbiddenCharacter(char),
    #[error("`{0}` is a reserved name")]
    ReservedName(String),
    #[error("name cannot start or end with whitespace")]
    SurroundingWhitespace,
    #[error("name cannot end with `.`")]
    TrailingDot,
}

/// Checks `name` against the naming rules for files and folders.
///
/// # Errors
///
/// Returns the first rule the name breaks.
pub fn validate_item_name(name: &str) -> Result<(), NameValidationError> {
    if name.trim().is_empty() {
        return Err(NameValidationError::Empty);
    }
    // Lookups trim the path, which would strip trailing whitespace off the last segment.
    if name.trim() != name {
        return Err(NameValidationError::SurroundingWhitespace);
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(NameValidationError::TooLong { len });
    }
    if let Some(ch) = name
        .chars()
        .find(|ch| FORBIDDEN_CHARS.contains(ch) || ch.is_control())
    {
        return Err(NameValidationError::ForbiddenCharacter(ch));
    }
    if name == "." || name == ".." {
        return Err(NameValidationError::ReservedName(name.to_string()));
    }
    if name.ends_with('.') {
        return Err(NameValidationError::TrailingDot);
    }
    let stem = name.split('.').next().unwrap_or(name).trim();
    if RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(stem))
    {
        return Err(NameValidationError::ReservedName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_names_pass() {
        let longest = "a".repeat(MAX_NAME_LEN);
        for name in ["notes.txt", "My Folder", ".bashrc", "console.log", longest.as_str()] {
            assert_eq!(validate_item_name(name), Ok(()), "name={name:?}");
        }
    }

    #[test]
    fn blank_names_are_empty() {
        assert_eq!(validate_item_name(""), Err(NameValidationError::Empty));
        assert_eq!(validate_item_name("   "), Err(NameValidationError::Empty));
    }

    #[test]
    fn overlong_names_report_length() {
        let name = "x".repeat(256);
        assert_eq!(
            validate_item_name(&name),
            Err(NameValidationError::TooLong { len: 256 })
        );
    }

    #[test]
    fn forbidden_characters_are_reported() {
        assert_eq!(
            validate_item_name("a/b"),
            Err(NameValidationError::ForbiddenCharacter('/'))
        );
        assert_eq!(
            validate_item_name("what?"),
            Err(NameValidationError::ForbiddenCharacter('?'))
        );
        assert_eq!(
            validate_item_name("tab\there"),
            Err(NameValidationError::ForbiddenCharacter('\t'))
        );
    }

    #[test]
    fn device_names_are_reserved_regardless_of_case_or_extension() {
        assert_eq!(
            validate_item_name("con"),
            Err(NameValidationError::ReservedName("con".to_string()))
        );
        assert_eq!(
            validate_item_name("LPT1.txt"),
            Err(NameValidationError::ReservedName("LPT1.txt".to_string()))
        );
        assert_eq!(
            validate_item_name(".."),
            Err(NameValidationError::ReservedName("..".to_string()))
        );
    }

    #[test]
    fn untrimmed_names_and_trailing_dots_are_refused() {
        for name in ["notes ", " notes", "notes\u{3000}"] {
            assert_eq!(
                validate_item_name(name),
                Err(NameValidationError::SurroundingWhitespace),
                "name={name:?}"
            );
        }
        assert_eq!(
            validate_item_name("draft."),
            Err(NameValidationError::TrailingDot)
        );
        assert_eq!(validate_item_name("draft.v2.txt"), Ok(()));
    }
}
