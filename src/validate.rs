use thiserror::Error;

use crate::photos::parse_date_key;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid date folder name: {0}")]
    DateFolder(String),

    #[error("Invalid photo filename: {0}")]
    Filename(String),

    #[error("Invalid number: {0}")]
    Number(String),
}

const MAX_FILENAME_BYTES: usize = 255;

pub fn validate_date_folder_name(name: &str) -> Result<(), ValidationError> {
    parse_date_key(name)
        .map(|_| ())
        .map_err(|_| ValidationError::DateFolder(name.to_string()))
}

/// Rejects anything that could escape the date folder or name a hidden file.
pub fn validate_photo_filename(name: &str) -> Result<(), ValidationError> {
    let valid = !name.is_empty()
        && name.len() <= MAX_FILENAME_BYTES
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0']);

    if valid {
        Ok(())
    } else {
        Err(ValidationError::Filename(name.to_string()))
    }
}

pub fn validate_number(value: &str) -> Result<usize, ValidationError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::Number(value.to_string()));
    }

    value
        .parse()
        .map_err(|_| ValidationError::Number(value.to_string()))
}
