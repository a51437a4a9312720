use std::collections::HashSet;
use crate::error::VoteError;

pub const MIN_OPTIONS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidCast<'a> {
    pub name: &'a str,
    pub option_id: i64,
}

/// Presence check for a cast request. Runs before the store is consulted.
pub fn validate_cast(name: Option<&str>, option_id: Option<i64>) -> Result<ValidCast<'_>, VoteError> {
    let name = name.filter(|n| !n.is_empty()).ok_or(VoteError::InvalidRequest)?;
    let option_id = option_id.filter(|&id| id != 0).ok_or(VoteError::InvalidRequest)?;
    Ok(ValidCast { name, option_id })
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("Too few options (minimum {MIN_OPTIONS})")]
    TooFewOptions,
    #[error("Empty option text")]
    EmptyOption,
    #[error("Duplicate option: {0}")]
    DuplicateOption(String),
}

/// Titles must be unique, so a seed list with repeats is rejected up front.
pub fn validate_seed_options(titles: &[String]) -> Result<(), SeedError> {
    if titles.len() < MIN_OPTIONS { return Err(SeedError::TooFewOptions); }
    if titles.iter().any(|t| t.trim().is_empty()) { return Err(SeedError::EmptyOption); }

    let mut seen = HashSet::with_capacity(titles.len());
    for title in titles {
        if !seen.insert(title.as_str()) {
            return Err(SeedError::DuplicateOption(title.clone()));
        }
    }

    Ok(())
}
