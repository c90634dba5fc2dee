//! Field-level checks for save request bodies, run before any store access.

use crate::error::AppError;
use regex::Regex;

pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_TEXT_LENGTH: usize = 4000;
const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// Implemented by every save body.
pub trait SaveRequest {
    /// `None` selects insert, `Some` selects update of that row.
    fn id(&self) -> Option<i64>;

    fn validate(&self) -> Result<(), AppError>;
}

pub struct RequestValidator;

impl RequestValidator {
    /// Present, not blank, at most `max` characters.
    pub fn required_text(field: &str, value: &str, max: usize) -> Result<(), AppError> {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{} must not be blank", field)));
        }
        Self::max_length(field, value, max)
    }

    pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<(), AppError> {
        match value {
            Some(v) => Self::max_length(field, v, max),
            None => Ok(()),
        }
    }

    pub fn email(field: &str, value: Option<&str>) -> Result<(), AppError> {
        let Some(v) = value else { return Ok(()) };
        let re = Regex::new(EMAIL_PATTERN).map_err(|_| AppError::Validation(format!("invalid pattern for {}", field)))?;
        if !re.is_match(v) {
            return Err(AppError::Validation(format!("{} must be a valid email", field)));
        }
        Self::max_length(field, v, MAX_NAME_LENGTH)
    }

    pub fn non_negative(field: &str, value: i64) -> Result<(), AppError> {
        if value < 0 {
            return Err(AppError::Validation(format!("{} must be at least 0", field)));
        }
        Ok(())
    }

    /// Identifiers submitted for associations must be positive.
    pub fn ids<'a, I>(field: &str, ids: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = &'a i64>,
    {
        for id in ids {
            if *id < 1 {
                return Err(AppError::Validation(format!("{} contains invalid id {}", field, id)));
            }
        }
        Ok(())
    }

    fn max_length(field: &str, value: &str, max: usize) -> Result<(), AppError> {
        if value.chars().count() > max {
            return Err(AppError::Validation(format!(
                "{} must be at most {} characters",
                field, max
            )));
        }
        Ok(())
    }
}
