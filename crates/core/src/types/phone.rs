//! Phone number type for buyer contact details.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains characters other than digits, separators and a leading `+`.
    #[error("phone number contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// Too few or too many digits.
    #[error("phone number must have between {min} and {max} digits (got {got})")]
    BadLength {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
        /// Digits found in the input.
        got: usize,
    },
}

/// A phone number normalized to digits with an optional leading `+`.
///
/// Spaces, dashes and parentheses are accepted on input and dropped.
///
/// ```
/// use breeze_core::Phone;
///
/// let phone = Phone::parse("+966 55-123-4567").unwrap();
/// assert_eq!(phone.as_str(), "+966551234567");
/// assert!(Phone::parse("call me").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum number of digits (local numbers).
    pub const MIN_DIGITS: usize = 7;
    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse and normalize a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains letters or other
    /// symbols, or has a digit count outside `7..=15`.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        let mut normalized = String::with_capacity(trimmed.len());
        for (i, c) in trimmed.chars().enumerate() {
            match c {
                '0'..='9' => normalized.push(c),
                '+' if i == 0 => normalized.push(c),
                ' ' | '-' | '(' | ')' => {}
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }

        let digits = normalized.chars().filter(char::is_ascii_digit).count();
        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits) {
            return Err(PhoneError::BadLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
                got: digits,
            });
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
