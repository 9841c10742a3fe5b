//! WhatsApp phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input contains no digits.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains a character that is neither a digit nor a separator.
    #[error("phone number contains invalid character '{0}'")]
    InvalidCharacter(char),
    /// Fewer digits than any real subscriber number.
    #[error("phone number must have at least {min} digits")]
    TooShort {
        /// Minimum digit count.
        min: usize,
    },
    /// More digits than E.164 allows.
    #[error("phone number must have at most {max} digits")]
    TooLong {
        /// Maximum digit count.
        max: usize,
    },
}

/// A phone number in the digits-only international form used by `wa.me`.
///
/// ## Normalization
///
/// - Spaces, dashes, dots and parentheses are dropped
/// - A leading `+` is dropped
/// - A leading trunk `0` is replaced with the Indonesian country code `62`
///
/// ## Examples
///
/// ```
/// use mamiejago_core::Phone;
///
/// assert_eq!(Phone::parse("0812-3456-7890").unwrap().as_str(), "6281234567890");
/// assert_eq!(Phone::parse("+62 812 3456 7890").unwrap().as_str(), "6281234567890");
/// assert!(Phone::parse("").is_err());
/// assert!(Phone::parse("call me").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Indonesian country calling code.
    pub const COUNTRY_CODE: &'static str = "62";
    /// Minimum number of digits after normalization.
    pub const MIN_DIGITS: usize = 8;
    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse and normalize a phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains letters or other
    /// symbols, or has a digit count outside 8..=15 after normalization.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix('+').unwrap_or(trimmed);

        let mut digits = String::with_capacity(body.len());
        for ch in body.chars() {
            match ch {
                '0'..='9' => digits.push(ch),
                ' ' | '-' | '.' | '(' | ')' => {}
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }

        if let Some(rest) = digits.strip_prefix('0') {
            digits = format!("{}{rest}", Self::COUNTRY_CODE);
        }

        if digits.len() < Self::MIN_DIGITS {
            return Err(PhoneError::TooShort {
                min: Self::MIN_DIGITS,
            });
        }
        if digits.len() > Self::MAX_DIGITS {
            return Err(PhoneError::TooLong {
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(digits))
    }

    /// Returns the normalized digits.
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

impl TryFrom<String> for Phone {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_international() {
        assert_eq!(Phone::parse("62881023406838").unwrap().as_str(), "62881023406838");
        assert_eq!(Phone::parse("+62881023406838").unwrap().as_str(), "62881023406838");
    }

    #[test]
    fn test_parse_local_trunk_prefix() {
        assert_eq!(Phone::parse("0881023406838").unwrap().as_str(), "62881023406838");
    }

    #[test]
    fn test_parse_strips_separators() {
        assert_eq!(
            Phone::parse(" (0812) 3456.7890 ").unwrap().as_str(),
            "6281234567890"
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Phone::parse("   "), Err(PhoneError::Empty));
        assert_eq!(Phone::parse("+"), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert_eq!(
            Phone::parse("0812abc"),
            Err(PhoneError::InvalidCharacter('a'))
        );
    }

    #[test]
    fn test_parse_length_bounds() {
        assert!(matches!(Phone::parse("12345"), Err(PhoneError::TooShort { .. })));
        assert!(matches!(
            Phone::parse("1234567890123456"),
            Err(PhoneError::TooLong { .. })
        ));
    }

    #[test]
    fn test_serde_normalizes() {
        let phone: Phone = serde_json::from_str("\"0812 3456 7890\"").unwrap();
        assert_eq!(serde_json::to_string(&phone).unwrap(), "\"6281234567890\"");
    }
}
