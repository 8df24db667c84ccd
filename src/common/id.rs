// src/common/id.rs

use arrayvec::ArrayString;
use core::fmt;

/// Longest identifier accepted in a configuration.
pub const MAX_ID_LEN: usize = 64;

/// Reason an identifier was rejected.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum IdError {
    #[error("identifier is empty")]
    Empty,
    #[error("identifier is longer than 64 characters")]
    TooLong,
    #[error("identifier must not start with a digit")]
    LeadingDigit,
    #[error("invalid character {0:?} in identifier, only letters, digits and '_' are allowed")]
    InvalidCharacter(char),
}

/// Name of a configured component, unique across one build.
///
/// Identifiers end up as variable names in generated code, so they follow
/// the usual rules: ASCII letters, digits and underscores, no leading digit.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ComponentId(ArrayString<MAX_ID_LEN>);

impl ComponentId {
    pub fn new(id: &str) -> Result<Self, IdError> {
        let first = id.chars().next().ok_or(IdError::Empty)?;
        if first.is_ascii_digit() {
            return Err(IdError::LeadingDigit);
        }
        if let Some(bad) = id.chars().find(|c| !Self::is_valid_id_char(*c)) {
            return Err(IdError::InvalidCharacter(bad));
        }
        ArrayString::from(id).map(ComponentId).map_err(|_| IdError::TooLong)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[inline]
    pub const fn is_valid_id_char(c: char) -> bool {
        matches!(c, '0'..='9' | 'a'..='z' | 'A'..='Z' | '_')
    }
}

impl TryFrom<&str> for ComponentId {
    type Error = IdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentId({:?})", self.as_str())
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        assert!(ComponentId::new("desk").is_ok());
        assert!(ComponentId::new("desk_height_1").is_ok());
        assert!(ComponentId::new("_private").is_ok());
        assert!(ComponentId::new("UART0").is_ok());
        assert_eq!(ComponentId::new("uart_bus").unwrap().as_str(), "uart_bus");
    }

    #[test]
    fn test_invalid_ids() {
        assert_eq!(ComponentId::new(""), Err(IdError::Empty));
        assert_eq!(ComponentId::new("1desk"), Err(IdError::LeadingDigit));
        assert_eq!(ComponentId::new("desk-height"), Err(IdError::InvalidCharacter('-')));
        assert_eq!(ComponentId::new("desk height"), Err(IdError::InvalidCharacter(' ')));
        assert_eq!(ComponentId::new("höhe"), Err(IdError::InvalidCharacter('ö')));
    }

    #[test]
    fn test_length_limit() {
        let max = [b'a'; MAX_ID_LEN];
        let max = core::str::from_utf8(&max).unwrap();
        assert!(ComponentId::new(max).is_ok());

        let long = [b'a'; MAX_ID_LEN + 1];
        let long = core::str::from_utf8(&long).unwrap();
        assert_eq!(ComponentId::new(long), Err(IdError::TooLong));
    }

    #[test]
    fn test_try_from_str() {
        assert_eq!(ComponentId::try_from("desk").unwrap(), ComponentId::new("desk").unwrap());
        assert!(ComponentId::try_from("$").is_err());
    }
}
