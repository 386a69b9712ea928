use std::str::FromStr;

use email_address::EmailAddress;

use crate::errors::ModelError;

/// Field-range rules of an entity, checked at decode time and again by the
/// services before anything reaches the store.
pub trait Validate {
    fn validate(&self) -> Result<(), ModelError>;
}

/// Check that `value` holds between `min` and `max` characters (Unicode
/// scalar values, not bytes).
pub fn check_char_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), ModelError> {
    let len = value.chars().count();
    if len < min {
        return Err(ModelError::field(field, format!("must be at least {min} characters")));
    }
    if len > max {
        return Err(ModelError::field(field, format!("must be at most {max} characters")));
    }
    Ok(())
}

/// Syntactic e-mail check (RFC 5322 with RFC 6531 internationalized
/// addresses). The domain must have at least two labels unless it is a
/// bracketed literal, and display-name forms (`Name <a@b.com>`) are refused.
pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let invalid = |why: &dyn std::fmt::Display| ModelError::field("email", format!("invalid address ({why})"));

    if email.trim_end().ends_with('>') {
        return Err(invalid(&"display name not allowed"));
    }
    let addr = EmailAddress::from_str(email).map_err(|e| invalid(&e))?;
    let domain = addr.domain();
    if !domain.starts_with('[') && !domain.contains('.') {
        return Err(invalid(&"domain needs a dot"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_len_counts_scalars() {
        assert!(check_char_len("name", "Ñandú", 1, 5).is_ok());
        assert!(check_char_len("name", "", 1, 5).is_err());
        assert!(check_char_len("name", "abcdef", 1, 5).is_err());
    }

    #[test]
    fn accepts_common_addresses() {
        for ok in ["a@b.com", "first.last+tag@sub.example.org", "x_y-z@a-b.io"] {
            assert!(validate_email(ok).is_ok(), "{ok}");
        }
    }

    #[test]
    fn accepts_internationalized_and_quoted_addresses() {
        for ok in ["a@bücher.de", "josé@example.com", "\"john doe\"@example.com", "user@[192.168.0.1]"] {
            assert!(validate_email(ok).is_ok(), "{ok}");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in [
            "plain",
            "@b.com",
            "a@",
            "a@b",
            "a@@b.com",
            "a@b@c.com",
            ".a@b.com",
            "a..b@c.com",
            "a b@c.com",
            "a@b..com",
            "Someone <a@b.com>",
        ] {
            assert!(validate_email(bad).is_err(), "{bad}");
        }
    }
}
