//! Pure predicates over field values, and the error taxonomy used to decide
//! how a failure is handled.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// How a failed outcome is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// A local format/length predicate failed; re-prompt only that field.
    RecoverableInput,
    /// The remote page reported a submission error; replay the whole step
    /// with all fields re-resolved.
    RecoverableStep,
    /// Browser/network/page-structure failure; abort the run and release
    /// the session.
    Fatal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RecoverableInput => "recoverable-input",
            Self::RecoverableStep => "recoverable-step",
            Self::Fatal => "fatal",
        })
    }
}

/// Symbols accepted by the password complexity predicate.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:,.<>?";

/// Minimum admin username length.
const USERNAME_MIN_LEN: usize = 6;

/// Minimum admin password length.
const PASSWORD_MIN_LEN: usize = 8;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9 .'\-_@]+$").unwrap());

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Admin username: restricted charset, at least 6 characters.
pub fn username_ok(value: &str) -> bool {
    value.chars().count() >= USERNAME_MIN_LEN && USERNAME_RE.is_match(value)
}

/// Email address: `local@domain` shape.
pub fn email_ok(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Password complexity: at least 8 characters with an upper-case letter, a
/// lower-case letter, a digit, and one symbol from [`PASSWORD_SYMBOLS`].
pub fn password_ok(value: &str) -> bool {
    value.chars().count() >= PASSWORD_MIN_LEN
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

/// Predicate applied to a field before it is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCheck {
    /// Any non-empty value.
    Required,
    /// May be left empty.
    Optional,
    /// Admin username predicate.
    Username,
    /// Email shape predicate.
    Email,
    /// Password complexity predicate.
    Password,
}

/// Check a value against a predicate.
///
/// `Err` carries the reason shown on the explanatory re-prompt; the caller
/// treats it as [`ErrorClass::RecoverableInput`].
pub fn check(kind: FieldCheck, value: &str) -> std::result::Result<(), String> {
    match kind {
        FieldCheck::Optional => Ok(()),
        FieldCheck::Required => {
            if value.trim().is_empty() {
                Err("input cannot be empty".into())
            } else {
                Ok(())
            }
        }
        FieldCheck::Username => {
            if username_ok(value) {
                Ok(())
            } else {
                Err(format!(
                    "username must be at least {} characters of letters, digits, \
                     spaces, or . ' - _ @",
                    USERNAME_MIN_LEN
                ))
            }
        }
        FieldCheck::Email => {
            if email_ok(value) {
                Ok(())
            } else {
                Err("expected an address of the form local@domain".into())
            }
        }
        FieldCheck::Password => {
            if password_ok(value) {
                Ok(())
            } else {
                Err(format!(
                    "password must be at least {} characters and contain upper-case, \
                     lower-case, a digit, and a symbol from {}",
                    PASSWORD_MIN_LEN, PASSWORD_SYMBOLS
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rejects_short() {
        assert!(!username_ok("ab"));
    }

    #[test]
    fn test_username_accepts_valid() {
        assert!(username_ok("valid_user.1"));
        assert!(username_ok("jane o'neil"));
        assert!(username_ok("admin@site"));
    }

    #[test]
    fn test_username_rejects_bad_charset() {
        assert!(!username_ok("sixchars!"));
        assert!(!username_ok("tab\tuser"));
    }

    #[test]
    fn test_email_shape() {
        assert!(email_ok("admin@example.com"));
        assert!(!email_ok("admin"));
        assert!(!email_ok("admin@"));
        assert!(!email_ok("a b@example.com"));
        assert!(!email_ok("admin@nodot"));
    }

    #[test]
    fn test_password_complexity() {
        assert!(password_ok("Str0ng!pw"));
        assert!(!password_ok("Sh0rt!7"));
        assert!(!password_ok("alllower1!"));
        assert!(!password_ok("ALLUPPER1!"));
        assert!(!password_ok("NoDigits!!"));
        assert!(!password_ok("NoSymbol11"));
    }

    #[test]
    fn test_check_required() {
        assert!(check(FieldCheck::Required, "x").is_ok());
        assert!(check(FieldCheck::Required, "  ").is_err());
        assert!(check(FieldCheck::Optional, "").is_ok());
    }
}
