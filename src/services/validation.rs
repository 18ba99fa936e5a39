//! Client-side input checks run before any request is sent.

use crate::error::{ApiError, ApiResult};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Whether `phone` is a Tanzanian mobile number.
///
/// Accepted after stripping non-digits: `7XXXXXXXX` (9 digits),
/// `07XXXXXXXX` (10), `2557XXXXXXXX` (12). The operator prefix may be
/// 6, 7 or 1.
pub fn is_valid_phone_number(phone: &str) -> bool {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let subscriber = match digits.len() {
        9 => digits.as_str(),
        10 => match digits.strip_prefix('0') {
            Some(rest) => rest,
            None => return false,
        },
        12 => match digits.strip_prefix("255") {
            Some(rest) => rest,
            None => return false,
        },
        _ => return false,
    };
    matches!(subscriber.as_bytes().first(), Some(b'6' | b'7' | b'1'))
}

/// Whether `email` looks like `local@domain.tld`. An empty string passes
/// since the field is optional.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() {
        return true;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

pub fn validate_phone_number(phone: &str) -> ApiResult<()> {
    if phone.trim().is_empty() {
        return Err(ApiError::validation("Phone number is required"));
    }
    if !is_valid_phone_number(phone) {
        return Err(ApiError::validation("Please enter a valid Tanzanian phone number"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> ApiResult<()> {
    if password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

pub fn validate_email(email: Option<&str>) -> ApiResult<()> {
    match email {
        Some(email) if !is_valid_email(email) => {
            Err(ApiError::validation("Please enter a valid email address"))
        }
        _ => Ok(()),
    }
}

/// Ids are required; zero stands for "not selected".
pub(crate) fn require_id(id: u64, what: &str) -> ApiResult<()> {
    if id == 0 {
        Err(ApiError::validation(format!("{what} is required")))
    } else {
        Ok(())
    }
}
