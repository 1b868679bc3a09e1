use validator::ValidateEmail;

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_PHONE_LEN: usize = 50;
pub const MAX_PROFILE_FIELD_LEN: usize = 50;

/// Validates that the input looks like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || email.len() > MAX_EMAIL_LEN || !email.validate_email() {
        return false;
    }
    // The validator accepts dotless hosts such as `user@localhost`; a waitlist
    // address needs a real domain.
    match email.rsplit_once('@') {
        Some((_, domain)) => {
            domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Normalizes an email for storage and uniqueness checks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returns the trimmed value of a required field, or `None` when it is
/// missing or blank.
pub fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Returns the trimmed value of an optional field, falling back to `default`
/// when it is missing or blank.
pub fn optional_or<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    required(value).unwrap_or(default)
}

pub fn within_len(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}
