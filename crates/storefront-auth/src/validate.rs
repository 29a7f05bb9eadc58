//! Form validators for registration, login and profile edits.
//!
//! Each check returns the message for one field, or `None` when the value is
//! acceptable. The form-level helpers collect them into [`ValidationErrors`].

use storefront_commerce::ValidationErrors;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 50;

/// Something shaped like `local@domain.tld`, without whitespace.
pub fn email(value: &str) -> Option<&'static str> {
    let value = value.trim();
    if value.is_empty() {
        return Some("email is required");
    }
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
                && domain
                    .rsplit_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    };
    (!valid).then_some("email is not valid")
}

/// At least [`MIN_PASSWORD_LEN`] characters with an uppercase letter, a
/// lowercase letter and a digit.
pub fn password(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return Some("password is required");
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Some("password must be at least 8 characters");
    }

    let has_upper = value.chars().any(|c| c.is_uppercase());
    let has_lower = value.chars().any(|c| c.is_lowercase());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    if !has_upper || !has_lower || !has_digit {
        return Some("password must contain uppercase, lowercase, and numbers");
    }
    None
}

pub fn name(value: &str) -> Option<&'static str> {
    let len = value.trim().chars().count();
    if len == 0 {
        Some("name is required")
    } else if len < MIN_NAME_LEN {
        Some("name must be at least 2 characters")
    } else if len > MAX_NAME_LEN {
        Some("name must be at most 50 characters")
    } else {
        None
    }
}

fn check(errors: &mut ValidationErrors, field: &str, message: Option<&str>) {
    if let Some(message) = message {
        errors.add(field, message);
    }
}

/// Validate a registration form.
pub fn registration(
    name_value: &str,
    email_value: &str,
    password_value: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check(&mut errors, "name", name(name_value));
    check(&mut errors, "email", email(email_value));
    check(&mut errors, "password", password(password_value));
    errors.into_result()
}

/// Validate a login form. Password strength is not re-checked here.
pub fn login(email_value: &str, password_value: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check(&mut errors, "email", email(email_value));
    if password_value.is_empty() {
        errors.add("password", "password is required");
    }
    errors.into_result()
}

/// Validate only the fields a profile update actually sets.
pub fn update(
    name_value: Option<&str>,
    email_value: Option<&str>,
    password_value: Option<&str>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check(&mut errors, "name", name_value.and_then(name));
    check(&mut errors, "email", email_value.and_then(email));
    check(&mut errors, "password", password_value.and_then(password));
    errors.into_result()
}

/// Lower-cased and trimmed, the form emails are stored and looked up in.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}
