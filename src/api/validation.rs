use super::ApiError;
use crate::domain::FieldErrors;
use crate::domain::validation::{BLANK, REQUIRED, check_char_field};

pub const EMAIL_MAX_CHARS: usize = 255;
pub const NAME_MAX_CHARS: usize = 255;
pub const HELLO_NAME_MAX_CHARS: usize = 10;

const INVALID_EMAIL: &str = "Enter a valid email address.";

pub fn validate_id(id: i32, resource: &str) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::not_found(resource, id));
    }
    Ok(id)
}

/// Required, at most 255 characters, `local@domain` with no whitespace.
pub fn check_email(errors: &mut FieldErrors, value: Option<&str>) {
    let before = errors.clone();
    check_char_field(errors, "email", value, EMAIL_MAX_CHARS);
    if *errors != before {
        return;
    }

    let email = value.unwrap_or_default().trim();
    let well_formed = email.rsplit_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.is_empty()
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !email.chars().any(char::is_whitespace)
    });

    if !well_formed {
        errors.add("email", INVALID_EMAIL);
    }
}

pub fn check_profile_name(errors: &mut FieldErrors, value: Option<&str>) {
    check_char_field(errors, "name", value, NAME_MAX_CHARS);
}

/// Required and non-empty. Whitespace is kept as part of the password.
pub fn check_password(errors: &mut FieldErrors, value: Option<&str>) {
    match value {
        None => errors.add("password", REQUIRED),
        Some("") => errors.add("password", BLANK),
        Some(_) => {}
    }
}

pub fn validate_hello_name(name: Option<&str>) -> Result<&str, ApiError> {
    let mut errors = FieldErrors::new();
    check_char_field(&mut errors, "name", name, HELLO_NAME_MAX_CHARS);
    errors.into_result().map_err(ApiError::InvalidFields)?;
    Ok(name.unwrap_or_default())
}

pub fn validate_search_query(query: Option<&str>) -> Option<&str> {
    query.map(str::trim).filter(|q| !q.is_empty())
}
