//! Email canonicalisation.

/// Lower-cases the domain part of an email address.
///
/// The split happens at the last `@`; the local part keeps its case because
/// mail servers are allowed to treat it case-sensitively. Input without an
/// `@` is returned unchanged.
///
/// ```rust
/// use profiles_api::domain::email::normalize_email;
///
/// assert_eq!(normalize_email("Bob@EXAMPLE.com"), "Bob@example.com");
/// ```
#[must_use]
pub fn normalize_email(email: &str) -> String {
    let trimmed = email.trim();
    match trimmed.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_domain_only() {
        assert_eq!(normalize_email("a@EXAMPLE.com"), "a@example.com");
        assert_eq!(normalize_email("MixedCase@Example.ORG"), "MixedCase@example.org");
    }

    #[test]
    fn test_splits_at_last_at_sign() {
        assert_eq!(normalize_email("\"a@b\"@EXAMPLE.com"), "\"a@b\"@example.com");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(normalize_email("  bob@Example.com "), "bob@example.com");
    }

    #[test]
    fn test_without_at_sign_is_unchanged() {
        assert_eq!(normalize_email("not-an-email"), "not-an-email");
        assert_eq!(normalize_email(""), "");
    }

    #[test]
    fn test_is_idempotent() {
        let once = normalize_email("Someone@ÉXAMPLE.com");
        assert_eq!(normalize_email(&once), once);
    }
}
