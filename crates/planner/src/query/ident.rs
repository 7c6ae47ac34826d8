use crate::error::PlanError;

const MAX_IDENTIFIER_LEN: usize = 255;

/// Checks that `name` can be used as a quoted identifier.
///
/// Quoting handles punctuation and spaces; what remains forbidden are empty
/// names, control characters and names longer than the server accepts.
pub fn validate_identifier(name: &str) -> Result<(), PlanError> {
    let fail = |reason: &str| Err(PlanError::InvalidIdentifier(name.to_string(), reason.into()));

    if name.trim().is_empty() {
        return fail("identifier is empty");
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        return fail("identifier is too long");
    }
    if name.chars().any(char::is_control) {
        return fail("identifier contains control characters");
    }
    Ok(())
}
