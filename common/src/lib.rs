use validator::{ValidationError, ValidationErrors};

fn message_of(field: &str, error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("\"{field}\" is invalid"))
}

/// Message of the first violation, walking fields in `field_order`.
///
/// `ValidationErrors` is map-backed, so callers that need a stable "first"
/// error pass the declaration order of their struct. Fields not listed are
/// considered after the listed ones.
pub fn first_validation_error(errors: &ValidationErrors, field_order: &[&str]) -> String {
    let field_errors = errors.field_errors();

    for field in field_order {
        if let Some(first) = field_errors.get(*field).and_then(|errs| errs.first()) {
            return message_of(field, first);
        }
    }

    let mut rest: Vec<_> = field_errors.iter().collect();
    rest.sort_by(|a, b| a.0.cmp(b.0));
    rest.into_iter()
        .find_map(|(field, errs)| errs.first().map(|e| message_of(field, e)))
        .unwrap_or_else(|| "Invalid request".to_string())
}
