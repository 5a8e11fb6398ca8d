//! Request filter and body validation

use serde_json::Value;
use validator::Validate;

use crate::classify::ClassifiedError;
use crate::domain::FilterSet;

/// Message used when an update or delete carries no filter at all
pub const MINIMUM_FILTERS_MESSAGE: &str = "Invalid filters. At least one filter is required.";

/// Reject a filter set with nothing in it
///
/// Update and delete calls must never reach storage with an empty filter set,
/// where it would match every row.
pub fn check_minimum_filters<F: FilterSet + ?Sized>(filters: &F) -> Result<(), ClassifiedError> {
    if filters.is_empty() {
        return Err(ClassifiedError::validation(MINIMUM_FILTERS_MESSAGE));
    }
    Ok(())
}

/// Validate a request body, reporting the first failing field by name
pub fn validate_body<T: Validate>(body: &T) -> Result<(), ClassifiedError> {
    let Err(errors) = body.validate() else {
        return Ok(());
    };

    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    let Some((field, failures)) = fields.first() else {
        return Err(ClassifiedError::invalid_body());
    };

    let rejected = failures
        .first()
        .and_then(|failure| failure.params.get("value"))
        .map(render_value)
        .unwrap_or_else(|| "null".to_string());

    Err(ClassifiedError::invalid_parameter(&camel_case(field), rejected))
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
