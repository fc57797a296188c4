//! Request-body parsing and report JSON decoding.

use uuid::Uuid;

use dashpulse_core::{Report, UpdateError};

/// Separates the dashboard-id field from the report-definition field.
/// Split on the first occurrence only, so the definition may contain any
/// text.
pub const BODY_SEPARATOR: char = '\0';

/// Split an update body into `(dashboard id, report definition)`.
///
/// Fails `MalformedRequest` when fewer than two fields are present, when the
/// definition field is empty, or when the dashboard id is not an integer.
pub fn split_update_body(body: &str, correlation_id: Uuid) -> Result<(u32, &str), UpdateError> {
    let (dash_field, report_json) = body
        .split_once(BODY_SEPARATOR)
        .ok_or_else(|| UpdateError::malformed("expected two body fields", correlation_id))?;

    if report_json.is_empty() {
        return Err(UpdateError::malformed(
            "report definition is empty",
            correlation_id,
        ));
    }

    let dash_id = dash_field
        .trim()
        .parse()
        .map_err(|_| UpdateError::malformed("dashboard id is not an integer", correlation_id))?;

    Ok((dash_id, report_json))
}

/// Decode a report definition, tagging any failure with the request's
/// correlation id.
pub fn parse_report(json: &str, correlation_id: Uuid) -> Result<Report, UpdateError> {
    serde_json::from_str(json).map_err(|e| {
        UpdateError::malformed(format!("report definition does not parse: {}", e), correlation_id)
    })
}
