//! Declarative input checks for bodies, queries and path identifiers.
//!
//! Every function here is pure: it takes untrusted input and returns either
//! a normalized value or one [`ValidationFailure`] listing every violated
//! field. Nothing in this module touches the store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    create_task_request::NewTask,
    task_list_query::{RawTaskQuery, TaskFilter},
    task_status::TaskStatus,
    update_task_request::TaskPatch,
};

pub const TITLE_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { path: path.into(), message: message.into() }
    }
}

/// All violations found in a single pass over one input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed")]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { errors: vec![FieldError::new(path, message)] }
    }
}

fn into_result<T>(value: T, errors: Vec<FieldError>) -> Result<T, ValidationFailure> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(ValidationFailure { errors })
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expected(kind: &str, value: &Value) -> String {
    format!("Expected {kind}, received {}", type_name(value))
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationFailure> {
    body.as_object()
        .ok_or_else(|| ValidationFailure::single("", expected("object", body)))
}

fn string_field(
    body: &Map<String, Value>,
    key: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match body.get(key) {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            errors.push(FieldError::new(key, expected("string", other)));
            None
        }
    }
}

fn title_field(
    body: &Map<String, Value>,
    required: bool,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    if required && !body.contains_key("title") {
        errors.push(FieldError::new("title", "Required"));
        return None;
    }
    let title = string_field(body, "title", errors)?;
    let chars = title.chars().count();
    if chars == 0 {
        errors.push(FieldError::new("title", "Title is required"));
        None
    } else if chars > TITLE_MAX_CHARS {
        errors.push(FieldError::new("title", "Title must be less than 100 characters"));
        None
    } else {
        Some(title)
    }
}

fn status_value(path: &str, raw: &str, errors: &mut Vec<FieldError>) -> Option<TaskStatus> {
    match raw.parse::<TaskStatus>() {
        Ok(status) => Some(status),
        Err(message) => {
            errors.push(FieldError::new(path, message));
            None
        }
    }
}

fn status_field(body: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<TaskStatus> {
    let raw = string_field(body, "status", errors)?;
    status_value("status", &raw, errors)
}

/// Create body: `title` required, `description` and `status` optional.
pub fn validate_new_task(body: &Value) -> Result<NewTask, ValidationFailure> {
    let body = as_object(body)?;
    let mut errors = Vec::new();
    let title = title_field(body, true, &mut errors);
    let description = string_field(body, "description", &mut errors);
    let status = status_field(body, &mut errors);
    into_result(
        NewTask { title: title.unwrap_or_default(), description, status },
        errors,
    )
}

/// Update body: same rules as create, every field optional.
pub fn validate_task_patch(body: &Value) -> Result<TaskPatch, ValidationFailure> {
    let body = as_object(body)?;
    let mut errors = Vec::new();
    let title = title_field(body, false, &mut errors);
    let description = string_field(body, "description", &mut errors);
    let status = status_field(body, &mut errors);
    into_result(TaskPatch { title, description, status }, errors)
}

/// Hyphenated 8-4-4-4-12 hex. Either letter case, nothing else.
fn is_canonical_uuid(raw: &str) -> bool {
    raw.len() == 36
        && raw.bytes().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => b == b'-',
            _ => b.is_ascii_hexdigit(),
        })
}

/// Path identifier: must be a UUID in its canonical hyphenated form.
pub fn validate_task_id(raw: &str) -> Result<Uuid, ValidationFailure> {
    let invalid = || ValidationFailure::single("id", "Invalid task ID format");
    if !is_canonical_uuid(raw) {
        return Err(invalid());
    }
    Uuid::parse_str(raw).map_err(|_| invalid())
}

/// List query: optional status filter plus the page window.
pub fn validate_task_query(
    raw: &RawTaskQuery,
    default_page_size: usize,
    max_page_size: usize,
) -> Result<TaskFilter, ValidationFailure> {
    let mut errors = Vec::new();

    let status = raw
        .status
        .as_deref()
        .and_then(|s| status_value("status", s, &mut errors));

    let limit = match raw.limit.as_deref() {
        None => default_page_size,
        Some(s) => match s.parse::<usize>() {
            Ok(n) if (1..=max_page_size).contains(&n) => n,
            _ => {
                errors.push(FieldError::new(
                    "limit",
                    format!("Limit must be an integer between 1 and {max_page_size}"),
                ));
                default_page_size
            }
        },
    };

    let cursor = raw.cursor.as_deref().and_then(|s| match Uuid::parse_str(s) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(FieldError::new("cursor", "Invalid cursor format"));
            None
        }
    });

    into_result(TaskFilter { status, limit, cursor }, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_minimal_create_body() {
        let input = validate_new_task(&json!({ "title": "Buy milk" })).unwrap();
        assert_eq!(input.title, "Buy milk");
        assert_eq!(input.description, None);
        assert_eq!(input.status, None);
    }

    #[test]
    fn rejects_title_over_limit() {
        let long = "x".repeat(TITLE_MAX_CHARS + 1);
        let err = validate_new_task(&json!({ "title": long })).unwrap_err();
        assert_eq!(
            err.errors,
            vec![FieldError::new("title", "Title must be less than 100 characters")]
        );
    }

    #[test]
    fn title_at_limit_is_fine() {
        let title = "é".repeat(TITLE_MAX_CHARS);
        assert!(validate_new_task(&json!({ "title": title })).is_ok());
    }

    #[test]
    fn reports_every_violation_at_once() {
        let err = validate_new_task(&json!({ "description": 7, "status": "DONE" })).unwrap_err();
        let paths: Vec<_> = err.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["title", "description", "status"]);
        assert_eq!(err.errors[0].message, "Required");
        assert_eq!(err.errors[1].message, "Expected string, received number");
    }

    #[test]
    fn empty_title_is_rejected() {
        let err = validate_new_task(&json!({ "title": "" })).unwrap_err();
        assert_eq!(err.errors[0].message, "Title is required");
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = validate_new_task(&json!(["title"])).unwrap_err();
        assert_eq!(err.errors, vec![FieldError::new("", "Expected object, received array")]);
    }

    #[test]
    fn patch_allows_omitted_title_but_checks_present_one() {
        let patch = validate_task_patch(&json!({ "description": "x" })).unwrap();
        assert_eq!(patch.title, None);
        assert_eq!(patch.description.as_deref(), Some("x"));

        let err = validate_task_patch(&json!({ "title": "" })).unwrap_err();
        assert_eq!(err.errors[0].path, "title");
    }

    #[test]
    fn null_description_is_a_type_error() {
        let err = validate_task_patch(&json!({ "description": null })).unwrap_err();
        assert_eq!(err.errors[0].message, "Expected string, received null");
    }

    #[test]
    fn task_id_must_be_uuid() {
        let err = validate_task_id("abc").unwrap_err();
        assert_eq!(err.errors, vec![FieldError::new("id", "Invalid task ID format")]);
        assert!(validate_task_id("6b3c18d4-2a1d-4f2b-9d4c-0a0c3f0f2f10").is_ok());
    }

    #[test]
    fn task_id_only_accepts_the_hyphenated_form() {
        let id = "6b3c18d4-2a1d-4f2b-9d4c-0a0c3f0f2f10";
        for raw in [
            "6b3c18d42a1d4f2b9d4c0a0c3f0f2f10".to_string(),
            format!("urn:uuid:{id}"),
            format!("{{{id}}}"),
            format!(" {id}"),
            "6b3c18d4-2a1d-4f2b-9d4c-0a0c3f0f2f1g".to_string(),
        ] {
            assert!(validate_task_id(&raw).is_err(), "{raw} should be rejected");
        }

        let upper = validate_task_id(&id.to_uppercase()).unwrap();
        assert_eq!(upper.to_string(), id);
    }

    #[test]
    fn query_defaults_and_bounds() {
        let filter = validate_task_query(&RawTaskQuery::default(), 100, 1000).unwrap();
        assert_eq!(filter.status, None);
        assert_eq!(filter.limit, 100);

        let raw = RawTaskQuery {
            status: Some("NOPE".into()),
            limit: Some("0".into()),
            cursor: Some("zzz".into()),
        };
        let err = validate_task_query(&raw, 100, 1000).unwrap_err();
        let paths: Vec<_> = err.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["status", "limit", "cursor"]);
    }
}
