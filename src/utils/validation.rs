use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{ValidationError, ValidationErrors};

use crate::utils::error::CustomError;

/// A single rejected field in a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A violation against the request body as a whole.
pub fn body_violation(message: impl Into<String>) -> CustomError {
    CustomError::ValidationError(vec![FieldViolation::new("body", message)])
}

/// A JSON object body read one field at a time, so a field of the wrong
/// type is reported under its own name instead of failing the whole body.
pub struct JsonFields {
    fields: Map<String, Value>,
    rejected: Vec<FieldViolation>,
}

impl JsonFields {
    pub fn new(body: Value) -> Result<Self, CustomError> {
        match body {
            Value::Object(fields) => Ok(JsonFields {
                fields,
                rejected: Vec::new(),
            }),
            _ => Err(body_violation("Request body must be a JSON object")),
        }
    }

    /// Absent and `null` both read as `None`. A value that does not
    /// deserialize as `T` is recorded as "`name` must be `expected`".
    pub fn take<T: DeserializeOwned>(&mut self, name: &str, expected: &str) -> Option<T> {
        let value = self.fields.remove(name)?;
        if value.is_null() {
            return None;
        }

        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(_) => {
                self.rejected.push(FieldViolation::new(
                    name,
                    format!("{} must be {}", name, expected),
                ));
                None
            }
        }
    }

    pub fn into_rejected(self) -> Vec<FieldViolation> {
        self.rejected
    }
}

/// Joins type rejections with rule failures into one ordered list. A rejected
/// field only reports its type; the rules would just call it missing.
pub fn merge_violations(
    rejected: &[FieldViolation],
    errors: &ValidationErrors,
) -> Vec<FieldViolation> {
    let mut out: Vec<FieldViolation> = violations(errors)
        .into_iter()
        .filter(|v| !rejected.iter().any(|r| r.field == v.field))
        .collect();
    out.extend(rejected.iter().cloned());

    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    out
}

/// Flattens validator output into one violation per failed rule, ordered by field.
pub fn violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut out: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid ({})", field, e.code));
                FieldViolation::new(field.clone(), message)
            })
        })
        .collect();

    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    out
}

/// Builds a validator error carrying a readable message.
pub fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

impl From<ValidationErrors> for CustomError {
    fn from(errors: ValidationErrors) -> Self {
        CustomError::ValidationError(violations(&errors))
    }
}
