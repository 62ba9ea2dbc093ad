//! Input validation.
//!
//! Every validator takes the raw submitted fields and returns either a typed
//! draft or the per-field error messages. Nothing here writes to the
//! database; handlers persist a draft explicitly once it has validated.

pub mod accounts;
pub mod comment;
pub mod fundraiser;
pub mod transaction;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use utoipa::ToSchema;

/// Submitted fields, name to value.
pub type RawForm = HashMap<String, String>;

/// Field name to human-readable messages. `__all__` holds form-wide errors.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const NON_FIELD_ERRORS: &str = "__all__";

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_INTEGER: &str = "Enter a whole number.";
pub const MSG_NUMBER: &str = "Enter a number.";
pub const MSG_DATETIME: &str = "Enter a valid date/time.";
pub const MSG_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

const DATETIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Format used to echo datetimes back into a form.
pub const DATETIME_OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Decode an `application/x-www-form-urlencoded` body. Later duplicates win.
pub fn parse_body(body: &[u8]) -> RawForm {
    url::form_urlencoded::parse(body).into_owned().collect()
}

/// A form as rendered to the client: where it posts, what it shows and
/// which errors it carries.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct FormView {
    pub method: String,
    pub action: String,
    pub submit: String,
    pub values: BTreeMap<String, String>,
    pub errors: FieldErrors,
}

/// Shared presentation wiring for every form: POST to `action` with a
/// "Submit" button.
pub fn form_view(
    action: impl Into<String>,
    values: BTreeMap<String, String>,
    errors: FieldErrors,
) -> FormView {
    FormView {
        method: "post".to_string(),
        action: action.into(),
        submit: "Submit".to_string(),
        values,
        errors,
    }
}

/// Echo the submitted values of `fields` back for redisplay. Password fields
/// should not be listed.
pub fn echo(raw: &RawForm, fields: &[&str]) -> BTreeMap<String, String> {
    fields
        .iter()
        .filter_map(|name| raw.get(*name).map(|value| (name.to_string(), value.clone())))
        .collect()
}

/// Per-field rule helpers that collect errors as they go.
pub(crate) struct Fields<'a> {
    raw: &'a RawForm,
    errors: FieldErrors,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(raw: &'a RawForm) -> Self {
        Fields {
            raw,
            errors: FieldErrors::new(),
        }
    }

    pub(crate) fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Trimmed value, or `None` with a "required" error when blank or absent.
    pub(crate) fn required(&mut self, field: &str) -> Option<&'a str> {
        match self.raw.get(field).map(|v| v.trim()) {
            Some(value) if !value.is_empty() => Some(value),
            _ => {
                self.error(field, MSG_REQUIRED);
                None
            }
        }
    }

    /// Trimmed value; blank or absent is the empty string.
    pub(crate) fn optional(&self, field: &str) -> &'a str {
        self.raw.get(field).map(|v| v.trim()).unwrap_or("")
    }

    pub(crate) fn max_length(&mut self, field: &str, value: &str, max: usize) -> bool {
        let length = value.chars().count();
        if length > max {
            self.error(
                field,
                format!(
                    "Ensure this value has at most {} characters (it has {}).",
                    max, length
                ),
            );
            return false;
        }
        true
    }

    /// Required text capped at `max` characters.
    pub(crate) fn text(&mut self, field: &str, max: usize) -> Option<String> {
        let value = self.required(field)?;
        self.max_length(field, value, max).then(|| value.to_string())
    }

    pub(crate) fn integer(&mut self, field: &str) -> Option<i64> {
        let value = self.required(field)?;
        match value.parse::<i64>() {
            Ok(number) => Some(number),
            Err(_) => {
                self.error(field, MSG_INTEGER);
                None
            }
        }
    }

    pub(crate) fn datetime(&mut self, field: &str) -> Option<DateTime<Utc>> {
        let value = self.required(field)?;
        match parse_datetime(value) {
            Some(parsed) => Some(parsed),
            None => {
                self.error(field, MSG_DATETIME);
                None
            }
        }
    }

    /// HTML checkbox semantics: absent means false.
    pub(crate) fn checkbox(&self, field: &str) -> bool {
        matches!(
            self.optional(field).to_ascii_lowercase().as_str(),
            "on" | "true" | "1" | "yes"
        )
    }

    pub(crate) fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub(crate) fn into_errors(self) -> FieldErrors {
        self.errors
    }
}

/// Accepts RFC 3339 with an offset or a naive timestamp taken as UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }
    DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}
