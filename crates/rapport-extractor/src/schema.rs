//! Record schema: field rules and validation of decoded service output
//!
//! The same field table drives three things: the JSON Schema handed to the
//! text service as an output constraint, the field list in the prompt, and
//! validation of whatever actually comes back.

use chrono::{DateTime, NaiveDate};
use rapport_domain::{ExtractedRecord, Gender};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Primitive type of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Opaque contact handle; non-empty when present
    Handle,
    /// One of the `Gender` tokens
    Gender,
    /// Calendar date, `YYYY-MM-DD`
    Date,
}

/// Declaration of one record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON key
    pub key: &'static str,
    /// Whether the field must be present and non-empty
    pub required: bool,
    /// Primitive type
    pub kind: FieldKind,
    /// What the field holds, as told to the service
    pub description: &'static str,
}

/// The record schema, in column order
pub const FIELDS: [FieldSpec; 7] = [
    FieldSpec {
        key: "name",
        required: true,
        kind: FieldKind::Text,
        description: "full name of the person",
    },
    FieldSpec {
        key: "gender",
        required: true,
        kind: FieldKind::Gender,
        description: "\"male\" or \"female\"",
    },
    FieldSpec {
        key: "birth_date",
        required: true,
        kind: FieldKind::Date,
        description: "date of birth as YYYY-MM-DD; estimate it if only an age is given",
    },
    FieldSpec {
        key: "company",
        required: false,
        kind: FieldKind::Text,
        description: "employer",
    },
    FieldSpec {
        key: "title",
        required: false,
        kind: FieldKind::Text,
        description: "job title",
    },
    FieldSpec {
        key: "phone",
        required: false,
        kind: FieldKind::Text,
        description: "phone number, verbatim",
    },
    FieldSpec {
        key: "wechat",
        required: false,
        kind: FieldKind::Handle,
        description: "WeChat ID",
    },
];

/// Ways a decoded payload can fail the record schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Payload is not valid JSON at all
    #[error("payload is not valid JSON: {0}")]
    Malformed(String),

    /// Payload is JSON but not an array of records
    #[error("expected a JSON array of records")]
    NotAnArray,

    /// A record is not a JSON object
    #[error("expected a JSON object")]
    NotAnObject,

    /// A required field is missing or null
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A field has the wrong JSON type
    #[error("field '{field}' must be {expected}")]
    WrongType {
        /// Field key
        field: &'static str,
        /// Expected type
        expected: &'static str,
    },

    /// A required text field is empty or whitespace
    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),

    /// Gender outside the enumeration
    #[error("field 'gender' must be \"male\" or \"female\", got \"{0}\"")]
    InvalidGender(String),

    /// Birth date is not a calendar date
    #[error("field 'birth_date' must be a date (YYYY-MM-DD), got \"{0}\"")]
    InvalidDate(String),

    /// Failure inside one element of a sequence
    #[error("record {index}: {source}")]
    AtIndex {
        /// Position in the sequence
        index: usize,
        /// The element's failure
        source: Box<ValidationError>,
    },
}

/// JSON Schema for the service response: an array of records
///
/// Optional fields are nullable rather than omittable, so a conforming
/// service always spells out every key.
pub fn response_schema() -> Value {
    let mut properties = Map::new();
    for field in FIELDS.iter() {
        let mut property = match (field.kind, field.required) {
            (FieldKind::Text, true) => json!({ "type": "string", "minLength": 1 }),
            (FieldKind::Text, false) => json!({ "type": ["string", "null"] }),
            (FieldKind::Handle, _) => json!({ "type": ["string", "null"], "minLength": 1 }),
            (FieldKind::Gender, _) => json!({
                "type": "string",
                "enum": Gender::ALL.iter().map(Gender::as_str).collect::<Vec<_>>(),
            }),
            (FieldKind::Date, _) => json!({ "type": "string", "format": "date" }),
        };
        property["description"] = Value::from(field.description);
        properties.insert(field.key.to_string(), property);
    }

    let required: Vec<&str> = FIELDS.iter().map(|f| f.key).collect();

    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": properties,
            "required": required,
        }
    })
}

/// Validate one decoded candidate
///
/// Unknown keys are ignored. For optional fields, a missing key and `null`
/// both mean absent; an empty string is kept as a value.
pub fn validate(candidate: &Value) -> Result<ExtractedRecord, ValidationError> {
    let obj = candidate.as_object().ok_or(ValidationError::NotAnObject)?;

    let name = required_text(obj, "name")?;
    let gender = {
        let raw = required_str(obj, "gender")?;
        Gender::parse(raw).ok_or_else(|| ValidationError::InvalidGender(raw.to_string()))?
    };
    let birth_date = {
        let raw = required_str(obj, "birth_date")?;
        parse_date(raw).ok_or_else(|| ValidationError::InvalidDate(raw.to_string()))?
    };

    Ok(ExtractedRecord {
        name,
        gender,
        birth_date,
        company: optional_text(obj, "company")?,
        title: optional_text(obj, "title")?,
        phone: optional_text(obj, "phone")?,
        wechat: optional_handle(obj, "wechat")?,
    })
}

/// Validate a decoded sequence of candidates
///
/// Fails as a whole on the first bad element; a batch is never partially
/// accepted.
pub fn validate_sequence(candidates: &Value) -> Result<Vec<ExtractedRecord>, ValidationError> {
    let items = candidates.as_array().ok_or(ValidationError::NotAnArray)?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            validate(item).map_err(|e| ValidationError::AtIndex {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}

fn required_str<'a>(obj: &'a Map<String, Value>, key: &'static str) -> Result<&'a str, ValidationError> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(key)),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ValidationError::WrongType {
            field: key,
            expected: "a string",
        }),
    }
}

fn required_text(obj: &Map<String, Value>, key: &'static str) -> Result<String, ValidationError> {
    let value = required_str(obj, key)?.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyField(key));
    }
    Ok(value.to_string())
}

fn optional_text(obj: &Map<String, Value>, key: &'static str) -> Result<Option<String>, ValidationError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::WrongType {
            field: key,
            expected: "a string or null",
        }),
    }
}

fn optional_handle(obj: &Map<String, Value>, key: &'static str) -> Result<Option<String>, ValidationError> {
    match optional_text(obj, key)? {
        Some(handle) if handle.trim().is_empty() => Err(ValidationError::EmptyField(key)),
        handle => Ok(handle),
    }
}

/// Accept `YYYY-MM-DD`, or an RFC 3339 timestamp whose date part is taken
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
