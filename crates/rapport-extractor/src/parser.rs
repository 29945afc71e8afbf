//! Parse the text service's output into validated records

use crate::error::PipelineError;
use crate::schema::{self, ValidationError};
use rapport_domain::ExtractedRecord;
use serde_json::Value;
use tracing::warn;

/// Key some services wrap the record array under when they cannot emit a
/// top-level array
const WRAPPER_KEY: &str = "records";

/// Parse a raw service response into a validated batch
///
/// Any failure, from undecodable JSON to one bad field in one record, is a
/// `SchemaViolation` carrying the raw response.
pub fn parse_response(response: &str) -> Result<Vec<ExtractedRecord>, PipelineError> {
    let json_str = extract_json(response);

    let json: Value = serde_json::from_str(json_str)
        .map_err(|e| violation(ValidationError::Malformed(e.to_string()), response))?;

    schema::validate_sequence(unwrap_records(&json)).map_err(|e| violation(e, response))
}

/// Strip a markdown code fence if the model added one
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    match trimmed.strip_prefix("```") {
        Some(rest) => {
            // First line is the fence and optional language tag
            let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
            let body = body.trim_end();
            body.strip_suffix("```").unwrap_or(body).trim()
        }
        None => trimmed,
    }
}

/// Accept `{"records": [...]}` as well as a bare array
fn unwrap_records(json: &Value) -> &Value {
    match json.as_object() {
        Some(obj) if obj.len() == 1 => match obj.get(WRAPPER_KEY) {
            Some(inner) if inner.is_array() => inner,
            _ => json,
        },
        _ => json,
    }
}

fn violation(source: ValidationError, payload: &str) -> PipelineError {
    warn!("Service output rejected: {}", source);
    PipelineError::SchemaViolation {
        source,
        payload: payload.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_RECORD: &str = r#"[
        {
            "name": "张三",
            "gender": "male",
            "birth_date": "1995-01-01",
            "company": "Acme",
            "title": "Engineer",
            "phone": "13900000000",
            "wechat": null
        }
    ]"#;

    #[test]
    fn test_parse_valid_json() {
        let records = parse_response(ONE_RECORD).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "张三");
        assert_eq!(records[0].company.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = format!("```json\n{}\n```", ONE_RECORD);
        let records = parse_response(&response).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_wrapped_records_object() {
        let response = format!(r#"{{"records": {}}}"#, ONE_RECORD);
        let records = parse_response(&response).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_response("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        let response = "This is not JSON";
        match parse_response(response) {
            Err(PipelineError::SchemaViolation { source, payload }) => {
                assert!(matches!(source, ValidationError::Malformed(_)));
                assert_eq!(payload, response);
            }
            other => panic!("Expected SchemaViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_single_object_is_rejected() {
        let response = r#"{"name": "张三", "gender": "male", "birth_date": "1995-01-01"}"#;
        match parse_response(response) {
            Err(PipelineError::SchemaViolation { source, .. }) => {
                assert_eq!(source, ValidationError::NotAnArray);
            }
            other => panic!("Expected SchemaViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_field_rejects_batch() {
        let response = r#"[
            {"name": "Alice", "gender": "female", "birth_date": "1990-01-01"},
            {"gender": "male", "birth_date": "1991-01-01"}
        ]"#;

        let error = parse_response(response).unwrap_err();
        assert_eq!(error.kind(), "schema_violation");
        assert_eq!(error.payload(), Some(response));
    }

    #[test]
    fn test_extract_json_from_plain_json() {
        let json = r#"{"key": "value"}"#;
        assert_eq!(extract_json(json), json);
    }

    #[test]
    fn test_extract_json_from_markdown() {
        let response = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json(response), r#"{"key": "value"}"#);
    }

    #[test]
    fn test_extract_json_from_markdown_without_language() {
        let response = "```\n[]\n```";
        assert_eq!(extract_json(response), "[]");
    }

    #[test]
    fn test_extract_json_from_empty_fence() {
        assert_eq!(extract_json("```"), "");
    }
}
