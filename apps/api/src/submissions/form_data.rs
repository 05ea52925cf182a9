use serde_json::Value;

use crate::errors::AppError;

/// Decoded `form_data` answers plus the skills declared in them.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFormData {
    pub value: Value,
    pub skills: Vec<String>,
}

/// `form_data` must be a JSON object. When it has a `skills` array, its
/// string elements become the submission's skills; anything else in the
/// array is dropped.
pub fn parse_form_data(raw: Option<&str>) -> Result<ParsedFormData, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::InvalidFormData("form_data is required".to_string()))?;

    let value: Value = serde_json::from_str(raw)
        .map_err(|e| AppError::InvalidFormData(format!("form_data is not valid JSON: {e}")))?;
    if !value.is_object() {
        return Err(AppError::InvalidFormData(
            "form_data must be a JSON object".to_string(),
        ));
    }

    let skills = value
        .get("skills")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(ParsedFormData { value, skills })
}
