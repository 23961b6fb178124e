use std::collections::HashMap;

use crate::api::format::PersonRequest;
use crate::error::ApiError;

/// Longest accepted first or last name, in characters
pub const NAME_MAX_LEN: usize = 100;

/// Field rules for create and update bodies. Runs before anything reaches the store.
pub fn validate_person(request: &PersonRequest) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    for (field, value) in [("firstName", &request.first_name), ("lastName", &request.last_name)] {
        if let Some(problem) = check_name(value) {
            field_errors.insert(field.to_string(), problem);
        }
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Invalid person", Some(field_errors)))
    }
}

fn check_name(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some("must not be empty".to_string());
    }
    if value.chars().count() > NAME_MAX_LEN {
        return Some(format!("must be at most {} characters", NAME_MAX_LEN));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_errors(err: ApiError) -> HashMap<String, String> {
        match err {
            ApiError::ValidationError { field_errors: Some(fields), .. } => fields,
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn accepts_ordinary_names() {
        assert!(validate_person(&PersonRequest::new("Ada", "Lovelace")).is_ok());
    }

    #[test]
    fn rejects_blank_names_per_field() {
        let fields = field_errors(validate_person(&PersonRequest::new("  ", "")).unwrap_err());
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["firstName"], "must not be empty");
        assert_eq!(fields["lastName"], "must not be empty");
    }

    #[test]
    fn length_limit_counts_characters() {
        let exactly = "é".repeat(NAME_MAX_LEN);
        assert!(validate_person(&PersonRequest::new(exactly, "Lovelace")).is_ok());

        let too_long = "a".repeat(NAME_MAX_LEN + 1);
        let fields = field_errors(validate_person(&PersonRequest::new("Ada", too_long)).unwrap_err());
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["lastName"]);
    }
}
