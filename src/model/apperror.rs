use std::collections::BTreeMap;
use std::fmt;

/**
 * Represents the type of error that can occur within the application.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorType {
    /**
     * Startup errors such as unreadable configuration or keys.
     */
    Initialization,
    /**
     * Missing or invalid bearer token.
     */
    JwtAuthorization,
    /**
     * Input rejected before touching the store. May carry field errors.
     */
    Validation,
    /**
     * Unexpected failure talking to the database.
     */
    DatabaseError,
    /**
     * The requested entity does not exist.
     */
    NotFound,
    /**
     * Uniqueness or referential integrity violation.
     */
    ConstraintViolation,
    /**
     * Internal inconsistency detected by the application.
     */
    Application,
}

/**
 * Field name mapped to the messages reported for it.
 */
pub type FieldErrorMap = BTreeMap<String, Vec<String>>;

/**
 * Represents an error that occurs within the application.
 */
#[derive(Debug, Clone)]
pub struct ApplicationError {
    /**
     * Error type.
     */
    pub error_type: ErrorType,
    /**
     * Error message describing problem.
     */
    pub message: String,
    /**
     * Per-field messages. Only set for validation errors.
     */
    pub field_errors: Option<FieldErrorMap>,
}

impl ApplicationError {
    /**
     * Creates a new ApplicationError.
     *
     * #Arguments
     * `error_type`: The type of error.
     * `message`: A description of the error.
     */
    pub fn new(error_type: ErrorType, message: String) -> Self {
        ApplicationError { error_type, message, field_errors: None }
    }

    /**
     * Creates a validation error carrying per-field messages.
     *
     * #Arguments
     * `field_errors`: The messages keyed by field name.
     */
    pub fn with_field_errors(field_errors: FieldErrorMap) -> Self {
        ApplicationError { error_type: ErrorType::Validation, message: "Validation failed".to_string(), field_errors: Some(field_errors) }
    }

    /**
     * Shorthand for a not found error.
     */
    pub fn not_found(entity: &str) -> Self {
        ApplicationError::new(ErrorType::NotFound, format!("{entity} not found"))
    }
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_with_field_errors_is_validation() {
        let mut fields = FieldErrorMap::new();
        fields.insert("percentage".to_string(), vec!["Must be between 0 and 100".to_string()]);
        let error = ApplicationError::with_field_errors(fields);
        assert_eq!(error.error_type, ErrorType::Validation);
        assert_eq!(error.field_errors.unwrap().get("percentage").unwrap().len(), 1);
    }

    #[test]
    fn test_not_found_message() {
        let error = ApplicationError::not_found("Apiary");
        assert_eq!(error.error_type, ErrorType::NotFound);
        assert_eq!(error.to_string(), "Apiary not found");
        assert!(error.field_errors.is_none());
    }
}
