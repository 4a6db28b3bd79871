pub mod analysis;
pub mod beekeeping;
pub mod laboratory;
pub mod statistics;
#[cfg(all(test, feature = "integration-test"))]
pub mod test_support;

use sqlx::postgres::PgQueryResult;

use crate::model::apperror::{ApplicationError, ErrorType};

/**
 * Unique violation.
 */
const UNIQUE_VIOLATION: &str = "23505";
/**
 * Foreign key violation. Raised both for missing parents and for restricted deletes.
 */
const FOREIGN_KEY_VIOLATION: &str = "23503";
/**
 * Restrict violation.
 */
const RESTRICT_VIOLATION: &str = "23001";
/**
 * Check constraint violation.
 */
const CHECK_VIOLATION: &str = "23514";
/**
 * Value too long for column.
 */
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

/**
 * Handles database errors raised by inserts and updates and maps them to application errors.
 *
 * # Arguments
 * `error`: The sqlx error to handle.
 *
 * # Returns
 * An `ApplicationError` corresponding to the database error.
 */
pub fn handle_database_error(error: &sqlx::Error) -> ApplicationError {
    let Some(db_error) = error.as_database_error() else {
        tracing::error!("Database operation failed: {}", error);
        return ApplicationError::new(ErrorType::DatabaseError, "Failed to execute database operation".to_string());
    };
    tracing::debug!("Database error: {}", db_error);
    tracing::info!("Add/Update error: {:?} on constraint {:?}", db_error.code(), db_error.constraint());
    let constraint = db_error.constraint().unwrap_or("unknown");
    match db_error.code() {
        Some(code) if code == UNIQUE_VIOLATION => ApplicationError::new(ErrorType::ConstraintViolation, format!("Already exists ({constraint})")),
        Some(code) if code == FOREIGN_KEY_VIOLATION || code == RESTRICT_VIOLATION => ApplicationError::new(ErrorType::ConstraintViolation, format!("Missing parent value ({constraint})")),
        Some(code) if code == CHECK_VIOLATION => ApplicationError::new(ErrorType::Validation, format!("Value out of range ({constraint})")),
        Some(code) if code == STRING_DATA_RIGHT_TRUNCATION => ApplicationError::new(ErrorType::Validation, "Value too long".to_string()),
        _ => {
            tracing::error!("Unhandled database error: {}", db_error);
            ApplicationError::new(ErrorType::DatabaseError, "Unhandled database error".to_string())
        }
    }
}

/**
 * Handles database errors raised by deletes. Foreign key failures here mean the row is still referenced.
 *
 * # Arguments
 * `error`: The sqlx error to handle.
 * `entity`: Name of the entity being deleted, used in the message.
 */
pub fn handle_delete_error(error: &sqlx::Error, entity: &str) -> ApplicationError {
    if let Some(db_error) = error.as_database_error() {
        let restricted = db_error.code().is_some_and(|code| code == FOREIGN_KEY_VIOLATION || code == RESTRICT_VIOLATION);
        if restricted {
            tracing::info!("Delete of {} restricted by {:?}", entity, db_error.constraint());
            return ApplicationError::new(ErrorType::ConstraintViolation, format!("{entity} cannot be deleted while it is referenced by other records"));
        }
    }
    handle_database_error(error)
}

/**
 * Maps failures of read queries.
 */
pub fn handle_query_error(error: &sqlx::Error, query: &str) -> ApplicationError {
    tracing::error!("Query {} failed: {}", query, error);
    ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get {query}"))
}

/**
 * Checks that an update or delete touched exactly one row.
 *
 * # Arguments
 * `result`: The query result.
 * `entity`: Name of the entity, used in messages.
 * `id`: Identifier that was targeted.
 */
pub fn check_single_row(result: &PgQueryResult, entity: &str, id: i64) -> Result<(), ApplicationError> {
    if result.rows_affected() == 0 {
        tracing::debug!("{} with ID {} not found", entity, id);
        return Err(ApplicationError::not_found(entity));
    }
    if result.rows_affected() > 1 {
        tracing::warn!("Multiple {} rows attempted changed. Rolled back", entity);
        return Err(ApplicationError::new(ErrorType::Application, format!("Multiple {entity} rows attempted changed. Rolled back")));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_non_database_error_is_database_error() {
        let error = handle_database_error(&sqlx::Error::RowNotFound);
        assert_eq!(error.error_type, ErrorType::DatabaseError);
        let error = handle_delete_error(&sqlx::Error::PoolTimedOut, "Analyst");
        assert_eq!(error.error_type, ErrorType::DatabaseError);
    }

    #[test]
    fn test_query_error_message() {
        let error = handle_query_error(&sqlx::Error::PoolClosed, "drum list");
        assert_eq!(error.error_type, ErrorType::DatabaseError);
        assert_eq!(error.message, "Failed to execute query to get drum list");
    }
}
