pub mod analysis;
pub mod beekeeping;
pub mod laboratory;
pub mod statistics;

use sqlx::{Pool, Postgres, Transaction, pool::PoolConnection};

use crate::model::apperror::{ApplicationError, ErrorType};

/**
 * Returns the pool or an error when the service runs without a database.
 */
fn connection_pool(connection_pool: &Option<Pool<Postgres>>) -> Result<&Pool<Postgres>, ApplicationError> {
    connection_pool.as_ref().ok_or_else(|| ApplicationError::new(ErrorType::DatabaseError, "No database connection available".to_string()))
}

/**
 * Acquires a single connection for read-only calls that run one query.
 */
pub(crate) async fn acquire(pool: &Option<Pool<Postgres>>) -> Result<PoolConnection<Postgres>, ApplicationError> {
    connection_pool(pool)?.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))
}

/**
 * Begins the transaction that spans one service call.
 */
pub(crate) async fn begin(pool: &Option<Pool<Postgres>>) -> Result<Transaction<'static, Postgres>, ApplicationError> {
    connection_pool(pool)?.begin().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to begin transaction: {err}")))
}

/**
 * Commits the transaction when the call succeeded, otherwise rolls it back and returns the original error.
 *
 * # Arguments
 * `transaction`: The transaction opened by `begin`.
 * `result`: Outcome of the work done inside the transaction.
 */
pub(crate) async fn finish<T>(transaction: Transaction<'static, Postgres>, result: Result<T, ApplicationError>) -> Result<T, ApplicationError> {
    match result {
        Ok(value) => {
            transaction.commit().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to commit transaction: {err}")))?;
            Ok(value)
        }
        Err(err) => {
            transaction.rollback().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to rollback transaction: {err}")))?;
            Err(err)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_missing_pool_is_database_error() {
        let error = begin(&None).await.unwrap_err();
        assert_eq!(error.error_type, ErrorType::DatabaseError);
        assert_eq!(error.message, "No database connection available");
        let error = acquire(&None).await.unwrap_err();
        assert_eq!(error.error_type, ErrorType::DatabaseError);
    }
}
