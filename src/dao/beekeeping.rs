use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgConnection;
use tracing::{Instrument, instrument};

use crate::dao::{check_single_row, handle_database_error, handle_delete_error, handle_query_error};
use crate::model::{
    apperror::ApplicationError,
    beekeeping::{
        ApiaryDetailType, ApiaryInputType, AssociatedApiaryType, BeekeeperDetailType, BeekeeperInputType, DrumApiaryDetailType, DrumApiaryInputType, DrumDetailType, DrumInputType,
    },
    models::{ListOutputType, PaginationInput},
};

/**
 * Database response type for beekeeper rows.
 */
pub type QueryBeekeeperDbResp = (i64, String, String, Option<String>, DateTime<Utc>, DateTime<Utc>);

/**
 * Database response type for apiary rows.
 */
pub type QueryApiaryDbResp = (i64, i64, String, Option<String>, DateTime<Utc>, DateTime<Utc>);

/**
 * Database response type for drum rows.
 */
pub type QueryDrumDbResp = (i64, String, Option<NaiveDate>, DateTime<Utc>, DateTime<Utc>);

/**
 * Database response type for drum-apiary association rows.
 */
pub type QueryDrumApiaryDbResp = (i64, i64, i64, NaiveDate);

/**
 * Database response type for apiaries reached through an association: association id and date followed by the apiary.
 */
pub type QueryAssociatedApiaryDbResp = (i64, NaiveDate, i64, i64, String, Option<String>, DateTime<Utc>, DateTime<Utc>);

const QUERY_BEEKEEPER_LIST: &str = "SELECT id, names, surnames, contact, created_at, updated_at FROM beekeeper ORDER BY id LIMIT $1 OFFSET $2";
const QUERY_BEEKEEPER: &str = "SELECT id, names, surnames, contact, created_at, updated_at FROM beekeeper WHERE id = $1";
const ADD_BEEKEEPER: &str = "INSERT INTO beekeeper (names, surnames, contact, created_at, updated_at) VALUES ($1, $2, $3, now(), now()) RETURNING id";
const UPDATE_BEEKEEPER: &str = "UPDATE beekeeper SET names = $1, surnames = $2, contact = $3, updated_at = now() WHERE id = $4";
const DELETE_BEEKEEPER: &str = "DELETE FROM beekeeper WHERE id = $1";

const QUERY_APIARY_LIST: &str = "SELECT id, beekeeper_id, name, location, created_at, updated_at FROM apiary ORDER BY id LIMIT $1 OFFSET $2";
const QUERY_APIARY: &str = "SELECT id, beekeeper_id, name, location, created_at, updated_at FROM apiary WHERE id = $1";
const QUERY_APIARIES_BY_BEEKEEPER: &str = "SELECT id, beekeeper_id, name, location, created_at, updated_at FROM apiary WHERE beekeeper_id = $1 ORDER BY id";
const ADD_APIARY: &str = "INSERT INTO apiary (beekeeper_id, name, location, created_at, updated_at) VALUES ($1, $2, $3, now(), now()) RETURNING id";
const UPDATE_APIARY: &str = "UPDATE apiary SET beekeeper_id = $1, name = $2, location = $3, updated_at = now() WHERE id = $4";
const DELETE_APIARY: &str = "DELETE FROM apiary WHERE id = $1";

const QUERY_DRUM_LIST: &str = "SELECT id, registration_number, extraction_date, created_at, updated_at FROM drum ORDER BY id LIMIT $1 OFFSET $2";
const QUERY_DRUM: &str = "SELECT id, registration_number, extraction_date, created_at, updated_at FROM drum WHERE id = $1";
const ADD_DRUM: &str = "INSERT INTO drum (registration_number, extraction_date, created_at, updated_at) VALUES ($1, $2, now(), now()) RETURNING id";
const UPDATE_DRUM: &str = "UPDATE drum SET registration_number = $1, extraction_date = $2, updated_at = now() WHERE id = $3";
const DELETE_DRUM: &str = "DELETE FROM drum WHERE id = $1";

const QUERY_DRUMS_BY_APIARY: &str = "SELECT d.id, d.registration_number, d.extraction_date, d.created_at, d.updated_at
                                     FROM drum d
                                     JOIN drum_apiary da ON da.drum_id = d.id
                                     WHERE da.apiary_id = $1
                                     ORDER BY d.id";
const QUERY_APIARIES_BY_DRUM: &str = "SELECT da.id, da.association_date, a.id, a.beekeeper_id, a.name, a.location, a.created_at, a.updated_at
                                      FROM apiary a
                                      JOIN drum_apiary da ON da.apiary_id = a.id
                                      WHERE da.drum_id = $1
                                      ORDER BY a.id";
const ADD_DRUM_APIARY: &str = "INSERT INTO drum_apiary (drum_id, apiary_id, association_date) VALUES ($1, $2, COALESCE($3, CURRENT_DATE))
                               RETURNING id, drum_id, apiary_id, association_date";
const DELETE_DRUM_APIARY: &str = "DELETE FROM drum_apiary WHERE apiary_id = $1 AND drum_id = $2";

impl From<QueryBeekeeperDbResp> for BeekeeperDetailType {
    fn from(row: QueryBeekeeperDbResp) -> Self {
        BeekeeperDetailType { id: row.0, names: row.1, surnames: row.2, contact: row.3, created_at: row.4, updated_at: row.5 }
    }
}

impl From<QueryApiaryDbResp> for ApiaryDetailType {
    fn from(row: QueryApiaryDbResp) -> Self {
        ApiaryDetailType { id: row.0, beekeeper_id: row.1, name: row.2, location: row.3, created_at: row.4, updated_at: row.5 }
    }
}

impl From<QueryDrumDbResp> for DrumDetailType {
    fn from(row: QueryDrumDbResp) -> Self {
        DrumDetailType { id: row.0, registration_number: row.1, extraction_date: row.2, created_at: row.3, updated_at: row.4 }
    }
}

impl From<QueryDrumApiaryDbResp> for DrumApiaryDetailType {
    fn from(row: QueryDrumApiaryDbResp) -> Self {
        DrumApiaryDetailType { id: row.0, drum_id: row.1, apiary_id: row.2, association_date: row.3 }
    }
}

impl From<QueryAssociatedApiaryDbResp> for AssociatedApiaryType {
    fn from(row: QueryAssociatedApiaryDbResp) -> Self {
        AssociatedApiaryType { association_id: row.0, association_date: row.1, apiary: ApiaryDetailType::from((row.2, row.3, row.4, row.5, row.6, row.7)) }
    }
}

/**
 * DAO for beekeepers, apiaries, drums and the drum-apiary association.
 */
pub struct BeekeepingDao {}

impl BeekeepingDao {
    /**
     * Creates a new instance of `BeekeepingDao`.
     */
    pub fn new() -> Self {
        BeekeepingDao {}
    }

    /***************** Beekeepers *********************/

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_beekeeper_list(&self, connection: &mut PgConnection, pagination_input: PaginationInput) -> Result<ListOutputType<BeekeeperDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryBeekeeperDbResp> = sqlx::query_as(QUERY_BEEKEEPER_LIST)
            .bind(pagination_input.page_size + 1)
            .bind(pagination_input.start_index)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "beekeeper list"))?;
        ListOutputType::from_rows(results.into_iter().map(BeekeeperDetailType::from).collect(), &pagination_input)
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_beekeeper(&self, connection: &mut PgConnection, beekeeper_id: i64) -> Result<BeekeeperDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<QueryBeekeeperDbResp> = sqlx::query_as(QUERY_BEEKEEPER)
            .bind(beekeeper_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "beekeeper"))?;
        result.map(BeekeeperDetailType::from).ok_or_else(|| ApplicationError::not_found("Beekeeper"))
    }

    /**
     * Adds a new beekeeper.
     *
     * # Returns
     * The identifier of the new beekeeper.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_beekeeper(&self, transaction: &mut PgConnection, input: BeekeeperInputType) -> Result<i64, ApplicationError> {
        let span = tracing::Span::current();
        let (id,): (i64,) = sqlx::query_as(ADD_BEEKEEPER)
            .bind(input.names)
            .bind(input.surnames)
            .bind(input.contact)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err))?;
        Ok(id)
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn update_beekeeper(&self, transaction: &mut PgConnection, beekeeper_id: i64, input: BeekeeperInputType) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(UPDATE_BEEKEEPER)
            .bind(input.names)
            .bind(input.surnames)
            .bind(input.contact)
            .bind(beekeeper_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err))?;
        check_single_row(&result, "Beekeeper", beekeeper_id)
    }

    /**
     * Deletes a beekeeper. Restricted while apiaries reference it.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn delete_beekeeper(&self, transaction: &mut PgConnection, beekeeper_id: i64) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(DELETE_BEEKEEPER)
            .bind(beekeeper_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_delete_error(&err, "Beekeeper"))?;
        check_single_row(&result, "Beekeeper", beekeeper_id)
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_beekeeper_apiaries(&self, connection: &mut PgConnection, beekeeper_id: i64) -> Result<Vec<ApiaryDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryApiaryDbResp> = sqlx::query_as(QUERY_APIARIES_BY_BEEKEEPER)
            .bind(beekeeper_id)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "beekeeper apiaries"))?;
        Ok(results.into_iter().map(ApiaryDetailType::from).collect())
    }

    /***************** Apiaries *********************/

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_apiary_list(&self, connection: &mut PgConnection, pagination_input: PaginationInput) -> Result<ListOutputType<ApiaryDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryApiaryDbResp> = sqlx::query_as(QUERY_APIARY_LIST)
            .bind(pagination_input.page_size + 1)
            .bind(pagination_input.start_index)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "apiary list"))?;
        ListOutputType::from_rows(results.into_iter().map(ApiaryDetailType::from).collect(), &pagination_input)
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_apiary(&self, connection: &mut PgConnection, apiary_id: i64) -> Result<ApiaryDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<QueryApiaryDbResp> = sqlx::query_as(QUERY_APIARY)
            .bind(apiary_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "apiary"))?;
        result.map(ApiaryDetailType::from).ok_or_else(|| ApplicationError::not_found("Apiary"))
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_apiary(&self, transaction: &mut PgConnection, input: ApiaryInputType) -> Result<i64, ApplicationError> {
        let span = tracing::Span::current();
        let (id,): (i64,) = sqlx::query_as(ADD_APIARY)
            .bind(input.beekeeper_id)
            .bind(input.name)
            .bind(input.location)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err))?;
        Ok(id)
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn update_apiary(&self, transaction: &mut PgConnection, apiary_id: i64, input: ApiaryInputType) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(UPDATE_APIARY)
            .bind(input.beekeeper_id)
            .bind(input.name)
            .bind(input.location)
            .bind(apiary_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err))?;
        check_single_row(&result, "Apiary", apiary_id)
    }

    /**
     * Deletes an apiary. Drum associations are removed with it.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn delete_apiary(&self, transaction: &mut PgConnection, apiary_id: i64) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(DELETE_APIARY)
            .bind(apiary_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_delete_error(&err, "Apiary"))?;
        check_single_row(&result, "Apiary", apiary_id)
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_apiary_drums(&self, connection: &mut PgConnection, apiary_id: i64) -> Result<Vec<DrumDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryDrumDbResp> = sqlx::query_as(QUERY_DRUMS_BY_APIARY)
            .bind(apiary_id)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "apiary drums"))?;
        Ok(results.into_iter().map(DrumDetailType::from).collect())
    }

    /**
     * Associates a drum with an apiary. The association date defaults to today.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_drum_to_apiary(&self, transaction: &mut PgConnection, apiary_id: i64, input: DrumApiaryInputType) -> Result<DrumApiaryDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let row: QueryDrumApiaryDbResp = sqlx::query_as(ADD_DRUM_APIARY)
            .bind(input.drum_id)
            .bind(apiary_id)
            .bind(input.association_date)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err))?;
        Ok(DrumApiaryDetailType::from(row))
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn remove_drum_from_apiary(&self, transaction: &mut PgConnection, apiary_id: i64, drum_id: i64) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(DELETE_DRUM_APIARY)
            .bind(apiary_id)
            .bind(drum_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_delete_error(&err, "Drum-apiary association"))?;
        check_single_row(&result, "Drum-apiary association", drum_id)
    }

    /***************** Drums *********************/

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_drum_list(&self, connection: &mut PgConnection, pagination_input: PaginationInput) -> Result<ListOutputType<DrumDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryDrumDbResp> = sqlx::query_as(QUERY_DRUM_LIST)
            .bind(pagination_input.page_size + 1)
            .bind(pagination_input.start_index)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "drum list"))?;
        ListOutputType::from_rows(results.into_iter().map(DrumDetailType::from).collect(), &pagination_input)
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_drum(&self, connection: &mut PgConnection, drum_id: i64) -> Result<DrumDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<QueryDrumDbResp> = sqlx::query_as(QUERY_DRUM)
            .bind(drum_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "drum"))?;
        result.map(DrumDetailType::from).ok_or_else(|| ApplicationError::not_found("Drum"))
    }

    /**
     * Adds a new drum. A duplicate registration number is reported as a constraint violation.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_drum(&self, transaction: &mut PgConnection, input: DrumInputType) -> Result<i64, ApplicationError> {
        let span = tracing::Span::current();
        let (id,): (i64,) = sqlx::query_as(ADD_DRUM)
            .bind(input.registration_number)
            .bind(input.extraction_date)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err))?;
        Ok(id)
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn update_drum(&self, transaction: &mut PgConnection, drum_id: i64, input: DrumInputType) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(UPDATE_DRUM)
            .bind(input.registration_number)
            .bind(input.extraction_date)
            .bind(drum_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err))?;
        check_single_row(&result, "Drum", drum_id)
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn delete_drum(&self, transaction: &mut PgConnection, drum_id: i64) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(DELETE_DRUM)
            .bind(drum_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_delete_error(&err, "Drum"))?;
        check_single_row(&result, "Drum", drum_id)
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_drum_apiaries(&self, connection: &mut PgConnection, drum_id: i64) -> Result<Vec<AssociatedApiaryType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryAssociatedApiaryDbResp> = sqlx::query_as(QUERY_APIARIES_BY_DRUM)
            .bind(drum_id)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "drum apiaries"))?;
        Ok(results.into_iter().map(AssociatedApiaryType::from).collect())
    }
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_associated_apiary_from_row() {
        let now = Utc::now();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let row: QueryAssociatedApiaryDbResp = (9, date, 4, 2, "Los Sauces".to_string(), None, now, now);
        let associated = AssociatedApiaryType::from(row);
        assert_eq!(associated.association_id, 9);
        assert_eq!(associated.association_date, date);
        assert_eq!(associated.apiary.id, 4);
        assert_eq!(associated.apiary.beekeeper_id, 2);
        assert_eq!(associated.apiary.name, "Los Sauces");
    }
}

#[cfg(feature = "integration-test")]
#[cfg(test)]
mod integration_test {
    use super::*;
    use crate::dao::test_support::init_db;
    use crate::model::apperror::ErrorType;

    fn beekeeper() -> BeekeeperInputType {
        BeekeeperInputType { names: "Rosa".to_string(), surnames: "Quispe".to_string(), contact: None }
    }

    #[sqlx::test]
    async fn test_apiary_drums_scenario() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let dao = BeekeepingDao::new();
        let beekeeper_id = dao.add_beekeeper(&mut transaction, beekeeper()).await.unwrap();
        let apiary_id = dao.add_apiary(&mut transaction, ApiaryInputType { beekeeper_id, name: "A1".to_string(), location: None }).await.unwrap();
        let drum_id = dao.add_drum(&mut transaction, DrumInputType { registration_number: "IT-D1".to_string(), extraction_date: None }).await.unwrap();
        let association = dao.add_drum_to_apiary(&mut transaction, apiary_id, DrumApiaryInputType { drum_id, association_date: None }).await.unwrap();
        assert_eq!(association.apiary_id, apiary_id);
        let drums = dao.get_apiary_drums(&mut transaction, apiary_id).await.unwrap();
        assert_eq!(drums.len(), 1);
        assert_eq!(drums[0].id, drum_id);
        let apiaries = dao.get_drum_apiaries(&mut transaction, drum_id).await.unwrap();
        assert_eq!(apiaries.len(), 1);
        assert_eq!(apiaries[0].apiary.id, apiary_id);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_duplicate_drum_registration_number() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let dao = BeekeepingDao::new();
        let first = dao.add_drum(&mut transaction, DrumInputType { registration_number: "IT-DUP".to_string(), extraction_date: None }).await;
        assert!(first.is_ok());
        let second = dao.add_drum(&mut transaction, DrumInputType { registration_number: "IT-DUP".to_string(), extraction_date: None }).await;
        assert_eq!(second.unwrap_err().error_type, ErrorType::ConstraintViolation);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_delete_beekeeper_with_apiary_is_restricted() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let dao = BeekeepingDao::new();
        let beekeeper_id = dao.add_beekeeper(&mut transaction, beekeeper()).await.unwrap();
        dao.add_apiary(&mut transaction, ApiaryInputType { beekeeper_id, name: "A1".to_string(), location: None }).await.unwrap();
        let result = dao.delete_beekeeper(&mut transaction, beekeeper_id).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::ConstraintViolation);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_missing_beekeeper_not_found() {
        let pool = init_db().await;
        let mut connection = pool.acquire().await.unwrap();
        let dao = BeekeepingDao::new();
        let result = dao.get_beekeeper(&mut connection, i64::MAX).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::NotFound);
    }
}
