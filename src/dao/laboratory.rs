use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgConnection;
use tracing::{Instrument, instrument};

use crate::dao::{beekeeping::QueryDrumDbResp, check_single_row, handle_database_error, handle_delete_error, handle_query_error};
use crate::model::{
    apperror::ApplicationError,
    beekeeping::DrumDetailType,
    laboratory::{
        AnalystDetailType, AnalystInputType, AssociatedDrumType, PoolMemberDetailType, PoolMemberInputType, SampleDetailType, SampleDrumDetailType, SampleDrumInputType, SampleInputType,
        SpeciesDetailType, SpeciesInputType,
    },
    models::{ListOutputType, PaginationInput},
};

/**
 * Database response type for analyst rows.
 */
pub type QueryAnalystDbResp = (i64, String, String, Option<String>, String, String, bool, DateTime<Utc>, DateTime<Utc>);

/**
 * Database response type for species rows.
 */
pub type QuerySpeciesDbResp = (i64, String, Option<String>, Option<String>, DateTime<Utc>, DateTime<Utc>);

/**
 * Database response type for sample and pool rows.
 */
pub type QuerySampleDbResp = (i64, i64, NaiveDate, Option<NaiveDate>, Option<String>, Option<String>, DateTime<Utc>, DateTime<Utc>);

/**
 * Database response type for sample-drum association rows.
 */
pub type QuerySampleDrumDbResp = (i64, i64, i64, NaiveDate);

/**
 * Database response type for drums reached through a sample: association id and date followed by the drum.
 */
pub type QueryAssociatedDrumDbResp = (i64, NaiveDate, i64, String, Option<NaiveDate>, DateTime<Utc>, DateTime<Utc>);

/**
 * Database response type for pool members: member id, pool id, created at, then the sample-drum association.
 */
pub type QueryPoolMemberDbResp = (i64, i64, DateTime<Utc>, i64, i64, i64, NaiveDate);

const ANALYST_COLUMNS: &str = "id, names, surnames, contact, username, email, is_active, created_at, updated_at";
const SPECIES_COLUMNS: &str = "id, scientific_name, common_name, family, created_at, updated_at";
const SAMPLE_COLUMNS: &str = "id, analyst_id, extraction_date, analysis_date, registration_number, observations, created_at, updated_at";

const ADD_ANALYST: &str = "INSERT INTO analyst (names, surnames, contact, username, email, is_active, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, TRUE, now(), now()) RETURNING id";
const UPDATE_ANALYST: &str = "UPDATE analyst SET names = $1, surnames = $2, contact = $3, username = $4, email = $5, updated_at = now() WHERE id = $6";
const DELETE_ANALYST: &str = "DELETE FROM analyst WHERE id = $1";

const ADD_SPECIES: &str = "INSERT INTO species (scientific_name, common_name, family, created_at, updated_at) VALUES ($1, $2, $3, now(), now()) RETURNING id";
const UPDATE_SPECIES: &str = "UPDATE species SET scientific_name = $1, common_name = $2, family = $3, updated_at = now() WHERE id = $4";
const DELETE_SPECIES: &str = "DELETE FROM species WHERE id = $1";

const ADD_SAMPLE: &str = "INSERT INTO sample (analyst_id, extraction_date, analysis_date, registration_number, observations, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, now(), now()) RETURNING id";
const UPDATE_SAMPLE: &str = "UPDATE sample SET analyst_id = $1, extraction_date = $2, analysis_date = $3, registration_number = $4, observations = $5, updated_at = now() WHERE id = $6";
const DELETE_SAMPLE: &str = "DELETE FROM sample WHERE id = $1";
const COUNT_SAMPLES: &str = "SELECT COUNT(*) FROM sample";

const ADD_POOL: &str = "INSERT INTO pool (analyst_id, extraction_date, analysis_date, registration_number, observations, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, now(), now()) RETURNING id";
const UPDATE_POOL: &str = "UPDATE pool SET analyst_id = $1, extraction_date = $2, analysis_date = $3, registration_number = $4, observations = $5, updated_at = now() WHERE id = $6";
const DELETE_POOL: &str = "DELETE FROM pool WHERE id = $1";

const QUERY_DRUMS_BY_SAMPLE: &str = "SELECT sd.id, sd.association_date, d.id, d.registration_number, d.extraction_date, d.created_at, d.updated_at
                                     FROM drum d
                                     JOIN sample_drum sd ON sd.drum_id = d.id
                                     WHERE sd.sample_id = $1
                                     ORDER BY d.id";
const QUERY_SAMPLES_BY_DRUM: &str = "SELECT s.id, s.analyst_id, s.extraction_date, s.analysis_date, s.registration_number, s.observations, s.created_at, s.updated_at
                                     FROM sample s
                                     JOIN sample_drum sd ON sd.sample_id = s.id
                                     WHERE sd.drum_id = $1
                                     ORDER BY s.id";
const ADD_SAMPLE_DRUM: &str = "INSERT INTO sample_drum (sample_id, drum_id, association_date) VALUES ($1, $2, COALESCE($3, CURRENT_DATE))
                               RETURNING id, sample_id, drum_id, association_date";
const DELETE_SAMPLE_DRUM: &str = "DELETE FROM sample_drum WHERE sample_id = $1 AND drum_id = $2";

const QUERY_POOL_MEMBERS: &str = "SELECT pm.id, pm.pool_id, pm.created_at, sd.id, sd.sample_id, sd.drum_id, sd.association_date
                                  FROM pool_member pm
                                  JOIN sample_drum sd ON sd.id = pm.sample_drum_id
                                  WHERE pm.pool_id = $1
                                  ORDER BY pm.id";
const ADD_POOL_MEMBER: &str = "WITH inserted AS (
                                   INSERT INTO pool_member (pool_id, sample_drum_id, created_at) VALUES ($1, $2, now())
                                   RETURNING id, pool_id, created_at, sample_drum_id
                               )
                               SELECT i.id, i.pool_id, i.created_at, sd.id, sd.sample_id, sd.drum_id, sd.association_date
                               FROM inserted i
                               JOIN sample_drum sd ON sd.id = i.sample_drum_id";
const DELETE_POOL_MEMBER: &str = "DELETE FROM pool_member WHERE pool_id = $1 AND id = $2";

impl From<QueryAnalystDbResp> for AnalystDetailType {
    fn from(row: QueryAnalystDbResp) -> Self {
        AnalystDetailType { id: row.0, names: row.1, surnames: row.2, contact: row.3, username: row.4, email: row.5, is_active: row.6, created_at: row.7, updated_at: row.8 }
    }
}

impl From<QuerySpeciesDbResp> for SpeciesDetailType {
    fn from(row: QuerySpeciesDbResp) -> Self {
        SpeciesDetailType { id: row.0, scientific_name: row.1, common_name: row.2, family: row.3, created_at: row.4, updated_at: row.5 }
    }
}

impl From<QuerySampleDbResp> for SampleDetailType {
    fn from(row: QuerySampleDbResp) -> Self {
        SampleDetailType { id: row.0, analyst_id: row.1, extraction_date: row.2, analysis_date: row.3, registration_number: row.4, observations: row.5, created_at: row.6, updated_at: row.7 }
    }
}

impl From<QuerySampleDrumDbResp> for SampleDrumDetailType {
    fn from(row: QuerySampleDrumDbResp) -> Self {
        SampleDrumDetailType { id: row.0, sample_id: row.1, drum_id: row.2, association_date: row.3 }
    }
}

impl From<QueryAssociatedDrumDbResp> for AssociatedDrumType {
    fn from(row: QueryAssociatedDrumDbResp) -> Self {
        let drum_row: QueryDrumDbResp = (row.2, row.3, row.4, row.5, row.6);
        AssociatedDrumType { association_id: row.0, association_date: row.1, drum: DrumDetailType::from(drum_row) }
    }
}

impl From<QueryPoolMemberDbResp> for PoolMemberDetailType {
    fn from(row: QueryPoolMemberDbResp) -> Self {
        PoolMemberDetailType { id: row.0, pool_id: row.1, created_at: row.2, sample_drum: SampleDrumDetailType::from((row.3, row.4, row.5, row.6)) }
    }
}

/**
 * Table holding rows shaped like a sample.
 */
#[derive(Debug, Clone, Copy)]
enum BatchTable {
    Sample,
    Pool,
}

impl BatchTable {
    fn table(self) -> &'static str {
        match self {
            BatchTable::Sample => "sample",
            BatchTable::Pool => "pool",
        }
    }

    fn entity(self) -> &'static str {
        match self {
            BatchTable::Sample => "Sample",
            BatchTable::Pool => "Pool",
        }
    }
}

/**
 * DAO for analysts, species, samples, pools and their associations.
 */
pub struct LaboratoryDao {}

impl LaboratoryDao {
    /**
     * Creates a new instance of `LaboratoryDao`.
     */
    pub fn new() -> Self {
        LaboratoryDao {}
    }

    /***************** Analysts *********************/

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_analyst_list(&self, connection: &mut PgConnection, pagination_input: PaginationInput) -> Result<ListOutputType<AnalystDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryAnalystDbResp> = sqlx::query_as(&format!("SELECT {ANALYST_COLUMNS} FROM analyst ORDER BY id LIMIT $1 OFFSET $2"))
            .bind(pagination_input.page_size + 1)
            .bind(pagination_input.start_index)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "analyst list"))?;
        ListOutputType::from_rows(results.into_iter().map(AnalystDetailType::from).collect(), &pagination_input)
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_analyst(&self, connection: &mut PgConnection, analyst_id: i64) -> Result<AnalystDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<QueryAnalystDbResp> = sqlx::query_as(&format!("SELECT {ANALYST_COLUMNS} FROM analyst WHERE id = $1"))
            .bind(analyst_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "analyst"))?;
        result.map(AnalystDetailType::from).ok_or_else(|| ApplicationError::not_found("Analyst"))
    }

    /**
     * Adds a new analyst. New analysts are always active.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_analyst(&self, transaction: &mut PgConnection, input: AnalystInputType) -> Result<i64, ApplicationError> {
        let span = tracing::Span::current();
        let (id,): (i64,) = sqlx::query_as(ADD_ANALYST)
            .bind(input.names)
            .bind(input.surnames)
            .bind(input.contact)
            .bind(input.username)
            .bind(input.email)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err))?;
        Ok(id)
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn update_analyst(&self, transaction: &mut PgConnection, analyst_id: i64, input: AnalystInputType) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(UPDATE_ANALYST)
            .bind(input.names)
            .bind(input.surnames)
            .bind(input.contact)
            .bind(input.username)
            .bind(input.email)
            .bind(analyst_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err))?;
        check_single_row(&result, "Analyst", analyst_id)
    }

    /**
     * Deletes an analyst. Restricted while samples, pools or physico-chemical analyses reference it.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn delete_analyst(&self, transaction: &mut PgConnection, analyst_id: i64) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(DELETE_ANALYST)
            .bind(analyst_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_delete_error(&err, "Analyst"))?;
        check_single_row(&result, "Analyst", analyst_id)
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_analyst_samples(&self, connection: &mut PgConnection, analyst_id: i64) -> Result<Vec<SampleDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QuerySampleDbResp> = sqlx::query_as(&format!("SELECT {SAMPLE_COLUMNS} FROM sample WHERE analyst_id = $1 ORDER BY id"))
            .bind(analyst_id)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "analyst samples"))?;
        Ok(results.into_iter().map(SampleDetailType::from).collect())
    }

    /***************** Species *********************/

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_species_list(&self, connection: &mut PgConnection, pagination_input: PaginationInput) -> Result<ListOutputType<SpeciesDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QuerySpeciesDbResp> = sqlx::query_as(&format!("SELECT {SPECIES_COLUMNS} FROM species ORDER BY scientific_name, id LIMIT $1 OFFSET $2"))
            .bind(pagination_input.page_size + 1)
            .bind(pagination_input.start_index)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "species list"))?;
        ListOutputType::from_rows(results.into_iter().map(SpeciesDetailType::from).collect(), &pagination_input)
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_species(&self, connection: &mut PgConnection, species_id: i64) -> Result<SpeciesDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<QuerySpeciesDbResp> = sqlx::query_as(&format!("SELECT {SPECIES_COLUMNS} FROM species WHERE id = $1"))
            .bind(species_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "species"))?;
        result.map(SpeciesDetailType::from).ok_or_else(|| ApplicationError::not_found("Species"))
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_species(&self, transaction: &mut PgConnection, input: SpeciesInputType) -> Result<i64, ApplicationError> {
        let span = tracing::Span::current();
        let (id,): (i64,) = sqlx::query_as(ADD_SPECIES)
            .bind(input.scientific_name)
            .bind(input.common_name)
            .bind(input.family)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err))?;
        Ok(id)
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn update_species(&self, transaction: &mut PgConnection, species_id: i64, input: SpeciesInputType) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(UPDATE_SPECIES)
            .bind(input.scientific_name)
            .bind(input.common_name)
            .bind(input.family)
            .bind(species_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err))?;
        check_single_row(&result, "Species", species_id)
    }

    /**
     * Deletes a species. Restricted while palynological analyses reference it.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn delete_species(&self, transaction: &mut PgConnection, species_id: i64) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(DELETE_SPECIES)
            .bind(species_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_delete_error(&err, "Species"))?;
        check_single_row(&result, "Species", species_id)
    }

    /***************** Samples *********************/

    pub async fn get_sample_list(&self, connection: &mut PgConnection, pagination_input: PaginationInput) -> Result<ListOutputType<SampleDetailType>, ApplicationError> {
        Self::get_batch_list(connection, BatchTable::Sample, pagination_input).await
    }

    pub async fn get_sample(&self, connection: &mut PgConnection, sample_id: i64) -> Result<SampleDetailType, ApplicationError> {
        Self::get_batch(connection, BatchTable::Sample, sample_id, false).await
    }

    /**
     * Reads a sample and locks its row until the transaction ends.
     */
    pub async fn get_sample_for_update(&self, transaction: &mut PgConnection, sample_id: i64) -> Result<SampleDetailType, ApplicationError> {
        Self::get_batch(transaction, BatchTable::Sample, sample_id, true).await
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_sample(&self, transaction: &mut PgConnection, input: SampleInputType) -> Result<i64, ApplicationError> {
        let span = tracing::Span::current();
        Self::add_batch(transaction, ADD_SAMPLE, input).instrument(span).await
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn update_sample(&self, transaction: &mut PgConnection, sample_id: i64, input: SampleInputType) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        Self::update_batch(transaction, BatchTable::Sample, UPDATE_SAMPLE, sample_id, input).instrument(span).await
    }

    /**
     * Deletes a sample. Its palynological analyses and drum associations are removed with it.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn delete_sample(&self, transaction: &mut PgConnection, sample_id: i64) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(DELETE_SAMPLE)
            .bind(sample_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_delete_error(&err, "Sample"))?;
        check_single_row(&result, "Sample", sample_id)
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn count_samples(&self, connection: &mut PgConnection) -> Result<i64, ApplicationError> {
        let span = tracing::Span::current();
        let (count,): (i64,) = sqlx::query_as(COUNT_SAMPLES).fetch_one(connection).instrument(span).await.map_err(|err| handle_query_error(&err, "sample count"))?;
        Ok(count)
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_sample_drums(&self, connection: &mut PgConnection, sample_id: i64) -> Result<Vec<AssociatedDrumType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryAssociatedDrumDbResp> = sqlx::query_as(QUERY_DRUMS_BY_SAMPLE)
            .bind(sample_id)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "sample drums"))?;
        Ok(results.into_iter().map(AssociatedDrumType::from).collect())
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_drum_samples(&self, connection: &mut PgConnection, drum_id: i64) -> Result<Vec<SampleDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QuerySampleDbResp> = sqlx::query_as(QUERY_SAMPLES_BY_DRUM)
            .bind(drum_id)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "drum samples"))?;
        Ok(results.into_iter().map(SampleDetailType::from).collect())
    }

    /**
     * Associates a drum with a sample. The association date defaults to today.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_drum_to_sample(&self, transaction: &mut PgConnection, sample_id: i64, input: SampleDrumInputType) -> Result<SampleDrumDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let row: QuerySampleDrumDbResp = sqlx::query_as(ADD_SAMPLE_DRUM)
            .bind(sample_id)
            .bind(input.drum_id)
            .bind(input.association_date)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err))?;
        Ok(SampleDrumDetailType::from(row))
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn remove_drum_from_sample(&self, transaction: &mut PgConnection, sample_id: i64, drum_id: i64) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(DELETE_SAMPLE_DRUM)
            .bind(sample_id)
            .bind(drum_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_delete_error(&err, "Sample-drum association"))?;
        check_single_row(&result, "Sample-drum association", drum_id)
    }

    /***************** Pools *********************/

    pub async fn get_pool_list(&self, connection: &mut PgConnection, pagination_input: PaginationInput) -> Result<ListOutputType<SampleDetailType>, ApplicationError> {
        Self::get_batch_list(connection, BatchTable::Pool, pagination_input).await
    }

    pub async fn get_pool(&self, connection: &mut PgConnection, pool_id: i64) -> Result<SampleDetailType, ApplicationError> {
        Self::get_batch(connection, BatchTable::Pool, pool_id, false).await
    }

    pub async fn get_pool_for_update(&self, transaction: &mut PgConnection, pool_id: i64) -> Result<SampleDetailType, ApplicationError> {
        Self::get_batch(transaction, BatchTable::Pool, pool_id, true).await
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_pool(&self, transaction: &mut PgConnection, input: SampleInputType) -> Result<i64, ApplicationError> {
        let span = tracing::Span::current();
        Self::add_batch(transaction, ADD_POOL, input).instrument(span).await
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn update_pool(&self, transaction: &mut PgConnection, pool_id: i64, input: SampleInputType) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        Self::update_batch(transaction, BatchTable::Pool, UPDATE_POOL, pool_id, input).instrument(span).await
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn delete_pool(&self, transaction: &mut PgConnection, pool_id: i64) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(DELETE_POOL)
            .bind(pool_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_delete_error(&err, "Pool"))?;
        check_single_row(&result, "Pool", pool_id)
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_pool_members(&self, connection: &mut PgConnection, pool_id: i64) -> Result<Vec<PoolMemberDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryPoolMemberDbResp> = sqlx::query_as(QUERY_POOL_MEMBERS)
            .bind(pool_id)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "pool members"))?;
        Ok(results.into_iter().map(PoolMemberDetailType::from).collect())
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_pool_member(&self, transaction: &mut PgConnection, pool_id: i64, input: PoolMemberInputType) -> Result<PoolMemberDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let row: QueryPoolMemberDbResp = sqlx::query_as(ADD_POOL_MEMBER)
            .bind(pool_id)
            .bind(input.sample_drum_id)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err))?;
        Ok(PoolMemberDetailType::from(row))
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn remove_pool_member(&self, transaction: &mut PgConnection, pool_id: i64, member_id: i64) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(DELETE_POOL_MEMBER)
            .bind(pool_id)
            .bind(member_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_delete_error(&err, "Pool member"))?;
        check_single_row(&result, "Pool member", member_id)
    }

    /***************** Shared sample/pool queries *********************/

    #[instrument(skip(connection), fields(result))]
    async fn get_batch_list(connection: &mut PgConnection, table: BatchTable, pagination_input: PaginationInput) -> Result<ListOutputType<SampleDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let query = format!("SELECT {SAMPLE_COLUMNS} FROM {} ORDER BY id LIMIT $1 OFFSET $2", table.table());
        let results: Vec<QuerySampleDbResp> = sqlx::query_as(&query)
            .bind(pagination_input.page_size + 1)
            .bind(pagination_input.start_index)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, &format!("{} list", table.table())))?;
        ListOutputType::from_rows(results.into_iter().map(SampleDetailType::from).collect(), &pagination_input)
    }

    #[instrument(skip(connection), fields(result))]
    async fn get_batch(connection: &mut PgConnection, table: BatchTable, id: i64, lock: bool) -> Result<SampleDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let query = format!("SELECT {SAMPLE_COLUMNS} FROM {} WHERE id = $1{}", table.table(), if lock { " FOR UPDATE" } else { "" });
        let result: Option<QuerySampleDbResp> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, table.table()))?;
        result.map(SampleDetailType::from).ok_or_else(|| ApplicationError::not_found(table.entity()))
    }

    async fn add_batch(transaction: &mut PgConnection, query: &str, input: SampleInputType) -> Result<i64, ApplicationError> {
        let (id,): (i64,) = sqlx::query_as(query)
            .bind(input.analyst_id)
            .bind(input.extraction_date)
            .bind(input.analysis_date)
            .bind(input.registration_number)
            .bind(input.observations)
            .fetch_one(transaction)
            .await
            .map_err(|err| handle_database_error(&err))?;
        Ok(id)
    }

    async fn update_batch(transaction: &mut PgConnection, table: BatchTable, query: &str, id: i64, input: SampleInputType) -> Result<(), ApplicationError> {
        let result = sqlx::query(query)
            .bind(input.analyst_id)
            .bind(input.extraction_date)
            .bind(input.analysis_date)
            .bind(input.registration_number)
            .bind(input.observations)
            .bind(id)
            .execute(transaction)
            .await
            .map_err(|err| handle_database_error(&err))?;
        check_single_row(&result, table.entity(), id)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pool_member_from_row() {
        let now = Utc::now();
        let date = NaiveDate::from_ymd_opt(2024, 2, 3).unwrap();
        let member = PoolMemberDetailType::from((5, 2, now, 11, 7, 3, date));
        assert_eq!(member.id, 5);
        assert_eq!(member.pool_id, 2);
        assert_eq!(member.sample_drum.id, 11);
        assert_eq!(member.sample_drum.sample_id, 7);
        assert_eq!(member.sample_drum.drum_id, 3);
        assert_eq!(member.sample_drum.association_date, date);
    }

    #[test]
    fn test_batch_table_names() {
        assert_eq!(BatchTable::Sample.table(), "sample");
        assert_eq!(BatchTable::Pool.entity(), "Pool");
    }
}

#[cfg(feature = "integration-test")]
#[cfg(test)]
mod integration_test {
    use super::*;
    use crate::dao::test_support::{add_test_analyst, date, init_db};
    use crate::model::apperror::ErrorType;

    fn sample(analyst_id: i64, registration_number: Option<&str>) -> SampleInputType {
        SampleInputType { analyst_id, extraction_date: date(2024, 1, 10), analysis_date: None, registration_number: registration_number.map(str::to_string), observations: None }
    }

    #[sqlx::test]
    async fn test_add_update_then_delete_sample() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let dao = LaboratoryDao::new();
        let analyst_id = add_test_analyst(&mut transaction, "it-sample").await;
        let sample_id = dao.add_sample(&mut transaction, sample(analyst_id, Some("IT-M-1"))).await.unwrap();
        let mut update = sample(analyst_id, Some("IT-M-1"));
        update.analysis_date = Some(date(2024, 1, 12));
        assert!(dao.update_sample(&mut transaction, sample_id, update).await.is_ok());
        let stored = dao.get_sample(&mut transaction, sample_id).await.unwrap();
        assert_eq!(stored.analysis_date, Some(date(2024, 1, 12)));
        assert!(dao.delete_sample(&mut transaction, sample_id).await.is_ok());
        assert_eq!(dao.get_sample(&mut transaction, sample_id).await.unwrap_err().error_type, ErrorType::NotFound);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_delete_analyst_with_sample_is_restricted() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let dao = LaboratoryDao::new();
        let analyst_id = add_test_analyst(&mut transaction, "it-restrict").await;
        dao.add_sample(&mut transaction, sample(analyst_id, None)).await.unwrap();
        let result = dao.delete_analyst(&mut transaction, analyst_id).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::ConstraintViolation);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_store_rejects_analysis_before_extraction() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let dao = LaboratoryDao::new();
        let analyst_id = add_test_analyst(&mut transaction, "it-check").await;
        let mut input = sample(analyst_id, None);
        input.analysis_date = Some(date(2024, 1, 1));
        let result = dao.add_pool(&mut transaction, input).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::Validation);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_pool_members() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let dao = LaboratoryDao::new();
        let analyst_id = add_test_analyst(&mut transaction, "it-pool").await;
        let sample_id = dao.add_sample(&mut transaction, sample(analyst_id, None)).await.unwrap();
        let (drum_id,): (i64,) = sqlx::query_as("INSERT INTO drum (registration_number) VALUES ('IT-POOL-D') RETURNING id").fetch_one(&mut *transaction).await.unwrap();
        let association = dao.add_drum_to_sample(&mut transaction, sample_id, SampleDrumInputType { drum_id, association_date: Some(date(2024, 1, 11)) }).await.unwrap();
        let pool_id = dao.add_pool(&mut transaction, sample(analyst_id, Some("IT-P-1"))).await.unwrap();
        let member = dao.add_pool_member(&mut transaction, pool_id, PoolMemberInputType { sample_drum_id: association.id }).await.unwrap();
        assert_eq!(member.sample_drum.drum_id, drum_id);
        let members = dao.get_pool_members(&mut transaction, pool_id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert!(dao.remove_pool_member(&mut transaction, pool_id, member.id).await.is_ok());
        assert!(dao.get_pool_members(&mut transaction, pool_id).await.unwrap().is_empty());
        transaction.rollback().await.unwrap();
    }
}
