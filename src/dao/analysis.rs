use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use tracing::{Instrument, instrument};

use crate::dao::{check_single_row, handle_database_error, handle_delete_error, handle_query_error};
use crate::model::{
    analysis::{PalynologicalAnalysisDetailType, PalynologicalAnalysisInputType, PhysicochemicalAnalysisDetailType, PhysicochemicalAnalysisInputType},
    apperror::{ApplicationError, ErrorType},
    models::{ListOutputType, PaginationInput},
};

/**
 * Database response type for palynological analyses.
 */
pub type QueryPalynologicalDbResp = (i64, i64, i64, i32, Option<String>, Option<Decimal>, DateTime<Utc>, DateTime<Utc>);

/**
 * Database response type for physico-chemical analyses.
 */
pub type QueryPhysicochemicalDbResp = (
    i64,
    i64,
    i64,
    Option<NaiveDate>,
    Option<Decimal>,
    Option<Decimal>,
    Option<Decimal>,
    Option<Decimal>,
    Option<Decimal>,
    Option<String>,
    DateTime<Utc>,
    DateTime<Utc>,
);

const PALYNOLOGICAL_COLUMNS: &str = "id, sample_id, species_id, grain_count, special_mark, percentage, created_at, updated_at";
const PHYSICOCHEMICAL_COLUMNS: &str =
    "id, analyst_id, drum_id, analysis_date, humidity, color, hydroxymethylfurfural, free_acidity, electrical_conductivity, observations, created_at, updated_at";

const ADD_PALYNOLOGICAL: &str = "INSERT INTO palynological_analysis (sample_id, species_id, grain_count, special_mark, percentage, created_at, updated_at)
                                 VALUES ($1, $2, $3, $4, $5, now(), now()) RETURNING id";
const UPDATE_PALYNOLOGICAL: &str = "UPDATE palynological_analysis SET sample_id = $1, species_id = $2, grain_count = $3, special_mark = $4, percentage = $5, updated_at = now() WHERE id = $6";
const DELETE_PALYNOLOGICAL: &str = "DELETE FROM palynological_analysis WHERE id = $1";

const ADD_PHYSICOCHEMICAL: &str = "INSERT INTO physicochemical_analysis
                                   (analyst_id, drum_id, analysis_date, humidity, color, hydroxymethylfurfural, free_acidity, electrical_conductivity, observations, created_at, updated_at)
                                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now(), now()) RETURNING id";
const UPDATE_PHYSICOCHEMICAL: &str = "UPDATE physicochemical_analysis
                                      SET analyst_id = $1, drum_id = $2, analysis_date = $3, humidity = $4, color = $5, hydroxymethylfurfural = $6,
                                          free_acidity = $7, electrical_conductivity = $8, observations = $9, updated_at = now()
                                      WHERE id = $10";
const DELETE_PHYSICOCHEMICAL: &str = "DELETE FROM physicochemical_analysis WHERE id = $1";

impl From<QueryPalynologicalDbResp> for PalynologicalAnalysisDetailType {
    fn from(row: QueryPalynologicalDbResp) -> Self {
        PalynologicalAnalysisDetailType {
            id: row.0,
            sample_id: row.1,
            species_id: row.2,
            grain_count: row.3,
            special_mark: row.4.as_deref().and_then(|mark| mark.parse().ok()),
            percentage: row.5,
            created_at: row.6,
            updated_at: row.7,
        }
    }
}

impl From<QueryPhysicochemicalDbResp> for PhysicochemicalAnalysisDetailType {
    fn from(row: QueryPhysicochemicalDbResp) -> Self {
        PhysicochemicalAnalysisDetailType {
            id: row.0,
            analyst_id: row.1,
            drum_id: row.2,
            analysis_date: row.3,
            humidity: row.4,
            color: row.5,
            hydroxymethylfurfural: row.6,
            free_acidity: row.7,
            electrical_conductivity: row.8,
            observations: row.9,
            created_at: row.10,
            updated_at: row.11,
        }
    }
}

/**
 * DAO for palynological and physico-chemical analyses.
 */
pub struct AnalysisDao {}

impl AnalysisDao {
    /**
     * Creates a new instance of `AnalysisDao`.
     */
    pub fn new() -> Self {
        AnalysisDao {}
    }

    /***************** Palynological analyses *********************/

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_palynological_list(&self, connection: &mut PgConnection, pagination_input: PaginationInput) -> Result<ListOutputType<PalynologicalAnalysisDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryPalynologicalDbResp> = sqlx::query_as(&format!("SELECT {PALYNOLOGICAL_COLUMNS} FROM palynological_analysis ORDER BY id LIMIT $1 OFFSET $2"))
            .bind(pagination_input.page_size + 1)
            .bind(pagination_input.start_index)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "palynological analysis list"))?;
        ListOutputType::from_rows(results.into_iter().map(PalynologicalAnalysisDetailType::from).collect(), &pagination_input)
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_palynological(&self, connection: &mut PgConnection, analysis_id: i64) -> Result<PalynologicalAnalysisDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<QueryPalynologicalDbResp> = sqlx::query_as(&format!("SELECT {PALYNOLOGICAL_COLUMNS} FROM palynological_analysis WHERE id = $1"))
            .bind(analysis_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "palynological analysis"))?;
        result.map(PalynologicalAnalysisDetailType::from).ok_or_else(|| ApplicationError::not_found("Palynological analysis"))
    }

    /**
     * Adds a palynological analysis. A second analysis of the same species in the same sample is a conflict.
     */
    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_palynological(&self, transaction: &mut PgConnection, input: PalynologicalAnalysisInputType) -> Result<i64, ApplicationError> {
        let span = tracing::Span::current();
        let special_mark = input.parsed_special_mark().map(|mark| mark.as_str());
        let (id,): (i64,) = sqlx::query_as(ADD_PALYNOLOGICAL)
            .bind(input.sample_id)
            .bind(input.species_id)
            .bind(grain_count(input.grain_count)?)
            .bind(special_mark)
            .bind(input.percentage)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err))?;
        Ok(id)
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn update_palynological(&self, transaction: &mut PgConnection, analysis_id: i64, input: PalynologicalAnalysisInputType) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let special_mark = input.parsed_special_mark().map(|mark| mark.as_str());
        let result = sqlx::query(UPDATE_PALYNOLOGICAL)
            .bind(input.sample_id)
            .bind(input.species_id)
            .bind(grain_count(input.grain_count)?)
            .bind(special_mark)
            .bind(input.percentage)
            .bind(analysis_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err))?;
        check_single_row(&result, "Palynological analysis", analysis_id)
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn delete_palynological(&self, transaction: &mut PgConnection, analysis_id: i64) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(DELETE_PALYNOLOGICAL)
            .bind(analysis_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_delete_error(&err, "Palynological analysis"))?;
        check_single_row(&result, "Palynological analysis", analysis_id)
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_palynological_by_species(&self, connection: &mut PgConnection, species_id: i64) -> Result<Vec<PalynologicalAnalysisDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryPalynologicalDbResp> = sqlx::query_as(&format!("SELECT {PALYNOLOGICAL_COLUMNS} FROM palynological_analysis WHERE species_id = $1 ORDER BY id"))
            .bind(species_id)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "species palynological analyses"))?;
        Ok(results.into_iter().map(PalynologicalAnalysisDetailType::from).collect())
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_palynological_by_sample(&self, connection: &mut PgConnection, sample_id: i64) -> Result<Vec<PalynologicalAnalysisDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryPalynologicalDbResp> = sqlx::query_as(&format!("SELECT {PALYNOLOGICAL_COLUMNS} FROM palynological_analysis WHERE sample_id = $1 ORDER BY id"))
            .bind(sample_id)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "sample palynological analyses"))?;
        Ok(results.into_iter().map(PalynologicalAnalysisDetailType::from).collect())
    }

    /***************** Physico-chemical analyses *********************/

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_physicochemical_list(&self, connection: &mut PgConnection, pagination_input: PaginationInput) -> Result<ListOutputType<PhysicochemicalAnalysisDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryPhysicochemicalDbResp> = sqlx::query_as(&format!("SELECT {PHYSICOCHEMICAL_COLUMNS} FROM physicochemical_analysis ORDER BY id LIMIT $1 OFFSET $2"))
            .bind(pagination_input.page_size + 1)
            .bind(pagination_input.start_index)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "physicochemical analysis list"))?;
        ListOutputType::from_rows(results.into_iter().map(PhysicochemicalAnalysisDetailType::from).collect(), &pagination_input)
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_physicochemical(&self, connection: &mut PgConnection, analysis_id: i64) -> Result<PhysicochemicalAnalysisDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<QueryPhysicochemicalDbResp> = sqlx::query_as(&format!("SELECT {PHYSICOCHEMICAL_COLUMNS} FROM physicochemical_analysis WHERE id = $1"))
            .bind(analysis_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "physicochemical analysis"))?;
        result.map(PhysicochemicalAnalysisDetailType::from).ok_or_else(|| ApplicationError::not_found("Physicochemical analysis"))
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn add_physicochemical(&self, transaction: &mut PgConnection, input: PhysicochemicalAnalysisInputType) -> Result<i64, ApplicationError> {
        let span = tracing::Span::current();
        let (id,): (i64,) = sqlx::query_as(ADD_PHYSICOCHEMICAL)
            .bind(input.analyst_id)
            .bind(input.drum_id)
            .bind(input.analysis_date)
            .bind(input.humidity)
            .bind(input.color)
            .bind(input.hydroxymethylfurfural)
            .bind(input.free_acidity)
            .bind(input.electrical_conductivity)
            .bind(input.observations)
            .fetch_one(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err))?;
        Ok(id)
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn update_physicochemical(&self, transaction: &mut PgConnection, analysis_id: i64, input: PhysicochemicalAnalysisInputType) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(UPDATE_PHYSICOCHEMICAL)
            .bind(input.analyst_id)
            .bind(input.drum_id)
            .bind(input.analysis_date)
            .bind(input.humidity)
            .bind(input.color)
            .bind(input.hydroxymethylfurfural)
            .bind(input.free_acidity)
            .bind(input.electrical_conductivity)
            .bind(input.observations)
            .bind(analysis_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err))?;
        check_single_row(&result, "Physicochemical analysis", analysis_id)
    }

    #[instrument(skip(self, transaction), fields(result))]
    pub async fn delete_physicochemical(&self, transaction: &mut PgConnection, analysis_id: i64) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(DELETE_PHYSICOCHEMICAL)
            .bind(analysis_id)
            .execute(transaction)
            .instrument(span)
            .await
            .map_err(|err| handle_delete_error(&err, "Physicochemical analysis"))?;
        check_single_row(&result, "Physicochemical analysis", analysis_id)
    }
}

/**
 * Narrows a validated grain count to the column type.
 */
fn grain_count(value: i64) -> Result<i32, ApplicationError> {
    i32::try_from(value).map_err(|_| ApplicationError::new(ErrorType::Validation, format!("Grain count {value} out of range")))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::analysis::SpecialMark;

    #[test]
    fn test_palynological_from_row() {
        let now = Utc::now();
        let analysis = PalynologicalAnalysisDetailType::from((1, 2, 3, 120, Some("##".to_string()), Some(Decimal::new(4550, 2)), now, now));
        assert_eq!(analysis.grain_count, 120);
        assert_eq!(analysis.special_mark, Some(SpecialMark::DoubleHash));
        assert_eq!(analysis.percentage, Some(Decimal::new(4550, 2)));
        let analysis = PalynologicalAnalysisDetailType::from((1, 2, 3, 0, None, None, now, now));
        assert_eq!(analysis.special_mark, None);
    }

    #[test]
    fn test_grain_count_narrowing() {
        assert_eq!(grain_count(42).unwrap(), 42);
        assert!(grain_count(i64::from(i32::MAX) + 1).is_err());
    }
}

#[cfg(feature = "integration-test")]
#[cfg(test)]
mod integration_test {
    use super::*;
    use crate::dao::laboratory::LaboratoryDao;
    use crate::dao::test_support::{add_test_analyst, add_test_sample, add_test_species, date, init_db};

    fn palynological(sample_id: i64, species_id: i64) -> PalynologicalAnalysisInputType {
        PalynologicalAnalysisInputType { sample_id, species_id, grain_count: 120, special_mark: Some("x".to_string()), percentage: Some(Decimal::new(4550, 2)) }
    }

    #[sqlx::test]
    async fn test_duplicate_sample_species_is_conflict() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let dao = AnalysisDao::new();
        let analyst_id = add_test_analyst(&mut transaction, "it-duplicate").await;
        let sample_id = add_test_sample(&mut transaction, analyst_id, date(2024, 3, 1)).await;
        let species_id = add_test_species(&mut transaction, "Prosopis it-duplicate").await;
        assert!(dao.add_palynological(&mut transaction, palynological(sample_id, species_id)).await.is_ok());
        let result = dao.add_palynological(&mut transaction, palynological(sample_id, species_id)).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::ConstraintViolation);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_sample_delete_cascades_analyses() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let dao = AnalysisDao::new();
        let analyst_id = add_test_analyst(&mut transaction, "it-cascade").await;
        let sample_id = add_test_sample(&mut transaction, analyst_id, date(2024, 3, 1)).await;
        let species_id = add_test_species(&mut transaction, "Salix it-cascade").await;
        let analysis_id = dao.add_palynological(&mut transaction, palynological(sample_id, species_id)).await.unwrap();
        LaboratoryDao::new().delete_sample(&mut transaction, sample_id).await.unwrap();
        let result = dao.get_palynological(&mut transaction, analysis_id).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::NotFound);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_species_delete_is_restricted() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let dao = AnalysisDao::new();
        let analyst_id = add_test_analyst(&mut transaction, "it-species").await;
        let sample_id = add_test_sample(&mut transaction, analyst_id, date(2024, 3, 1)).await;
        let species_id = add_test_species(&mut transaction, "Baccharis it-species").await;
        dao.add_palynological(&mut transaction, palynological(sample_id, species_id)).await.unwrap();
        let result = LaboratoryDao::new().delete_species(&mut transaction, species_id).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::ConstraintViolation);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_add_update_then_delete_physicochemical() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let dao = AnalysisDao::new();
        let analyst_id = add_test_analyst(&mut transaction, "it-physchem").await;
        let (drum_id,): (i64,) = sqlx::query_as("INSERT INTO drum (registration_number) VALUES ('IT-PC-D') RETURNING id").fetch_one(&mut *transaction).await.unwrap();
        let input = PhysicochemicalAnalysisInputType {
            analyst_id,
            drum_id,
            analysis_date: Some(date(2024, 3, 2)),
            humidity: Some(Decimal::new(1750, 2)),
            color: None,
            hydroxymethylfurfural: None,
            free_acidity: None,
            electrical_conductivity: None,
            observations: None,
        };
        let analysis_id = dao.add_physicochemical(&mut transaction, input.clone()).await.unwrap();
        let update = PhysicochemicalAnalysisInputType { humidity: Some(Decimal::new(1800, 2)), ..input };
        assert!(dao.update_physicochemical(&mut transaction, analysis_id, update).await.is_ok());
        let stored = dao.get_physicochemical(&mut transaction, analysis_id).await.unwrap();
        assert_eq!(stored.humidity, Some(Decimal::new(1800, 2)));
        assert!(dao.delete_physicochemical(&mut transaction, analysis_id).await.is_ok());
        transaction.rollback().await.unwrap();
    }
}
