use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use tracing::{Instrument, instrument};

use crate::dao::handle_query_error;
use crate::model::{
    apperror::ApplicationError,
    statistics::{
        ApiaryHumidityType, ApiaryStatisticsType, EntityTotalsType, MonthlyCountType, RecentActivityType, SampleStatisticsType, SpeciesAnalysisCountType, SpeciesBreakdownType, TopSpeciesType,
        recent_activity_since,
    },
};

/**
 * Database response type for apiary statistics.
 */
pub type QueryApiaryStatisticsDbResp = (i64, String, i64, i64, i64, i64, Option<Decimal>, Option<Decimal>);

/**
 * Database response type for the per-species breakdown of a sample.
 */
pub type QuerySpeciesBreakdownDbResp = (String, i64, Option<Decimal>);

/**
 * Database response type for species ranked by total analyses.
 */
pub type QueryTopSpeciesDbResp = (i64, String, i64, i64);

/**
 * Database response type for the entity totals.
 */
pub type QueryEntityTotalsDbResp = (i64, i64, i64, i64, i64, i64, i64, i64, i64);

/**
 * Database response type for species ranked by analyses with their average grain count.
 */
pub type QuerySpeciesAnalysisCountDbResp = (i64, String, i64, Option<Decimal>);

/**
 * SQL query for the aggregates of one apiary. Samples and analyses are reached through the apiary's drums.
 */
const QUERY_APIARY_STATISTICS: &str = "SELECT a.id, a.name,
                                              (SELECT COUNT(*) FROM drum_apiary da WHERE da.apiary_id = a.id),
                                              (SELECT COUNT(DISTINCT sd.sample_id)
                                               FROM drum_apiary da JOIN sample_drum sd ON sd.drum_id = da.drum_id
                                               WHERE da.apiary_id = a.id),
                                              (SELECT COUNT(DISTINCT pa.id)
                                               FROM drum_apiary da
                                               JOIN sample_drum sd ON sd.drum_id = da.drum_id
                                               JOIN palynological_analysis pa ON pa.sample_id = sd.sample_id
                                               WHERE da.apiary_id = a.id),
                                              (SELECT COUNT(DISTINCT pa.species_id)
                                               FROM drum_apiary da
                                               JOIN sample_drum sd ON sd.drum_id = da.drum_id
                                               JOIN palynological_analysis pa ON pa.sample_id = sd.sample_id
                                               WHERE da.apiary_id = a.id),
                                              (SELECT ROUND(AVG(pc.humidity), 2)
                                               FROM drum_apiary da JOIN physicochemical_analysis pc ON pc.drum_id = da.drum_id
                                               WHERE da.apiary_id = a.id),
                                              (SELECT ROUND(AVG(pc.color), 2)
                                               FROM drum_apiary da JOIN physicochemical_analysis pc ON pc.drum_id = da.drum_id
                                               WHERE da.apiary_id = a.id)
                                       FROM apiary a
                                       WHERE a.id = $1";

const QUERY_SAMPLE_EXISTS: &str = "SELECT EXISTS (SELECT 1 FROM sample WHERE id = $1)";

const QUERY_SAMPLE_ANALYSIS_COUNT: &str = "SELECT COUNT(*) FROM palynological_analysis WHERE sample_id = $1";

const QUERY_SAMPLE_SPECIES_BREAKDOWN: &str = "SELECT s.scientific_name, COALESCE(SUM(pa.grain_count), 0)::BIGINT, ROUND(AVG(pa.percentage), 2)
                                              FROM palynological_analysis pa
                                              JOIN species s ON s.id = pa.species_id
                                              WHERE pa.sample_id = $1
                                              GROUP BY s.scientific_name
                                              ORDER BY s.scientific_name";

/**
 * Species ordered by number of analyses. Ties go to the species with more grains, then by name.
 */
const QUERY_TOP_SPECIES: &str = "SELECT s.id, s.scientific_name, COUNT(pa.id), COALESCE(SUM(pa.grain_count), 0)::BIGINT AS total_grains
                                 FROM species s
                                 JOIN palynological_analysis pa ON pa.species_id = s.id
                                 GROUP BY s.id, s.scientific_name
                                 ORDER BY COUNT(pa.id) DESC, total_grains DESC, s.scientific_name
                                 LIMIT $1";

const QUERY_ENTITY_TOTALS: &str = "SELECT (SELECT COUNT(*) FROM beekeeper),
                                          (SELECT COUNT(*) FROM analyst),
                                          (SELECT COUNT(*) FROM apiary),
                                          (SELECT COUNT(*) FROM drum),
                                          (SELECT COUNT(*) FROM species),
                                          (SELECT COUNT(*) FROM sample),
                                          (SELECT COUNT(*) FROM pool),
                                          (SELECT COUNT(*) FROM palynological_analysis),
                                          (SELECT COUNT(*) FROM physicochemical_analysis)";

const QUERY_SAMPLES_BY_MONTH: &str = "SELECT date_trunc('month', extraction_date)::date AS month, COUNT(*)
                                      FROM sample
                                      GROUP BY month
                                      ORDER BY month";

const QUERY_SPECIES_BY_ANALYSES: &str = "SELECT s.id, s.scientific_name, COUNT(pa.id), ROUND(AVG(pa.grain_count), 2)
                                         FROM species s
                                         JOIN palynological_analysis pa ON pa.species_id = s.id
                                         GROUP BY s.id, s.scientific_name
                                         ORDER BY COUNT(pa.id) DESC, s.scientific_name
                                         LIMIT $1";

const QUERY_HUMIDITY_BY_APIARY: &str = "SELECT a.id, a.name, ROUND(AVG(pc.humidity), 2) AS average_humidity
                                        FROM apiary a
                                        JOIN drum_apiary da ON da.apiary_id = a.id
                                        JOIN physicochemical_analysis pc ON pc.drum_id = da.drum_id
                                        WHERE pc.humidity IS NOT NULL
                                        GROUP BY a.id, a.name
                                        ORDER BY average_humidity DESC, a.id";

const QUERY_RECENT_ACTIVITY: &str = "SELECT (SELECT COUNT(*) FROM sample WHERE created_at >= $1),
                                            (SELECT COUNT(*) FROM palynological_analysis WHERE created_at >= $1),
                                            (SELECT COUNT(*) FROM physicochemical_analysis WHERE created_at >= $1)";

const SET_READ_ONLY: &str = "SET TRANSACTION READ ONLY";

impl From<QueryApiaryStatisticsDbResp> for ApiaryStatisticsType {
    fn from(row: QueryApiaryStatisticsDbResp) -> Self {
        ApiaryStatisticsType {
            apiary_id: row.0,
            apiary_name: row.1,
            total_drums: row.2,
            total_samples: row.3,
            total_analyses: row.4,
            total_species: row.5,
            average_humidity: row.6,
            average_color: row.7,
        }
    }
}

impl From<QueryEntityTotalsDbResp> for EntityTotalsType {
    fn from(row: QueryEntityTotalsDbResp) -> Self {
        EntityTotalsType {
            beekeepers: row.0,
            analysts: row.1,
            apiaries: row.2,
            drums: row.3,
            species: row.4,
            samples: row.5,
            pools: row.6,
            palynological_analyses: row.7,
            physicochemical_analyses: row.8,
        }
    }
}

/**
 * Read-only aggregate queries. All of them tolerate empty tables.
 */
pub struct StatisticsDao {}

impl StatisticsDao {
    /**
     * Creates a new instance of `StatisticsDao`.
     */
    pub fn new() -> Self {
        StatisticsDao {}
    }

    /**
     * Marks the current transaction read-only. Must be the first statement of the transaction.
     */
    #[instrument(skip(self, transaction))]
    pub async fn set_read_only(&self, transaction: &mut PgConnection) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        sqlx::query(SET_READ_ONLY).execute(transaction).instrument(span).await.map_err(|err| handle_query_error(&err, "read only transaction"))?;
        Ok(())
    }

    /**
     * Get the aggregates of one apiary.
     *
     * # Arguments
     * `connection`: Connection or transaction to run on.
     * `apiary_id`: The apiary.
     *
     * # Returns
     * The statistics, or not found if the apiary does not exist.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_apiary_statistics(&self, connection: &mut PgConnection, apiary_id: i64) -> Result<ApiaryStatisticsType, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<QueryApiaryStatisticsDbResp> = sqlx::query_as(QUERY_APIARY_STATISTICS)
            .bind(apiary_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "apiary statistics"))?;
        result.map(ApiaryStatisticsType::from).ok_or_else(|| ApplicationError::not_found("Apiary"))
    }

    /**
     * Get the analysis count and the per-species breakdown of one sample.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_sample_statistics(&self, connection: &mut PgConnection, sample_id: i64) -> Result<SampleStatisticsType, ApplicationError> {
        let span = tracing::Span::current();
        let (exists,): (bool,) = sqlx::query_as(QUERY_SAMPLE_EXISTS)
            .bind(sample_id)
            .fetch_one(&mut *connection)
            .instrument(span.clone())
            .await
            .map_err(|err| handle_query_error(&err, "sample"))?;
        if !exists {
            return Err(ApplicationError::not_found("Sample"));
        }
        let (total_analyses,): (i64,) = sqlx::query_as(QUERY_SAMPLE_ANALYSIS_COUNT)
            .bind(sample_id)
            .fetch_one(&mut *connection)
            .instrument(span.clone())
            .await
            .map_err(|err| handle_query_error(&err, "sample analysis count"))?;
        let rows: Vec<QuerySpeciesBreakdownDbResp> = sqlx::query_as(QUERY_SAMPLE_SPECIES_BREAKDOWN)
            .bind(sample_id)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "sample species breakdown"))?;
        let species = rows.into_iter().map(|row| SpeciesBreakdownType { scientific_name: row.0, total_grains: row.1, average_percentage: row.2 }).collect();
        Ok(SampleStatisticsType { sample_id, total_analyses, species })
    }

    /**
     * Get the species with the most palynological analyses.
     *
     * # Arguments
     * `limit`: Maximum number of species returned.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_top_species(&self, connection: &mut PgConnection, limit: i64) -> Result<Vec<TopSpeciesType>, ApplicationError> {
        let span = tracing::Span::current();
        let rows: Vec<QueryTopSpeciesDbResp> = sqlx::query_as(QUERY_TOP_SPECIES)
            .bind(limit)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "top species"))?;
        Ok(rows.into_iter().map(|row| TopSpeciesType { species_id: row.0, scientific_name: row.1, total_analyses: row.2, total_grains: row.3 }).collect())
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_entity_totals(&self, connection: &mut PgConnection) -> Result<EntityTotalsType, ApplicationError> {
        let span = tracing::Span::current();
        let row: QueryEntityTotalsDbResp = sqlx::query_as(QUERY_ENTITY_TOTALS).fetch_one(connection).instrument(span).await.map_err(|err| handle_query_error(&err, "entity totals"))?;
        Ok(EntityTotalsType::from(row))
    }

    /**
     * Sample counts per month of extraction, oldest month first.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_samples_by_month(&self, connection: &mut PgConnection) -> Result<Vec<MonthlyCountType>, ApplicationError> {
        let span = tracing::Span::current();
        let rows: Vec<(NaiveDate, i64)> = sqlx::query_as(QUERY_SAMPLES_BY_MONTH).fetch_all(connection).instrument(span).await.map_err(|err| handle_query_error(&err, "samples by month"))?;
        Ok(rows.into_iter().map(|(month, total)| MonthlyCountType { month, total }).collect())
    }

    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_species_by_analyses(&self, connection: &mut PgConnection, limit: i64) -> Result<Vec<SpeciesAnalysisCountType>, ApplicationError> {
        let span = tracing::Span::current();
        let rows: Vec<QuerySpeciesAnalysisCountDbResp> = sqlx::query_as(QUERY_SPECIES_BY_ANALYSES)
            .bind(limit)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "species by analyses"))?;
        Ok(rows.into_iter().map(|row| SpeciesAnalysisCountType { species_id: row.0, scientific_name: row.1, total_analyses: row.2, average_grains: row.3 }).collect())
    }

    /**
     * Apiaries ordered by the average humidity measured on their drums, most humid first.
     * Apiaries without humidity measurements are left out.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_humidity_by_apiary(&self, connection: &mut PgConnection) -> Result<Vec<ApiaryHumidityType>, ApplicationError> {
        let span = tracing::Span::current();
        let rows: Vec<(i64, String, Decimal)> = sqlx::query_as(QUERY_HUMIDITY_BY_APIARY).fetch_all(connection).instrument(span).await.map_err(|err| handle_query_error(&err, "humidity by apiary"))?;
        Ok(rows.into_iter().map(|(apiary_id, apiary_name, average_humidity)| ApiaryHumidityType { apiary_id, apiary_name, average_humidity }).collect())
    }

    /**
     * Counts rows created within the trailing window ending at `now`.
     *
     * # Arguments
     * `now`: The instant captured for the request.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_recent_activity(&self, connection: &mut PgConnection, now: DateTime<Utc>) -> Result<RecentActivityType, ApplicationError> {
        let span = tracing::Span::current();
        let since = recent_activity_since(now);
        let (samples, palynological_analyses, physicochemical_analyses): (i64, i64, i64) = sqlx::query_as(QUERY_RECENT_ACTIVITY)
            .bind(since)
            .fetch_one(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_query_error(&err, "recent activity"))?;
        Ok(RecentActivityType { since, samples, palynological_analyses, physicochemical_analyses })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_entity_totals_from_row() {
        let totals = EntityTotalsType::from((1, 2, 3, 4, 5, 6, 7, 8, 9));
        assert_eq!(totals.beekeepers, 1);
        assert_eq!(totals.samples, 6);
        assert_eq!(totals.physicochemical_analyses, 9);
    }

    #[test]
    fn test_apiary_statistics_without_measurements() {
        let statistics = ApiaryStatisticsType::from((3, "A1".to_string(), 0, 0, 0, 0, None, None));
        assert_eq!(statistics.apiary_id, 3);
        assert_eq!(statistics.total_drums, 0);
        assert!(statistics.average_humidity.is_none());
    }
}

#[cfg(feature = "integration-test")]
#[cfg(test)]
mod integration_test {
    use super::*;
    use crate::dao::test_support::{add_test_analyst, add_test_sample, add_test_species, date, init_db};
    use crate::model::{apperror::ErrorType, statistics::TOP_SPECIES_LIMIT};

    async fn add_analysis(connection: &mut PgConnection, sample_id: i64, species_id: i64, grain_count: i32) {
        sqlx::query("INSERT INTO palynological_analysis (sample_id, species_id, grain_count) VALUES ($1, $2, $3)")
            .bind(sample_id)
            .bind(species_id)
            .bind(grain_count)
            .execute(connection)
            .await
            .unwrap();
    }

    async fn add_apiary(connection: &mut PgConnection, name: &str) -> i64 {
        let (beekeeper_id,): (i64,) = sqlx::query_as("INSERT INTO beekeeper (names, surnames) VALUES ('Test', 'Beekeeper') RETURNING id").fetch_one(&mut *connection).await.unwrap();
        let (id,): (i64,) = sqlx::query_as("INSERT INTO apiary (beekeeper_id, name) VALUES ($1, $2) RETURNING id").bind(beekeeper_id).bind(name).fetch_one(connection).await.unwrap();
        id
    }

    async fn add_drum(connection: &mut PgConnection, apiary_id: i64, registration_number: &str) -> i64 {
        let (id,): (i64,) = sqlx::query_as("INSERT INTO drum (registration_number) VALUES ($1) RETURNING id").bind(registration_number).fetch_one(&mut *connection).await.unwrap();
        sqlx::query("INSERT INTO drum_apiary (drum_id, apiary_id) VALUES ($1, $2)").bind(id).bind(apiary_id).execute(connection).await.unwrap();
        id
    }

    async fn add_measurement(connection: &mut PgConnection, analyst_id: i64, drum_id: i64, humidity: Option<Decimal>, color: Option<Decimal>) {
        sqlx::query("INSERT INTO physicochemical_analysis (analyst_id, drum_id, humidity, color) VALUES ($1, $2, $3, $4)")
            .bind(analyst_id)
            .bind(drum_id)
            .bind(humidity)
            .bind(color)
            .execute(connection)
            .await
            .unwrap();
    }

    #[sqlx::test]
    async fn test_apiary_statistics_count_shared_sample_once() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let dao = StatisticsDao::new();
        let analyst_id = add_test_analyst(&mut transaction, "it-apiary-stats").await;
        let apiary_id = add_apiary(&mut transaction, "Apiario it-apiary-stats").await;
        let first_drum = add_drum(&mut transaction, apiary_id, "IT-AS-001").await;
        let second_drum = add_drum(&mut transaction, apiary_id, "IT-AS-002").await;
        let sample_id = add_test_sample(&mut transaction, analyst_id, date(2024, 4, 1)).await;
        for drum_id in [first_drum, second_drum] {
            sqlx::query("INSERT INTO sample_drum (sample_id, drum_id) VALUES ($1, $2)").bind(sample_id).bind(drum_id).execute(&mut *transaction).await.unwrap();
        }
        let species_id = add_test_species(&mut transaction, "Prosopis it-apiary-stats").await;
        add_analysis(&mut transaction, sample_id, species_id, 40).await;
        add_measurement(&mut transaction, analyst_id, first_drum, Some(Decimal::new(1750, 2)), Some(Decimal::new(80, 0))).await;
        add_measurement(&mut transaction, analyst_id, second_drum, Some(Decimal::new(1850, 2)), None).await;

        let statistics = dao.get_apiary_statistics(&mut transaction, apiary_id).await.unwrap();
        assert_eq!(statistics.total_drums, 2);
        assert_eq!(statistics.total_samples, 1);
        assert_eq!(statistics.total_analyses, 1);
        assert_eq!(statistics.total_species, 1);
        assert_eq!(statistics.average_humidity, Some(Decimal::new(1800, 2)));
        assert_eq!(statistics.average_color, Some(Decimal::new(8000, 2)));
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_humidity_ranking_descending() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let dao = StatisticsDao::new();
        let analyst_id = add_test_analyst(&mut transaction, "it-humidity").await;
        let dry_apiary = add_apiary(&mut transaction, "Seco it-humidity").await;
        let humid_apiary = add_apiary(&mut transaction, "Humedo it-humidity").await;
        let unmeasured_apiary = add_apiary(&mut transaction, "Sin datos it-humidity").await;
        let dry_drum = add_drum(&mut transaction, dry_apiary, "IT-HU-001").await;
        let humid_drum = add_drum(&mut transaction, humid_apiary, "IT-HU-002").await;
        let unmeasured_drum = add_drum(&mut transaction, unmeasured_apiary, "IT-HU-003").await;
        add_measurement(&mut transaction, analyst_id, dry_drum, Some(Decimal::new(1600, 2)), None).await;
        add_measurement(&mut transaction, analyst_id, dry_drum, None, Some(Decimal::new(50, 0))).await;
        add_measurement(&mut transaction, analyst_id, humid_drum, Some(Decimal::new(1900, 2)), None).await;
        add_measurement(&mut transaction, analyst_id, unmeasured_drum, None, Some(Decimal::new(30, 0))).await;

        let ranking = dao.get_humidity_by_apiary(&mut transaction).await.unwrap();
        let humid_rank = ranking.iter().position(|apiary| apiary.apiary_id == humid_apiary).unwrap();
        let dry_rank = ranking.iter().position(|apiary| apiary.apiary_id == dry_apiary).unwrap();
        assert!(humid_rank < dry_rank);
        assert_eq!(ranking[dry_rank].average_humidity, Decimal::new(1600, 2));
        assert!(ranking.iter().all(|apiary| apiary.apiary_id != unmeasured_apiary));
        assert!(ranking.windows(2).all(|pair| pair[0].average_humidity >= pair[1].average_humidity));
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_dashboard_counts_sample_in_month() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let dao = StatisticsDao::new();
        let analyst_id = add_test_analyst(&mut transaction, "it-dashboard").await;
        add_test_sample(&mut transaction, analyst_id, date(2024, 1, 10)).await;
        let totals = dao.get_entity_totals(&mut transaction).await.unwrap();
        assert!(totals.samples >= 1);
        let months = dao.get_samples_by_month(&mut transaction).await.unwrap();
        let january = months.iter().find(|month| month.month == date(2024, 1, 1)).unwrap();
        assert!(january.total >= 1);
        assert!(months.windows(2).all(|pair| pair[0].month < pair[1].month));
        let recent = dao.get_recent_activity(&mut transaction, Utc::now()).await.unwrap();
        assert!(recent.samples >= 1);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_top_species_ranking() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let dao = StatisticsDao::new();
        let analyst_id = add_test_analyst(&mut transaction, "it-top").await;
        let first_sample = add_test_sample(&mut transaction, analyst_id, date(2024, 2, 1)).await;
        let second_sample = add_test_sample(&mut transaction, analyst_id, date(2024, 2, 2)).await;
        let frequent = add_test_species(&mut transaction, "Eucalyptus it-top").await;
        let rare = add_test_species(&mut transaction, "Trifolium it-top").await;
        add_analysis(&mut transaction, first_sample, frequent, 200).await;
        add_analysis(&mut transaction, second_sample, frequent, 10).await;
        add_analysis(&mut transaction, first_sample, rare, 50).await;
        let ranking = dao.get_top_species(&mut transaction, i64::MAX).await.unwrap();
        let frequent_rank = ranking.iter().position(|species| species.species_id == frequent).unwrap();
        let rare_rank = ranking.iter().position(|species| species.species_id == rare).unwrap();
        assert!(frequent_rank < rare_rank);
        assert_eq!(ranking[frequent_rank].total_grains, 210);
        assert!(dao.get_top_species(&mut transaction, TOP_SPECIES_LIMIT).await.unwrap().len() <= 10);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_sample_statistics() {
        let pool = init_db().await;
        let mut transaction = pool.begin().await.unwrap();
        let dao = StatisticsDao::new();
        let analyst_id = add_test_analyst(&mut transaction, "it-sample-stats").await;
        let sample_id = add_test_sample(&mut transaction, analyst_id, date(2024, 2, 1)).await;
        let empty = dao.get_sample_statistics(&mut transaction, sample_id).await.unwrap();
        assert_eq!(empty.total_analyses, 0);
        assert!(empty.species.is_empty());
        let species_id = add_test_species(&mut transaction, "Brassica it-sample-stats").await;
        add_analysis(&mut transaction, sample_id, species_id, 80).await;
        let statistics = dao.get_sample_statistics(&mut transaction, sample_id).await.unwrap();
        assert_eq!(statistics.total_analyses, 1);
        assert_eq!(statistics.species[0].total_grains, 80);
        let missing = dao.get_sample_statistics(&mut transaction, -1).await;
        assert_eq!(missing.unwrap_err().error_type, ErrorType::NotFound);
        transaction.rollback().await.unwrap();
    }

    #[sqlx::test]
    async fn test_unknown_apiary_statistics() {
        let pool = init_db().await;
        let mut connection = pool.acquire().await.unwrap();
        let result = StatisticsDao::new().get_apiary_statistics(&mut connection, -1).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::NotFound);
    }
}
