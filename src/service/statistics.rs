use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    dao::statistics::StatisticsDao,
    model::{
        apperror::ApplicationError,
        statistics::{ApiaryStatisticsType, DashboardType, SampleStatisticsType, TOP_SPECIES_LIMIT, TopSpeciesType},
    },
    service::{acquire, begin, finish},
};

/**
 * Represents the service for the aggregate reports.
 */
pub struct StatisticsService {
    /**
     * The DAO for the aggregate queries.
     */
    statistics_dao: StatisticsDao,
    /**
     * Optional connection pool for database operations. Optional for test purposes until we have a better way to mock the database.
     */
    connection_pool: Option<Pool<Postgres>>,
}

impl StatisticsService {
    /**
     * Creates a new instance of `StatisticsService`.
     *
     * # Arguments
     * `statistics_dao`: The DAO for the aggregate queries.
     * `connection_pool`: Optional connection pool for database operations.
     */
    pub fn new(statistics_dao: StatisticsDao, connection_pool: Option<Pool<Postgres>>) -> Self {
        StatisticsService { statistics_dao, connection_pool }
    }

    pub async fn get_apiary_statistics(&self, apiary_id: i64) -> Result<ApiaryStatisticsType, ApplicationError> {
        let mut connection = acquire(&self.connection_pool).await?;
        self.statistics_dao.get_apiary_statistics(&mut connection, apiary_id).await
    }

    pub async fn get_sample_statistics(&self, sample_id: i64) -> Result<SampleStatisticsType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.statistics_dao.set_read_only(&mut transaction).await?;
            self.statistics_dao.get_sample_statistics(&mut transaction, sample_id).await
        }
        .await;
        finish(transaction, result).await
    }

    /**
     * Retrieves the ten species with the most palynological analyses.
     */
    pub async fn get_top_species(&self) -> Result<Vec<TopSpeciesType>, ApplicationError> {
        let mut connection = acquire(&self.connection_pool).await?;
        self.statistics_dao.get_top_species(&mut connection, TOP_SPECIES_LIMIT).await
    }

    /**
     * Builds the dashboard. Every block is read inside one read-only transaction and the recent
     * activity window ends at `now`.
     *
     * # Arguments
     * `now`: The instant captured once for the request.
     *
     * # Returns
     * A Result containing `DashboardType` or an `ApplicationError`.
     */
    pub async fn get_dashboard(&self, now: DateTime<Utc>) -> Result<DashboardType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.statistics_dao.set_read_only(&mut transaction).await?;
            self.dashboard(&mut transaction, now).await
        }
        .await;
        finish(transaction, result).await
    }

    async fn dashboard(&self, connection: &mut PgConnection, now: DateTime<Utc>) -> Result<DashboardType, ApplicationError> {
        let totals = self.statistics_dao.get_entity_totals(connection).await?;
        let samples_by_month = self.statistics_dao.get_samples_by_month(connection).await?;
        let species_by_analyses = self.statistics_dao.get_species_by_analyses(connection, TOP_SPECIES_LIMIT).await?;
        let humidity_by_apiary = self.statistics_dao.get_humidity_by_apiary(connection).await?;
        let recent_activity = self.statistics_dao.get_recent_activity(connection, now).await?;
        Ok(DashboardType { totals, samples_by_month, species_by_analyses, humidity_by_apiary, recent_activity })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::apperror::ErrorType;

    #[tokio::test]
    async fn test_dashboard_without_pool() {
        let service = StatisticsService::new(StatisticsDao::new(), None);
        let result = service.get_dashboard(Utc::now()).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::DatabaseError);
    }
}

#[cfg(feature = "integration-test")]
#[cfg(test)]
mod integration_test {
    use super::*;
    use crate::dao::test_support::init_db;

    #[sqlx::test]
    async fn test_dashboard_on_one_transaction() {
        let pool = init_db().await;
        let service = StatisticsService::new(StatisticsDao::new(), Some(pool));
        let now = Utc::now();
        let dashboard = service.get_dashboard(now).await.unwrap();
        assert_eq!(dashboard.recent_activity.since, now - chrono::Duration::days(30));
        assert!(dashboard.species_by_analyses.len() <= 10);
    }
}
