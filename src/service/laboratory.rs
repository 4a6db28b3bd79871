use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    dao::{beekeeping::BeekeepingDao, laboratory::LaboratoryDao},
    model::{
        apperror::ApplicationError,
        laboratory::{
            AnalystDetailType, AnalystInputType, PoolDetailType, PoolInputType, PoolMemberDetailType, PoolMemberInputType, PoolPatchType, PoolWithRelationsType, SampleDetailType,
            SampleDrumDetailType, SampleDrumInputType, SampleInputType, SamplePatchType, SampleWithRelationsType, SpeciesDetailType, SpeciesInputType,
        },
        models::{ListOutputType, PaginationInput},
    },
    service::{acquire, begin, finish},
};

/**
 * Service for analysts, species, samples and pools.
 */
pub struct LaboratoryService {
    laboratory_dao: LaboratoryDao,
    /**
     * Used to resolve drums associated with samples.
     */
    beekeeping_dao: BeekeepingDao,
    connection_pool: Option<Pool<Postgres>>,
}

impl LaboratoryService {
    pub fn new(laboratory_dao: LaboratoryDao, beekeeping_dao: BeekeepingDao, connection_pool: Option<Pool<Postgres>>) -> Self {
        LaboratoryService { laboratory_dao, beekeeping_dao, connection_pool }
    }

    /***************** Analysts *********************/

    pub async fn get_analyst_list(&self, pagination_input: PaginationInput) -> Result<ListOutputType<AnalystDetailType>, ApplicationError> {
        let mut connection = acquire(&self.connection_pool).await?;
        self.laboratory_dao.get_analyst_list(&mut connection, pagination_input).await
    }

    pub async fn get_analyst(&self, analyst_id: i64) -> Result<AnalystDetailType, ApplicationError> {
        let mut connection = acquire(&self.connection_pool).await?;
        self.laboratory_dao.get_analyst(&mut connection, analyst_id).await
    }

    pub async fn add_analyst(&self, input: AnalystInputType) -> Result<AnalystDetailType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            let analyst_id = self.laboratory_dao.add_analyst(&mut transaction, input).await?;
            self.laboratory_dao.get_analyst(&mut transaction, analyst_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn update_analyst(&self, analyst_id: i64, input: AnalystInputType) -> Result<AnalystDetailType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.laboratory_dao.update_analyst(&mut transaction, analyst_id, input).await?;
            self.laboratory_dao.get_analyst(&mut transaction, analyst_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn delete_analyst(&self, analyst_id: i64) -> Result<(), ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = self.laboratory_dao.delete_analyst(&mut transaction, analyst_id).await;
        finish(transaction, result).await
    }

    pub async fn get_analyst_samples(&self, analyst_id: i64) -> Result<Vec<SampleDetailType>, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.laboratory_dao.get_analyst(&mut transaction, analyst_id).await?;
            self.laboratory_dao.get_analyst_samples(&mut transaction, analyst_id).await
        }
        .await;
        finish(transaction, result).await
    }

    /***************** Species *********************/

    pub async fn get_species_list(&self, pagination_input: PaginationInput) -> Result<ListOutputType<SpeciesDetailType>, ApplicationError> {
        let mut connection = acquire(&self.connection_pool).await?;
        self.laboratory_dao.get_species_list(&mut connection, pagination_input).await
    }

    pub async fn get_species(&self, species_id: i64) -> Result<SpeciesDetailType, ApplicationError> {
        let mut connection = acquire(&self.connection_pool).await?;
        self.laboratory_dao.get_species(&mut connection, species_id).await
    }

    pub async fn add_species(&self, input: SpeciesInputType) -> Result<SpeciesDetailType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            let species_id = self.laboratory_dao.add_species(&mut transaction, input).await?;
            self.laboratory_dao.get_species(&mut transaction, species_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn update_species(&self, species_id: i64, input: SpeciesInputType) -> Result<SpeciesDetailType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.laboratory_dao.update_species(&mut transaction, species_id, input).await?;
            self.laboratory_dao.get_species(&mut transaction, species_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn delete_species(&self, species_id: i64) -> Result<(), ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = self.laboratory_dao.delete_species(&mut transaction, species_id).await;
        finish(transaction, result).await
    }

    /***************** Samples *********************/

    pub async fn get_sample_list(&self, pagination_input: PaginationInput) -> Result<ListOutputType<SampleDetailType>, ApplicationError> {
        let mut connection = acquire(&self.connection_pool).await?;
        self.laboratory_dao.get_sample_list(&mut connection, pagination_input).await
    }

    /**
     * Get a sample with its analyst and drums embedded.
     */
    pub async fn get_sample(&self, sample_id: i64) -> Result<SampleWithRelationsType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = self.sample_with_relations(&mut transaction, sample_id).await;
        finish(transaction, result).await
    }

    /**
     * Adds a sample. The input must already be validated, including the date ordering.
     *
     * # Returns
     * The stored sample with its relations.
     */
    pub async fn add_sample(&self, input: SampleInputType) -> Result<SampleWithRelationsType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            let sample_id = self.laboratory_dao.add_sample(&mut transaction, input).await?;
            self.sample_with_relations(&mut transaction, sample_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn update_sample(&self, sample_id: i64, input: SampleInputType) -> Result<SampleWithRelationsType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.laboratory_dao.update_sample(&mut transaction, sample_id, input).await?;
            self.sample_with_relations(&mut transaction, sample_id).await
        }
        .await;
        finish(transaction, result).await
    }

    /**
     * Applies a partial update. The stored row is locked, merged with the patch and the merged
     * values are validated again, so changing only one of the dates cannot break their ordering.
     */
    pub async fn patch_sample(&self, sample_id: i64, patch: SamplePatchType) -> Result<SampleWithRelationsType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            let current = self.laboratory_dao.get_sample_for_update(&mut transaction, sample_id).await?;
            let input = patch.apply(&current).validate()?;
            self.laboratory_dao.update_sample(&mut transaction, sample_id, input).await?;
            self.sample_with_relations(&mut transaction, sample_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn delete_sample(&self, sample_id: i64) -> Result<(), ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = self.laboratory_dao.delete_sample(&mut transaction, sample_id).await;
        finish(transaction, result).await
    }

    /**
     * Total number of samples.
     */
    pub async fn count_samples(&self) -> Result<i64, ApplicationError> {
        let mut connection = acquire(&self.connection_pool).await?;
        self.laboratory_dao.count_samples(&mut connection).await
    }

    pub async fn get_drum_samples(&self, drum_id: i64) -> Result<Vec<SampleDetailType>, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.beekeeping_dao.get_drum(&mut transaction, drum_id).await?;
            self.laboratory_dao.get_drum_samples(&mut transaction, drum_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn add_drum_to_sample(&self, sample_id: i64, input: SampleDrumInputType) -> Result<SampleDrumDetailType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.laboratory_dao.get_sample(&mut transaction, sample_id).await?;
            self.beekeeping_dao.get_drum(&mut transaction, input.drum_id).await?;
            self.laboratory_dao.add_drum_to_sample(&mut transaction, sample_id, input).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn remove_drum_from_sample(&self, sample_id: i64, drum_id: i64) -> Result<(), ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = self.laboratory_dao.remove_drum_from_sample(&mut transaction, sample_id, drum_id).await;
        finish(transaction, result).await
    }

    /***************** Pools *********************/

    pub async fn get_pool_list(&self, pagination_input: PaginationInput) -> Result<ListOutputType<PoolDetailType>, ApplicationError> {
        let mut connection = acquire(&self.connection_pool).await?;
        self.laboratory_dao.get_pool_list(&mut connection, pagination_input).await
    }

    pub async fn get_pool(&self, pool_id: i64) -> Result<PoolWithRelationsType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = self.pool_with_relations(&mut transaction, pool_id).await;
        finish(transaction, result).await
    }

    pub async fn add_pool(&self, input: PoolInputType) -> Result<PoolWithRelationsType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            let pool_id = self.laboratory_dao.add_pool(&mut transaction, input).await?;
            self.pool_with_relations(&mut transaction, pool_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn update_pool(&self, pool_id: i64, input: PoolInputType) -> Result<PoolWithRelationsType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.laboratory_dao.update_pool(&mut transaction, pool_id, input).await?;
            self.pool_with_relations(&mut transaction, pool_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn patch_pool(&self, pool_id: i64, patch: PoolPatchType) -> Result<PoolWithRelationsType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            let current = self.laboratory_dao.get_pool_for_update(&mut transaction, pool_id).await?;
            let input = patch.apply(&current).validate()?;
            self.laboratory_dao.update_pool(&mut transaction, pool_id, input).await?;
            self.pool_with_relations(&mut transaction, pool_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn delete_pool(&self, pool_id: i64) -> Result<(), ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = self.laboratory_dao.delete_pool(&mut transaction, pool_id).await;
        finish(transaction, result).await
    }

    pub async fn get_pool_members(&self, pool_id: i64) -> Result<Vec<PoolMemberDetailType>, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.laboratory_dao.get_pool(&mut transaction, pool_id).await?;
            self.laboratory_dao.get_pool_members(&mut transaction, pool_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn add_pool_member(&self, pool_id: i64, input: PoolMemberInputType) -> Result<PoolMemberDetailType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.laboratory_dao.get_pool(&mut transaction, pool_id).await?;
            self.laboratory_dao.add_pool_member(&mut transaction, pool_id, input).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn remove_pool_member(&self, pool_id: i64, member_id: i64) -> Result<(), ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = self.laboratory_dao.remove_pool_member(&mut transaction, pool_id, member_id).await;
        finish(transaction, result).await
    }

    async fn sample_with_relations(&self, connection: &mut PgConnection, sample_id: i64) -> Result<SampleWithRelationsType, ApplicationError> {
        let sample = self.laboratory_dao.get_sample(connection, sample_id).await?;
        let analyst = self.laboratory_dao.get_analyst(connection, sample.analyst_id).await?;
        let drums = self.laboratory_dao.get_sample_drums(connection, sample_id).await?;
        Ok(SampleWithRelationsType { sample, analyst, drums })
    }

    async fn pool_with_relations(&self, connection: &mut PgConnection, pool_id: i64) -> Result<PoolWithRelationsType, ApplicationError> {
        let pool = self.laboratory_dao.get_pool(connection, pool_id).await?;
        let analyst = self.laboratory_dao.get_analyst(connection, pool.analyst_id).await?;
        let members = self.laboratory_dao.get_pool_members(connection, pool_id).await?;
        Ok(PoolWithRelationsType { pool, analyst, members })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::apperror::ErrorType;

    #[tokio::test]
    async fn test_counter_without_pool() {
        let service = LaboratoryService::new(LaboratoryDao::new(), BeekeepingDao::new(), None);
        assert_eq!(service.count_samples().await.unwrap_err().error_type, ErrorType::DatabaseError);
        let result = service.patch_sample(1, SamplePatchType::default()).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::DatabaseError);
    }
}

#[cfg(feature = "integration-test")]
#[cfg(test)]
mod integration_test {
    use super::*;
    use crate::dao::test_support::{add_test_analyst, date, init_db};
    use crate::model::apperror::ErrorType;

    #[sqlx::test]
    async fn test_patch_rechecks_merged_dates() {
        let pool = init_db().await;
        let mut connection = pool.acquire().await.unwrap();
        let analyst_id = add_test_analyst(&mut connection, "it-patch-service").await;
        drop(connection);
        let service = LaboratoryService::new(LaboratoryDao::new(), BeekeepingDao::new(), Some(pool.clone()));
        let input = SampleInputType { analyst_id, extraction_date: date(2024, 1, 10), analysis_date: Some(date(2024, 1, 12)), registration_number: None, observations: None };
        let created = service.add_sample(input).await.unwrap();
        let patch = SamplePatchType { extraction_date: Some(date(2024, 1, 20)), ..SamplePatchType::default() };
        let error = service.patch_sample(created.sample.id, patch).await.unwrap_err();
        assert_eq!(error.error_type, ErrorType::Validation);
        assert!(error.field_errors.unwrap().contains_key("analysisDate"));
        let stored = service.get_sample(created.sample.id).await.unwrap();
        assert_eq!(stored.sample.extraction_date, date(2024, 1, 10));
        service.delete_sample(created.sample.id).await.unwrap();
        service.delete_analyst(analyst_id).await.unwrap();
    }
}
