use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    dao::{analysis::AnalysisDao, beekeeping::BeekeepingDao, laboratory::LaboratoryDao},
    model::{
        analysis::{
            PalynologicalAnalysisDetailType, PalynologicalAnalysisInputType, PalynologicalAnalysisWithRelationsType, PhysicochemicalAnalysisDetailType, PhysicochemicalAnalysisInputType,
            PhysicochemicalAnalysisWithRelationsType,
        },
        apperror::ApplicationError,
        beekeeping::DrumDetailType,
        models::{ListOutputType, PaginationInput},
    },
    service::{acquire, begin, finish},
};

/**
 * Service for palynological and physico-chemical analyses.
 */
pub struct AnalysisService {
    analysis_dao: AnalysisDao,
    laboratory_dao: LaboratoryDao,
    beekeeping_dao: BeekeepingDao,
    connection_pool: Option<Pool<Postgres>>,
}

impl AnalysisService {
    pub fn new(analysis_dao: AnalysisDao, laboratory_dao: LaboratoryDao, beekeeping_dao: BeekeepingDao, connection_pool: Option<Pool<Postgres>>) -> Self {
        AnalysisService { analysis_dao, laboratory_dao, beekeeping_dao, connection_pool }
    }

    /***************** Palynological analyses *********************/

    pub async fn get_palynological_list(&self, pagination_input: PaginationInput) -> Result<ListOutputType<PalynologicalAnalysisDetailType>, ApplicationError> {
        let mut connection = acquire(&self.connection_pool).await?;
        self.analysis_dao.get_palynological_list(&mut connection, pagination_input).await
    }

    /**
     * Get a palynological analysis with its sample and species embedded.
     */
    pub async fn get_palynological(&self, analysis_id: i64) -> Result<PalynologicalAnalysisWithRelationsType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            let analysis = self.analysis_dao.get_palynological(&mut transaction, analysis_id).await?;
            self.palynological_with_relations(&mut transaction, analysis).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn add_palynological(&self, input: PalynologicalAnalysisInputType) -> Result<PalynologicalAnalysisWithRelationsType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            let analysis_id = self.analysis_dao.add_palynological(&mut transaction, input).await?;
            let analysis = self.analysis_dao.get_palynological(&mut transaction, analysis_id).await?;
            self.palynological_with_relations(&mut transaction, analysis).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn update_palynological(&self, analysis_id: i64, input: PalynologicalAnalysisInputType) -> Result<PalynologicalAnalysisWithRelationsType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.analysis_dao.update_palynological(&mut transaction, analysis_id, input).await?;
            let analysis = self.analysis_dao.get_palynological(&mut transaction, analysis_id).await?;
            self.palynological_with_relations(&mut transaction, analysis).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn delete_palynological(&self, analysis_id: i64) -> Result<(), ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = self.analysis_dao.delete_palynological(&mut transaction, analysis_id).await;
        finish(transaction, result).await
    }

    pub async fn get_species_palynological(&self, species_id: i64) -> Result<Vec<PalynologicalAnalysisDetailType>, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.laboratory_dao.get_species(&mut transaction, species_id).await?;
            self.analysis_dao.get_palynological_by_species(&mut transaction, species_id).await
        }
        .await;
        finish(transaction, result).await
    }

    /**
     * Lists the palynological analyses of a sample in detail shape.
     */
    pub async fn get_sample_palynological(&self, sample_id: i64) -> Result<Vec<PalynologicalAnalysisWithRelationsType>, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            let sample = self.laboratory_dao.get_sample(&mut transaction, sample_id).await?;
            let analyses = self.analysis_dao.get_palynological_by_sample(&mut transaction, sample_id).await?;
            let mut details = Vec::with_capacity(analyses.len());
            for analysis in analyses {
                let species = self.laboratory_dao.get_species(&mut transaction, analysis.species_id).await?;
                details.push(PalynologicalAnalysisWithRelationsType { analysis, sample: sample.clone(), species });
            }
            Ok::<_, ApplicationError>(details)
        }
        .await;
        finish(transaction, result).await
    }

    /***************** Physico-chemical analyses *********************/

    pub async fn get_physicochemical_list(&self, pagination_input: PaginationInput) -> Result<ListOutputType<PhysicochemicalAnalysisDetailType>, ApplicationError> {
        let mut connection = acquire(&self.connection_pool).await?;
        self.analysis_dao.get_physicochemical_list(&mut connection, pagination_input).await
    }

    /**
     * Get a physico-chemical analysis with its analyst and drum embedded.
     */
    pub async fn get_physicochemical(&self, analysis_id: i64) -> Result<PhysicochemicalAnalysisWithRelationsType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = self.physicochemical_with_relations(&mut transaction, analysis_id).await;
        finish(transaction, result).await
    }

    pub async fn add_physicochemical(&self, input: PhysicochemicalAnalysisInputType) -> Result<PhysicochemicalAnalysisWithRelationsType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            let analysis_id = self.analysis_dao.add_physicochemical(&mut transaction, input).await?;
            self.physicochemical_with_relations(&mut transaction, analysis_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn update_physicochemical(&self, analysis_id: i64, input: PhysicochemicalAnalysisInputType) -> Result<PhysicochemicalAnalysisWithRelationsType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.analysis_dao.update_physicochemical(&mut transaction, analysis_id, input).await?;
            self.physicochemical_with_relations(&mut transaction, analysis_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn delete_physicochemical(&self, analysis_id: i64) -> Result<(), ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = self.analysis_dao.delete_physicochemical(&mut transaction, analysis_id).await;
        finish(transaction, result).await
    }

    /**
     * Get the drum a physico-chemical analysis was made on.
     */
    pub async fn get_physicochemical_drum(&self, analysis_id: i64) -> Result<DrumDetailType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            let analysis = self.analysis_dao.get_physicochemical(&mut transaction, analysis_id).await?;
            self.beekeeping_dao.get_drum(&mut transaction, analysis.drum_id).await
        }
        .await;
        finish(transaction, result).await
    }

    async fn palynological_with_relations(&self, connection: &mut PgConnection, analysis: PalynologicalAnalysisDetailType) -> Result<PalynologicalAnalysisWithRelationsType, ApplicationError> {
        let sample = self.laboratory_dao.get_sample(connection, analysis.sample_id).await?;
        let species = self.laboratory_dao.get_species(connection, analysis.species_id).await?;
        Ok(PalynologicalAnalysisWithRelationsType { analysis, sample, species })
    }

    async fn physicochemical_with_relations(&self, connection: &mut PgConnection, analysis_id: i64) -> Result<PhysicochemicalAnalysisWithRelationsType, ApplicationError> {
        let analysis = self.analysis_dao.get_physicochemical(connection, analysis_id).await?;
        let analyst = self.laboratory_dao.get_analyst(connection, analysis.analyst_id).await?;
        let drum = self.beekeeping_dao.get_drum(connection, analysis.drum_id).await?;
        Ok(PhysicochemicalAnalysisWithRelationsType { analysis, analyst, drum })
    }
}
