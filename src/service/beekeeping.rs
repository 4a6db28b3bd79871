use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    dao::beekeeping::BeekeepingDao,
    model::{
        apperror::ApplicationError,
        beekeeping::{
            ApiaryDetailType, ApiaryInputType, ApiaryWithBeekeeperType, BeekeeperDetailType, BeekeeperInputType, DrumApiaryDetailType, DrumApiaryInputType, DrumDetailType, DrumInputType,
            DrumWithApiariesType,
        },
        models::{ListOutputType, PaginationInput},
    },
    service::{acquire, begin, finish},
};

/**
 * Service for beekeepers, apiaries and drums.
 */
pub struct BeekeepingService {
    beekeeping_dao: BeekeepingDao,
    /**
     * Optional connection pool. Services without a pool answer every call with a database error.
     */
    connection_pool: Option<Pool<Postgres>>,
}

impl BeekeepingService {
    pub fn new(beekeeping_dao: BeekeepingDao, connection_pool: Option<Pool<Postgres>>) -> Self {
        BeekeepingService { beekeeping_dao, connection_pool }
    }

    /***************** Beekeepers *********************/

    pub async fn get_beekeeper_list(&self, pagination_input: PaginationInput) -> Result<ListOutputType<BeekeeperDetailType>, ApplicationError> {
        let mut connection = acquire(&self.connection_pool).await?;
        self.beekeeping_dao.get_beekeeper_list(&mut connection, pagination_input).await
    }

    pub async fn get_beekeeper(&self, beekeeper_id: i64) -> Result<BeekeeperDetailType, ApplicationError> {
        let mut connection = acquire(&self.connection_pool).await?;
        self.beekeeping_dao.get_beekeeper(&mut connection, beekeeper_id).await
    }

    /**
     * Adds a beekeeper.
     *
     * # Returns
     * The stored beekeeper.
     */
    pub async fn add_beekeeper(&self, input: BeekeeperInputType) -> Result<BeekeeperDetailType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            let beekeeper_id = self.beekeeping_dao.add_beekeeper(&mut transaction, input).await?;
            self.beekeeping_dao.get_beekeeper(&mut transaction, beekeeper_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn update_beekeeper(&self, beekeeper_id: i64, input: BeekeeperInputType) -> Result<BeekeeperDetailType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.beekeeping_dao.update_beekeeper(&mut transaction, beekeeper_id, input).await?;
            self.beekeeping_dao.get_beekeeper(&mut transaction, beekeeper_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn delete_beekeeper(&self, beekeeper_id: i64) -> Result<(), ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = self.beekeeping_dao.delete_beekeeper(&mut transaction, beekeeper_id).await;
        finish(transaction, result).await
    }

    /**
     * Lists the apiaries of a beekeeper. Unknown beekeepers are reported as not found.
     */
    pub async fn get_beekeeper_apiaries(&self, beekeeper_id: i64) -> Result<Vec<ApiaryDetailType>, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.beekeeping_dao.get_beekeeper(&mut transaction, beekeeper_id).await?;
            self.beekeeping_dao.get_beekeeper_apiaries(&mut transaction, beekeeper_id).await
        }
        .await;
        finish(transaction, result).await
    }

    /***************** Apiaries *********************/

    pub async fn get_apiary_list(&self, pagination_input: PaginationInput) -> Result<ListOutputType<ApiaryDetailType>, ApplicationError> {
        let mut connection = acquire(&self.connection_pool).await?;
        self.beekeeping_dao.get_apiary_list(&mut connection, pagination_input).await
    }

    /**
     * Get an apiary with its beekeeper embedded.
     */
    pub async fn get_apiary(&self, apiary_id: i64) -> Result<ApiaryWithBeekeeperType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = self.apiary_with_beekeeper(&mut transaction, apiary_id).await;
        finish(transaction, result).await
    }

    pub async fn add_apiary(&self, input: ApiaryInputType) -> Result<ApiaryWithBeekeeperType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            let apiary_id = self.beekeeping_dao.add_apiary(&mut transaction, input).await?;
            self.apiary_with_beekeeper(&mut transaction, apiary_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn update_apiary(&self, apiary_id: i64, input: ApiaryInputType) -> Result<ApiaryWithBeekeeperType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.beekeeping_dao.update_apiary(&mut transaction, apiary_id, input).await?;
            self.apiary_with_beekeeper(&mut transaction, apiary_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn delete_apiary(&self, apiary_id: i64) -> Result<(), ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = self.beekeeping_dao.delete_apiary(&mut transaction, apiary_id).await;
        finish(transaction, result).await
    }

    pub async fn get_apiary_drums(&self, apiary_id: i64) -> Result<Vec<DrumDetailType>, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.beekeeping_dao.get_apiary(&mut transaction, apiary_id).await?;
            self.beekeeping_dao.get_apiary_drums(&mut transaction, apiary_id).await
        }
        .await;
        finish(transaction, result).await
    }

    /**
     * Associates a drum with an apiary.
     *
     * # Returns
     * The association, or not found when either side does not exist.
     */
    pub async fn add_drum_to_apiary(&self, apiary_id: i64, input: DrumApiaryInputType) -> Result<DrumApiaryDetailType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.beekeeping_dao.get_apiary(&mut transaction, apiary_id).await?;
            self.beekeeping_dao.get_drum(&mut transaction, input.drum_id).await?;
            self.beekeeping_dao.add_drum_to_apiary(&mut transaction, apiary_id, input).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn remove_drum_from_apiary(&self, apiary_id: i64, drum_id: i64) -> Result<(), ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = self.beekeeping_dao.remove_drum_from_apiary(&mut transaction, apiary_id, drum_id).await;
        finish(transaction, result).await
    }

    /***************** Drums *********************/

    pub async fn get_drum_list(&self, pagination_input: PaginationInput) -> Result<ListOutputType<DrumDetailType>, ApplicationError> {
        let mut connection = acquire(&self.connection_pool).await?;
        self.beekeeping_dao.get_drum_list(&mut connection, pagination_input).await
    }

    /**
     * Get a drum with the apiaries it is associated with.
     */
    pub async fn get_drum(&self, drum_id: i64) -> Result<DrumWithApiariesType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = self.drum_with_apiaries(&mut transaction, drum_id).await;
        finish(transaction, result).await
    }

    pub async fn add_drum(&self, input: DrumInputType) -> Result<DrumWithApiariesType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            let drum_id = self.beekeeping_dao.add_drum(&mut transaction, input).await?;
            self.drum_with_apiaries(&mut transaction, drum_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn update_drum(&self, drum_id: i64, input: DrumInputType) -> Result<DrumWithApiariesType, ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = async {
            self.beekeeping_dao.update_drum(&mut transaction, drum_id, input).await?;
            self.drum_with_apiaries(&mut transaction, drum_id).await
        }
        .await;
        finish(transaction, result).await
    }

    pub async fn delete_drum(&self, drum_id: i64) -> Result<(), ApplicationError> {
        let mut transaction = begin(&self.connection_pool).await?;
        let result = self.beekeeping_dao.delete_drum(&mut transaction, drum_id).await;
        finish(transaction, result).await
    }

    async fn apiary_with_beekeeper(&self, connection: &mut PgConnection, apiary_id: i64) -> Result<ApiaryWithBeekeeperType, ApplicationError> {
        let apiary = self.beekeeping_dao.get_apiary(connection, apiary_id).await?;
        let beekeeper = self.beekeeping_dao.get_beekeeper(connection, apiary.beekeeper_id).await?;
        Ok(ApiaryWithBeekeeperType { apiary, beekeeper })
    }

    async fn drum_with_apiaries(&self, connection: &mut PgConnection, drum_id: i64) -> Result<DrumWithApiariesType, ApplicationError> {
        let drum = self.beekeeping_dao.get_drum(connection, drum_id).await?;
        let apiaries = self.beekeeping_dao.get_drum_apiaries(connection, drum_id).await?;
        Ok(DrumWithApiariesType { drum, apiaries })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::apperror::ErrorType;

    #[tokio::test]
    async fn test_service_without_pool() {
        let service = BeekeepingService::new(BeekeepingDao::new(), None);
        let result = service.get_beekeeper_list(PaginationInput::new(None, None)).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::DatabaseError);
        let result = service.add_drum(DrumInputType { registration_number: "D-1".to_string(), extraction_date: None }).await;
        assert_eq!(result.unwrap_err().error_type, ErrorType::DatabaseError);
    }
}
