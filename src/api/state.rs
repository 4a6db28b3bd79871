use crate::{
    api::security::JwtSecurityService,
    service::{analysis::AnalysisService, beekeeping::BeekeepingService, laboratory::LaboratoryService, statistics::StatisticsService},
};

/**
* Represents the application state shared across the Actix web application.
*/
pub struct AppState {
    /**
     * The JWT security service for handling authentication and authorization.
     */
    pub jwt_service: JwtSecurityService,
    /**
     * Beekeepers, apiaries and drums.
     */
    pub beekeeping_service: BeekeepingService,
    /**
     * Analysts, species, samples and pools.
     */
    pub laboratory_service: LaboratoryService,
    pub analysis_service: AnalysisService,
    /**
     * The aggregate reports.
     */
    pub statistics_service: StatisticsService,
}

impl AppState {
    /**
     * Creates a new instance of `AppState`.
     */
    pub fn new(
        jwt_service: JwtSecurityService,
        beekeeping_service: BeekeepingService,
        laboratory_service: LaboratoryService,
        analysis_service: AnalysisService,
        statistics_service: StatisticsService,
    ) -> Self {
        AppState { jwt_service, beekeeping_service, laboratory_service, analysis_service, statistics_service }
    }
}
