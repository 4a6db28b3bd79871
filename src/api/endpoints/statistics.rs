use actix_web::{
    HttpRequest, HttpResponse, get,
    web::{self, Path},
};
use chrono::Utc;
use tracing::{Instrument, instrument};

use crate::{
    api::{
        endpoints::get_trace_id,
        rest::statistics::{ApiaryStatisticsResponse, DashboardResponse, SampleStatisticsResponse, TopSpeciesResponse},
        state::AppState,
    },
    model::apperror::ApplicationError,
};

#[instrument(skip(http_request, app_state), fields(service = "getApiaryStatistics", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/apiaries/{apiaryId}/stats")]
pub async fn apiaries_stats(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let statistics = app_state.statistics_service.get_apiary_statistics(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ApiaryStatisticsResponse::from(statistics)))
}

#[instrument(skip(http_request, app_state), fields(service = "getSampleStatistics", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/samples/{sampleId}/stats")]
pub async fn samples_stats(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let statistics = app_state.statistics_service.get_sample_statistics(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(SampleStatisticsResponse::from(statistics)))
}

/**
 * Species ranked by number of palynological analyses.
 */
#[instrument(skip(http_request, app_state), fields(service = "topSpecies", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/species:top")]
pub async fn species_top(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let species = app_state.statistics_service.get_top_species().instrument(span).await?;
    Ok(HttpResponse::Ok().json(species.into_iter().map(TopSpeciesResponse::from).collect::<Vec<_>>()))
}

/**
 * Global dashboard. The clock is read once here and shared by every block.
 */
#[instrument(skip(http_request, app_state), fields(service = "dashboard", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/dashboard")]
pub async fn dashboard(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let dashboard = app_state.statistics_service.get_dashboard(Utc::now()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(DashboardResponse::from(dashboard)))
}
