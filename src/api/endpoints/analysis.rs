use actix_web::{
    HttpRequest, HttpResponse, delete, get, post, put,
    web::{self, Path},
};
use tracing::{Instrument, instrument};

use crate::{
    api::{
        endpoints::get_trace_id,
        rest::{
            ListResponse, PaginationQuery,
            analysis::{
                PalynologicalAnalysisDetailResponse, PalynologicalAnalysisRequest, PalynologicalAnalysisResponse, PhysicochemicalAnalysisDetailResponse, PhysicochemicalAnalysisRequest,
                PhysicochemicalAnalysisResponse,
            },
            beekeeping::DrumResponse,
        },
        state::AppState,
    },
    model::{
        analysis::{PalynologicalAnalysisInputType, PhysicochemicalAnalysisInputType},
        apperror::ApplicationError,
        models::PaginationInput,
    },
};

/***************** Palynological analyses *********************/

#[instrument(skip(http_request, app_state), fields(service = "listPalynologicalAnalyses", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/palynological-analyses")]
pub async fn palynological_list(http_request: HttpRequest, pagination: web::Query<PaginationQuery>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let pagination_input = PaginationInput::from(pagination).validate()?;
    let output = app_state.analysis_service.get_palynological_list(pagination_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<PalynologicalAnalysisResponse>::from(output)))
}

#[instrument(skip(http_request, app_state), fields(service = "getPalynologicalAnalysis", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/palynological-analyses/{analysisId}")]
pub async fn palynological_get(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let analysis = app_state.analysis_service.get_palynological(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(PalynologicalAnalysisDetailResponse::from(analysis)))
}

#[instrument(skip(http_request, app_state), fields(service = "addPalynologicalAnalysis", trace_id = get_trace_id(&http_request), result))]
#[post("/api/services/v1_0/palynological-analyses")]
pub async fn palynological_add(http_request: HttpRequest, request_body: web::Json<PalynologicalAnalysisRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = PalynologicalAnalysisInputType::try_from(request_body)?.validate()?;
    let analysis = app_state.analysis_service.add_palynological(input).instrument(span).await?;
    Ok(HttpResponse::Created().json(PalynologicalAnalysisDetailResponse::from(analysis)))
}

#[instrument(skip(http_request, app_state), fields(service = "updatePalynologicalAnalysis", trace_id = get_trace_id(&http_request), result))]
#[put("/api/services/v1_0/palynological-analyses/{analysisId}")]
pub async fn palynological_update(
    path: Path<i64>,
    http_request: HttpRequest,
    request_body: web::Json<PalynologicalAnalysisRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = PalynologicalAnalysisInputType::try_from(request_body)?.validate()?;
    let analysis = app_state.analysis_service.update_palynological(path.into_inner(), input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(PalynologicalAnalysisDetailResponse::from(analysis)))
}

#[instrument(skip(http_request, app_state), fields(service = "deletePalynologicalAnalysis", trace_id = get_trace_id(&http_request), result))]
#[delete("/api/services/v1_0/palynological-analyses/{analysisId}")]
pub async fn palynological_delete(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    app_state.analysis_service.delete_palynological(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::NoContent().finish())
}

/**
 * Analyses in which a species was found.
 */
#[instrument(skip(http_request, app_state), fields(service = "listSpeciesPalynologicalAnalyses", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/species/{speciesId}/palynological-analyses")]
pub async fn species_palynological(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let analyses = app_state.analysis_service.get_species_palynological(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(analyses.into_iter().map(PalynologicalAnalysisResponse::from).collect::<Vec<_>>()))
}

/**
 * Analyses of a sample, each with its sample and species embedded.
 */
#[instrument(skip(http_request, app_state), fields(service = "listSamplePalynologicalAnalyses", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/samples/{sampleId}/palynological-analyses")]
pub async fn samples_palynological(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let analyses = app_state.analysis_service.get_sample_palynological(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(analyses.into_iter().map(PalynologicalAnalysisDetailResponse::from).collect::<Vec<_>>()))
}

/***************** Physico-chemical analyses *********************/

#[instrument(skip(http_request, app_state), fields(service = "listPhysicochemicalAnalyses", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/physicochemical-analyses")]
pub async fn physicochemical_list(http_request: HttpRequest, pagination: web::Query<PaginationQuery>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let pagination_input = PaginationInput::from(pagination).validate()?;
    let output = app_state.analysis_service.get_physicochemical_list(pagination_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<PhysicochemicalAnalysisResponse>::from(output)))
}

#[instrument(skip(http_request, app_state), fields(service = "getPhysicochemicalAnalysis", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/physicochemical-analyses/{analysisId}")]
pub async fn physicochemical_get(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let analysis = app_state.analysis_service.get_physicochemical(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(PhysicochemicalAnalysisDetailResponse::from(analysis)))
}

#[instrument(skip(http_request, app_state), fields(service = "addPhysicochemicalAnalysis", trace_id = get_trace_id(&http_request), result))]
#[post("/api/services/v1_0/physicochemical-analyses")]
pub async fn physicochemical_add(http_request: HttpRequest, request_body: web::Json<PhysicochemicalAnalysisRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = PhysicochemicalAnalysisInputType::from(request_body).validate()?;
    let analysis = app_state.analysis_service.add_physicochemical(input).instrument(span).await?;
    Ok(HttpResponse::Created().json(PhysicochemicalAnalysisDetailResponse::from(analysis)))
}

#[instrument(skip(http_request, app_state), fields(service = "updatePhysicochemicalAnalysis", trace_id = get_trace_id(&http_request), result))]
#[put("/api/services/v1_0/physicochemical-analyses/{analysisId}")]
pub async fn physicochemical_update(
    path: Path<i64>,
    http_request: HttpRequest,
    request_body: web::Json<PhysicochemicalAnalysisRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = PhysicochemicalAnalysisInputType::from(request_body).validate()?;
    let analysis = app_state.analysis_service.update_physicochemical(path.into_inner(), input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(PhysicochemicalAnalysisDetailResponse::from(analysis)))
}

#[instrument(skip(http_request, app_state), fields(service = "deletePhysicochemicalAnalysis", trace_id = get_trace_id(&http_request), result))]
#[delete("/api/services/v1_0/physicochemical-analyses/{analysisId}")]
pub async fn physicochemical_delete(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    app_state.analysis_service.delete_physicochemical(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::NoContent().finish())
}

/**
 * The drum a physico-chemical analysis was made on.
 */
#[instrument(skip(http_request, app_state), fields(service = "getPhysicochemicalDrum", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/physicochemical-analyses/{analysisId}/drum")]
pub async fn physicochemical_drum(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let drum = app_state.analysis_service.get_physicochemical_drum(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(DrumResponse::from(drum)))
}
