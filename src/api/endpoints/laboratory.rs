use actix_web::{
    HttpRequest, HttpResponse, delete, get, patch, post, put,
    web::{self, Path},
};
use tracing::{Instrument, instrument};

use crate::{
    api::{
        endpoints::get_trace_id,
        rest::{
            ListResponse, PaginationQuery,
            laboratory::{
                AnalystRequest, AnalystResponse, CountResponse, PoolDetailResponse, PoolMemberRequest, PoolMemberResponse, SampleDetailResponse, SampleDrumRequest, SampleDrumResponse,
                SamplePatchRequest, SampleRequest, SampleResponse, SpeciesRequest, SpeciesResponse,
            },
        },
        state::AppState,
    },
    model::{
        apperror::ApplicationError,
        laboratory::{AnalystInputType, PoolMemberInputType, SampleDrumInputType, SampleInputType, SamplePatchType, SpeciesInputType},
        models::PaginationInput,
    },
};

/***************** Analysts *********************/

#[instrument(skip(http_request, app_state), fields(service = "listAnalysts", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/analysts")]
pub async fn analysts_list(http_request: HttpRequest, pagination: web::Query<PaginationQuery>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let pagination_input = PaginationInput::from(pagination).validate()?;
    let output = app_state.laboratory_service.get_analyst_list(pagination_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<AnalystResponse>::from(output)))
}

#[instrument(skip(http_request, app_state), fields(service = "getAnalyst", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/analysts/{analystId}")]
pub async fn analysts_get(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let analyst = app_state.laboratory_service.get_analyst(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(AnalystResponse::from(analyst)))
}

#[instrument(skip(http_request, app_state), fields(service = "addAnalyst", trace_id = get_trace_id(&http_request), result))]
#[post("/api/services/v1_0/analysts")]
pub async fn analysts_add(http_request: HttpRequest, request_body: web::Json<AnalystRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = AnalystInputType::from(request_body).validate()?;
    let analyst = app_state.laboratory_service.add_analyst(input).instrument(span).await?;
    Ok(HttpResponse::Created().json(AnalystResponse::from(analyst)))
}

#[instrument(skip(http_request, app_state), fields(service = "updateAnalyst", trace_id = get_trace_id(&http_request), result))]
#[put("/api/services/v1_0/analysts/{analystId}")]
pub async fn analysts_update(path: Path<i64>, http_request: HttpRequest, request_body: web::Json<AnalystRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = AnalystInputType::from(request_body).validate()?;
    let analyst = app_state.laboratory_service.update_analyst(path.into_inner(), input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(AnalystResponse::from(analyst)))
}

#[instrument(skip(http_request, app_state), fields(service = "deleteAnalyst", trace_id = get_trace_id(&http_request), result))]
#[delete("/api/services/v1_0/analysts/{analystId}")]
pub async fn analysts_delete(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    app_state.laboratory_service.delete_analyst(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::NoContent().finish())
}

/**
 * Samples registered by an analyst.
 */
#[instrument(skip(http_request, app_state), fields(service = "listAnalystSamples", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/analysts/{analystId}/samples")]
pub async fn analysts_samples(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let samples = app_state.laboratory_service.get_analyst_samples(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(samples.into_iter().map(SampleResponse::from).collect::<Vec<_>>()))
}

/***************** Species *********************/

#[instrument(skip(http_request, app_state), fields(service = "listSpecies", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/species")]
pub async fn species_list(http_request: HttpRequest, pagination: web::Query<PaginationQuery>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let pagination_input = PaginationInput::from(pagination).validate()?;
    let output = app_state.laboratory_service.get_species_list(pagination_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<SpeciesResponse>::from(output)))
}

#[instrument(skip(http_request, app_state), fields(service = "getSpecies", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/species/{speciesId}")]
pub async fn species_get(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let species = app_state.laboratory_service.get_species(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(SpeciesResponse::from(species)))
}

#[instrument(skip(http_request, app_state), fields(service = "addSpecies", trace_id = get_trace_id(&http_request), result))]
#[post("/api/services/v1_0/species")]
pub async fn species_add(http_request: HttpRequest, request_body: web::Json<SpeciesRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = SpeciesInputType::from(request_body).validate()?;
    let species = app_state.laboratory_service.add_species(input).instrument(span).await?;
    Ok(HttpResponse::Created().json(SpeciesResponse::from(species)))
}

#[instrument(skip(http_request, app_state), fields(service = "updateSpecies", trace_id = get_trace_id(&http_request), result))]
#[put("/api/services/v1_0/species/{speciesId}")]
pub async fn species_update(path: Path<i64>, http_request: HttpRequest, request_body: web::Json<SpeciesRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = SpeciesInputType::from(request_body).validate()?;
    let species = app_state.laboratory_service.update_species(path.into_inner(), input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(SpeciesResponse::from(species)))
}

#[instrument(skip(http_request, app_state), fields(service = "deleteSpecies", trace_id = get_trace_id(&http_request), result))]
#[delete("/api/services/v1_0/species/{speciesId}")]
pub async fn species_delete(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    app_state.laboratory_service.delete_species(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::NoContent().finish())
}

/***************** Samples *********************/

#[instrument(skip(http_request, app_state), fields(service = "listSamples", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/samples")]
pub async fn samples_list(http_request: HttpRequest, pagination: web::Query<PaginationQuery>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let pagination_input = PaginationInput::from(pagination).validate()?;
    let output = app_state.laboratory_service.get_sample_list(pagination_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<SampleResponse>::from(output)))
}

#[instrument(skip(http_request, app_state), fields(service = "getSample", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/samples/{sampleId}")]
pub async fn samples_get(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let sample = app_state.laboratory_service.get_sample(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(SampleDetailResponse::from(sample)))
}

#[instrument(skip(http_request, app_state), fields(service = "addSample", trace_id = get_trace_id(&http_request), result))]
#[post("/api/services/v1_0/samples")]
pub async fn samples_add(http_request: HttpRequest, request_body: web::Json<SampleRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = SampleInputType::try_from(request_body)?.validate()?;
    let sample = app_state.laboratory_service.add_sample(input).instrument(span).await?;
    Ok(HttpResponse::Created().json(SampleDetailResponse::from(sample)))
}

#[instrument(skip(http_request, app_state), fields(service = "updateSample", trace_id = get_trace_id(&http_request), result))]
#[put("/api/services/v1_0/samples/{sampleId}")]
pub async fn samples_update(path: Path<i64>, http_request: HttpRequest, request_body: web::Json<SampleRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = SampleInputType::try_from(request_body)?.validate()?;
    let sample = app_state.laboratory_service.update_sample(path.into_inner(), input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(SampleDetailResponse::from(sample)))
}

/**
 * Partial update. Validation runs in the service against the merged values.
 */
#[instrument(skip(http_request, app_state), fields(service = "patchSample", trace_id = get_trace_id(&http_request), result))]
#[patch("/api/services/v1_0/samples/{sampleId}")]
pub async fn samples_patch(path: Path<i64>, http_request: HttpRequest, request_body: web::Json<SamplePatchRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let patch = SamplePatchType::from(request_body);
    let sample = app_state.laboratory_service.patch_sample(path.into_inner(), patch).instrument(span).await?;
    Ok(HttpResponse::Ok().json(SampleDetailResponse::from(sample)))
}

#[instrument(skip(http_request, app_state), fields(service = "deleteSample", trace_id = get_trace_id(&http_request), result))]
#[delete("/api/services/v1_0/samples/{sampleId}")]
pub async fn samples_delete(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    app_state.laboratory_service.delete_sample(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(http_request, app_state), fields(service = "addSampleDrum", trace_id = get_trace_id(&http_request), result))]
#[post("/api/services/v1_0/samples/{sampleId}/drums")]
pub async fn samples_drums_add(path: Path<i64>, http_request: HttpRequest, request_body: web::Json<SampleDrumRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = SampleDrumInputType::from(request_body).validate()?;
    let association = app_state.laboratory_service.add_drum_to_sample(path.into_inner(), input).instrument(span).await?;
    Ok(HttpResponse::Created().json(SampleDrumResponse::from(association)))
}

#[instrument(skip(http_request, app_state), fields(service = "removeSampleDrum", trace_id = get_trace_id(&http_request), result))]
#[delete("/api/services/v1_0/samples/{sampleId}/drums/{drumId}")]
pub async fn samples_drums_delete(path: Path<(i64, i64)>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let (sample_id, drum_id) = path.into_inner();
    app_state.laboratory_service.remove_drum_from_sample(sample_id, drum_id).instrument(span).await?;
    Ok(HttpResponse::NoContent().finish())
}

/**
 * Samples drawn from a drum.
 */
#[instrument(skip(http_request, app_state), fields(service = "listDrumSamples", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/drums/{drumId}/samples")]
pub async fn drums_samples(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let samples = app_state.laboratory_service.get_drum_samples(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(samples.into_iter().map(SampleResponse::from).collect::<Vec<_>>()))
}

/***************** Pools *********************/

#[instrument(skip(http_request, app_state), fields(service = "listPools", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/pools")]
pub async fn pools_list(http_request: HttpRequest, pagination: web::Query<PaginationQuery>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let pagination_input = PaginationInput::from(pagination).validate()?;
    let output = app_state.laboratory_service.get_pool_list(pagination_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<SampleResponse>::from(output)))
}

#[instrument(skip(http_request, app_state), fields(service = "getPool", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/pools/{poolId}")]
pub async fn pools_get(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let pool = app_state.laboratory_service.get_pool(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(PoolDetailResponse::from(pool)))
}

#[instrument(skip(http_request, app_state), fields(service = "addPool", trace_id = get_trace_id(&http_request), result))]
#[post("/api/services/v1_0/pools")]
pub async fn pools_add(http_request: HttpRequest, request_body: web::Json<SampleRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = SampleInputType::try_from(request_body)?.validate()?;
    let pool = app_state.laboratory_service.add_pool(input).instrument(span).await?;
    Ok(HttpResponse::Created().json(PoolDetailResponse::from(pool)))
}

#[instrument(skip(http_request, app_state), fields(service = "updatePool", trace_id = get_trace_id(&http_request), result))]
#[put("/api/services/v1_0/pools/{poolId}")]
pub async fn pools_update(path: Path<i64>, http_request: HttpRequest, request_body: web::Json<SampleRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = SampleInputType::try_from(request_body)?.validate()?;
    let pool = app_state.laboratory_service.update_pool(path.into_inner(), input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(PoolDetailResponse::from(pool)))
}

#[instrument(skip(http_request, app_state), fields(service = "patchPool", trace_id = get_trace_id(&http_request), result))]
#[patch("/api/services/v1_0/pools/{poolId}")]
pub async fn pools_patch(path: Path<i64>, http_request: HttpRequest, request_body: web::Json<SamplePatchRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let patch = SamplePatchType::from(request_body);
    let pool = app_state.laboratory_service.patch_pool(path.into_inner(), patch).instrument(span).await?;
    Ok(HttpResponse::Ok().json(PoolDetailResponse::from(pool)))
}

#[instrument(skip(http_request, app_state), fields(service = "deletePool", trace_id = get_trace_id(&http_request), result))]
#[delete("/api/services/v1_0/pools/{poolId}")]
pub async fn pools_delete(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    app_state.laboratory_service.delete_pool(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(http_request, app_state), fields(service = "listPoolMembers", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/pools/{poolId}/members")]
pub async fn pools_members(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let members = app_state.laboratory_service.get_pool_members(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(members.into_iter().map(PoolMemberResponse::from).collect::<Vec<_>>()))
}

#[instrument(skip(http_request, app_state), fields(service = "addPoolMember", trace_id = get_trace_id(&http_request), result))]
#[post("/api/services/v1_0/pools/{poolId}/members")]
pub async fn pools_members_add(path: Path<i64>, http_request: HttpRequest, request_body: web::Json<PoolMemberRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = PoolMemberInputType::from(request_body).validate()?;
    let member = app_state.laboratory_service.add_pool_member(path.into_inner(), input).instrument(span).await?;
    Ok(HttpResponse::Created().json(PoolMemberResponse::from(member)))
}

#[instrument(skip(http_request, app_state), fields(service = "removePoolMember", trace_id = get_trace_id(&http_request), result))]
#[delete("/api/services/v1_0/pools/{poolId}/members/{memberId}")]
pub async fn pools_members_delete(path: Path<(i64, i64)>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let (pool_id, member_id) = path.into_inner();
    app_state.laboratory_service.remove_pool_member(pool_id, member_id).instrument(span).await?;
    Ok(HttpResponse::NoContent().finish())
}

/***************** Counter *********************/

/**
 * Total number of samples.
 */
#[instrument(skip(http_request, app_state), fields(service = "countSamples", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/counter")]
pub async fn counter_get(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let count = app_state.laboratory_service.count_samples().instrument(span).await?;
    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

/**
 * Registers a sample through the counter form.
 */
#[instrument(skip(http_request, app_state), fields(service = "counterAddSample", trace_id = get_trace_id(&http_request), result))]
#[post("/api/services/v1_0/counter")]
pub async fn counter_add(http_request: HttpRequest, request_body: web::Json<SampleRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = SampleInputType::try_from(request_body)?.validate()?;
    let sample = app_state.laboratory_service.add_sample(input).instrument(span).await?;
    Ok(HttpResponse::Created().json(SampleDetailResponse::from(sample)))
}
