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
            beekeeping::{ApiaryDetailResponse, ApiaryRequest, ApiaryResponse, BeekeeperRequest, BeekeeperResponse, DrumApiaryRequest, DrumApiaryResponse, DrumDetailResponse, DrumRequest, DrumResponse},
        },
        state::AppState,
    },
    model::{
        apperror::ApplicationError,
        beekeeping::{ApiaryInputType, BeekeeperInputType, DrumApiaryInputType, DrumInputType},
        models::PaginationInput,
    },
};

/***************** Beekeepers *********************/

#[instrument(skip(http_request, app_state), fields(service = "listBeekeepers", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/beekeepers")]
pub async fn beekeepers_list(http_request: HttpRequest, pagination: web::Query<PaginationQuery>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let pagination_input = PaginationInput::from(pagination).validate()?;
    let output = app_state.beekeeping_service.get_beekeeper_list(pagination_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<BeekeeperResponse>::from(output)))
}

#[instrument(skip(http_request, app_state), fields(service = "getBeekeeper", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/beekeepers/{beekeeperId}")]
pub async fn beekeepers_get(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let beekeeper = app_state.beekeeping_service.get_beekeeper(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(BeekeeperResponse::from(beekeeper)))
}

#[instrument(skip(http_request, app_state), fields(service = "addBeekeeper", trace_id = get_trace_id(&http_request), result))]
#[post("/api/services/v1_0/beekeepers")]
pub async fn beekeepers_add(http_request: HttpRequest, request_body: web::Json<BeekeeperRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = BeekeeperInputType::from(request_body).validate()?;
    let beekeeper = app_state.beekeeping_service.add_beekeeper(input).instrument(span).await?;
    Ok(HttpResponse::Created().json(BeekeeperResponse::from(beekeeper)))
}

#[instrument(skip(http_request, app_state), fields(service = "updateBeekeeper", trace_id = get_trace_id(&http_request), result))]
#[put("/api/services/v1_0/beekeepers/{beekeeperId}")]
pub async fn beekeepers_update(path: Path<i64>, http_request: HttpRequest, request_body: web::Json<BeekeeperRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = BeekeeperInputType::from(request_body).validate()?;
    let beekeeper = app_state.beekeeping_service.update_beekeeper(path.into_inner(), input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(BeekeeperResponse::from(beekeeper)))
}

#[instrument(skip(http_request, app_state), fields(service = "deleteBeekeeper", trace_id = get_trace_id(&http_request), result))]
#[delete("/api/services/v1_0/beekeepers/{beekeeperId}")]
pub async fn beekeepers_delete(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    app_state.beekeeping_service.delete_beekeeper(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::NoContent().finish())
}

/**
 * Apiaries owned by a beekeeper.
 */
#[instrument(skip(http_request, app_state), fields(service = "listBeekeeperApiaries", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/beekeepers/{beekeeperId}/apiaries")]
pub async fn beekeepers_apiaries(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let apiaries = app_state.beekeeping_service.get_beekeeper_apiaries(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(apiaries.into_iter().map(ApiaryResponse::from).collect::<Vec<_>>()))
}

/***************** Apiaries *********************/

#[instrument(skip(http_request, app_state), fields(service = "listApiaries", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/apiaries")]
pub async fn apiaries_list(http_request: HttpRequest, pagination: web::Query<PaginationQuery>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let pagination_input = PaginationInput::from(pagination).validate()?;
    let output = app_state.beekeeping_service.get_apiary_list(pagination_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<ApiaryResponse>::from(output)))
}

#[instrument(skip(http_request, app_state), fields(service = "getApiary", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/apiaries/{apiaryId}")]
pub async fn apiaries_get(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let apiary = app_state.beekeeping_service.get_apiary(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ApiaryDetailResponse::from(apiary)))
}

#[instrument(skip(http_request, app_state), fields(service = "addApiary", trace_id = get_trace_id(&http_request), result))]
#[post("/api/services/v1_0/apiaries")]
pub async fn apiaries_add(http_request: HttpRequest, request_body: web::Json<ApiaryRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = ApiaryInputType::from(request_body).validate()?;
    let apiary = app_state.beekeeping_service.add_apiary(input).instrument(span).await?;
    Ok(HttpResponse::Created().json(ApiaryDetailResponse::from(apiary)))
}

#[instrument(skip(http_request, app_state), fields(service = "updateApiary", trace_id = get_trace_id(&http_request), result))]
#[put("/api/services/v1_0/apiaries/{apiaryId}")]
pub async fn apiaries_update(path: Path<i64>, http_request: HttpRequest, request_body: web::Json<ApiaryRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = ApiaryInputType::from(request_body).validate()?;
    let apiary = app_state.beekeeping_service.update_apiary(path.into_inner(), input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ApiaryDetailResponse::from(apiary)))
}

#[instrument(skip(http_request, app_state), fields(service = "deleteApiary", trace_id = get_trace_id(&http_request), result))]
#[delete("/api/services/v1_0/apiaries/{apiaryId}")]
pub async fn apiaries_delete(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    app_state.beekeeping_service.delete_apiary(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::NoContent().finish())
}

/**
 * Drums associated with an apiary.
 */
#[instrument(skip(http_request, app_state), fields(service = "listApiaryDrums", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/apiaries/{apiaryId}/drums")]
pub async fn apiaries_drums(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let drums = app_state.beekeeping_service.get_apiary_drums(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(drums.into_iter().map(DrumResponse::from).collect::<Vec<_>>()))
}

#[instrument(skip(http_request, app_state), fields(service = "addApiaryDrum", trace_id = get_trace_id(&http_request), result))]
#[post("/api/services/v1_0/apiaries/{apiaryId}/drums")]
pub async fn apiaries_drums_add(path: Path<i64>, http_request: HttpRequest, request_body: web::Json<DrumApiaryRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = DrumApiaryInputType::from(request_body).validate()?;
    let association = app_state.beekeeping_service.add_drum_to_apiary(path.into_inner(), input).instrument(span).await?;
    Ok(HttpResponse::Created().json(DrumApiaryResponse::from(association)))
}

#[instrument(skip(http_request, app_state), fields(service = "removeApiaryDrum", trace_id = get_trace_id(&http_request), result))]
#[delete("/api/services/v1_0/apiaries/{apiaryId}/drums/{drumId}")]
pub async fn apiaries_drums_delete(path: Path<(i64, i64)>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let (apiary_id, drum_id) = path.into_inner();
    app_state.beekeeping_service.remove_drum_from_apiary(apiary_id, drum_id).instrument(span).await?;
    Ok(HttpResponse::NoContent().finish())
}

/***************** Drums *********************/

#[instrument(skip(http_request, app_state), fields(service = "listDrums", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/drums")]
pub async fn drums_list(http_request: HttpRequest, pagination: web::Query<PaginationQuery>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let pagination_input = PaginationInput::from(pagination).validate()?;
    let output = app_state.beekeeping_service.get_drum_list(pagination_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<DrumResponse>::from(output)))
}

#[instrument(skip(http_request, app_state), fields(service = "getDrum", trace_id = get_trace_id(&http_request), result))]
#[get("/api/services/v1_0/drums/{drumId}")]
pub async fn drums_get(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let drum = app_state.beekeeping_service.get_drum(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::Ok().json(DrumDetailResponse::from(drum)))
}

#[instrument(skip(http_request, app_state), fields(service = "addDrum", trace_id = get_trace_id(&http_request), result))]
#[post("/api/services/v1_0/drums")]
pub async fn drums_add(http_request: HttpRequest, request_body: web::Json<DrumRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = DrumInputType::from(request_body).validate()?;
    let drum = app_state.beekeeping_service.add_drum(input).instrument(span).await?;
    Ok(HttpResponse::Created().json(DrumDetailResponse::from(drum)))
}

#[instrument(skip(http_request, app_state), fields(service = "updateDrum", trace_id = get_trace_id(&http_request), result))]
#[put("/api/services/v1_0/drums/{drumId}")]
pub async fn drums_update(path: Path<i64>, http_request: HttpRequest, request_body: web::Json<DrumRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    let input = DrumInputType::from(request_body).validate()?;
    let drum = app_state.beekeeping_service.update_drum(path.into_inner(), input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(DrumDetailResponse::from(drum)))
}

#[instrument(skip(http_request, app_state), fields(service = "deleteDrum", trace_id = get_trace_id(&http_request), result))]
#[delete("/api/services/v1_0/drums/{drumId}")]
pub async fn drums_delete(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    app_state.jwt_service.validate(&http_request)?;
    app_state.beekeeping_service.delete_drum(path.into_inner()).instrument(span).await?;
    Ok(HttpResponse::NoContent().finish())
}
