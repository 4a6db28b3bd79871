pub mod analysis;
pub mod beekeeping;
pub mod laboratory;
pub mod statistics;

use actix_web::{HttpRequest, error::JsonPayloadError, web};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    validation::{FieldErrors, REQUIRED_FIELD},
};

/**
 * Registers the extractor configuration and every lab endpoint.
 */
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| json_error(err).into()))
        .app_data(web::PathConfig::default().error_handler(|err, _| ApplicationError::new(ErrorType::Validation, err.to_string()).into()))
        .app_data(web::QueryConfig::default().error_handler(|err, _| ApplicationError::new(ErrorType::Validation, err.to_string()).into()))
        .service(beekeeping::beekeepers_list)
        .service(beekeeping::beekeepers_get)
        .service(beekeeping::beekeepers_add)
        .service(beekeeping::beekeepers_update)
        .service(beekeeping::beekeepers_delete)
        .service(beekeeping::beekeepers_apiaries)
        .service(beekeeping::apiaries_list)
        .service(beekeeping::apiaries_get)
        .service(beekeeping::apiaries_add)
        .service(beekeeping::apiaries_update)
        .service(beekeeping::apiaries_delete)
        .service(beekeeping::apiaries_drums)
        .service(beekeeping::apiaries_drums_add)
        .service(beekeeping::apiaries_drums_delete)
        .service(beekeeping::drums_list)
        .service(beekeeping::drums_get)
        .service(beekeeping::drums_add)
        .service(beekeeping::drums_update)
        .service(beekeeping::drums_delete)
        .service(laboratory::analysts_list)
        .service(laboratory::analysts_get)
        .service(laboratory::analysts_add)
        .service(laboratory::analysts_update)
        .service(laboratory::analysts_delete)
        .service(laboratory::analysts_samples)
        .service(laboratory::species_list)
        .service(laboratory::species_get)
        .service(laboratory::species_add)
        .service(laboratory::species_update)
        .service(laboratory::species_delete)
        .service(laboratory::samples_list)
        .service(laboratory::samples_get)
        .service(laboratory::samples_add)
        .service(laboratory::samples_update)
        .service(laboratory::samples_patch)
        .service(laboratory::samples_delete)
        .service(laboratory::samples_drums_add)
        .service(laboratory::samples_drums_delete)
        .service(laboratory::drums_samples)
        .service(laboratory::pools_list)
        .service(laboratory::pools_get)
        .service(laboratory::pools_add)
        .service(laboratory::pools_update)
        .service(laboratory::pools_patch)
        .service(laboratory::pools_delete)
        .service(laboratory::pools_members)
        .service(laboratory::pools_members_add)
        .service(laboratory::pools_members_delete)
        .service(laboratory::counter_get)
        .service(laboratory::counter_add)
        .service(analysis::palynological_list)
        .service(analysis::palynological_get)
        .service(analysis::palynological_add)
        .service(analysis::palynological_update)
        .service(analysis::palynological_delete)
        .service(analysis::species_palynological)
        .service(analysis::samples_palynological)
        .service(analysis::physicochemical_list)
        .service(analysis::physicochemical_get)
        .service(analysis::physicochemical_add)
        .service(analysis::physicochemical_update)
        .service(analysis::physicochemical_delete)
        .service(analysis::physicochemical_drum)
        .service(statistics::apiaries_stats)
        .service(statistics::samples_stats)
        .service(statistics::species_top)
        .service(statistics::dashboard);
}

/**
 * Maps a body that could not be deserialized into a validation error with field errors.
 * A missing field is reported under its own key, anything else under `nonFieldErrors`.
 */
fn json_error(err: JsonPayloadError) -> ApplicationError {
    let JsonPayloadError::Deserialize(deserialize_error) = &err else {
        return ApplicationError::new(ErrorType::Validation, err.to_string());
    };
    let mut errors = FieldErrors::new();
    let detail = deserialize_error.to_string();
    match missing_field(&detail) {
        Some(field) => errors.add(field, REQUIRED_FIELD),
        None => errors.add("nonFieldErrors", detail.as_str()),
    }
    let mut error = errors.into_error();
    error.message = err.to_string();
    error
}

fn missing_field(detail: &str) -> Option<&str> {
    detail.strip_prefix("missing field `")?.split('`').next()
}

/**
 * Retrieves the trace ID from the HTTP request headers.
 * If the trace ID is not present, a new UUID is generated.
 */
pub(crate) fn get_trace_id(http_request: &HttpRequest) -> String {
    http_request.headers().get("X-Trace-ID").and_then(|v| v.to_str().ok().map(std::string::ToString::to_string)).unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

#[cfg(test)]
mod test {
    use actix_web::{
        App,
        http::StatusCode,
        test::{self, TestRequest},
    };
    use jsonwebtoken::{EncodingKey, Header};

    use super::*;
    use crate::{
        api::{security::JwtSecurityService, state::AppState},
        dao::{analysis::AnalysisDao, beekeeping::BeekeepingDao, laboratory::LaboratoryDao, statistics::StatisticsDao},
        service::{analysis::AnalysisService, beekeeping::BeekeepingService, laboratory::LaboratoryService, statistics::StatisticsService},
    };

    const SECRET: &str = "lab-test-secret";

    fn app_state() -> web::Data<AppState> {
        web::Data::new(AppState::new(
            JwtSecurityService::new(SECRET, "HS256").unwrap(),
            BeekeepingService::new(BeekeepingDao::new(), None),
            LaboratoryService::new(LaboratoryDao::new(), BeekeepingDao::new(), None),
            AnalysisService::new(AnalysisDao::new(), LaboratoryDao::new(), BeekeepingDao::new(), None),
            StatisticsService::new(StatisticsDao::new(), None),
        ))
    }

    fn bearer() -> String {
        let claims = serde_json::json!({ "sub": "analyst", "name": "Lab Analyst", "exp": 4_102_444_800u64 });
        let token = jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap();
        format!("Bearer {token}")
    }

    #[actix_web::test]
    async fn test_get_trace_id_exists() {
        let request = TestRequest::default().insert_header(("X-Trace-ID", "test")).to_http_request();
        assert_eq!(get_trace_id(&request), "test");
    }

    #[actix_web::test]
    async fn test_get_trace_id_not_exists() {
        let request = TestRequest::default().to_http_request();
        assert!(!get_trace_id(&request).is_empty());
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;
        for uri in ["/api/services/v1_0/samples", "/api/services/v1_0/dashboard", "/api/services/v1_0/species:top", "/api/services/v1_0/counter"] {
            let response = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
            let body: serde_json::Value = test::read_body_json(response).await;
            assert_eq!(body["code"], 1000);
        }
    }

    #[actix_web::test]
    async fn test_authorized_request_reaches_service() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;
        let request = TestRequest::get().uri("/api/services/v1_0/beekeepers").insert_header(("Authorization", bearer())).to_request();
        let response = test::call_service(&app, request).await;
        // No pool configured in tests.
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["code"], 1003);
    }

    #[actix_web::test]
    async fn test_invalid_pagination_is_bad_request() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;
        let request = TestRequest::get().uri("/api/services/v1_0/samples?pageSize=0").insert_header(("Authorization", bearer())).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_malformed_body_is_bad_request() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;
        let request = TestRequest::post()
            .uri("/api/services/v1_0/samples")
            .insert_header(("Authorization", bearer()))
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{\"analystId\": ")
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["code"], 1002);
        assert!(body["fieldErrors"]["nonFieldErrors"].is_array());
    }

    #[actix_web::test]
    async fn test_missing_body_field_is_reported_by_name() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;
        let request = TestRequest::post()
            .uri("/api/services/v1_0/beekeepers")
            .insert_header(("Authorization", bearer()))
            .set_json(serde_json::json!({ "names": "Rosa" }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["fieldErrors"]["surnames"][0], "This field is required");
    }

    #[actix_web::test]
    async fn test_counter_missing_extraction_date() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;
        let request = TestRequest::post().uri("/api/services/v1_0/counter").insert_header(("Authorization", bearer())).set_json(serde_json::json!({ "analystId": 1 })).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["code"], 1002);
        assert_eq!(body["fieldErrors"]["extractionDate"][0], "This field is required");
    }

    #[actix_web::test]
    async fn test_counter_invalid_extraction_date() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;
        let request = TestRequest::post()
            .uri("/api/services/v1_0/counter")
            .insert_header(("Authorization", bearer()))
            .set_json(serde_json::json!({ "analystId": 1, "extractionDate": "2024-13-40" }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert!(body["fieldErrors"]["extractionDate"].is_array());
        assert!(body["fieldErrors"]["analystId"].is_null());
    }

    #[actix_web::test]
    async fn test_palynological_non_numeric_percentage() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;
        let request = TestRequest::post()
            .uri("/api/services/v1_0/palynological-analyses")
            .insert_header(("Authorization", bearer()))
            .set_json(serde_json::json!({ "sampleId": 1, "speciesId": 2, "grainCount": 10, "percentage": "abc" }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert!(body["fieldErrors"]["percentage"].is_array());
    }

    #[test]
    fn test_missing_field_name() {
        assert_eq!(missing_field("missing field `extractionDate` at line 1 column 15"), Some("extractionDate"));
        assert_eq!(missing_field("input is out of range at line 1 column 40"), None);
    }

    #[actix_web::test]
    async fn test_non_numeric_id_is_bad_request() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;
        let request = TestRequest::get().uri("/api/services/v1_0/drums/abc").insert_header(("Authorization", bearer())).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_counter_rejects_analysis_before_extraction() {
        let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;
        let request = TestRequest::post()
            .uri("/api/services/v1_0/counter")
            .insert_header(("Authorization", bearer()))
            .set_json(serde_json::json!({ "analystId": 1, "extractionDate": "2024-03-10", "analysisDate": "2024-03-01" }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert!(body["fieldErrors"]["analysisDate"].is_array());
    }
}
