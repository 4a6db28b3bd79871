pub mod analysis;
pub mod beekeeping;
pub mod laboratory;
pub mod statistics;

use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

use crate::model::{
    apperror::{ApplicationError, ErrorType, FieldErrorMap},
    models::{ListOutputType, PaginationInput, PaginationOutput},
    validation::{FieldErrors, REQUIRED_FIELD},
};

/***************** Error models *********************/

/**
 * Custom error response for the application.
 */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /**
     * The error code associated with the error type.
     */
    pub code: u16,
    /**
     * A human-readable message describing the error.
     */
    pub message: String,
    /**
     * Messages per request field. Only present for validation errors.
     */
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrorMap>,
}

impl ResponseError for ApplicationError {
    fn status_code(&self) -> StatusCode {
        get_statuscode(&self.error_type)
    }

    /**
     * Generates an error response for the application error.
     */
    fn error_response(&self) -> HttpResponse {
        let error_response = ErrorResponse { code: get_error_code(&self.error_type), message: self.message.clone(), field_errors: self.field_errors.clone() };
        HttpResponse::build(self.status_code()).json(&error_response)
    }
}

/**
* Maps application errors to HTTP status codes.
*
* # Arguments
* `application_error`: The type of error that occurred.
*
* # Returns
* The corresponding HTTP status code.
*/
fn get_statuscode(application_error: &ErrorType) -> StatusCode {
    match application_error {
        ErrorType::JwtAuthorization => StatusCode::UNAUTHORIZED,
        ErrorType::Validation => StatusCode::BAD_REQUEST,
        ErrorType::NotFound => StatusCode::NOT_FOUND,
        ErrorType::ConstraintViolation => StatusCode::CONFLICT,
        ErrorType::Initialization | ErrorType::DatabaseError | ErrorType::Application => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/**
 * Maps application errors to error codes.
 *
 * # Arguments
 * `application_error`: The type of error that occurred.
 *
 * # Returns
 * The corresponding error code.
 */
fn get_error_code(application_error: &ErrorType) -> u16 {
    match application_error {
        ErrorType::JwtAuthorization => 1000,
        ErrorType::Initialization => 1001,
        ErrorType::Validation => 1002,
        ErrorType::DatabaseError => 1003,
        ErrorType::NotFound => 1004,
        ErrorType::ConstraintViolation => 1005,
        ErrorType::Application => 1006,
    }
}

/***************** Common models *********************/

/**
 * Pagination query parameters for API requests.
 */
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    /**
     * The index of the first item to return.
     */
    pub start_index: Option<i64>,
    /**
     * The size of the page to return.
     */
    pub page_size: Option<i64>,
}

impl From<web::Query<PaginationQuery>> for PaginationInput {
    fn from(query: web::Query<PaginationQuery>) -> Self {
        PaginationInput::new(query.start_index, query.page_size)
    }
}

/**
 * Pagination response structure.
 */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResponse {
    /**
     * The starting index of the returned items.
     */
    pub start_index: i64,
    /**
     * The size of the page.
     */
    pub page_size: i64,
    /**
     * Indicates if there are more items available.
     */
    pub has_more_elements: bool,
}

impl From<PaginationOutput> for PaginationResponse {
    fn from(pagination_output: PaginationOutput) -> Self {
        PaginationResponse { start_index: pagination_output.start_index, page_size: pagination_output.page_size, has_more_elements: pagination_output.has_more }
    }
}

/**
 * A page of flat elements.
 */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub elements: Vec<T>,
    pub pagination: PaginationResponse,
}

impl<D, T: From<D>> From<ListOutputType<D>> for ListResponse<T> {
    fn from(output: ListOutputType<D>) -> Self {
        ListResponse { elements: output.elements.into_iter().map(T::from).collect(), pagination: PaginationResponse::from(output.pagination) }
    }
}

/**
 * Deserializes a field that distinguishes "absent" from "null".
 *
 * Use together with `#[serde(default)]`: an absent field stays `None`, `null` becomes `Some(None)`.
 */
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/**
 * A request field that survives deserialization even when it is missing or malformed,
 * so the failure can be reported under the field's own key.
 *
 * Use together with `#[serde(default)]`. `null` is treated like an absent field.
 */
#[derive(Debug, PartialEq)]
pub enum RequestValue<T> {
    Missing,
    Invalid(String),
    Value(T),
}

impl<T> Default for RequestValue<T> {
    fn default() -> Self {
        RequestValue::Missing
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for RequestValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(RequestValue::Missing);
        }
        Ok(serde_json::from_value(value).map_or_else(|err| RequestValue::Invalid(err.to_string()), RequestValue::Value))
    }
}

impl<T> RequestValue<T> {
    /**
     * Takes a value the caller must send. Missing and malformed values are recorded against `field`.
     */
    pub fn required(self, field: &str, errors: &mut FieldErrors) -> Option<T> {
        match self {
            RequestValue::Missing => {
                errors.add(field, REQUIRED_FIELD);
                None
            }
            RequestValue::Invalid(message) => {
                errors.add(field, format!("Invalid value: {message}"));
                None
            }
            RequestValue::Value(value) => Some(value),
        }
    }

    /**
     * Takes a value the caller may leave out. Only malformed values are recorded.
     */
    pub fn optional(self, field: &str, errors: &mut FieldErrors) -> Option<T> {
        match self {
            RequestValue::Missing => None,
            RequestValue::Invalid(message) => {
                errors.add(field, format!("Invalid value: {message}"));
                None
            }
            RequestValue::Value(value) => Some(value),
        }
    }
}

#[cfg(test)]
mod test {
    use actix_web::body::to_bytes;

    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(get_statuscode(&ErrorType::JwtAuthorization), StatusCode::UNAUTHORIZED);
        assert_eq!(get_statuscode(&ErrorType::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(get_statuscode(&ErrorType::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(get_statuscode(&ErrorType::ConstraintViolation), StatusCode::CONFLICT);
        assert_eq!(get_statuscode(&ErrorType::DatabaseError), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(get_error_code(&ErrorType::ConstraintViolation), 1005);
        assert_eq!(get_error_code(&ErrorType::Application), 1006);
    }

    #[actix_web::test]
    async fn test_validation_error_body() {
        let mut field_errors = FieldErrorMap::new();
        field_errors.insert("analysisDate".to_string(), vec!["Analysis date cannot be earlier than extraction date".to_string()]);
        let response = ApplicationError::with_field_errors(field_errors).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], 1002);
        assert!(json["fieldErrors"]["analysisDate"].is_array());
    }

    #[actix_web::test]
    async fn test_field_errors_omitted_when_absent() {
        let response = ApplicationError::not_found("Drum").error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Drum not found");
        assert!(json.get("fieldErrors").is_none());
    }

    #[test]
    fn test_double_option() {
        #[derive(Deserialize)]
        struct Patch {
            #[serde(default, deserialize_with = "double_option")]
            value: Option<Option<i64>>,
        }
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.value, None);
        let null: Patch = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(null.value, Some(None));
        let set: Patch = serde_json::from_str(r#"{"value": 3}"#).unwrap();
        assert_eq!(set.value, Some(Some(3)));
    }
}
