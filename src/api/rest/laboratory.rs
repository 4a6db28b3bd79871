use actix_web::web;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::rest::{RequestValue, beekeeping::DrumResponse, double_option};
use crate::model::apperror::ApplicationError;
use crate::model::laboratory::{
    AnalystDetailType, AnalystInputType, AssociatedDrumType, PoolMemberDetailType, PoolMemberInputType, PoolWithRelationsType, SampleDetailType, SampleDrumDetailType, SampleDrumInputType,
    SampleInputType, SamplePatchType, SampleWithRelationsType, SpeciesDetailType, SpeciesInputType,
};
use crate::model::validation::FieldErrors;

/***************** Analyst models *********************/

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalystRequest {
    pub names: String,
    pub surnames: String,
    pub contact: Option<String>,
    pub username: String,
    pub email: String,
}

impl From<web::Json<AnalystRequest>> for AnalystInputType {
    fn from(request: web::Json<AnalystRequest>) -> Self {
        let request = request.into_inner();
        AnalystInputType { names: request.names, surnames: request.surnames, contact: request.contact, username: request.username, email: request.email }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalystResponse {
    pub id: i64,
    pub names: String,
    pub surnames: String,
    pub contact: Option<String>,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AnalystDetailType> for AnalystResponse {
    fn from(analyst: AnalystDetailType) -> Self {
        AnalystResponse {
            id: analyst.id,
            names: analyst.names,
            surnames: analyst.surnames,
            contact: analyst.contact,
            username: analyst.username,
            email: analyst.email,
            is_active: analyst.is_active,
            created_at: analyst.created_at,
            updated_at: analyst.updated_at,
        }
    }
}

/***************** Species models *********************/

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesRequest {
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub family: Option<String>,
}

impl From<web::Json<SpeciesRequest>> for SpeciesInputType {
    fn from(request: web::Json<SpeciesRequest>) -> Self {
        let request = request.into_inner();
        SpeciesInputType { scientific_name: request.scientific_name, common_name: request.common_name, family: request.family }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesResponse {
    pub id: i64,
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub family: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SpeciesDetailType> for SpeciesResponse {
    fn from(species: SpeciesDetailType) -> Self {
        SpeciesResponse {
            id: species.id,
            scientific_name: species.scientific_name,
            common_name: species.common_name,
            family: species.family,
            created_at: species.created_at,
            updated_at: species.updated_at,
        }
    }
}

/***************** Sample and pool models *********************/

/**
 * Body for creating or replacing a sample or a pool, and for the counter endpoint.
 */
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRequest {
    #[serde(default)]
    pub analyst_id: RequestValue<i64>,
    #[serde(default)]
    pub extraction_date: RequestValue<NaiveDate>,
    #[serde(default)]
    pub analysis_date: RequestValue<NaiveDate>,
    pub registration_number: Option<String>,
    pub observations: Option<String>,
}

impl TryFrom<web::Json<SampleRequest>> for SampleInputType {
    type Error = ApplicationError;

    fn try_from(request: web::Json<SampleRequest>) -> Result<Self, Self::Error> {
        let request = request.into_inner();
        let mut errors = FieldErrors::new();
        let analyst_id = request.analyst_id.required("analystId", &mut errors);
        let extraction_date = request.extraction_date.required("extractionDate", &mut errors);
        let analysis_date = request.analysis_date.optional("analysisDate", &mut errors);
        match (analyst_id, extraction_date) {
            (Some(analyst_id), Some(extraction_date)) if errors.is_empty() => {
                Ok(SampleInputType { analyst_id, extraction_date, analysis_date, registration_number: request.registration_number, observations: request.observations })
            }
            _ => Err(errors.into_error()),
        }
    }
}

/**
 * Body for a partial update. Absent fields are kept, `null` clears nullable fields.
 */
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplePatchRequest {
    pub analyst_id: Option<i64>,
    pub extraction_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub analysis_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub registration_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub observations: Option<Option<String>>,
}

impl From<web::Json<SamplePatchRequest>> for SamplePatchType {
    fn from(request: web::Json<SamplePatchRequest>) -> Self {
        let request = request.into_inner();
        SamplePatchType {
            analyst_id: request.analyst_id,
            extraction_date: request.extraction_date,
            analysis_date: request.analysis_date,
            registration_number: request.registration_number,
            observations: request.observations,
        }
    }
}

/**
 * Flat sample or pool representation.
 */
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleResponse {
    pub id: i64,
    pub analyst_id: i64,
    pub extraction_date: NaiveDate,
    pub analysis_date: Option<NaiveDate>,
    pub registration_number: Option<String>,
    pub observations: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SampleDetailType> for SampleResponse {
    fn from(sample: SampleDetailType) -> Self {
        SampleResponse {
            id: sample.id,
            analyst_id: sample.analyst_id,
            extraction_date: sample.extraction_date,
            analysis_date: sample.analysis_date,
            registration_number: sample.registration_number,
            observations: sample.observations,
            created_at: sample.created_at,
            updated_at: sample.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociatedDrumResponse {
    pub association_id: i64,
    pub association_date: NaiveDate,
    pub drum: DrumResponse,
}

impl From<AssociatedDrumType> for AssociatedDrumResponse {
    fn from(associated: AssociatedDrumType) -> Self {
        AssociatedDrumResponse { association_id: associated.association_id, association_date: associated.association_date, drum: DrumResponse::from(associated.drum) }
    }
}

/**
 * Sample with its analyst and drums embedded.
 */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleDetailResponse {
    #[serde(flatten)]
    pub sample: SampleResponse,
    pub analyst: AnalystResponse,
    pub drums: Vec<AssociatedDrumResponse>,
}

impl From<SampleWithRelationsType> for SampleDetailResponse {
    fn from(detail: SampleWithRelationsType) -> Self {
        SampleDetailResponse {
            sample: SampleResponse::from(detail.sample),
            analyst: AnalystResponse::from(detail.analyst),
            drums: detail.drums.into_iter().map(AssociatedDrumResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleDrumRequest {
    pub drum_id: i64,
    pub association_date: Option<NaiveDate>,
}

impl From<web::Json<SampleDrumRequest>> for SampleDrumInputType {
    fn from(request: web::Json<SampleDrumRequest>) -> Self {
        SampleDrumInputType { drum_id: request.drum_id, association_date: request.association_date }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleDrumResponse {
    pub id: i64,
    pub sample_id: i64,
    pub drum_id: i64,
    pub association_date: NaiveDate,
}

impl From<SampleDrumDetailType> for SampleDrumResponse {
    fn from(association: SampleDrumDetailType) -> Self {
        SampleDrumResponse { id: association.id, sample_id: association.sample_id, drum_id: association.drum_id, association_date: association.association_date }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolMemberRequest {
    pub sample_drum_id: i64,
}

impl From<web::Json<PoolMemberRequest>> for PoolMemberInputType {
    fn from(request: web::Json<PoolMemberRequest>) -> Self {
        PoolMemberInputType { sample_drum_id: request.sample_drum_id }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolMemberResponse {
    pub id: i64,
    pub pool_id: i64,
    pub sample_drum: SampleDrumResponse,
    pub created_at: DateTime<Utc>,
}

impl From<PoolMemberDetailType> for PoolMemberResponse {
    fn from(member: PoolMemberDetailType) -> Self {
        PoolMemberResponse { id: member.id, pool_id: member.pool_id, sample_drum: SampleDrumResponse::from(member.sample_drum), created_at: member.created_at }
    }
}

/**
 * Pool with its analyst and member associations embedded.
 */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDetailResponse {
    #[serde(flatten)]
    pub pool: SampleResponse,
    pub analyst: AnalystResponse,
    pub members: Vec<PoolMemberResponse>,
}

impl From<PoolWithRelationsType> for PoolDetailResponse {
    fn from(detail: PoolWithRelationsType) -> Self {
        PoolDetailResponse {
            pool: SampleResponse::from(detail.pool),
            analyst: AnalystResponse::from(detail.analyst),
            members: detail.members.into_iter().map(PoolMemberResponse::from).collect(),
        }
    }
}

/**
 * Response of the counter endpoint.
 */
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_patch_request_distinguishes_null_from_absent() {
        let request: SamplePatchRequest = serde_json::from_str(r#"{"analysisDate": null, "observations": "re-run"}"#).unwrap();
        let patch = SamplePatchType::from(web::Json(request));
        assert_eq!(patch.analysis_date, Some(None));
        assert_eq!(patch.observations, Some(Some("re-run".to_string())));
        assert_eq!(patch.registration_number, None);
        assert_eq!(patch.extraction_date, None);
    }

    #[test]
    fn test_sample_request_reports_missing_fields() {
        let request: SampleRequest = serde_json::from_str(r#"{"observations": "turbid"}"#).unwrap();
        let error = SampleInputType::try_from(web::Json(request)).unwrap_err();
        let fields = error.field_errors.unwrap();
        assert_eq!(fields.get("extractionDate").unwrap(), &vec!["This field is required".to_string()]);
        assert_eq!(fields.get("analystId").unwrap(), &vec!["This field is required".to_string()]);
    }

    #[test]
    fn test_sample_request_reports_malformed_dates() {
        let request: SampleRequest = serde_json::from_str(r#"{"analystId": 1, "extractionDate": "2024-13-40", "analysisDate": "soon"}"#).unwrap();
        let fields = SampleInputType::try_from(web::Json(request)).unwrap_err().field_errors.unwrap();
        assert!(fields.get("extractionDate").unwrap()[0].starts_with("Invalid value"));
        assert!(fields.contains_key("analysisDate"));
        assert!(!fields.contains_key("analystId"));
    }

    #[test]
    fn test_sample_request_null_analysis_date_is_absent() {
        let request: SampleRequest = serde_json::from_str(r#"{"analystId": 4, "extractionDate": "2024-03-01", "analysisDate": null}"#).unwrap();
        let input = SampleInputType::try_from(web::Json(request)).unwrap();
        assert_eq!(input.analyst_id, 4);
        assert_eq!(input.extraction_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(input.analysis_date, None);
    }

    #[test]
    fn test_count_response() {
        assert_eq!(serde_json::to_string(&CountResponse { count: 3 }).unwrap(), r#"{"count":3}"#);
    }
}
