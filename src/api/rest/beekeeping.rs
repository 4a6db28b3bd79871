use actix_web::web;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::beekeeping::{
    ApiaryDetailType, ApiaryInputType, ApiaryWithBeekeeperType, AssociatedApiaryType, BeekeeperDetailType, BeekeeperInputType, DrumApiaryDetailType, DrumApiaryInputType, DrumDetailType,
    DrumInputType, DrumWithApiariesType,
};

/***************** Beekeeper models *********************/

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeekeeperRequest {
    pub names: String,
    pub surnames: String,
    pub contact: Option<String>,
}

impl From<web::Json<BeekeeperRequest>> for BeekeeperInputType {
    fn from(request: web::Json<BeekeeperRequest>) -> Self {
        let request = request.into_inner();
        BeekeeperInputType { names: request.names, surnames: request.surnames, contact: request.contact }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeekeeperResponse {
    pub id: i64,
    pub names: String,
    pub surnames: String,
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BeekeeperDetailType> for BeekeeperResponse {
    fn from(beekeeper: BeekeeperDetailType) -> Self {
        BeekeeperResponse {
            id: beekeeper.id,
            names: beekeeper.names,
            surnames: beekeeper.surnames,
            contact: beekeeper.contact,
            created_at: beekeeper.created_at,
            updated_at: beekeeper.updated_at,
        }
    }
}

/***************** Apiary models *********************/

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiaryRequest {
    pub beekeeper_id: i64,
    pub name: String,
    pub location: Option<String>,
}

impl From<web::Json<ApiaryRequest>> for ApiaryInputType {
    fn from(request: web::Json<ApiaryRequest>) -> Self {
        let request = request.into_inner();
        ApiaryInputType { beekeeper_id: request.beekeeper_id, name: request.name, location: request.location }
    }
}

/**
 * Flat apiary representation used in lists.
 */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiaryResponse {
    pub id: i64,
    pub beekeeper_id: i64,
    pub name: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApiaryDetailType> for ApiaryResponse {
    fn from(apiary: ApiaryDetailType) -> Self {
        ApiaryResponse { id: apiary.id, beekeeper_id: apiary.beekeeper_id, name: apiary.name, location: apiary.location, created_at: apiary.created_at, updated_at: apiary.updated_at }
    }
}

/**
 * Apiary with its beekeeper embedded.
 */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiaryDetailResponse {
    #[serde(flatten)]
    pub apiary: ApiaryResponse,
    pub beekeeper: BeekeeperResponse,
}

impl From<ApiaryWithBeekeeperType> for ApiaryDetailResponse {
    fn from(detail: ApiaryWithBeekeeperType) -> Self {
        ApiaryDetailResponse { apiary: ApiaryResponse::from(detail.apiary), beekeeper: BeekeeperResponse::from(detail.beekeeper) }
    }
}

/***************** Drum models *********************/

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrumRequest {
    pub registration_number: String,
    pub extraction_date: Option<NaiveDate>,
}

impl From<web::Json<DrumRequest>> for DrumInputType {
    fn from(request: web::Json<DrumRequest>) -> Self {
        let request = request.into_inner();
        DrumInputType { registration_number: request.registration_number, extraction_date: request.extraction_date }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrumResponse {
    pub id: i64,
    pub registration_number: String,
    pub extraction_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DrumDetailType> for DrumResponse {
    fn from(drum: DrumDetailType) -> Self {
        DrumResponse { id: drum.id, registration_number: drum.registration_number, extraction_date: drum.extraction_date, created_at: drum.created_at, updated_at: drum.updated_at }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociatedApiaryResponse {
    pub association_id: i64,
    pub association_date: NaiveDate,
    pub apiary: ApiaryResponse,
}

impl From<AssociatedApiaryType> for AssociatedApiaryResponse {
    fn from(associated: AssociatedApiaryType) -> Self {
        AssociatedApiaryResponse { association_id: associated.association_id, association_date: associated.association_date, apiary: ApiaryResponse::from(associated.apiary) }
    }
}

/**
 * Drum with the apiaries it is associated with.
 */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrumDetailResponse {
    #[serde(flatten)]
    pub drum: DrumResponse,
    pub apiaries: Vec<AssociatedApiaryResponse>,
}

impl From<DrumWithApiariesType> for DrumDetailResponse {
    fn from(detail: DrumWithApiariesType) -> Self {
        DrumDetailResponse { drum: DrumResponse::from(detail.drum), apiaries: detail.apiaries.into_iter().map(AssociatedApiaryResponse::from).collect() }
    }
}

/***************** Drum-apiary models *********************/

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrumApiaryRequest {
    pub drum_id: i64,
    pub association_date: Option<NaiveDate>,
}

impl From<web::Json<DrumApiaryRequest>> for DrumApiaryInputType {
    fn from(request: web::Json<DrumApiaryRequest>) -> Self {
        DrumApiaryInputType { drum_id: request.drum_id, association_date: request.association_date }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrumApiaryResponse {
    pub id: i64,
    pub drum_id: i64,
    pub apiary_id: i64,
    pub association_date: NaiveDate,
}

impl From<DrumApiaryDetailType> for DrumApiaryResponse {
    fn from(association: DrumApiaryDetailType) -> Self {
        DrumApiaryResponse { id: association.id, drum_id: association.drum_id, apiary_id: association.apiary_id, association_date: association.association_date }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_apiary_detail_embeds_beekeeper() {
        let now = Utc::now();
        let detail = ApiaryWithBeekeeperType {
            apiary: ApiaryDetailType { id: 4, beekeeper_id: 2, name: "A1".to_string(), location: None, created_at: now, updated_at: now },
            beekeeper: BeekeeperDetailType { id: 2, names: "Rosa".to_string(), surnames: "Quispe".to_string(), contact: None, created_at: now, updated_at: now },
        };
        let json = serde_json::to_value(ApiaryDetailResponse::from(detail)).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["beekeeperId"], 2);
        assert_eq!(json["beekeeper"]["names"], "Rosa");
    }

    #[test]
    fn test_drum_request_keys() {
        let request: DrumRequest = serde_json::from_str(r#"{"registrationNumber": "T-001", "extractionDate": "2024-01-05"}"#).unwrap();
        let input = DrumInputType::from(web::Json(request));
        assert_eq!(input.registration_number, "T-001");
        assert_eq!(input.extraction_date, NaiveDate::from_ymd_opt(2024, 1, 5));
    }
}
