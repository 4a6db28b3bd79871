use actix_web::web;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::rest::{
    RequestValue,
    beekeeping::DrumResponse,
    laboratory::{AnalystResponse, SampleResponse, SpeciesResponse},
};
use crate::model::analysis::{
    PalynologicalAnalysisDetailType, PalynologicalAnalysisInputType, PalynologicalAnalysisWithRelationsType, PhysicochemicalAnalysisDetailType, PhysicochemicalAnalysisInputType,
    PhysicochemicalAnalysisWithRelationsType,
};
use crate::model::apperror::ApplicationError;
use crate::model::validation::FieldErrors;

/***************** Palynological analysis models *********************/

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PalynologicalAnalysisRequest {
    #[serde(default)]
    pub sample_id: RequestValue<i64>,
    #[serde(default)]
    pub species_id: RequestValue<i64>,
    #[serde(default)]
    pub grain_count: RequestValue<i64>,
    pub special_mark: Option<String>,
    #[serde(default)]
    pub percentage: RequestValue<Decimal>,
}

impl TryFrom<web::Json<PalynologicalAnalysisRequest>> for PalynologicalAnalysisInputType {
    type Error = ApplicationError;

    fn try_from(request: web::Json<PalynologicalAnalysisRequest>) -> Result<Self, Self::Error> {
        let request = request.into_inner();
        let mut errors = FieldErrors::new();
        let sample_id = request.sample_id.required("sampleId", &mut errors);
        let species_id = request.species_id.required("speciesId", &mut errors);
        let grain_count = request.grain_count.required("grainCount", &mut errors);
        let percentage = request.percentage.optional("percentage", &mut errors);
        match (sample_id, species_id, grain_count) {
            (Some(sample_id), Some(species_id), Some(grain_count)) if errors.is_empty() => {
                Ok(PalynologicalAnalysisInputType { sample_id, species_id, grain_count, special_mark: request.special_mark, percentage })
            }
            _ => Err(errors.into_error()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PalynologicalAnalysisResponse {
    pub id: i64,
    pub sample_id: i64,
    pub species_id: i64,
    pub grain_count: i32,
    pub special_mark: Option<String>,
    pub percentage: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PalynologicalAnalysisDetailType> for PalynologicalAnalysisResponse {
    fn from(analysis: PalynologicalAnalysisDetailType) -> Self {
        PalynologicalAnalysisResponse {
            id: analysis.id,
            sample_id: analysis.sample_id,
            species_id: analysis.species_id,
            grain_count: analysis.grain_count,
            special_mark: analysis.special_mark.map(|mark| mark.to_string()),
            percentage: analysis.percentage,
            created_at: analysis.created_at,
            updated_at: analysis.updated_at,
        }
    }
}

/**
 * Palynological analysis with its sample and species embedded.
 */
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PalynologicalAnalysisDetailResponse {
    #[serde(flatten)]
    pub analysis: PalynologicalAnalysisResponse,
    pub sample: SampleResponse,
    pub species: SpeciesResponse,
}

impl From<PalynologicalAnalysisWithRelationsType> for PalynologicalAnalysisDetailResponse {
    fn from(detail: PalynologicalAnalysisWithRelationsType) -> Self {
        PalynologicalAnalysisDetailResponse {
            analysis: PalynologicalAnalysisResponse::from(detail.analysis),
            sample: SampleResponse::from(detail.sample),
            species: SpeciesResponse::from(detail.species),
        }
    }
}

/***************** Physico-chemical analysis models *********************/

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicochemicalAnalysisRequest {
    pub analyst_id: i64,
    pub drum_id: i64,
    pub analysis_date: Option<NaiveDate>,
    pub humidity: Option<Decimal>,
    pub color: Option<Decimal>,
    pub hydroxymethylfurfural: Option<Decimal>,
    pub free_acidity: Option<Decimal>,
    pub electrical_conductivity: Option<Decimal>,
    pub observations: Option<String>,
}

impl From<web::Json<PhysicochemicalAnalysisRequest>> for PhysicochemicalAnalysisInputType {
    fn from(request: web::Json<PhysicochemicalAnalysisRequest>) -> Self {
        let request = request.into_inner();
        PhysicochemicalAnalysisInputType {
            analyst_id: request.analyst_id,
            drum_id: request.drum_id,
            analysis_date: request.analysis_date,
            humidity: request.humidity,
            color: request.color,
            hydroxymethylfurfural: request.hydroxymethylfurfural,
            free_acidity: request.free_acidity,
            electrical_conductivity: request.electrical_conductivity,
            observations: request.observations,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicochemicalAnalysisResponse {
    pub id: i64,
    pub analyst_id: i64,
    pub drum_id: i64,
    pub analysis_date: Option<NaiveDate>,
    pub humidity: Option<Decimal>,
    pub color: Option<Decimal>,
    pub hydroxymethylfurfural: Option<Decimal>,
    pub free_acidity: Option<Decimal>,
    pub electrical_conductivity: Option<Decimal>,
    pub observations: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PhysicochemicalAnalysisDetailType> for PhysicochemicalAnalysisResponse {
    fn from(analysis: PhysicochemicalAnalysisDetailType) -> Self {
        PhysicochemicalAnalysisResponse {
            id: analysis.id,
            analyst_id: analysis.analyst_id,
            drum_id: analysis.drum_id,
            analysis_date: analysis.analysis_date,
            humidity: analysis.humidity,
            color: analysis.color,
            hydroxymethylfurfural: analysis.hydroxymethylfurfural,
            free_acidity: analysis.free_acidity,
            electrical_conductivity: analysis.electrical_conductivity,
            observations: analysis.observations,
            created_at: analysis.created_at,
            updated_at: analysis.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicochemicalAnalysisDetailResponse {
    #[serde(flatten)]
    pub analysis: PhysicochemicalAnalysisResponse,
    pub analyst: AnalystResponse,
    pub drum: DrumResponse,
}

impl From<PhysicochemicalAnalysisWithRelationsType> for PhysicochemicalAnalysisDetailResponse {
    fn from(detail: PhysicochemicalAnalysisWithRelationsType) -> Self {
        PhysicochemicalAnalysisDetailResponse {
            analysis: PhysicochemicalAnalysisResponse::from(detail.analysis),
            analyst: AnalystResponse::from(detail.analyst),
            drum: DrumResponse::from(detail.drum),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::analysis::SpecialMark;

    #[test]
    fn test_special_mark_rendered_as_symbol() {
        let now = Utc::now();
        let analysis = PalynologicalAnalysisDetailType {
            id: 1,
            sample_id: 2,
            species_id: 3,
            grain_count: 120,
            special_mark: Some(SpecialMark::DoubleHash),
            percentage: Some(Decimal::new(4550, 2)),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(PalynologicalAnalysisResponse::from(analysis)).unwrap();
        assert_eq!(json["specialMark"], "##");
        assert_eq!(json["grainCount"], 120);
        assert_eq!(json["percentage"], "45.50");
    }

    #[test]
    fn test_palynological_request_keeps_raw_values() {
        let request: PalynologicalAnalysisRequest = serde_json::from_str(r#"{"sampleId": 1, "speciesId": 2, "grainCount": -5, "specialMark": "?", "percentage": "100.00"}"#).unwrap();
        let input = PalynologicalAnalysisInputType::try_from(web::Json(request)).unwrap();
        assert_eq!(input.grain_count, -5);
        assert_eq!(input.special_mark.as_deref(), Some("?"));
        assert_eq!(input.percentage, Some(Decimal::ONE_HUNDRED));
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_palynological_request_reports_fields() {
        let request: PalynologicalAnalysisRequest = serde_json::from_str(r#"{"sampleId": 1, "grainCount": "many", "percentage": "abc"}"#).unwrap();
        let fields = PalynologicalAnalysisInputType::try_from(web::Json(request)).unwrap_err().field_errors.unwrap();
        assert_eq!(fields.get("speciesId").unwrap(), &vec!["This field is required".to_string()]);
        assert!(fields.get("grainCount").unwrap()[0].starts_with("Invalid value"));
        assert!(fields.get("percentage").unwrap()[0].starts_with("Invalid value"));
        assert!(!fields.contains_key("sampleId"));
    }
}
