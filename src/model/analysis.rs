use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::model::{
    apperror::ApplicationError,
    beekeeping::DrumDetailType,
    laboratory::{AnalystDetailType, SampleDetailType, SpeciesDetailType},
    validation::FieldErrors,
};

/**
 * Marker recorded next to a pollen count.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialMark {
    /**
     * `x`
     */
    Cross,
    /**
     * `#`
     */
    Hash,
    /**
     * `##`
     */
    DoubleHash,
}

impl SpecialMark {
    pub fn as_str(self) -> &'static str {
        match self {
            SpecialMark::Cross => "x",
            SpecialMark::Hash => "#",
            SpecialMark::DoubleHash => "##",
        }
    }
}

impl FromStr for SpecialMark {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "x" => Ok(SpecialMark::Cross),
            "#" => Ok(SpecialMark::Hash),
            "##" => Ok(SpecialMark::DoubleHash),
            other => Err(format!("\"{other}\" is not a valid choice")),
        }
    }
}

impl fmt::Display for SpecialMark {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/***************** Palynological analysis *********************/

/**
 * Input for adding or updating a palynological analysis.
 *
 * The grain count and the mark arrive unchecked from the request so that bad values
 * are reported as field errors.
 */
#[derive(Debug, Clone)]
pub struct PalynologicalAnalysisInputType {
    pub sample_id: i64,
    pub species_id: i64,
    pub grain_count: i64,
    pub special_mark: Option<String>,
    pub percentage: Option<Decimal>,
}

impl PalynologicalAnalysisInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        let mut errors = FieldErrors::new();
        errors.require_id("sampleId", self.sample_id);
        errors.require_id("speciesId", self.species_id);
        if self.grain_count < 0 {
            errors.add("grainCount", "Ensure this value is greater than or equal to 0");
        } else if self.grain_count > i64::from(i32::MAX) {
            errors.add("grainCount", format!("Ensure this value is less than or equal to {}", i32::MAX));
        }
        if let Some(Err(message)) = self.special_mark.as_deref().filter(|mark| !mark.is_empty()).map(SpecialMark::from_str) {
            errors.add("specialMark", message);
        }
        errors.decimal_in_range("percentage", self.percentage, Decimal::ZERO, Some(Decimal::ONE_HUNDRED));
        errors.decimal_places("percentage", self.percentage, 2);
        errors.into_result()?;
        Ok(self)
    }

    /**
     * The mark to store. Empty strings are stored as no mark.
     */
    pub fn parsed_special_mark(&self) -> Option<SpecialMark> {
        self.special_mark.as_deref().and_then(|mark| SpecialMark::from_str(mark).ok())
    }
}

#[derive(Debug, Clone)]
pub struct PalynologicalAnalysisDetailType {
    pub id: i64,
    pub sample_id: i64,
    pub species_id: i64,
    pub grain_count: i32,
    pub special_mark: Option<SpecialMark>,
    pub percentage: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/**
 * Palynological analysis with its sample and species embedded.
 */
#[derive(Debug, Clone)]
pub struct PalynologicalAnalysisWithRelationsType {
    pub analysis: PalynologicalAnalysisDetailType,
    pub sample: SampleDetailType,
    pub species: SpeciesDetailType,
}

/***************** Physico-chemical analysis *********************/

#[derive(Debug, Clone)]
pub struct PhysicochemicalAnalysisInputType {
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

impl PhysicochemicalAnalysisInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        let mut errors = FieldErrors::new();
        errors.require_id("analystId", self.analyst_id);
        errors.require_id("drumId", self.drum_id);
        errors.decimal_in_range("humidity", self.humidity, Decimal::ZERO, Some(Decimal::ONE_HUNDRED));
        errors.decimal_places("humidity", self.humidity, 2);
        errors.decimal_in_range("color", self.color, Decimal::ZERO, Some(Decimal::new(999_999, 2)));
        errors.decimal_places("color", self.color, 2);
        errors.decimal_in_range("hydroxymethylfurfural", self.hydroxymethylfurfural, Decimal::ZERO, Some(Decimal::new(99_999_999, 2)));
        errors.decimal_places("hydroxymethylfurfural", self.hydroxymethylfurfural, 2);
        errors.decimal_in_range("freeAcidity", self.free_acidity, Decimal::ZERO, Some(Decimal::new(99_999_999, 2)));
        errors.decimal_places("freeAcidity", self.free_acidity, 2);
        errors.decimal_in_range("electricalConductivity", self.electrical_conductivity, Decimal::ZERO, Some(Decimal::new(999_999, 3)));
        errors.decimal_places("electricalConductivity", self.electrical_conductivity, 3);
        errors.into_result()?;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct PhysicochemicalAnalysisDetailType {
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

/**
 * Physico-chemical analysis with its analyst and drum embedded.
 */
#[derive(Debug, Clone)]
pub struct PhysicochemicalAnalysisWithRelationsType {
    pub analysis: PhysicochemicalAnalysisDetailType,
    pub analyst: AnalystDetailType,
    pub drum: DrumDetailType,
}

#[cfg(test)]
mod test {
    use super::*;

    fn palynological(grain_count: i64, special_mark: Option<&str>, percentage: Option<Decimal>) -> PalynologicalAnalysisInputType {
        PalynologicalAnalysisInputType { sample_id: 1, species_id: 2, grain_count, special_mark: special_mark.map(str::to_string), percentage }
    }

    #[test]
    fn test_special_mark_parsing() {
        assert_eq!("x".parse::<SpecialMark>(), Ok(SpecialMark::Cross));
        assert_eq!("#".parse::<SpecialMark>(), Ok(SpecialMark::Hash));
        assert_eq!("##".parse::<SpecialMark>(), Ok(SpecialMark::DoubleHash));
        assert!("###".parse::<SpecialMark>().is_err());
        assert_eq!(SpecialMark::DoubleHash.to_string(), "##");
    }

    #[test]
    fn test_percentage_boundaries_accepted() {
        assert!(palynological(10, None, Some(Decimal::ZERO)).validate().is_ok());
        assert!(palynological(10, None, Some(Decimal::ONE_HUNDRED)).validate().is_ok());
        assert!(palynological(10, None, None).validate().is_ok());
    }

    #[test]
    fn test_percentage_out_of_bounds_rejected() {
        let fields = palynological(10, None, Some(Decimal::new(10001, 2))).validate().unwrap_err().field_errors.unwrap();
        assert!(fields.contains_key("percentage"));
        let fields = palynological(10, None, Some(Decimal::new(-1, 0))).validate().unwrap_err().field_errors.unwrap();
        assert!(fields.contains_key("percentage"));
    }

    #[test]
    fn test_negative_grain_count_rejected() {
        let fields = palynological(-1, None, None).validate().unwrap_err().field_errors.unwrap();
        assert!(fields.contains_key("grainCount"));
        assert!(palynological(0, None, None).validate().is_ok());
    }

    #[test]
    fn test_invalid_special_mark_rejected() {
        let fields = palynological(5, Some("*"), None).validate().unwrap_err().field_errors.unwrap();
        assert!(fields.contains_key("specialMark"));
        let input = palynological(5, Some("##"), None).validate().unwrap();
        assert_eq!(input.parsed_special_mark(), Some(SpecialMark::DoubleHash));
        let input = palynological(5, Some(""), None).validate().unwrap();
        assert_eq!(input.parsed_special_mark(), None);
    }

    #[test]
    fn test_physicochemical_humidity_bounds() {
        let input = PhysicochemicalAnalysisInputType {
            analyst_id: 1,
            drum_id: 1,
            analysis_date: None,
            humidity: Some(Decimal::new(1750, 2)),
            color: Some(Decimal::new(85, 0)),
            hydroxymethylfurfural: None,
            free_acidity: None,
            electrical_conductivity: Some(Decimal::new(452, 3)),
            observations: None,
        };
        assert!(input.clone().validate().is_ok());
        let invalid = PhysicochemicalAnalysisInputType { humidity: Some(Decimal::new(101, 0)), color: Some(Decimal::new(-5, 0)), ..input };
        let fields = invalid.validate().unwrap_err().field_errors.unwrap();
        assert!(fields.contains_key("humidity"));
        assert!(fields.contains_key("color"));
    }
}
