use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{
    apperror::ApplicationError,
    beekeeping::DrumDetailType,
    validation::FieldErrors,
};

/***************** Analyst *********************/

/**
 * Input for adding or updating an analyst. `is_active` is managed elsewhere and never accepted here.
 */
#[derive(Debug, Clone)]
pub struct AnalystInputType {
    pub names: String,
    pub surnames: String,
    pub contact: Option<String>,
    pub username: String,
    pub email: String,
}

impl AnalystInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        let mut errors = FieldErrors::new();
        errors.require_text("names", &self.names, 100);
        errors.require_text("surnames", &self.surnames, 100);
        errors.optional_text("contact", self.contact.as_deref(), 150);
        errors.require_text("username", &self.username, 150);
        if self.username.chars().any(char::is_whitespace) {
            errors.add("username", "Username may not contain whitespace");
        }
        errors.require_text("email", &self.email, 254);
        if !is_email(&self.email) {
            errors.add("email", "Enter a valid email address");
        }
        errors.into_result()?;
        Ok(self)
    }
}

/**
 * Minimal shape check: one `@`, a non-empty local part and a dotted domain.
 */
fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else { return false };
    !local.is_empty() && !domain.contains('@') && domain.split('.').count() > 1 && domain.split('.').all(|part| !part.is_empty())
}

#[derive(Debug, Clone)]
pub struct AnalystDetailType {
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

/***************** Species *********************/

#[derive(Debug, Clone)]
pub struct SpeciesInputType {
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub family: Option<String>,
}

impl SpeciesInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        let mut errors = FieldErrors::new();
        errors.require_text("scientificName", &self.scientific_name, 150);
        errors.optional_text("commonName", self.common_name.as_deref(), 150);
        errors.optional_text("family", self.family.as_deref(), 100);
        errors.into_result()?;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct SpeciesDetailType {
    pub id: i64,
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub family: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/***************** Sample and pool *********************/

/**
 * Input for adding or fully updating a sample. Pools share the same shape.
 */
#[derive(Debug, Clone)]
pub struct SampleInputType {
    pub analyst_id: i64,
    pub extraction_date: NaiveDate,
    pub analysis_date: Option<NaiveDate>,
    pub registration_number: Option<String>,
    pub observations: Option<String>,
}

pub type PoolInputType = SampleInputType;

impl SampleInputType {
    /**
     * Validates field constraints and the analysis/extraction date ordering.
     */
    pub fn validate(self) -> Result<Self, ApplicationError> {
        let mut errors = FieldErrors::new();
        errors.require_id("analystId", self.analyst_id);
        errors.optional_text("registrationNumber", self.registration_number.as_deref(), 50);
        errors.analysis_dates(self.extraction_date, self.analysis_date);
        errors.into_result()?;
        Ok(self)
    }
}

/**
 * Partial update of a sample or pool. `None` leaves the stored value untouched,
 * `Some(None)` clears a nullable column.
 */
#[derive(Debug, Clone, Default)]
pub struct SamplePatchType {
    pub analyst_id: Option<i64>,
    pub extraction_date: Option<NaiveDate>,
    pub analysis_date: Option<Option<NaiveDate>>,
    pub registration_number: Option<Option<String>>,
    pub observations: Option<Option<String>>,
}

pub type PoolPatchType = SamplePatchType;

impl SamplePatchType {
    /**
     * Merges the patch over the stored values. The result still has to be validated.
     */
    pub fn apply(self, current: &SampleDetailType) -> SampleInputType {
        SampleInputType {
            analyst_id: self.analyst_id.unwrap_or(current.analyst_id),
            extraction_date: self.extraction_date.unwrap_or(current.extraction_date),
            analysis_date: self.analysis_date.unwrap_or(current.analysis_date),
            registration_number: self.registration_number.unwrap_or_else(|| current.registration_number.clone()),
            observations: self.observations.unwrap_or_else(|| current.observations.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SampleDetailType {
    pub id: i64,
    pub analyst_id: i64,
    pub extraction_date: NaiveDate,
    pub analysis_date: Option<NaiveDate>,
    pub registration_number: Option<String>,
    pub observations: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type PoolDetailType = SampleDetailType;

/**
 * Input for associating a drum with a sample. The sample comes from the path.
 */
#[derive(Debug, Clone)]
pub struct SampleDrumInputType {
    pub drum_id: i64,
    pub association_date: Option<NaiveDate>,
}

impl SampleDrumInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        let mut errors = FieldErrors::new();
        errors.require_id("drumId", self.drum_id);
        errors.into_result()?;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct SampleDrumDetailType {
    pub id: i64,
    pub sample_id: i64,
    pub drum_id: i64,
    pub association_date: NaiveDate,
}

/**
 * A drum reached through a sample-drum association.
 */
#[derive(Debug, Clone)]
pub struct AssociatedDrumType {
    pub association_id: i64,
    pub association_date: NaiveDate,
    pub drum: DrumDetailType,
}

/**
 * Sample with its analyst and drums embedded.
 */
#[derive(Debug, Clone)]
pub struct SampleWithRelationsType {
    pub sample: SampleDetailType,
    pub analyst: AnalystDetailType,
    pub drums: Vec<AssociatedDrumType>,
}

/**
 * Input for adding a sample-drum association to a pool.
 */
#[derive(Debug, Clone)]
pub struct PoolMemberInputType {
    pub sample_drum_id: i64,
}

impl PoolMemberInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        let mut errors = FieldErrors::new();
        errors.require_id("sampleDrumId", self.sample_drum_id);
        errors.into_result()?;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct PoolMemberDetailType {
    pub id: i64,
    pub pool_id: i64,
    pub sample_drum: SampleDrumDetailType,
    pub created_at: DateTime<Utc>,
}

/**
 * Pool with its analyst and member associations embedded.
 */
#[derive(Debug, Clone)]
pub struct PoolWithRelationsType {
    pub pool: PoolDetailType,
    pub analyst: AnalystDetailType,
    pub members: Vec<PoolMemberDetailType>,
}

#[cfg(test)]
mod test {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn stored_sample() -> SampleDetailType {
        SampleDetailType {
            id: 7,
            analyst_id: 3,
            extraction_date: date(2024, 1, 10),
            analysis_date: Some(date(2024, 1, 20)),
            registration_number: Some("M-7".to_string()),
            observations: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_sample_rejects_analysis_before_extraction() {
        let input = SampleInputType { analyst_id: 1, extraction_date: date(2024, 1, 10), analysis_date: Some(date(2023, 12, 31)), registration_number: None, observations: None };
        let fields = input.validate().unwrap_err().field_errors.unwrap();
        assert!(fields.contains_key("analysisDate"));
    }

    #[test]
    fn test_sample_accepts_missing_analysis_date() {
        let input = SampleInputType { analyst_id: 1, extraction_date: date(2024, 1, 10), analysis_date: None, registration_number: None, observations: None };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_patch_moving_extraction_after_analysis_is_rejected() {
        let patch = SamplePatchType { extraction_date: Some(date(2024, 2, 1)), ..Default::default() };
        let merged = patch.apply(&stored_sample());
        assert_eq!(merged.analysis_date, Some(date(2024, 1, 20)));
        assert!(merged.validate().is_err());
    }

    #[test]
    fn test_patch_moving_analysis_before_extraction_is_rejected() {
        let patch = SamplePatchType { analysis_date: Some(Some(date(2024, 1, 1))), ..Default::default() };
        assert!(patch.apply(&stored_sample()).validate().is_err());
    }

    #[test]
    fn test_patch_clearing_analysis_date() {
        let patch = SamplePatchType { analysis_date: Some(None), ..Default::default() };
        let merged = patch.apply(&stored_sample());
        assert_eq!(merged.analysis_date, None);
        assert_eq!(merged.registration_number, Some("M-7".to_string()));
        assert!(merged.validate().is_ok());
    }

    #[test]
    fn test_analyst_email_validation() {
        let input = AnalystInputType {
            names: "Ana".to_string(),
            surnames: "Pérez".to_string(),
            contact: None,
            username: "aperez".to_string(),
            email: "ana@lab.example".to_string(),
        };
        assert!(input.clone().validate().is_ok());
        let invalid = AnalystInputType { email: "ana.lab.example".to_string(), username: "a perez".to_string(), ..input };
        let fields = invalid.validate().unwrap_err().field_errors.unwrap();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("username"));
    }

    #[test]
    fn test_is_email() {
        assert!(is_email("a@b.co"));
        assert!(!is_email("@b.co"));
        assert!(!is_email("a@b"));
        assert!(!is_email("a@b..co"));
        assert!(!is_email("a@b@c.co"));
    }
}
