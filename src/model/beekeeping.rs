use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{apperror::ApplicationError, validation::FieldErrors};

/***************** Beekeeper *********************/

/**
 * Input for adding or updating a beekeeper.
 */
#[derive(Debug, Clone)]
pub struct BeekeeperInputType {
    pub names: String,
    pub surnames: String,
    pub contact: Option<String>,
}

impl BeekeeperInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        let mut errors = FieldErrors::new();
        errors.require_text("names", &self.names, 100);
        errors.require_text("surnames", &self.surnames, 100);
        errors.optional_text("contact", self.contact.as_deref(), 150);
        errors.into_result()?;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct BeekeeperDetailType {
    pub id: i64,
    pub names: String,
    pub surnames: String,
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/***************** Apiary *********************/

/**
 * Input for adding or updating an apiary.
 */
#[derive(Debug, Clone)]
pub struct ApiaryInputType {
    pub beekeeper_id: i64,
    pub name: String,
    pub location: Option<String>,
}

impl ApiaryInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        let mut errors = FieldErrors::new();
        errors.require_id("beekeeperId", self.beekeeper_id);
        errors.require_text("name", &self.name, 100);
        errors.optional_text("location", self.location.as_deref(), 255);
        errors.into_result()?;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct ApiaryDetailType {
    pub id: i64,
    pub beekeeper_id: i64,
    pub name: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/**
 * Apiary with its owning beekeeper embedded.
 */
#[derive(Debug, Clone)]
pub struct ApiaryWithBeekeeperType {
    pub apiary: ApiaryDetailType,
    pub beekeeper: BeekeeperDetailType,
}

/***************** Drum *********************/

/**
 * Input for adding or updating a drum.
 */
#[derive(Debug, Clone)]
pub struct DrumInputType {
    pub registration_number: String,
    pub extraction_date: Option<NaiveDate>,
}

impl DrumInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        let mut errors = FieldErrors::new();
        errors.require_text("registrationNumber", &self.registration_number, 50);
        errors.into_result()?;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct DrumDetailType {
    pub id: i64,
    pub registration_number: String,
    pub extraction_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/**
 * Input for associating a drum with an apiary. The apiary comes from the path.
 */
#[derive(Debug, Clone)]
pub struct DrumApiaryInputType {
    pub drum_id: i64,
    pub association_date: Option<NaiveDate>,
}

impl DrumApiaryInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        let mut errors = FieldErrors::new();
        errors.require_id("drumId", self.drum_id);
        errors.into_result()?;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct DrumApiaryDetailType {
    pub id: i64,
    pub drum_id: i64,
    pub apiary_id: i64,
    pub association_date: NaiveDate,
}

/**
 * An apiary reached through a drum-apiary association.
 */
#[derive(Debug, Clone)]
pub struct AssociatedApiaryType {
    pub association_id: i64,
    pub association_date: NaiveDate,
    pub apiary: ApiaryDetailType,
}

/**
 * Drum with the apiaries it is associated with.
 */
#[derive(Debug, Clone)]
pub struct DrumWithApiariesType {
    pub drum: DrumDetailType,
    pub apiaries: Vec<AssociatedApiaryType>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_beekeeper_validation() {
        let input = BeekeeperInputType { names: "Rosa".to_string(), surnames: "Quispe".to_string(), contact: None };
        assert!(input.validate().is_ok());
        let input = BeekeeperInputType { names: "".to_string(), surnames: "Quispe".to_string(), contact: Some("".to_string()) };
        let fields = input.validate().unwrap_err().field_errors.unwrap();
        assert!(fields.contains_key("names"));
        assert!(fields.contains_key("contact"));
    }

    #[test]
    fn test_apiary_requires_beekeeper() {
        let input = ApiaryInputType { beekeeper_id: 0, name: "Los Alamos".to_string(), location: None };
        let fields = input.validate().unwrap_err().field_errors.unwrap();
        assert!(fields.contains_key("beekeeperId"));
    }

    #[test]
    fn test_drum_registration_number_length() {
        let input = DrumInputType { registration_number: "T-0001".to_string(), extraction_date: None };
        assert!(input.validate().is_ok());
        let input = DrumInputType { registration_number: "T".repeat(51), extraction_date: None };
        assert!(input.validate().is_err());
    }
}
