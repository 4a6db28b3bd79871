use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::model::apperror::{ApplicationError, FieldErrorMap};

pub const REQUIRED_FIELD: &str = "This field is required";

/**
 * Collects field level validation messages before persistence.
 */
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: FieldErrorMap,
}

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors::default()
    }

    /**
     * Records a message for a field.
     */
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /**
     * Converts the collected messages into a result. Ok when nothing was recorded.
     */
    pub fn into_result(self) -> Result<(), ApplicationError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(self.into_error())
    }

    pub fn into_error(self) -> ApplicationError {
        ApplicationError::with_field_errors(self.errors)
    }

    /**
     * Requires a non blank value not longer than `max_length` characters.
     */
    pub fn require_text(&mut self, field: &str, value: &str, max_length: usize) {
        if value.trim().is_empty() {
            self.add(field, "This field may not be blank");
        } else if value.chars().count() > max_length {
            self.add(field, format!("Ensure this field has no more than {max_length} characters"));
        }
    }

    /**
     * Same as `require_text` but accepts a missing value.
     */
    pub fn optional_text(&mut self, field: &str, value: Option<&str>, max_length: usize) {
        if let Some(value) = value {
            self.require_text(field, value, max_length);
        }
    }

    /**
     * Requires an identifier referencing another entity.
     */
    pub fn require_id(&mut self, field: &str, value: i64) {
        if value <= 0 {
            self.add(field, "Invalid identifier");
        }
    }

    /**
     * Requires an optional decimal to be within the inclusive range when present.
     */
    pub fn decimal_in_range(&mut self, field: &str, value: Option<Decimal>, min: Decimal, max: Option<Decimal>) {
        let Some(value) = value else { return };
        if value < min {
            self.add(field, format!("Ensure this value is greater than or equal to {min}"));
        }
        if let Some(max) = max
            && value > max
        {
            self.add(field, format!("Ensure this value is less than or equal to {max}"));
        }
    }

    /**
     * Rejects decimals with more fractional digits than the column stores.
     */
    pub fn decimal_places(&mut self, field: &str, value: Option<Decimal>, places: u32) {
        if value.is_some_and(|value| value.normalize().scale() > places) {
            self.add(field, format!("Ensure that there are no more than {places} decimal places"));
        }
    }

    /**
     * Records an error when the analysis date precedes the extraction date.
     */
    pub fn analysis_dates(&mut self, extraction_date: NaiveDate, analysis_date: Option<NaiveDate>) {
        if let Err(message) = check_analysis_dates(extraction_date, analysis_date) {
            self.add("analysisDate", message);
        }
    }
}

/**
 * Checks that the analysis date does not precede the extraction date.
 *
 * # Arguments
 * `extraction_date`: The date the honey was extracted.
 * `analysis_date`: The optional date the lab analysed it.
 *
 * # Returns
 * Ok when no analysis date is set or it is on or after the extraction date.
 */
pub fn check_analysis_dates(extraction_date: NaiveDate, analysis_date: Option<NaiveDate>) -> Result<(), String> {
    match analysis_date {
        Some(analysis_date) if analysis_date < extraction_date => Err("The analysis date cannot be earlier than the extraction date".to_string()),
        _ => Ok(()),
    }
}

/**
 * Validates the date ordering of a sample or pool and reports it as a field error.
 */
pub fn validate_analysis_dates(extraction_date: NaiveDate, analysis_date: Option<NaiveDate>) -> Result<(), ApplicationError> {
    let mut errors = FieldErrors::new();
    errors.analysis_dates(extraction_date, analysis_date);
    errors.into_result()
}
