use crate::model::apperror::{ApplicationError, ErrorType};

/**
 * Default page size when the caller does not provide one.
 */
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/**
 * Largest page size a caller may request.
 */
pub const MAX_PAGE_SIZE: i64 = 500;

/**
 * Pagination parameters for list queries.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationInput {
    pub start_index: i64,
    pub page_size: i64,
}

impl PaginationInput {
    pub fn new(start_index: Option<i64>, page_size: Option<i64>) -> Self {
        PaginationInput { start_index: start_index.unwrap_or(0), page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE) }
    }

    /**
     * Validates the pagination input.
     *
     * # Returns
     * The input itself or a validation error when the values are out of range.
     */
    pub fn validate(self) -> Result<Self, ApplicationError> {
        if self.start_index < 0 {
            return Err(ApplicationError::new(ErrorType::Validation, "Start index cannot be negative".to_string()));
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(ApplicationError::new(ErrorType::Validation, format!("Page size must be between 1 and {MAX_PAGE_SIZE}")));
        }
        Ok(self)
    }
}

/**
 * Pagination information returned with a list.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationOutput {
    pub start_index: i64,
    pub page_size: i64,
    pub has_more: bool,
}

impl PaginationOutput {
    pub fn new(start_index: i64, page_size: i64, has_more: bool) -> Self {
        PaginationOutput { start_index, page_size, has_more }
    }
}

/**
 * A page of elements together with its pagination information.
 */
#[derive(Debug, Clone)]
pub struct ListOutputType<T> {
    pub elements: Vec<T>,
    pub pagination: PaginationOutput,
}

impl<T> ListOutputType<T> {
    pub fn new(elements: Vec<T>, pagination: PaginationOutput) -> Self {
        ListOutputType { elements, pagination }
    }

    /**
     * Builds a page from rows fetched with a limit of `page_size + 1`.
     *
     * The extra row only signals that more elements exist and is dropped.
     */
    pub fn from_rows(mut elements: Vec<T>, pagination_input: &PaginationInput) -> Result<Self, ApplicationError> {
        let fetched = i64::try_from(elements.len()).map_err(|err| ApplicationError::new(ErrorType::Application, format!("Failed to get pagination output: {err}")))?;
        let pagination_output = PaginationOutput::new(pagination_input.start_index, pagination_input.page_size, fetched > pagination_input.page_size);
        elements.truncate(usize::try_from(pagination_input.page_size).map_err(|err| ApplicationError::new(ErrorType::Application, format!("Failed to truncate elements: {err}")))?);
        Ok(ListOutputType::new(elements, pagination_output))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let pagination_input = PaginationInput::new(None, None);
        assert_eq!(pagination_input.start_index, 0);
        assert_eq!(pagination_input.page_size, DEFAULT_PAGE_SIZE);
        assert!(pagination_input.validate().is_ok());
    }

    #[test]
    fn test_pagination_invalid() {
        assert!(PaginationInput::new(Some(-1), Some(10)).validate().is_err());
        assert!(PaginationInput::new(Some(0), Some(0)).validate().is_err());
        assert!(PaginationInput::new(Some(0), Some(MAX_PAGE_SIZE + 1)).validate().is_err());
    }

    #[test]
    fn test_pagination_output_has_more() {
        let pagination_input = PaginationInput { start_index: 0, page_size: 10 };
        let output = ListOutputType::from_rows((0..11).collect::<Vec<i32>>(), &pagination_input).unwrap();
        assert_eq!(output.elements.len(), 10);
        assert_eq!(output.pagination.start_index, 0);
        assert_eq!(output.pagination.page_size, 10);
        assert!(output.pagination.has_more);
    }

    #[test]
    fn test_pagination_output_has_no_more() {
        let pagination_input = PaginationInput { start_index: 20, page_size: 10 };
        let output = ListOutputType::from_rows((0..10).collect::<Vec<i32>>(), &pagination_input).unwrap();
        assert_eq!(output.elements.len(), 10);
        assert_eq!(output.pagination.start_index, 20);
        assert!(!output.pagination.has_more);
    }

    #[test]
    fn test_pagination_output_empty() {
        let pagination_input = PaginationInput { start_index: 0, page_size: 10 };
        let output = ListOutputType::from_rows(Vec::<i32>::new(), &pagination_input).unwrap();
        assert!(output.elements.is_empty());
        assert!(!output.pagination.has_more);
    }
}
