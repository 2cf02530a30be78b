//! Parser configuration.

/// Options controlling how a query string is lexed and parsed.
///
/// The defaults match what a host usually wants: surrounding whitespace is
/// ignored and temporal literals are left for the evaluator to interpret.
///
/// ```
/// use sift_query::ParseOptions;
///
/// let options = ParseOptions::default().validate_temporal(true);
/// assert!(sift_query::parse_with("start < 25:00", &options).is_err());
/// assert!(sift_query::parse("start < 25:00").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Strip leading and trailing whitespace before lexing
    pub trim: bool,
    /// Reject TIME, DATE and DATETIME literals that are not real calendar
    /// values (`13:99`, `2021-2-30`, `0:15 am`)
    pub validate_temporal: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            trim: true,
            validate_temporal: false,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    pub fn validate_temporal(mut self, validate: bool) -> Self {
        self.validate_temporal = validate;
        self
    }
}
