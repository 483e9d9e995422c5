//! Grade value classification and submission outcomes.

use std::fmt;

use serde::Serialize;

/// A grade as it will be posted.
///
/// `Clear` un-posts the grade (the cell was blank), which is not the
/// same as a score of zero. Textual input that is neither blank nor a finite
/// number is rejected here, before anything touches the network.
#[derive(Debug, Clone, PartialEq)]
pub enum GradeValue {
    Clear,
    Score(f64),
}

/// Local rejection of a grade cell's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeParseError {
    pub input: String,
}

impl fmt::Display for GradeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a numeric grade: '{}'", self.input)
    }
}

impl std::error::Error for GradeParseError {}

impl GradeValue {
    /// Classify a sheet cell's text: trimmed-empty is the clear-sentinel,
    /// a finite number is a score, everything else is invalid.
    pub fn parse(input: &str) -> Result<Self, GradeParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::Clear);
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Self::Score(n)),
            _ => Err(GradeParseError {
                input: input.to_string(),
            }),
        }
    }

    /// JSON value for the `posted_grade` submission field. The clear
    /// sentinel posts an empty string, which removes the grade.
    pub fn as_posted_grade(&self) -> serde_json::Value {
        match self {
            Self::Clear => serde_json::Value::String(String::new()),
            Self::Score(n) => serde_json::json!(n),
        }
    }
}

/// One submission attempt's result. Failures carry a human-readable
/// reason; no attempt is ever silently dropped.
#[derive(Debug, Clone, Serialize)]
pub struct GradeWriteOutcome {
    pub student_key: String,
    pub success: bool,
    pub message: String,
}
