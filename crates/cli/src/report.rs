//! Push run summary and the durable outcome report.
//!
//! The on-screen summary caps the failure list; the JSON report written
//! next to the sheet always carries every outcome, so nothing is lost
//! when a 400-row push goes sideways.

use std::path::Path;

use serde::Serialize;

use marksync_api::GradeWriteOutcome;

use crate::exit_codes;
use crate::CliError;

/// Failure reasons shown on screen before "+N more".
pub const MAX_DISPLAY_REASONS: usize = 15;

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub ran_at: String,
    pub course_id: String,
    pub assignment_id: String,
    /// Grades accepted by the LMS.
    pub posted: usize,
    /// Submissions the LMS rejected or that failed in transit.
    pub failed: usize,
    /// Rows rejected locally (non-numeric grade text), never sent.
    pub invalid: usize,
    /// Rows with a blank SIS key, excluded up front.
    pub skipped_blank_keys: usize,
    /// Every outcome, local rejections included. Nothing is dropped.
    pub outcomes: Vec<GradeWriteOutcome>,
}

impl RunReport {
    /// `rejected` are local validation failures (already outcomes, never
    /// sent); `submitted` are the wire results in submission order.
    pub fn new(
        course_id: &str,
        assignment_id: &str,
        skipped_blank_keys: usize,
        rejected: Vec<GradeWriteOutcome>,
        submitted: Vec<GradeWriteOutcome>,
    ) -> Self {
        let invalid = rejected.len();
        let posted = submitted.iter().filter(|o| o.success).count();
        let failed = submitted.len() - posted;

        let mut outcomes = rejected;
        outcomes.extend(submitted);

        Self {
            ran_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            course_id: course_id.to_string(),
            assignment_id: assignment_id.to_string(),
            posted,
            failed,
            invalid,
            skipped_blank_keys,
            outcomes,
        }
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{} posted, {} failed, {} invalid, {} blank-key rows skipped",
            self.posted, self.failed, self.invalid, self.skipped_blank_keys
        )
    }

    /// Failure reasons for the terminal, capped at
    /// [`MAX_DISPLAY_REASONS`] with a "+N more" trailer.
    pub fn failure_lines(&self) -> Vec<String> {
        let failures: Vec<&GradeWriteOutcome> =
            self.outcomes.iter().filter(|o| !o.success).collect();

        let mut lines: Vec<String> = failures
            .iter()
            .take(MAX_DISPLAY_REASONS)
            .map(|o| format!("  {}: {}", o.student_key, o.message))
            .collect();

        if failures.len() > MAX_DISPLAY_REASONS {
            lines.push(format!(
                "  +{} more (see the report file)",
                failures.len() - MAX_DISPLAY_REASONS
            ));
        }
        lines
    }

    pub fn exit_code(&self) -> u8 {
        if self.failed + self.invalid > 0 {
            exit_codes::EXIT_PUSH_PARTIAL
        } else {
            exit_codes::EXIT_SUCCESS
        }
    }

    /// Write the full report as pretty JSON.
    pub fn write(&self, path: &Path) -> Result<(), CliError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| CliError {
            code: exit_codes::EXIT_ERROR,
            message: format!("report serialization error: {e}"),
            hint: None,
        })?;
        std::fs::write(path, json.as_bytes()).map_err(|e| CliError {
            code: exit_codes::EXIT_SHEET,
            message: format!("cannot write report to {}: {e}", path.display()),
            hint: None,
        })
    }
}
