//! `marksync push` — post the sheet's grade column to an assignment.
//!
//! Each data row is classified before anything touches the network:
//! a blank SIS key skips the row, non-numeric grade text is rejected
//! locally, and a blank grade becomes the clear-sentinel (un-posts the
//! grade). Valid rows go out one PUT at a time; one student's failure
//! never blocks the rest.
//! The summary always prints, and the full outcome list lands in a JSON
//! report file.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use marksync_api::{GradeValue, GradeWriteOutcome, LmsClient};
use marksync_sheet::SheetStore;

use crate::common::{
    load_project_config, open_sheet, progress_printer, read_local_keys, resolve_course,
    resolve_credentials, resolve_layout,
};
use crate::exit_codes;
use crate::report::RunReport;
use crate::CliError;

/// Courtesy pause between submissions. Not a correctness requirement,
/// just politeness toward the API's rate limiter.
const SUBMIT_PAUSE: Duration = Duration::from_millis(150);

pub fn cmd_push(
    course: Option<String>,
    assignment_id: &str,
    sheet_path: &Path,
    yes: bool,
    report_path: &Path,
    domain: Option<&str>,
    token: Option<&str>,
    quiet: bool,
) -> Result<u8, CliError> {
    let creds = resolve_credentials(domain, token)?;
    let config = load_project_config()?;
    let course = resolve_course(course, &config)?;
    let layout = resolve_layout(&config)?;

    let sheet = open_sheet(sheet_path)?;
    let local_keys = read_local_keys(&sheet, &layout);
    let grade_texts = sheet.read_column(layout.first_data_row(), layout.grade_column);

    // ── Local classification, before any network call ───────────────
    let mut skipped_blank_keys = 0usize;
    let mut rejected: Vec<GradeWriteOutcome> = Vec::new();
    let mut batch: Vec<(String, GradeValue)> = Vec::new();

    for ((row, key), text) in local_keys.iter().zip(grade_texts.iter()) {
        let key = key.trim();
        if key.is_empty() {
            skipped_blank_keys += 1;
            continue;
        }
        match GradeValue::parse(text) {
            Ok(grade) => batch.push((key.to_string(), grade)),
            Err(e) => rejected.push(GradeWriteOutcome {
                student_key: key.to_string(),
                success: false,
                message: format!("{e} (row {row}), not sent"),
            }),
        }
    }

    if batch.is_empty() && rejected.is_empty() {
        println!("nothing to push: no rows with an SIS key");
        return Ok(exit_codes::EXIT_SUCCESS);
    }

    // ── Confirm before the destructive batch ────────────────────────
    if !yes {
        let prompt = format!(
            "Push {} grades to assignment {} in course {}? [y/N] ",
            batch.len(),
            assignment_id,
            course
        );
        if !confirm(&prompt) {
            println!("push cancelled");
            return Ok(exit_codes::EXIT_SUCCESS);
        }
    }

    // ── Submit ──────────────────────────────────────────────────────
    let client = LmsClient::from_credentials(&creds);
    if !quiet {
        eprintln!("Pushing {} grades...", batch.len());
    }
    let mut progress = progress_printer(quiet);
    let submitted =
        client.submit_grades(&course, assignment_id, &batch, SUBMIT_PAUSE, &mut progress);

    // ── Summary + durable report ────────────────────────────────────
    let report = RunReport::new(&course, assignment_id, skipped_blank_keys, rejected, submitted);
    report.write(report_path)?;

    println!("{}", report.summary_line());
    for line in report.failure_lines() {
        println!("{line}");
    }
    if !quiet {
        eprintln!("Full outcome list written to {}", report_path.display());
    }

    Ok(report.exit_code())
}

/// Ask on stderr, read one line from stdin. Anything but an explicit
/// yes declines.
fn confirm(prompt: &str) -> bool {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim(), "y" | "Y" | "yes" | "YES")
}

#[cfg(test)]
mod tests {
    use marksync_api::GradeValue;

    // Row classification is the push command's local half; the wire
    // half lives in marksync-api and the end-to-end path in tests/.

    #[test]
    fn blank_grade_is_clear_not_skip() {
        assert_eq!(GradeValue::parse("").unwrap(), GradeValue::Clear);
    }

    #[test]
    fn row_classification_shapes() {
        assert!(GradeValue::parse("92").is_ok());
        assert!(GradeValue::parse("92.5").is_ok());
        assert!(GradeValue::parse("ninety").is_err());
    }
}
