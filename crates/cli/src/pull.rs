//! `marksync pull` — pull grades into the sheet.
//!
//! One assignment writes the configured grade column; `--all` lays the
//! whole gradebook out as one column per assignment, starting at the
//! grade column, with assignment names in the header row. A remote
//! score of null (or no score field at all) clears the cell: a missing
//! grade is not a zero.

use std::path::Path;

use marksync_api::LmsClient;
use marksync_recon::{reconcile, CellWrite, ReconReport};
use marksync_sheet::{index_to_letters, SheetStore};

use crate::common::{
    lms_error, load_project_config, open_sheet, progress_printer, read_local_keys,
    resolve_course, resolve_credentials, resolve_layout, save_sheet,
};
use crate::exit_codes;
use crate::CliError;

pub fn cmd_pull(
    course: Option<String>,
    assignment: Option<String>,
    all: bool,
    sheet_path: &Path,
    domain: Option<&str>,
    token: Option<&str>,
    quiet: bool,
) -> Result<u8, CliError> {
    match (&assignment, all) {
        (Some(_), true) => {
            return Err(CliError {
                code: exit_codes::EXIT_USAGE,
                message: "--assignment and --all are mutually exclusive".into(),
                hint: None,
            })
        }
        (None, false) => {
            return Err(CliError {
                code: exit_codes::EXIT_USAGE,
                message: "nothing to pull".into(),
                hint: Some("pass --assignment <id> for one assignment or --all for the gradebook".into()),
            })
        }
        _ => {}
    }

    let creds = resolve_credentials(domain, token)?;
    let config = load_project_config()?;
    let course = resolve_course(course, &config)?;
    let layout = resolve_layout(&config)?;

    let mut sheet = open_sheet(sheet_path)?;
    let local_keys = read_local_keys(&sheet, &layout);
    let client = LmsClient::from_credentials(&creds);
    let mut progress = progress_printer(quiet);

    if let Some(assignment_id) = assignment {
        // ── One assignment ──────────────────────────────────────────
        if !quiet {
            eprintln!("Fetching submissions for assignment {assignment_id}...");
        }
        let seed = client
            .assignment_submissions_url(&course, &assignment_id)
            .map_err(lms_error)?;
        let submissions = client.fetch_all(&seed, &mut progress).map_err(lms_error)?;

        let report = reconcile(&local_keys, &submissions, submission_sis_id, submission_score);
        write_column(&mut sheet, layout.grade_column, &report);
        save_sheet(&sheet, sheet_path)?;

        print_summary(&report, 1);
        return Ok(exit_codes::EXIT_SUCCESS);
    }

    // ── Whole gradebook ─────────────────────────────────────────────
    if !quiet {
        eprintln!("Fetching assignments for course {course}...");
    }
    let seed = client.course_assignments_url(&course).map_err(lms_error)?;
    let assignments = client.fetch_all(&seed, &mut progress).map_err(lms_error)?;

    if assignments.is_empty() {
        println!("Gradebook: course {course} has no assignments");
        return Ok(exit_codes::EXIT_SUCCESS);
    }

    let mut totals = ReconReport::default();
    let mut columns = 0u32;

    for record in &assignments {
        let Some(assignment_id) = record_id(record) else {
            // An assignment record without an id cannot be queried;
            // count it and move on.
            totals.keyless_remote += 1;
            continue;
        };
        let name = record.get("name").and_then(|v| v.as_str()).unwrap_or("");
        let column = layout.grade_column + columns;
        columns += 1;

        if layout.header_rows >= 1 {
            sheet.write_cell(layout.header_rows, column, name);
        }

        if !quiet {
            eprintln!("Fetching submissions for '{name}' ({assignment_id})...");
        }
        // A fetch failure aborts the whole pull: a partial gradebook
        // column is worse than none.
        let seed = client
            .student_submissions_url(&course, &assignment_id)
            .map_err(lms_error)?;
        let submissions = client.fetch_all(&seed, &mut progress).map_err(lms_error)?;

        let report = reconcile(&local_keys, &submissions, submission_sis_id, submission_score);
        write_column(&mut sheet, column, &report);

        totals.local_misses += report.local_misses;
        totals.unmatched_remote += report.unmatched_remote;
        totals.keyless_remote += report.keyless_remote;
        totals.empty_local_keys = report.empty_local_keys;
        totals.entries.extend(report.entries);
    }

    save_sheet(&sheet, sheet_path)?;
    if columns > 0 && !quiet {
        eprintln!(
            "Gradebook columns {}-{}",
            index_to_letters(layout.grade_column),
            index_to_letters(layout.grade_column + columns - 1),
        );
    }
    print_summary(&totals, columns as usize);
    Ok(exit_codes::EXIT_SUCCESS)
}

fn write_column(sheet: &mut marksync_sheet::CsvSheet, column: u32, report: &ReconReport) {
    for entry in &report.entries {
        sheet.write_cell(entry.row, column, entry.value.as_cell_text());
    }
}

fn print_summary(report: &ReconReport, assignments: usize) {
    println!(
        "Grades: {} cells written across {} assignment(s), \
         {} row/submission misses, {} remote records without an SIS id, \
         {} blank-key rows skipped",
        report.entries.len(),
        assignments,
        report.local_misses,
        report.keyless_remote,
        report.empty_local_keys,
    );
}

// ── Record extractors ───────────────────────────────────────────────

/// Submission records carry the submitting user embedded
/// (`include[]=user`); the SIS id lives on that user.
fn submission_sis_id(record: &serde_json::Value) -> Option<String> {
    record
        .get("user")
        .and_then(|u| u.get("sis_user_id"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn submission_score(record: &serde_json::Value) -> CellWrite {
    CellWrite::from_json(record.get("score"))
}

/// LMS ids arrive as numbers or strings depending on the endpoint.
fn record_id(record: &serde_json::Value) -> Option<String> {
    match record.get("id") {
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}
