//! `marksync roster` — pull the class roster into the sheet.
//!
//! Fetches every student enrolled in the course, joins them to the
//! sheet's SIS-id column, and writes names into the name column. Rows
//! the course doesn't know, and students the sheet doesn't list, are
//! counted in the summary; neither is an error.

use std::path::Path;

use marksync_api::LmsClient;
use marksync_recon::{reconcile, CellWrite};
use marksync_sheet::SheetStore;

use crate::common::{
    lms_error, load_project_config, open_sheet, progress_printer, read_local_keys,
    resolve_course, resolve_credentials, resolve_layout, save_sheet,
};
use crate::exit_codes;
use crate::CliError;

pub fn cmd_roster(
    course: Option<String>,
    sheet_path: &Path,
    domain: Option<&str>,
    token: Option<&str>,
    quiet: bool,
) -> Result<u8, CliError> {
    let creds = resolve_credentials(domain, token)?;
    let config = load_project_config()?;
    let course = resolve_course(course, &config)?;
    let layout = resolve_layout(&config)?;

    let mut sheet = open_sheet(sheet_path)?;
    let local_keys = read_local_keys(&sheet, &layout);

    let client = LmsClient::from_credentials(&creds);
    if !quiet {
        eprintln!("Fetching roster for course {course}...");
    }
    let seed = client.course_users_url(&course).map_err(lms_error)?;
    let mut progress = progress_printer(quiet);
    let users = client.fetch_all(&seed, &mut progress).map_err(lms_error)?;

    let report = reconcile(&local_keys, &users, user_sis_id, user_name);
    for entry in &report.entries {
        sheet.write_cell(entry.row, layout.name_column, entry.value.as_cell_text());
    }
    save_sheet(&sheet, sheet_path)?;

    println!(
        "Roster: {} rows updated, {} sheet rows without a course match, \
         {} enrolled students not in the sheet, {} without an SIS id, \
         {} blank-key rows skipped",
        report.matched(),
        report.local_misses,
        report.unmatched_remote,
        report.keyless_remote,
        report.empty_local_keys,
    );
    Ok(exit_codes::EXIT_SUCCESS)
}

// ── Record extractors ───────────────────────────────────────────────

fn user_sis_id(record: &serde_json::Value) -> Option<String> {
    record
        .get("sis_user_id")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn user_name(record: &serde_json::Value) -> CellWrite {
    CellWrite::from_json(record.get("name"))
}
