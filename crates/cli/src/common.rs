//! Shared infrastructure for marksync commands.
//!
//! Credential resolution (flags > env > saved login), project config
//! loading, LMS error mapping, and the stderr progress printer.

use std::path::Path;

use marksync_api::{load_auth, Credentials, LmsError, Progress};
use marksync_sheet::{CsvSheet, ProjectConfig, SheetLayout};

use crate::exit_codes;
use crate::CliError;

/// Project config file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "marksync.toml";

/// Resolve credentials: explicit flags win, then the saved login.
pub fn resolve_credentials(
    domain: Option<&str>,
    token: Option<&str>,
) -> Result<Credentials, CliError> {
    if let (Some(domain), Some(token)) = (domain, token) {
        return Ok(Credentials::new(token.to_string(), domain));
    }

    let mut creds = load_auth().ok_or_else(|| CliError {
        code: exit_codes::EXIT_NOT_AUTH,
        message: "not logged in".into(),
        hint: Some("run `marksync login --domain <lms> --token <token>` or pass --domain/--token".into()),
    })?;

    // Partial overrides on top of the saved login
    if let Some(domain) = domain {
        creds.domain = marksync_api::normalize_domain(domain);
    }
    if let Some(token) = token {
        creds.token = token.to_string();
    }
    Ok(creds)
}

/// Load `marksync.toml` when present; defaults otherwise.
pub fn load_project_config() -> Result<ProjectConfig, CliError> {
    match std::fs::read_to_string(PROJECT_CONFIG_FILE) {
        Ok(text) => ProjectConfig::from_toml(&text).map_err(|e| CliError {
            code: exit_codes::EXIT_USAGE,
            message: format!("invalid {PROJECT_CONFIG_FILE}: {e}"),
            hint: None,
        }),
        Err(_) => Ok(ProjectConfig::default()),
    }
}

/// Resolve the sheet layout from the project config.
pub fn resolve_layout(config: &ProjectConfig) -> Result<SheetLayout, CliError> {
    config.layout().map_err(|e| CliError {
        code: exit_codes::EXIT_USAGE,
        message: format!("invalid {PROJECT_CONFIG_FILE}: {e}"),
        hint: None,
    })
}

/// Course id: flag wins, then `[course].id` from the project config.
pub fn resolve_course(flag: Option<String>, config: &ProjectConfig) -> Result<String, CliError> {
    flag.or_else(|| config.course.id.clone()).ok_or(CliError {
        code: exit_codes::EXIT_USAGE,
        message: "missing course id".into(),
        hint: Some(format!(
            "pass --course or set [course].id in {PROJECT_CONFIG_FILE}"
        )),
    })
}

/// Open the sheet of record.
pub fn open_sheet(path: &Path) -> Result<CsvSheet, CliError> {
    CsvSheet::open(path).map_err(|e| CliError {
        code: exit_codes::EXIT_SHEET,
        message: e.to_string(),
        hint: None,
    })
}

/// Save the sheet of record.
pub fn save_sheet(sheet: &CsvSheet, path: &Path) -> Result<(), CliError> {
    sheet.save(path).map_err(|e| CliError {
        code: exit_codes::EXIT_SHEET,
        message: e.to_string(),
        hint: None,
    })
}

/// Map an LMS client error to a CLI error with the right exit code.
pub fn lms_error(err: LmsError) -> CliError {
    match err {
        LmsError::NotAuthenticated => CliError {
            code: exit_codes::EXIT_NOT_AUTH,
            message: err.to_string(),
            hint: Some("run `marksync login` first".into()),
        },
        LmsError::Http { status: 401, .. } | LmsError::Http { status: 403, .. } => CliError {
            code: exit_codes::EXIT_AUTH_REJECTED,
            message: format!("the LMS rejected the token: {err}"),
            hint: Some("re-run `marksync login` with a fresh token".into()),
        },
        other => CliError {
            code: exit_codes::EXIT_UPSTREAM,
            message: other.to_string(),
            hint: None,
        },
    }
}

/// Progress printer for stderr, gated by --quiet and TTY detection.
pub fn progress_printer(quiet: bool) -> impl FnMut(Progress<'_>) {
    let show = !quiet && atty::is(atty::Stream::Stderr);
    move |p: Progress<'_>| {
        if show {
            eprintln!("  {}", p.detail);
        }
    }
}

/// Read the SIS key column as `(absolute sheet row, key)` pairs.
pub fn read_local_keys(sheet: &CsvSheet, layout: &SheetLayout) -> Vec<(usize, String)> {
    use marksync_sheet::SheetStore;
    let first = layout.first_data_row();
    sheet
        .read_column(first, layout.sis_column)
        .into_iter()
        .enumerate()
        .map(|(i, key)| (first + i, key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_bypass_saved_auth() {
        let creds = resolve_credentials(Some("lms.test"), Some("tok")).unwrap();
        assert_eq!(creds.domain, "https://lms.test");
        assert_eq!(creds.token, "tok");
    }

    #[test]
    fn course_flag_wins_over_config() {
        let config = ProjectConfig::from_toml("[course]\nid = \"99\"\n").unwrap();
        assert_eq!(resolve_course(Some("7".into()), &config).unwrap(), "7");
        assert_eq!(resolve_course(None, &config).unwrap(), "99");
    }

    #[test]
    fn missing_course_is_usage_error() {
        let config = ProjectConfig::default();
        let err = resolve_course(None, &config).unwrap_err();
        assert_eq!(err.code, exit_codes::EXIT_USAGE);
    }

    #[test]
    fn local_keys_carry_absolute_rows() {
        use marksync_sheet::SheetStore;
        let mut sheet = CsvSheet::new();
        sheet.write_cell(1, 1, "SIS ID");
        sheet.write_cell(2, 1, "s1");
        sheet.write_cell(3, 1, "s2");

        let keys = read_local_keys(&sheet, &SheetLayout::default());
        assert_eq!(keys, vec![(2, "s1".to_string()), (3, "s2".to_string())]);
    }
}
