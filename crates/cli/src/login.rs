//! `marksync login` / `marksync logout` — credential management.

use marksync_api::{delete_auth, save_auth, Credentials, LmsClient};

use crate::common::lms_error;
use crate::exit_codes;
use crate::CliError;

/// Verify the token against the API, then store it.
pub fn cmd_login(
    domain: Option<String>,
    token: Option<String>,
    quiet: bool,
) -> Result<u8, CliError> {
    let domain = domain.ok_or(CliError {
        code: exit_codes::EXIT_USAGE,
        message: "missing LMS domain".into(),
        hint: Some("pass --domain, e.g. --domain school.instructure.com".into()),
    })?;
    let token = token.ok_or(CliError {
        code: exit_codes::EXIT_USAGE,
        message: "missing API token".into(),
        hint: Some("pass --token or set MARKSYNC_TOKEN".into()),
    })?;

    let mut creds = Credentials::new(token, &domain);
    let client = LmsClient::from_credentials(&creds);
    let info = client.verify_token().map_err(lms_error)?;
    creds.user_name = Some(info.name.clone());

    save_auth(&creds).map_err(|e| CliError {
        code: exit_codes::EXIT_ERROR,
        message: e,
        hint: None,
    })?;

    if !quiet {
        eprintln!("Logged in to {} as {}", creds.domain, info.name);
    }
    Ok(exit_codes::EXIT_SUCCESS)
}

/// Delete stored credentials.
pub fn cmd_logout(quiet: bool) -> Result<u8, CliError> {
    delete_auth().map_err(|e| CliError {
        code: exit_codes::EXIT_ERROR,
        message: e,
        hint: None,
    })?;
    if !quiet {
        eprintln!("Logged out");
    }
    Ok(exit_codes::EXIT_SUCCESS)
}
