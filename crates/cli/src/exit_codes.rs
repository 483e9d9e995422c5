//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Meaning                                             |
//! |------|-----------------------------------------------------|
//! | 0    | Success                                             |
//! | 1    | General error (unspecified)                         |
//! | 2    | CLI usage error (bad args, missing config)          |
//! | 10   | Not logged in (no stored credentials)               |
//! | 11   | Token rejected by the LMS (401/403)                 |
//! | 12   | Upstream/API error (non-2xx, network, bad payload)  |
//! | 13   | Sheet file error (missing, unreadable, unwritable)  |
//! | 14   | Push completed but some rows failed or were invalid |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// No stored credentials and no --domain/--token override.
pub const EXIT_NOT_AUTH: u8 = 10;

/// The LMS rejected the token (401/403).
pub const EXIT_AUTH_REJECTED: u8 = 11;

/// Upstream failure: non-2xx status, transport error, unparseable
/// response, or a pagination chain that never terminated.
pub const EXIT_UPSTREAM: u8 = 12;

/// Sheet file could not be read or written.
pub const EXIT_SHEET: u8 = 13;

/// The push batch ran to completion but at least one row failed
/// remotely or was rejected locally. The summary and report carry the
/// details.
pub const EXIT_PUSH_PARTIAL: u8 = 14;
