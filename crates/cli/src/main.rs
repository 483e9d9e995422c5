// marksync CLI - sync rosters and grades between a CSV sheet and an LMS course

mod common;
mod exit_codes;
mod login;
mod pull;
mod push;
mod report;
mod roster;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Error carried from a command to the process exit.
#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn print(&self) {
        eprintln!("error: {}", self.message);
        if let Some(hint) = &self.hint {
            eprintln!("hint: {hint}");
        }
    }
}

#[derive(Parser)]
#[command(name = "marksync")]
#[command(about = "Sync rosters and grades between a CSV sheet and an LMS course")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// LMS domain (default: saved login)
    #[arg(long, global = true)]
    domain: Option<String>,

    /// API token (default: saved login)
    #[arg(long, global = true, env = "MARKSYNC_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Suppress progress output on stderr
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify an API token and store it for later commands
    #[command(after_help = "\
Examples:
  marksync login --domain school.instructure.com --token <token>
  MARKSYNC_TOKEN=<token> marksync login --domain school.instructure.com")]
    Login,

    /// Delete stored credentials
    Logout,

    /// Pull the class roster: write student names next to their SIS ids
    #[command(after_help = "\
Examples:
  marksync roster --course 1042 --sheet grades.csv
  marksync roster --sheet grades.csv            # course id from marksync.toml")]
    Roster {
        /// Course id (default: [course].id in marksync.toml)
        #[arg(long)]
        course: Option<String>,

        /// Sheet of record (CSV)
        #[arg(long)]
        sheet: PathBuf,
    },

    /// Pull grades for one assignment, or the whole gradebook
    #[command(after_help = "\
Examples:
  marksync pull --course 1042 --assignment 77 --sheet grades.csv
  marksync pull --course 1042 --all --sheet grades.csv")]
    Pull {
        /// Course id (default: [course].id in marksync.toml)
        #[arg(long)]
        course: Option<String>,

        /// Assignment id
        #[arg(long)]
        assignment: Option<String>,

        /// Pull every assignment, one sheet column each
        #[arg(long)]
        all: bool,

        /// Sheet of record (CSV)
        #[arg(long)]
        sheet: PathBuf,
    },

    /// Push the sheet's grade column to an assignment
    #[command(after_help = "\
Blank grade cells un-post the grade (distinct from 0). Non-numeric grade
text is rejected locally and never sent. Exit code 14 means the batch
completed but some rows failed; the report file has every outcome.

Examples:
  marksync push --course 1042 --assignment 77 --sheet grades.csv
  marksync push --course 1042 --assignment 77 --sheet grades.csv --yes --report out.json")]
    Push {
        /// Course id (default: [course].id in marksync.toml)
        #[arg(long)]
        course: Option<String>,

        /// Assignment id
        #[arg(long)]
        assignment: String,

        /// Sheet of record (CSV)
        #[arg(long)]
        sheet: PathBuf,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,

        /// Where to write the full outcome report
        #[arg(long, default_value = "marksync-report.json")]
        report: PathBuf,
    },
}

fn run(cli: Cli) -> Result<u8, CliError> {
    let domain = cli.domain.as_deref();
    let token = cli.token.as_deref();

    match cli.command {
        Commands::Login => login::cmd_login(cli.domain.clone(), cli.token.clone(), cli.quiet),
        Commands::Logout => login::cmd_logout(cli.quiet),
        Commands::Roster { course, sheet } => {
            roster::cmd_roster(course, &sheet, domain, token, cli.quiet)
        }
        Commands::Pull {
            course,
            assignment,
            all,
            sheet,
        } => pull::cmd_pull(course, assignment, all, &sheet, domain, token, cli.quiet),
        Commands::Push {
            course,
            assignment,
            sheet,
            yes,
            report,
        } => push::cmd_push(
            course, &assignment, &sheet, yes, &report, domain, token, cli.quiet,
        ),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            e.print();
            ExitCode::from(e.code)
        }
    }
}
