// Crucible CLI - submission management against the Crucible API

mod commands;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::ConnectionArgs;
use crucible_client::DEFAULT_API_BASE;
use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "crucible")]
#[command(about = "Client for the Crucible submission-management API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store API credentials for later commands
    #[command(after_help = "\
Examples:
  crucible login --api-key crucible-key-123
  CRUCIBLE_API_KEY=crucible-key-123 crucible login")]
    Login {
        /// API key (falls back to CRUCIBLE_API_KEY, then an interactive prompt)
        #[arg(long)]
        api_key: Option<String>,

        /// API base URL
        #[arg(long, default_value = DEFAULT_API_BASE)]
        api_base: String,
    },

    /// Delete stored API credentials
    Logout,

    /// Create, inspect, or delete submissions
    #[command(subcommand)]
    Submission(SubmissionCmd),

    /// Attach or delete runs on a submission
    #[command(subcommand)]
    Run(RunCmd),

    /// Upload or delete evidence on a submission
    #[command(subcommand)]
    Evidence(EvidenceCmd),
}

#[derive(Subcommand)]
enum SubmissionCmd {
    /// Upload a submission file; prints the new submission ID
    #[command(after_help = "\
Examples:
  crucible submission create sub.json
  crucible submission create sub.json --api-key crucible-key-123")]
    Create {
        /// Submission file (sent as multipart field `file`)
        file: PathBuf,

        #[command(flatten)]
        conn: ConnectionArgs,
    },

    /// Fetch submission state; prints the JSON document
    Get {
        /// Submission ID
        submission_id: String,

        #[command(flatten)]
        conn: ConnectionArgs,
    },

    /// Delete a submission
    Delete {
        /// Submission ID
        submission_id: String,

        #[command(flatten)]
        conn: ConnectionArgs,
    },
}

#[derive(Subcommand)]
enum RunCmd {
    /// Attach a run file to a submission
    Add {
        /// Submission ID
        submission_id: String,

        /// Run file (sent as multipart field `file`)
        file: PathBuf,

        #[command(flatten)]
        conn: ConnectionArgs,
    },

    /// Delete a run from a submission
    Delete {
        /// Submission ID
        submission_id: String,

        /// Run ID
        run_id: String,

        #[command(flatten)]
        conn: ConnectionArgs,
    },
}

#[derive(Subcommand)]
enum EvidenceCmd {
    /// Upload an evidence file; prints the new evidence ID
    Upload {
        /// Submission ID
        submission_id: String,

        /// Evidence file (sent as multipart field `file`, text/plain)
        file: PathBuf,

        #[command(flatten)]
        conn: ConnectionArgs,
    },

    /// Delete an evidence file from a submission
    Delete {
        /// Submission ID
        submission_id: String,

        /// Evidence ID
        evidence_id: String,

        #[command(flatten)]
        conn: ConnectionArgs,
    },
}

/// CLI error: exit code, message, and an optional hint for the user.
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Login { api_key, api_base } => commands::cmd_login(api_key, api_base),
        Commands::Logout => commands::cmd_logout(),
        Commands::Submission(cmd) => match cmd {
            SubmissionCmd::Create { file, conn } => commands::cmd_submission_create(file, &conn),
            SubmissionCmd::Get { submission_id, conn } => {
                commands::cmd_submission_get(&submission_id, &conn)
            }
            SubmissionCmd::Delete { submission_id, conn } => {
                commands::cmd_submission_delete(&submission_id, &conn)
            }
        },
        Commands::Run(cmd) => match cmd {
            RunCmd::Add { submission_id, file, conn } => {
                commands::cmd_run_add(&submission_id, file, &conn)
            }
            RunCmd::Delete { submission_id, run_id, conn } => {
                commands::cmd_run_delete(&submission_id, &run_id, &conn)
            }
        },
        Commands::Evidence(cmd) => match cmd {
            EvidenceCmd::Upload { submission_id, file, conn } => {
                commands::cmd_evidence_upload(&submission_id, file, &conn)
            }
            EvidenceCmd::Delete { submission_id, evidence_id, conn } => {
                commands::cmd_evidence_delete(&submission_id, &evidence_id, &conn)
            }
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = e.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(e.code)
        }
    }
}
