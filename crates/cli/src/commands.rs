//! Crucible CLI commands: login, logout, and the submission/run/evidence
//! operations.
//!
//! `crucible login`               — store API key
//! `crucible submission create`   — upload a submission file, print its ID
//! `crucible run add`             — attach a run file to a submission
//! `crucible evidence upload`     — attach an evidence file, print its ID

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;

use crucible_client::{
    auth_file_path, delete_auth, load_auth, save_auth, ApiOutcome, AuthCredentials,
    CrucibleClient, CrucibleError, DEFAULT_API_BASE,
};

use crate::exit_codes::*;
use crate::CliError;

// ── Connection resolution ───────────────────────────────────────────

/// API connection options shared by all service commands.
///
/// Resolution order for each: flag > environment variable > saved login.
#[derive(Debug, Args)]
pub struct ConnectionArgs {
    /// API key (falls back to CRUCIBLE_API_KEY, then saved login)
    #[arg(long)]
    pub api_key: Option<String>,

    /// API base URL (falls back to CRUCIBLE_API_BASE, then saved login)
    #[arg(long)]
    pub api_base: Option<String>,
}

/// Build a client from flags, environment, or the saved login.
pub fn resolve_client(conn: &ConnectionArgs) -> Result<CrucibleClient, CliError> {
    let saved = load_auth();

    let api_key = conn
        .api_key
        .clone()
        .or_else(|| std::env::var("CRUCIBLE_API_KEY").ok())
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .or_else(|| saved.as_ref().map(|c| c.api_key.clone()))
        .ok_or(CliError {
            code: EXIT_API_NOT_AUTH,
            message: "Not authenticated".into(),
            hint: Some("run `crucible login`, pass --api-key, or set CRUCIBLE_API_KEY".into()),
        })?;

    let api_base = conn
        .api_base
        .clone()
        .or_else(|| std::env::var("CRUCIBLE_API_BASE").ok())
        .or_else(|| saved.as_ref().map(|c| c.api_base.clone()))
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    Ok(CrucibleClient::new(AuthCredentials::new(api_key, api_base)))
}

// ── Login / logout ──────────────────────────────────────────────────

pub fn cmd_login(api_key: Option<String>, api_base: String) -> Result<(), CliError> {
    // Resolve key: --api-key flag > CRUCIBLE_API_KEY env > interactive prompt
    let api_key = if let Some(k) = api_key {
        k
    } else if let Ok(k) = std::env::var("CRUCIBLE_API_KEY") {
        k
    } else if atty::is(atty::Stream::Stdin) {
        eprint!("Crucible API key: ");
        io::stderr().flush().ok();
        let mut buf = String::new();
        io::stdin()
            .read_line(&mut buf)
            .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
        let trimmed = buf.trim().to_string();
        if trimmed.is_empty() {
            return Err(CliError {
                code: EXIT_USAGE,
                message: "No API key provided".into(),
                hint: Some("pass --api-key or set CRUCIBLE_API_KEY".into()),
            });
        }
        trimmed
    } else {
        return Err(CliError {
            code: EXIT_USAGE,
            message: "No API key provided and stdin is not a TTY".into(),
            hint: Some("pass --api-key or set CRUCIBLE_API_KEY".into()),
        });
    };

    let creds = AuthCredentials::new(api_key, api_base);
    save_auth(&creds).map_err(|e| CliError { code: EXIT_ERROR, message: e, hint: None })?;

    match auth_file_path() {
        Some(path) => eprintln!("Saved credentials to {}", path.display()),
        None => eprintln!("Saved credentials"),
    }
    Ok(())
}

pub fn cmd_logout() -> Result<(), CliError> {
    delete_auth().map_err(|e| CliError { code: EXIT_ERROR, message: e, hint: None })?;
    eprintln!("Logged out");
    Ok(())
}

// ── Submission commands ─────────────────────────────────────────────

pub fn cmd_submission_create(file: PathBuf, conn: &ConnectionArgs) -> Result<(), CliError> {
    if !file.exists() {
        return Err(CliError {
            code: EXIT_USAGE,
            message: format!("File not found: {}", file.display()),
            hint: None,
        });
    }

    let client = resolve_client(conn)?;
    let outcome = client.create_submission(&file).map_err(api_error)?;
    print_outcome(outcome)
}

pub fn cmd_submission_get(submission_id: &str, conn: &ConnectionArgs) -> Result<(), CliError> {
    let client = resolve_client(conn)?;
    let outcome = client.get_submission(submission_id).map_err(api_error)?;
    print_outcome(outcome)
}

pub fn cmd_submission_delete(submission_id: &str, conn: &ConnectionArgs) -> Result<(), CliError> {
    let client = resolve_client(conn)?;
    let outcome = client.delete_submission(submission_id).map_err(api_error)?;
    eprintln!("Deleted submission {}", submission_id);
    print_outcome(outcome)
}

// ── Run commands ────────────────────────────────────────────────────

pub fn cmd_run_add(
    submission_id: &str,
    file: PathBuf,
    conn: &ConnectionArgs,
) -> Result<(), CliError> {
    if !file.exists() {
        return Err(CliError {
            code: EXIT_USAGE,
            message: format!("File not found: {}", file.display()),
            hint: None,
        });
    }

    let client = resolve_client(conn)?;
    let outcome = client.add_run(submission_id, &file).map_err(api_error)?;
    print_outcome(outcome)
}

pub fn cmd_run_delete(
    submission_id: &str,
    run_id: &str,
    conn: &ConnectionArgs,
) -> Result<(), CliError> {
    let client = resolve_client(conn)?;
    let outcome = client.delete_run(submission_id, run_id).map_err(api_error)?;
    eprintln!("Deleted run {}", run_id);
    print_outcome(outcome)
}

// ── Evidence commands ───────────────────────────────────────────────

pub fn cmd_evidence_upload(
    submission_id: &str,
    file: PathBuf,
    conn: &ConnectionArgs,
) -> Result<(), CliError> {
    if !file.exists() {
        return Err(CliError {
            code: EXIT_USAGE,
            message: format!("File not found: {}", file.display()),
            hint: None,
        });
    }

    let client = resolve_client(conn)?;
    let outcome = client.upload_evidence(submission_id, &file).map_err(api_error)?;
    print_outcome(outcome)
}

pub fn cmd_evidence_delete(
    submission_id: &str,
    evidence_id: &str,
    conn: &ConnectionArgs,
) -> Result<(), CliError> {
    let client = resolve_client(conn)?;
    let outcome = client
        .delete_evidence(submission_id, evidence_id)
        .map_err(api_error)?;
    eprintln!("Deleted evidence {}", evidence_id);
    print_outcome(outcome)
}

// ── Output / error mapping ──────────────────────────────────────────

/// Print an outcome: bare identifier, pretty JSON, or the raw body with an
/// HTTP-status note on stderr.
fn print_outcome(outcome: ApiOutcome) -> Result<(), CliError> {
    match outcome {
        ApiOutcome::Id(id) => println!("{}", id),
        ApiOutcome::Document(doc) => {
            let pretty = serde_json::to_string_pretty(&doc)
                .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
            println!("{}", pretty);
        }
        ApiOutcome::Raw(raw) => {
            eprintln!("HTTP {} (body was not JSON)", raw.status);
            if !raw.body.is_empty() {
                println!("{}", raw.body);
            }
        }
    }
    Ok(())
}

fn api_error(e: CrucibleError) -> CliError {
    let code = api_exit_code(&e);
    match e {
        CrucibleError::NotAuthenticated => CliError {
            code,
            message: "Not authenticated".into(),
            hint: Some("run `crucible login` first".into()),
        },
        CrucibleError::Network(msg) => CliError {
            code,
            message: format!("Cannot reach Crucible: {}", msg),
            hint: None,
        },
        CrucibleError::Http(status, msg) => CliError {
            code,
            message: format!("HTTP {}: {}", status, msg),
            hint: None,
        },
        CrucibleError::Parse(msg) => CliError {
            code,
            message: format!("Could not decode response: {}", msg),
            hint: None,
        },
        CrucibleError::Io(msg) => CliError { code, message: msg, hint: None },
    }
}
