//! Crucible HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required).
//! One request per operation: create submission → attach runs/evidence →
//! fetch state → delete. No retries, no local caching.

use std::path::Path;
use std::time::Duration;

use crate::auth::{load_auth, AuthCredentials, DEFAULT_API_BASE};

/// Crucible API client (blocking).
#[derive(Clone)]
pub struct CrucibleClient {
    http: reqwest::blocking::Client,
    api_base: String,
    api_key: String,
}

/// Error type for Crucible operations.
#[derive(Debug)]
pub enum CrucibleError {
    /// No credentials configured
    NotAuthenticated,
    /// Network error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// JSON parsing error
    Parse(String),
    /// File I/O error
    Io(String),
}

impl std::fmt::Display for CrucibleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrucibleError::NotAuthenticated => {
                write!(f, "Not authenticated — run `crucible login` first")
            }
            CrucibleError::Network(msg) => write!(f, "Network error: {}", msg),
            CrucibleError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            CrucibleError::Parse(msg) => write!(f, "Parse error: {}", msg),
            CrucibleError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for CrucibleError {}

/// The unparsed response: status plus body text as received.
///
/// Returned when JSON decoding fails or is inapplicable (empty 204 body).
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Outcome of a Crucible API call.
///
/// The service's responses do not have a single shape: identifier-returning
/// operations may come back without the expected field, and several endpoints
/// legitimately return empty or non-JSON bodies. Callers match on the variant
/// instead of guessing from a loosely typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    /// The expected identifier (`submission_id` / `evidence_id`).
    Id(String),
    /// A decoded JSON document (submission state, or a body missing the
    /// expected identifier field).
    Document(serde_json::Value),
    /// The raw response when the body is not valid JSON, or a 204 with an
    /// empty body.
    Raw(RawResponse),
}

impl ApiOutcome {
    /// The identifier, if this outcome is one.
    pub fn id(&self) -> Option<&str> {
        match self {
            ApiOutcome::Id(id) => Some(id),
            _ => None,
        }
    }

    /// The decoded document, if this outcome is one.
    pub fn document(&self) -> Option<&serde_json::Value> {
        match self {
            ApiOutcome::Document(doc) => Some(doc),
            _ => None,
        }
    }
}

impl CrucibleClient {
    /// Create a new client using saved auth credentials.
    pub fn from_saved_auth() -> Result<Self, CrucibleError> {
        let creds = load_auth().ok_or(CrucibleError::NotAuthenticated)?;
        Ok(Self::new(creds))
    }

    /// Create a new client from `CRUCIBLE_API_KEY` / `CRUCIBLE_API_BASE`.
    pub fn from_env() -> Result<Self, CrucibleError> {
        let api_key = std::env::var("CRUCIBLE_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(CrucibleError::NotAuthenticated)?;
        let api_base = std::env::var("CRUCIBLE_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Ok(Self::new(AuthCredentials::new(api_key, api_base)))
    }

    /// Create a new client with explicit credentials.
    pub fn new(creds: AuthCredentials) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("crucible/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_base: creds.api_base,
            api_key: creds.api_key,
        }
    }

    /// Create a submission from a file (POST /submission, multipart).
    ///
    /// Errors on non-2xx. Returns `Id` when the response carries
    /// `submission_id`, otherwise warns and returns the full `Document`.
    pub fn create_submission(&self, file_path: &Path) -> Result<ApiOutcome, CrucibleError> {
        let url = format!("{}/submission", self.api_base);
        let form = multipart_file(file_path, "application/json")?;

        let response = self
            .http
            .post(&url)
            .header("Authorization", &self.api_key)
            .multipart(form)
            .send()
            .map_err(|e| CrucibleError::Network(e.to_string()))?;

        let json = require_json(response)?;
        Ok(extract_id(json, "submission_id"))
    }

    /// Fetch submission state (GET /submission/{id}).
    ///
    /// Never errors on HTTP status. A body that is not valid JSON comes back
    /// as `Raw` with a diagnostic, not an error.
    pub fn get_submission(&self, submission_id: &str) -> Result<ApiOutcome, CrucibleError> {
        let url = format!("{}/submission/{}", self.api_base, submission_id);

        let response = self
            .http
            .get(&url)
            .header("Authorization", &self.api_key)
            .send()
            .map_err(|e| CrucibleError::Network(e.to_string()))?;

        Ok(decode_or_raw(response, "get submission"))
    }

    /// Attach a run file to a submission (PUT /submission/{id}/runs,
    /// multipart). Never errors on HTTP status.
    pub fn add_run(
        &self,
        submission_id: &str,
        file_path: &Path,
    ) -> Result<ApiOutcome, CrucibleError> {
        let url = format!("{}/submission/{}/runs", self.api_base, submission_id);
        let form = multipart_file(file_path, "application/json")?;

        let response = self
            .http
            .put(&url)
            .header("Authorization", &self.api_key)
            .multipart(form)
            .send()
            .map_err(|e| CrucibleError::Network(e.to_string()))?;

        Ok(decode_or_raw(response, "add run"))
    }

    /// Delete a run (DELETE /submission/{id}/runs/{run_id}).
    /// Errors on non-2xx.
    pub fn delete_run(
        &self,
        submission_id: &str,
        run_id: &str,
    ) -> Result<ApiOutcome, CrucibleError> {
        let url = format!(
            "{}/submission/{}/runs/{}",
            self.api_base, submission_id, run_id,
        );
        self.delete(&url, "delete run")
    }

    /// Upload an evidence file (PUT /submission/{id}/evidence, multipart,
    /// text/plain).
    ///
    /// Never errors on HTTP status — the body is decoded regardless, so a
    /// JSON error document missing `evidence_id` comes back as `Document`.
    pub fn upload_evidence(
        &self,
        submission_id: &str,
        file_path: &Path,
    ) -> Result<ApiOutcome, CrucibleError> {
        let url = format!("{}/submission/{}/evidence", self.api_base, submission_id);
        let form = multipart_file(file_path, "text/plain")?;

        let response = self
            .http
            .put(&url)
            .header("Authorization", &self.api_key)
            .multipart(form)
            .send()
            .map_err(|e| CrucibleError::Network(e.to_string()))?;

        let body = response
            .text()
            .map_err(|e| CrucibleError::Network(e.to_string()))?;
        let json: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| CrucibleError::Parse(e.to_string()))?;
        Ok(extract_id(json, "evidence_id"))
    }

    /// Delete an evidence file (DELETE /submission/{id}/evidence/{evidence_id}).
    /// Errors on non-2xx.
    pub fn delete_evidence(
        &self,
        submission_id: &str,
        evidence_id: &str,
    ) -> Result<ApiOutcome, CrucibleError> {
        let url = format!(
            "{}/submission/{}/evidence/{}",
            self.api_base, submission_id, evidence_id,
        );
        self.delete(&url, "delete evidence")
    }

    /// Delete a submission (DELETE /submission/{id}). Errors on non-2xx.
    ///
    /// Not idempotent locally: a repeated delete reports whatever the server
    /// says about the already-deleted ID.
    pub fn delete_submission(&self, submission_id: &str) -> Result<ApiOutcome, CrucibleError> {
        let url = format!("{}/submission/{}", self.api_base, submission_id);
        self.delete(&url, "delete submission")
    }

    // ── Internal helpers ────────────────────────────────────────────

    /// Shared DELETE flow: error on non-2xx, pass 204-with-empty-body
    /// through as `Raw`, otherwise decode JSON with `Raw` fallback.
    fn delete(&self, url: &str, what: &str) -> Result<ApiOutcome, CrucibleError> {
        let response = self
            .http
            .delete(url)
            .header("Authorization", &self.api_key)
            .send()
            .map_err(|e| CrucibleError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CrucibleError::Http(status, body));
        }

        let body = response
            .text()
            .map_err(|e| CrucibleError::Network(e.to_string()))?;

        if status == 204 && body.is_empty() {
            return Ok(ApiOutcome::Raw(RawResponse { status, body }));
        }

        match serde_json::from_str(&body) {
            Ok(json) => Ok(ApiOutcome::Document(json)),
            Err(_) => {
                eprintln!("warning: {} response was not valid JSON (HTTP {})", what, status);
                Ok(ApiOutcome::Raw(RawResponse { status, body }))
            }
        }
    }
}

// ── Free helpers ────────────────────────────────────────────────────

/// Error on non-2xx, then decode the body as JSON or error on decode
/// failure. Used by operations that promise a JSON response.
fn require_json(
    response: reqwest::blocking::Response,
) -> Result<serde_json::Value, CrucibleError> {
    let status = response.status().as_u16();
    if !response.status().is_success() {
        let body = response.text().unwrap_or_default();
        return Err(CrucibleError::Http(status, body));
    }

    let body = response
        .text()
        .map_err(|e| CrucibleError::Network(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| CrucibleError::Parse(e.to_string()))
}

/// Read a file fully into memory and wrap it as a single multipart part
/// named `file`, with the path string as the filename.
fn multipart_file(
    path: &Path,
    mime: &'static str,
) -> Result<reqwest::blocking::multipart::Form, CrucibleError> {
    let bytes = std::fs::read(path)
        .map_err(|e| CrucibleError::Io(format!("{}: {}", path.display(), e)))?;
    let part = reqwest::blocking::multipart::Part::bytes(bytes)
        .file_name(path.display().to_string())
        .mime_str(mime)
        .expect("static MIME string is valid");
    Ok(reqwest::blocking::multipart::Form::new().part("file", part))
}

/// Decode the body as JSON, falling back to `Raw` (with a diagnostic) when
/// it doesn't parse. Status is never checked — callers that use this
/// deliberately swallow HTTP errors.
fn decode_or_raw(response: reqwest::blocking::Response, what: &str) -> ApiOutcome {
    let status = response.status().as_u16();
    let body = response.text().unwrap_or_default();

    match serde_json::from_str(&body) {
        Ok(json) => ApiOutcome::Document(json),
        Err(_) => {
            eprintln!("warning: {} response was not valid JSON (HTTP {})", what, status);
            ApiOutcome::Raw(RawResponse { status, body })
        }
    }
}

/// Pull the expected identifier field out of a decoded body. Falls back to
/// the full document (with a diagnostic) when the field is absent.
fn extract_id(json: serde_json::Value, key: &str) -> ApiOutcome {
    let id = json[key]
        .as_str()
        .map(String::from)
        .or_else(|| json[key].as_i64().map(|n| n.to_string()));

    match id {
        Some(id) => ApiOutcome::Id(id),
        None => {
            eprintln!("warning: response missing {}, returning full body", key);
            ApiOutcome::Document(json)
        }
    }
}
