//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 40-49   | api              | Crucible service codes                   |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use crucible_client::CrucibleError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options, missing input file.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// API (40-49) — Crucible service codes
// =============================================================================

/// Not authenticated (no flag, no env var, no saved key).
pub const EXIT_API_NOT_AUTH: u8 = 40;

/// Service returned a failure status on an operation that propagates it.
pub const EXIT_API_HTTP: u8 = 41;

/// Network error communicating with the service.
pub const EXIT_API_NETWORK: u8 = 42;

/// Response body could not be decoded where JSON was required.
pub const EXIT_API_PARSE: u8 = 43;

/// Map a client error to its exit code.
pub fn api_exit_code(err: &CrucibleError) -> u8 {
    match err {
        CrucibleError::NotAuthenticated => EXIT_API_NOT_AUTH,
        CrucibleError::Network(_) => EXIT_API_NETWORK,
        CrucibleError::Http(_, _) => EXIT_API_HTTP,
        CrucibleError::Parse(_) => EXIT_API_PARSE,
        // Missing or unreadable upload file is a usage problem
        CrucibleError::Io(_) => EXIT_USAGE,
    }
}
