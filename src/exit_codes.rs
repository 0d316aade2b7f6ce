//! Process exit codes for the `gitinfo` binary.
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0    | Success |
//! | 1    | Sync failure, or any other runtime error |
//! | 2    | Invalid repository reference (clap usage errors also exit 2) |

use crate::error::Error;

pub const SUCCESS: i32 = 0;
pub const SYNC_FAILED: i32 = 1;
pub const INVALID_REFERENCE: i32 = 2;

/// Exit code for a run that ended with `error`.
pub fn for_error(error: &Error) -> i32 {
    match error {
        Error::InvalidReference { .. } => INVALID_REFERENCE,
        _ => SYNC_FAILED,
    }
}

/// Exit code for an error surfaced through `anyhow` at the command layer.
pub fn for_anyhow(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<Error>())
        .map(for_error)
        .unwrap_or(SYNC_FAILED)
}
