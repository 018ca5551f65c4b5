use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by the core switching machinery.
///
/// Nothing here is recovered from internally: every variant propagates up to
/// the CLI layer, which prints it and exits non-zero.
#[derive(Debug, Error)]
pub enum Error {
    #[error("filesystem operation failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("account '{0}' does not exist; create it first with 'ssh-key-switcher create {0}'")]
    AccountNotFound(String),

    /// Raised when the target account turns out to be missing after the active
    /// directory has already been cleared. The message must name the intact
    /// snapshot so the user can recover by hand.
    #[error(
        "account '{name}' does not exist and the active ssh directory has already been \
         cleared - it is now empty. Your previous keys were saved intact to {snapshot} \
         before anything was deleted; switch back to that account to restore them"
    )]
    LoadFailed { name: String, snapshot: PathBuf },

    #[error(
        "no current account is recorded but the active ssh directory is not empty; \
         run 'ssh-key-switcher current <name>' first to save the existing keys under a name"
    )]
    NoCurrentAccount,

    #[error("invalid account name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },
}

impl Error {
    /// Wrap an `io::Error` with the path the operation was touching.
    pub fn io(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
        move |source| Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
