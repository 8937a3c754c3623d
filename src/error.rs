//! Crate-wide error type.
//!
//! Nothing in the game core is fatal: callers either surface these to the
//! player (a missing username) or log them and fall back to defaults
//! (unreadable storage, bad settings).

use thiserror::Error;

use crate::game::Phase;

/// Top-level error enum for Block Dash.
#[derive(Debug, Error)]
pub enum GameError {
    /// `start` was called with a blank username.
    #[error("please enter a username")]
    EmptyUsername,

    /// A lifecycle call arrived in a phase that cannot handle it.
    #[error("cannot {action} while {phase:?}")]
    InvalidPhase {
        /// The rejected operation.
        action: &'static str,
        /// Phase the game was in.
        phase: Phase,
    },

    /// The storage backend could not be reached at all.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The host page is missing something the front end needs
    /// (an element, a 2D context, a window).
    #[error("host environment: {0}")]
    Host(String),

    /// A setting is outside the range the simulation can handle.
    #[error("setting '{name}' = {value} is outside {expected}")]
    InvalidSetting {
        /// Field name in [`crate::Settings`].
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias: a `Result` using [`GameError`] as the error type.
pub type GameResult<T> = Result<T, GameError>;
