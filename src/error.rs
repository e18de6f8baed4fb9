//! Unified error handling for qqircd.
//!
//! Handler failures are split into protocol-fatal errors, which end the
//! connection after a best-effort ERROR line, and everything else, which is
//! reported to the client while the connection stays open.

use thiserror::Error;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters")]
    NeedMoreParams,

    #[error("password required")]
    PasswordRequired,

    #[error("password invalid")]
    PasswordMismatch,

    #[error("client quit: {0:?}")]
    Quit(Option<String>),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for logging.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams => "need_more_params",
            Self::PasswordRequired => "password_required",
            Self::PasswordMismatch => "password_mismatch",
            Self::Quit(_) => "quit",
            Self::Backend(_) => "backend_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Whether the connection must close after this error.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::PasswordRequired | Self::PasswordMismatch | Self::Quit(_)
        )
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Backend Errors (bridge and facade)
// ============================================================================

/// Failures reported by the backend or by the loop that hosts it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("backend loop is not running")]
    LoopClosed,

    #[error("{0}")]
    Failed(String),

    #[error("backend task panicked: {0}")]
    Panicked(String),

    #[error("not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(HandlerError::PasswordRequired.is_fatal());
        assert!(HandlerError::PasswordMismatch.is_fatal());
        assert!(HandlerError::Quit(None).is_fatal());
        assert!(!HandlerError::NeedMoreParams.is_fatal());
        assert!(!HandlerError::Backend(BackendError::LoopClosed).is_fatal());
        assert!(!HandlerError::Internal("x".into()).is_fatal());
    }

    #[test]
    fn backend_error_converts() {
        let err: HandlerError = BackendError::NotFound("group 1".into()).into();
        assert_eq!(err.error_code(), "backend_error");
        assert_eq!(err.to_string(), "backend error: not found: group 1");
    }
}
