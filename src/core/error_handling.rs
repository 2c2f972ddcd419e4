//! Error reporting shared by the library and the binary
//!
//! Errors are split into those the user can fix (bad settings, invalid
//! records) and system failures (remote errors, shutdown races). Fatal
//! reporting shows the user message for the former and only the operation
//! context for the latter, with full detail at debug level.

/// Errors that know whether the user can act on them
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)`; otherwise it should return `None`.
pub trait ContextualError: std::error::Error {
    fn is_user_actionable(&self) -> bool;

    fn user_message(&self) -> Option<&str>;
}

/// Log a fatal error with detail appropriate to its kind
///
/// # Examples
/// ```rust,no_run
/// # use streamprod::core::error_handling::log_error_with_context;
/// # use streamprod::producer::ConfigError;
/// log_error_with_context(&ConfigError::MissingStream, "Producer setup");
/// // Logs: "FATAL: stream name not provided in configs"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    log::error!("FATAL: {}", fatal_line(error, operation_context));
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

fn fatal_line<'a, E: ContextualError>(error: &'a E, operation_context: &'a str) -> &'a str {
    if error.is_user_actionable() {
        error.user_message().unwrap_or(operation_context)
    } else {
        operation_context
    }
}
