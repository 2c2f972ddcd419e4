//! Mutex poisoning helpers

use std::sync::LockResult;

/// Convert a poisoned lock into a domain error
///
/// `error_constructor` receives a description of the poisoning and builds
/// the caller's error type.
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use streamprod::core::sync::handle_mutex_poison;
/// use streamprod::producer::WriteError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(mutex.lock(), |message| WriteError::Internal { message })
///     .unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "internal synchronisation error (mutex poisoned by a panicking holder): {:?}",
            poison_err
        ))
    })
}
