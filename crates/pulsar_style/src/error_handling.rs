//! Internal invariant checks

/// Cold path hint, causes compiler to better optimize unlikely error paths.
#[cold]
pub(crate) fn cold_path() {}

/// Log an `Err` value, panicking on debug builds only.
///
/// Reaching the error branch is a bug in the engine, bad input is skipped and logged at `debug`
/// instead. In release builds generation carries on with less output.
macro_rules! log_or_panic_result {
    ($expr:expr, $($msg:expr),*) => {
        if $expr.is_err() {
            $crate::error_handling::cold_path();

            ::log::error!($($msg),*);
            if cfg!(debug_assertions) {
                panic!($($msg),*);
            }
        }
    };
}

pub(crate) use log_or_panic_result;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "Failed to write css")]
    fn err_panics_in_debug() {
        log_or_panic_result!(Err::<(), _>("error"), "Failed to write css");
    }

    #[test]
    fn ok_is_silent() {
        log_or_panic_result!(Ok::<(), &str>(()), "Never shown");
    }
}
