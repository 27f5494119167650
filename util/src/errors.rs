//! Helpers for error handling

/// Expands a given error type to wrap a stringified version of a given error
///
/// To be used in a map_err() call
#[macro_export]
macro_rules! err_str {
    ($x:expr) => {
        |e| $x(e.to_string())
    };
}

/// Expands a given error to format the string with the given format string and
/// args
///
/// The error should come last in the format string
#[macro_export]
macro_rules! raw_err_str {
    ($fmt:expr $(, $($arg:tt)*)?) => {
        |e| format!($fmt $(, $($arg)*)?, e)
    }
}

#[cfg(test)]
mod test {
    /// A toy error wrapping a string
    #[derive(Debug, PartialEq)]
    struct WrappedError(String);

    /// Tests wrapping a parse error into a string-carrying variant
    #[test]
    fn test_err_str() {
        let res: Result<u32, WrappedError> = "C4".parse::<u32>().map_err(err_str!(WrappedError));
        let err = res.unwrap_err();
        assert!(!err.0.is_empty());
    }

    /// Tests formatting an error with a prefix
    #[test]
    fn test_raw_err_str() {
        let res: Result<u32, String> =
            "C4".parse::<u32>().map_err(raw_err_str!("bad note index {}: {}", "C4"));
        assert!(res.unwrap_err().starts_with("bad note index C4: "));
    }
}
