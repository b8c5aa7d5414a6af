//! Result type alias for nivex
//!
//! This module provides a convenient Result type alias that uses NivexError
//! as the error type.

use super::errors::NivexError;

/// Result type alias for nivex operations
///
/// This is a convenience type alias that uses `NivexError` as the error type.
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use nivex::domain::result::Result;
/// use nivex::domain::errors::NivexError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(NivexError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, NivexError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::NivexError;

    #[test]
    fn test_result_ok() {
        let result: Result<i32> = Ok(42);
        assert!(result.is_ok());
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(NivexError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
