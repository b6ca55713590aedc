//! # Error Types
//!
//! Domain error types for quantum-core.
//!
//! ## Why So Few Variants?
//! The financial core is deliberately non-fatal: out-of-range rates are
//! clamped at the input boundary, missing numbers default to zero, an
//! unbalanced commission distribution is a reportable warning, and a
//! failed cross-store match is an informational result. The only thing
//! that can actually fail in pure code is parsing a malformed literal.

use thiserror::Error;

/// Errors produced by the pure core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A money literal could not be parsed (non-numeric, or more than
    /// four decimal places).
    #[error("invalid money amount: '{0}'")]
    InvalidMoney(String),

    /// A quantity literal could not be parsed.
    #[error("invalid quantity: '{0}'")]
    InvalidQuantity(String),

    /// A calendar date string was not in `YYYY-MM-DD` form.
    #[error("invalid date: '{0}'")]
    InvalidDate(String),
}

/// Convenience alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidMoney("12,50".to_string());
        assert_eq!(err.to_string(), "invalid money amount: '12,50'");
    }
}
