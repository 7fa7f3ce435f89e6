//! Engine error taxonomy
//!
//! Three classes, matching how callers surface them:
//! - `Validation`: an input is outside its physical or mathematical domain.
//!   Raised before any computation, the model is left untouched.
//! - `InsufficientData`: too few points or missing initial conditions.
//! - `Computation`: a failure at the point of evaluation (zero denominator,
//!   degenerate regression, non-finite intermediate).

use rust_decimal::Decimal;
use thiserror::Error;

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Computation error: {0}")]
    Computation(#[from] ComputationError),
}

impl EngineError {
    /// Coarse category for caller-facing messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::InsufficientData(_) => "insufficient_data",
            Self::Computation(_) => "computation",
        }
    }

    pub fn insufficient(message: impl Into<String>) -> Self {
        Self::InsufficientData(message.into())
    }
}

/// Input outside its physical/mathematical domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: Decimal },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: Decimal },

    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("Flowing pressure {pwf} psi cannot exceed reservoir pressure {pr} psi")]
    PwfExceedsReservoir { pwf: Decimal, pr: Decimal },

    #[error("{name} must be a finite number")]
    NotFinite { name: &'static str },

    #[error("Data point {index} is out of order: {message}")]
    Ordering { index: usize, message: String },
}

/// Failure raised where the arithmetic breaks down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputationError {
    #[error("Division by zero while computing {context}")]
    DivisionByZero { context: &'static str },

    #[error("Degenerate regression: {0}")]
    DegenerateRegression(String),

    #[error("Non-finite intermediate result for {quantity}")]
    NonFinite { quantity: &'static str },

    #[error("Decimal overflow while computing {quantity}")]
    Overflow { quantity: &'static str },

    #[error("Non-physical result for {quantity}: {value}")]
    NonPhysical { quantity: &'static str, value: Decimal },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_kind_categories() {
        let v: EngineError = ValidationError::NotPositive { name: "qi", value: dec!(-1) }.into();
        assert_eq!(v.kind(), "validation");
        assert_eq!(EngineError::insufficient("need 3 points").kind(), "insufficient_data");
        let c: EngineError = ComputationError::DivisionByZero { context: "slope" }.into();
        assert_eq!(c.kind(), "computation");
    }

    #[test]
    fn test_messages_name_the_quantity() {
        let err: EngineError = ValidationError::OutOfRange {
            name: "Porosity",
            value: dec!(1.2),
            min: Decimal::ZERO,
            max: Decimal::ONE,
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("Porosity"));
        assert!(msg.contains("1.2"));
    }
}
