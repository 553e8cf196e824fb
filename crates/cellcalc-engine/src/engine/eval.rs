//! Arithmetic evaluation backend.
//!
//! Formulas reach the evaluator only after every cell reference and range
//! function has been replaced by a numeric literal, so the backend needs no
//! knowledge of the grid. [`RhaiEvaluator`] is the default backend; anything
//! implementing [`Evaluator`] can stand in for it.

use std::fmt;

use rhai::{Dynamic, Engine};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Evaluation error: {0}")]
    Rejected(String),

    #[error("Result is not a number: {0}")]
    NotANumber(String),

    #[error("Result is not finite")]
    NonFinite,
}

/// Evaluates a fully numeric arithmetic expression.
pub trait Evaluator {
    fn evaluate(&self, expression: &str) -> Result<f64, EvalError>;
}

impl<F> Evaluator for F
where
    F: Fn(&str) -> Result<f64, EvalError>,
{
    fn evaluate(&self, expression: &str) -> Result<f64, EvalError> {
        self(expression)
    }
}

/// Evaluator backed by a Rhai engine in expression-only mode.
pub struct RhaiEvaluator {
    engine: Engine,
}

impl RhaiEvaluator {
    pub fn new() -> Self {
        let mut engine = Engine::new();
        // Substituted formulas are short; anything deeper is malformed input.
        engine.set_max_expr_depths(64, 32);
        engine.set_max_string_size(1024);
        RhaiEvaluator { engine }
    }
}

impl Default for RhaiEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RhaiEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RhaiEvaluator").finish_non_exhaustive()
    }
}

impl Evaluator for RhaiEvaluator {
    fn evaluate(&self, expression: &str) -> Result<f64, EvalError> {
        let result = self
            .engine
            .eval_expression::<Dynamic>(expression)
            .map_err(|e| EvalError::Rejected(e.to_string()))?;

        let n = if let Ok(n) = result.as_float() {
            n
        } else if let Ok(n) = result.as_int() {
            n as f64
        } else {
            return Err(EvalError::NotANumber(result.type_name().to_string()));
        };

        if n.is_finite() {
            Ok(n)
        } else {
            Err(EvalError::NonFinite)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_and_parentheses() {
        let eval = RhaiEvaluator::new();
        assert_eq!(eval.evaluate("2.0 + 3.0 * 4.0"), Ok(14.0));
        assert_eq!(eval.evaluate("(2.0 + 3.0) * 4.0"), Ok(20.0));
        assert_eq!(eval.evaluate("7.0 / 2.0"), Ok(3.5));
        assert_eq!(eval.evaluate("10.0 - (-2.0)"), Ok(12.0));
    }

    #[test]
    fn test_division_by_zero_fails() {
        let eval = RhaiEvaluator::new();
        assert!(eval.evaluate("1.0 / 0.0").is_err());
        assert!(eval.evaluate("1 / 0").is_err());
    }

    #[test]
    fn test_syntax_errors_are_rejected() {
        let eval = RhaiEvaluator::new();
        assert!(matches!(eval.evaluate("1.0 +"), Err(EvalError::Rejected(_))));
        assert!(matches!(eval.evaluate("FOO + 1.0"), Err(EvalError::Rejected(_))));
    }

    #[test]
    fn test_non_numeric_results_are_rejected() {
        let eval = RhaiEvaluator::new();
        assert!(matches!(eval.evaluate("1.0 < 2.0"), Err(EvalError::NotANumber(_))));
    }

    #[test]
    fn test_closure_evaluator() {
        let fixed = |_: &str| -> Result<f64, EvalError> { Ok(42.0) };
        assert_eq!(fixed.evaluate("anything"), Ok(42.0));
    }
}
