use serde::{Deserialize, Serialize};

use crate::operator::{BinaryOperator, UnsupportedOperatorError};

/// Which operator pipes, and the reserved names used while desugaring.
///
/// The bound variable must not collide with any identifier used inside a
/// piped expression; that is not checked beyond `placeholder != bound_variable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeSyntax {
    pub operator: BinaryOperator,
    pub placeholder: String,
    pub bound_variable: String,
}

impl Default for PipeSyntax {
    fn default() -> Self {
        Self {
            operator: BinaryOperator::RShift,
            placeholder: "_".to_string(),
            bound_variable: "_pipe_x".to_string(),
        }
    }
}

impl PipeSyntax {
    pub fn with_operator_symbol(mut self, symbol: &str) -> Result<Self, UnsupportedOperatorError> {
        self.operator = BinaryOperator::from_symbol(symbol)?;
        Ok(self)
    }

    pub fn is_pipe(&self, op: BinaryOperator) -> bool {
        op == self.operator
    }
}
