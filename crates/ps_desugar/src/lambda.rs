//! Turns placeholder-bearing operator expressions into one-argument lambdas.
//!
//! With `_` as placeholder and `_pipe_x` as bound variable:
//!
//! ```text
//! 1_000 >> _ + 3 >> double >> _ - _
//! 1_000 >> (_pipe_x => _pipe_x + 3) >> double >> (_pipe_x => _pipe_x - _pipe_x)
//! ```

use log::trace;
use ps_ast::{BinOp, BinaryOperator, Expr, ExprKind, Fold, PipeSyntax};

use crate::shape::contains_name;
use crate::substitute::{ConfigurationError, Substituter};

#[derive(Debug, Clone)]
pub struct LambdaSynthesizer {
    pipe: BinaryOperator,
    substituter: Substituter,
}

impl LambdaSynthesizer {
    pub fn new(syntax: &PipeSyntax) -> Result<Self, ConfigurationError> {
        Ok(Self {
            pipe: syntax.operator,
            substituter: Substituter::new(&syntax.placeholder, &syntax.bound_variable)?,
        })
    }

    /// Lambda-wrap a non-pipe binary operation if it mentions the placeholder.
    ///
    /// Otherwise the operation is kept and each operand is handed to
    /// `fallback`, which is expected to rewrite any pipes found inside.
    /// Anything that is not a non-pipe `BinOp` goes to `fallback` whole.
    pub fn maybe_lambdafy<F: Fold + ?Sized>(&self, expr: Expr, fallback: &mut F) -> Expr {
        let Expr { span, kind } = expr;
        let bin = match kind {
            ExprKind::BinOp(bin) if bin.op != self.pipe => bin,
            kind => return fallback.fold_expr(Expr::new(span, kind)),
        };

        let placeholder = self.substituter.target();
        if contains_name(&bin.left, placeholder) || contains_name(&bin.right, placeholder) {
            trace!("lambda over `{}` {span:?}", bin.op);
            let body = self
                .substituter
                .substitute(Expr::new(span, ExprKind::BinOp(bin)));
            return Expr::lambda(span, self.substituter.replacement(), body);
        }

        let BinOp { left, op, right } = bin;
        Expr::binop(span, fallback.fold_expr(*left), op, fallback.fold_expr(*right))
    }
}
