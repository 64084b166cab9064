//! Top-level desugaring entry points.
//!
//! Takes a parsed program (or a lone expression) and rewrites every pipe
//! chain into standard call/attribute/lambda nodes.

use ps_ast::{Expr, PipeSyntax, Program};

use crate::pipe::PipeRewriter;
use crate::substitute::ConfigurationError;

/// Desugar all pipe chains in a program.
pub fn desugar_program(
    program: Program,
    syntax: &PipeSyntax,
) -> Result<Program, ConfigurationError> {
    let rewriter = PipeRewriter::new(syntax.clone())?;
    Ok(rewriter.rewrite_program(program))
}

/// Desugar all pipe chains in a single expression.
pub fn desugar_expr(expr: Expr, syntax: &PipeSyntax) -> Result<Expr, ConfigurationError> {
    let rewriter = PipeRewriter::new(syntax.clone())?;
    Ok(rewriter.rewrite(expr))
}
