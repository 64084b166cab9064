//! Desugaring pass that rewrites pipe chains into ordinary calls.
//!
//! Transforms (with the default `>>` pipe and `_` placeholder):
//! - `a >> _.name`      → `a.name`
//! - `a >> _.m(x)`      → `a.m(x)`
//! - `a >> _ + 1`       → `(_pipe_x => _pipe_x + 1)(a)`
//! - `a >> f`           → `f(a)`
//! - `a >> f(x, k = 1)` → `f(a, x, k = 1)`

pub mod desugar;
pub mod lambda;
pub mod pipe;
pub mod shape;
pub mod substitute;

#[cfg(test)]
pub(crate) mod build;

pub use desugar::{desugar_expr, desugar_program};
pub use lambda::LambdaSynthesizer;
pub use pipe::PipeRewriter;
pub use shape::PipeShape;
pub use substitute::{ConfigurationError, Substituter};
