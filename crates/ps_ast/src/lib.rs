//! Expression tree for pipesugar.
//!
//! A closed set of node kinds the desugaring pass understands:
//! - `BinOp`, `Call`, `Attribute`, `Name`, `Lambda` take part in pipe rewriting
//! - every other kind is carried through untouched apart from its children
//!
//! Spans are the SWC ones so source maps and diagnostics keep working after
//! the tree has been rewritten.

pub mod expr;
pub mod fold;
pub mod operator;
pub mod syntax;

pub use expr::*;
pub use fold::{Fold, Visit};
pub use operator::{
    BinaryOperator, BoolOperator, CompareOperator, UnaryOperator, UnsupportedOperatorError,
};
pub use swc_common::{BytePos, Span, DUMMY_SP};
pub use syntax::PipeSyntax;
