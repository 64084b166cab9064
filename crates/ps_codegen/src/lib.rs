//! Code generation for pipesugar trees.
//!
//! The tree is raised back into SWC nodes, with parentheses inserted
//! wherever operator precedence needs them, and printed by the standard
//! SWC emitter. Keyword arguments print as `name = value` so the output
//! parses back into the same tree.

pub mod emit;
pub mod error;
pub mod raise;

pub use emit::{emit_expr, emit_program, Emitted};
pub use error::CodegenError;
pub use raise::{raise_expr, raise_program};
