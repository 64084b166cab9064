//! Parser for pipesugar sources.
//!
//! Sources use ECMAScript expression syntax, with two additions given
//! meaning by lowering rather than by the grammar:
//!
//! - `name = value` inside a call's argument list is a keyword argument
//! - `>>` (or whichever operator is configured) chains calls left to right
//!
//! The standard SWC parser reads the text; `lower` then maps the SWC tree
//! onto the closed `ps_ast` node set, rejecting anything outside it.

pub mod lower;
pub mod parse;

pub use lower::{lower_expr, lower_module, LowerError};
pub use parse::{location, parse_expression, parse_source, ParseResult};
