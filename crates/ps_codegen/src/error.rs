use derive_more::{Display, Error, From};
use ps_ast::{BinaryOperator, Span};

/// Errors that can occur while turning a tree back into text.
#[derive(Debug, Display, Error, From)]
pub enum CodegenError {
    /// `//` and `@` have no source form in the surface syntax.
    #[from(ignore)]
    #[display("operator `{op}` cannot be written in source form")]
    UnsupportedOperator {
        op: BinaryOperator,
        #[error(not(source))]
        span: Span,
    },

    #[display("I/O error while emitting: {_0}")]
    Io(#[error(source)] std::io::Error),

    #[display("emitted code is not UTF-8: {_0}")]
    Utf8(#[error(source)] std::string::FromUtf8Error),

    #[from(ignore)]
    #[display("failed to serialize source map: {_0}")]
    SourceMap(#[error(not(source))] String),
}
