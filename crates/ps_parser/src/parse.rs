use anyhow::{anyhow, bail, Result};
use ps_ast::{Expr, Program, StmtKind};
use swc_common::{errors::Handler, sync::Lrc, FileName, SourceMap, Span};
use swc_ecma_ast::EsVersion;
use swc_ecma_parser::{EsSyntax, Syntax};

use crate::lower;

/// Result of parsing a pipesugar source file.
pub struct ParseResult {
    pub program: Program,
    pub source_map: Lrc<SourceMap>,
}

/// Parse a source string into a pipesugar program.
///
/// 1. Parse: feed the text to the standard SWC parser as an ES module.
/// 2. Lower: map the SWC tree onto `ps_ast`, reporting `file:line:column`
///    for the first construct outside the supported set.
pub fn parse_source(source: &str, filename: &str) -> Result<ParseResult> {
    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        source.to_string(),
    );

    let handler =
        Handler::with_emitter_writer(Box::new(std::io::stderr()), Some(source_map.clone()));

    let mut recovered = vec![];
    let module = swc_ecma_parser::parse_file_as_module(
        &source_file,
        Syntax::Es(EsSyntax::default()),
        EsVersion::latest(),
        None,
        &mut recovered,
    )
    .map_err(|e| {
        e.into_diagnostic(&handler).emit();
        anyhow!("failed to parse {filename}")
    })?;

    if !recovered.is_empty() {
        for e in recovered {
            e.into_diagnostic(&handler).emit();
        }
        bail!("failed to parse {filename}");
    }

    let program = lower::lower_module(&module)
        .map_err(|e| anyhow!("{}: {e}", location(&source_map, filename, e.span())))?;

    Ok(ParseResult {
        program,
        source_map,
    })
}

/// Parse a source holding exactly one expression statement.
pub fn parse_expression(source: &str) -> Result<Expr> {
    let mut parsed = parse_source(source, "<expr>")?;
    if parsed.program.body.len() != 1 {
        bail!(
            "expected a single expression, found {} statements",
            parsed.program.body.len()
        );
    }
    match parsed.program.body.remove(0).kind {
        StmtKind::Expr(expr) => Ok(expr),
        StmtKind::Let { .. } => bail!("expected an expression, found a declaration"),
    }
}

/// `file:line:column` of the start of `span`.
pub fn location(source_map: &SourceMap, filename: &str, span: Span) -> String {
    let loc = source_map.lookup_char_pos(span.lo);
    format!("{filename}:{}:{}", loc.line, loc.col.0 + 1)
}
