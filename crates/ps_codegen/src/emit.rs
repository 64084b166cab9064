use ps_ast::{Expr, Program, Stmt, StmtKind};
use swc_common::{source_map::DefaultSourceMapGenConfig, sync::Lrc, SourceMap};
use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};

use crate::error::CodegenError;
use crate::raise::raise_program;

/// Emitted source text, plus the JSON source map when one was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    pub code: String,
    pub source_map: Option<String>,
}

/// Emit `program` as source text.
///
/// `source_map` must be the map the program was parsed with; spans of
/// rewritten nodes point back into it.
pub fn emit_program(
    program: &Program,
    source_map: Lrc<SourceMap>,
    with_source_map: bool,
) -> Result<Emitted, CodegenError> {
    let module = raise_program(program)?;

    let mut buf = Vec::new();
    let mut srcmap_buf = if with_source_map { Some(vec![]) } else { None };
    {
        let writer = JsWriter::new(source_map.clone(), "\n", &mut buf, srcmap_buf.as_mut());
        let mut emitter = Emitter {
            cfg: swc_ecma_codegen::Config::default()
                .with_target(swc_ecma_ast::EsVersion::latest()),
            cm: source_map.clone(),
            comments: None,
            wr: writer,
        };
        module.emit_with(&mut emitter)?;
    }

    let code = String::from_utf8(buf)?;

    let source_map = match srcmap_buf {
        Some(mappings) => {
            let srcmap = source_map.build_source_map(&mappings, None, DefaultSourceMapGenConfig);
            let mut json = vec![];
            srcmap
                .to_writer(&mut json)
                .map_err(|e| CodegenError::SourceMap(e.to_string()))?;
            Some(String::from_utf8(json)?)
        }
        None => None,
    };

    Ok(Emitted { code, source_map })
}

/// Emit a lone expression, without the trailing `;` and newline.
///
/// No source map is involved, so spans are dropped before printing.
pub fn emit_expr(expr: &Expr) -> Result<String, CodegenError> {
    let expr = expr.clone().without_spans();
    let program = Program {
        span: expr.span,
        body: vec![Stmt {
            span: expr.span,
            kind: StmtKind::Expr(expr),
        }],
    };
    let emitted = emit_program(&program, Default::default(), false)?;
    Ok(emitted.code.trim_end().trim_end_matches(';').to_string())
}
