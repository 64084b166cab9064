//! Shape classification of a pipe's right-hand operand.

use ps_ast::{Call, Expr, ExprKind, Keyword, PipeSyntax, Visit};

/// How the right-hand side of `left |pipe| right` desugars.
///
/// Variants are listed in matching priority; the first one that fits wins.
#[derive(Debug, Clone, PartialEq)]
pub enum PipeShape {
    /// `_.name`
    AttributeWildcard { name: String },
    /// `_.name(args...)`
    MethodWildcard {
        name: String,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
    },
    /// A non-pipe binary operation mentioning the placeholder, e.g. `_ + 1`.
    PlaceholderOperation(Expr),
    /// Anything that is not a call: `f`, `x => x`, `obj.method`.
    BareCallable(Expr),
    /// `f(args...)`
    DirectCall(Call),
}

impl PipeShape {
    pub fn rule(&self) -> &'static str {
        match self {
            PipeShape::AttributeWildcard { .. } => "attribute wildcard",
            PipeShape::MethodWildcard { .. } => "method wildcard",
            PipeShape::PlaceholderOperation(_) => "placeholder operation",
            PipeShape::BareCallable(_) => "bare callable",
            PipeShape::DirectCall(_) => "direct call",
        }
    }
}

/// Classify `right`, taking ownership of its pieces.
pub fn classify(right: Expr, syntax: &PipeSyntax) -> PipeShape {
    let Expr { span, kind } = right;
    match kind {
        ExprKind::Attribute(attr) if attr.target.is_name(&syntax.placeholder) => {
            PipeShape::AttributeWildcard { name: attr.name }
        }
        ExprKind::Call(call) => match placeholder_method(&call, &syntax.placeholder) {
            Some(name) => PipeShape::MethodWildcard {
                name,
                args: call.args,
                keywords: call.keywords,
            },
            None => PipeShape::DirectCall(call),
        },
        ExprKind::BinOp(bin)
            if !syntax.is_pipe(bin.op)
                && (contains_name(&bin.left, &syntax.placeholder)
                    || contains_name(&bin.right, &syntax.placeholder)) =>
        {
            PipeShape::PlaceholderOperation(Expr::new(span, ExprKind::BinOp(bin)))
        }
        kind => PipeShape::BareCallable(Expr::new(span, kind)),
    }
}

fn placeholder_method(call: &Call, placeholder: &str) -> Option<String> {
    match &call.callee.kind {
        ExprKind::Attribute(attr) if attr.target.is_name(placeholder) => Some(attr.name.clone()),
        _ => None,
    }
}

/// True when `Name(id)` occurs anywhere in `expr`, including `expr` itself.
pub fn contains_name(expr: &Expr, id: &str) -> bool {
    let mut finder = NameFinder { id, found: false };
    finder.visit_expr(expr);
    finder.found
}

struct NameFinder<'a> {
    id: &'a str,
    found: bool,
}

impl Visit for NameFinder<'_> {
    fn visit_expr(&mut self, expr: &Expr) {
        if self.found {
            return;
        }
        if expr.is_name(self.id) {
            self.found = true;
            return;
        }
        expr.visit_children_with(self);
    }
}
