//! Lowering from the SWC tree into `ps_ast`.

use ps_ast::{
    BinaryOperator, BoolOperator, CompareOperator, Constant, DictEntry, Expr, ExprKind, Keyword,
    Program, Stmt, StmtKind, UnaryOperator,
};
use swc_common::{Span, Spanned};
use swc_ecma_ast as ast;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum LowerError {
    #[display("unsupported syntax: {what}")]
    Unsupported { what: &'static str, span: Span },
    #[display("positional argument follows keyword argument")]
    PositionalAfterKeyword { span: Span },
    #[display("keyword argument repeated: `{name}`")]
    DuplicateKeyword { name: String, span: Span },
}

impl LowerError {
    pub fn span(&self) -> Span {
        match self {
            LowerError::Unsupported { span, .. }
            | LowerError::PositionalAfterKeyword { span }
            | LowerError::DuplicateKeyword { span, .. } => *span,
        }
    }
}

type LowerResult<T> = Result<T, LowerError>;

fn unsupported<T>(what: &'static str, span: Span) -> LowerResult<T> {
    Err(LowerError::Unsupported { what, span })
}

pub fn lower_module(module: &ast::Module) -> LowerResult<Program> {
    let mut body = Vec::with_capacity(module.body.len());
    for item in &module.body {
        match item {
            ast::ModuleItem::Stmt(stmt) => {
                if let Some(stmt) = lower_stmt(stmt)? {
                    body.push(stmt);
                }
            }
            ast::ModuleItem::ModuleDecl(decl) => {
                return unsupported("import or export", decl.span());
            }
        }
    }
    Ok(Program {
        span: module.span,
        body,
    })
}

fn lower_stmt(stmt: &ast::Stmt) -> LowerResult<Option<Stmt>> {
    let kind = match stmt {
        ast::Stmt::Empty(_) => return Ok(None),
        ast::Stmt::Expr(expr_stmt) => StmtKind::Expr(lower_expr(&expr_stmt.expr)?),
        ast::Stmt::Decl(ast::Decl::Var(var)) => {
            let [decl] = var.decls.as_slice() else {
                return unsupported("more than one declarator", var.span);
            };
            let ast::Pat::Ident(binding) = &decl.name else {
                return unsupported("destructuring declaration", decl.span);
            };
            let Some(init) = &decl.init else {
                return unsupported("declaration without initializer", decl.span);
            };
            StmtKind::Let {
                name: binding.id.sym.to_string(),
                value: lower_expr(init)?,
            }
        }
        other => return unsupported("statement", other.span()),
    };
    Ok(Some(Stmt {
        span: stmt.span(),
        kind,
    }))
}

fn lower_boxed(expr: &ast::Expr) -> LowerResult<Box<Expr>> {
    lower_expr(expr).map(Box::new)
}

pub fn lower_expr(expr: &ast::Expr) -> LowerResult<Expr> {
    let span = expr.span();
    let kind = match expr {
        ast::Expr::Paren(paren) => return lower_expr(&paren.expr),
        ast::Expr::Ident(ident) => ExprKind::Name(ident.sym.to_string()),
        ast::Expr::Lit(lit) => ExprKind::Constant(lower_lit(lit)?),
        ast::Expr::Bin(bin) => lower_bin(bin)?,
        ast::Expr::Unary(unary) => {
            let op = match unary.op {
                ast::UnaryOp::Minus => UnaryOperator::Neg,
                ast::UnaryOp::Plus => UnaryOperator::Pos,
                ast::UnaryOp::Bang => UnaryOperator::Not,
                ast::UnaryOp::Tilde => UnaryOperator::Invert,
                _ => return unsupported("`typeof`, `void` or `delete`", span),
            };
            ExprKind::UnaryOp {
                op,
                operand: lower_boxed(&unary.arg)?,
            }
        }
        ast::Expr::Member(member) => {
            let target = lower_boxed(&member.obj)?;
            match &member.prop {
                ast::MemberProp::Ident(name) => ExprKind::Attribute(ps_ast::Attribute {
                    target,
                    name: name.sym.to_string(),
                }),
                ast::MemberProp::Computed(computed) => ExprKind::Subscript {
                    target,
                    index: lower_boxed(&computed.expr)?,
                },
                ast::MemberProp::PrivateName(_) => return unsupported("private name", span),
            }
        }
        ast::Expr::Call(call) => lower_call(call)?,
        ast::Expr::Arrow(arrow) => lower_arrow(arrow)?,
        ast::Expr::Array(array) => {
            let mut items = Vec::with_capacity(array.elems.len());
            for elem in &array.elems {
                match elem {
                    Some(ast::ExprOrSpread { spread: None, expr }) => items.push(lower_expr(expr)?),
                    Some(_) => return unsupported("spread element", span),
                    None => return unsupported("array hole", span),
                }
            }
            ExprKind::List(items)
        }
        ast::Expr::Object(object) => {
            let mut entries = Vec::with_capacity(object.props.len());
            for prop in &object.props {
                entries.push(lower_prop(prop, span)?);
            }
            ExprKind::Dict(entries)
        }
        ast::Expr::Cond(cond) => ExprKind::IfExp {
            test: lower_boxed(&cond.test)?,
            body: lower_boxed(&cond.cons)?,
            orelse: lower_boxed(&cond.alt)?,
        },
        ast::Expr::Tpl(tpl) => ExprKind::FString {
            quasis: tpl.quasis.iter().map(|q| q.raw.to_string()).collect(),
            values: tpl
                .exprs
                .iter()
                .map(|e| lower_expr(e))
                .collect::<LowerResult<_>>()?,
        },
        ast::Expr::Assign(_) => return unsupported("assignment outside an argument list", span),
        ast::Expr::This(_) => return unsupported("`this`", span),
        ast::Expr::New(_) => return unsupported("`new` expression", span),
        ast::Expr::Seq(_) => return unsupported("comma expression", span),
        ast::Expr::Fn(_) => return unsupported("function expression", span),
        ast::Expr::Class(_) => return unsupported("class expression", span),
        ast::Expr::OptChain(_) => return unsupported("optional chaining", span),
        ast::Expr::Update(_) => return unsupported("increment or decrement", span),
        _ => return unsupported("expression", span),
    };
    Ok(Expr::new(span, kind))
}

fn lower_lit(lit: &ast::Lit) -> LowerResult<Constant> {
    match lit {
        ast::Lit::Str(s) => lower_str(s),
        ast::Lit::Num(n) => Ok(lower_num(n)),
        ast::Lit::Bool(b) => Ok(Constant::Bool(b.value)),
        ast::Lit::Null(_) => Ok(Constant::None),
        other => unsupported("regex, bigint or JSX literal", other.span()),
    }
}

fn lower_str(s: &ast::Str) -> LowerResult<Constant> {
    match &s.raw {
        Some(raw) => Ok(Constant::Str {
            raw: raw.to_string(),
        }),
        None => unsupported("string literal without source text", s.span),
    }
}

fn lower_num(n: &ast::Number) -> Constant {
    Constant::Num {
        value: n.value,
        raw: n
            .raw
            .as_ref()
            .map_or_else(|| n.value.to_string(), |raw| raw.to_string()),
    }
}

fn lower_bin(bin: &ast::BinExpr) -> LowerResult<ExprKind> {
    use ast::BinaryOp as B;

    enum Family {
        Arith(BinaryOperator),
        Compare(CompareOperator),
        Bool(BoolOperator),
    }

    let family = match bin.op {
        B::Add => Family::Arith(BinaryOperator::Add),
        B::Sub => Family::Arith(BinaryOperator::Sub),
        B::Mul => Family::Arith(BinaryOperator::Mul),
        B::Div => Family::Arith(BinaryOperator::Div),
        B::Mod => Family::Arith(BinaryOperator::Mod),
        B::Exp => Family::Arith(BinaryOperator::Pow),
        B::LShift => Family::Arith(BinaryOperator::LShift),
        B::RShift => Family::Arith(BinaryOperator::RShift),
        B::BitOr => Family::Arith(BinaryOperator::BitOr),
        B::BitXor => Family::Arith(BinaryOperator::BitXor),
        B::BitAnd => Family::Arith(BinaryOperator::BitAnd),
        B::EqEq => Family::Compare(CompareOperator::Eq),
        B::NotEq => Family::Compare(CompareOperator::NotEq),
        B::EqEqEq => Family::Compare(CompareOperator::StrictEq),
        B::NotEqEq => Family::Compare(CompareOperator::StrictNotEq),
        B::Lt => Family::Compare(CompareOperator::Lt),
        B::LtEq => Family::Compare(CompareOperator::LtE),
        B::Gt => Family::Compare(CompareOperator::Gt),
        B::GtEq => Family::Compare(CompareOperator::GtE),
        B::In => Family::Compare(CompareOperator::In),
        B::InstanceOf => Family::Compare(CompareOperator::InstanceOf),
        B::LogicalAnd => Family::Bool(BoolOperator::And),
        B::LogicalOr => Family::Bool(BoolOperator::Or),
        B::NullishCoalescing => Family::Bool(BoolOperator::Coalesce),
        B::ZeroFillRShift => return unsupported("`>>>`", bin.span),
    };

    let left = lower_boxed(&bin.left)?;
    let right = lower_boxed(&bin.right)?;
    Ok(match family {
        Family::Arith(op) => ExprKind::BinOp(ps_ast::BinOp { left, op, right }),
        Family::Compare(op) => ExprKind::Compare { left, op, right },
        Family::Bool(op) => ExprKind::BoolOp { op, left, right },
    })
}

fn lower_call(call: &ast::CallExpr) -> LowerResult<ExprKind> {
    let ast::Callee::Expr(callee) = &call.callee else {
        return unsupported("`super` or `import` call", call.span);
    };

    let mut args = Vec::new();
    let mut keywords: Vec<Keyword> = Vec::new();
    for arg in &call.args {
        if let Some(spread) = arg.spread {
            return unsupported("spread argument", spread);
        }
        match keyword_argument(&arg.expr) {
            Some((name, value, span)) => {
                if keywords.iter().any(|kw| kw.name == name) {
                    return Err(LowerError::DuplicateKeyword { name, span });
                }
                keywords.push(Keyword {
                    span,
                    name,
                    value: lower_expr(value)?,
                });
            }
            None if !keywords.is_empty() => {
                return Err(LowerError::PositionalAfterKeyword {
                    span: arg.expr.span(),
                });
            }
            None => args.push(lower_expr(&arg.expr)?),
        }
    }

    Ok(ExprKind::Call(ps_ast::Call {
        callee: lower_boxed(callee)?,
        args,
        keywords,
    }))
}

/// `name = value` as a call argument.
fn keyword_argument(expr: &ast::Expr) -> Option<(String, &ast::Expr, Span)> {
    let ast::Expr::Assign(assign) = expr else {
        return None;
    };
    if assign.op != ast::AssignOp::Assign {
        return None;
    }
    match &assign.left {
        ast::AssignTarget::Simple(ast::SimpleAssignTarget::Ident(binding)) => {
            Some((binding.id.sym.to_string(), &*assign.right, assign.span))
        }
        _ => None,
    }
}

fn lower_arrow(arrow: &ast::ArrowExpr) -> LowerResult<ExprKind> {
    if arrow.is_async || arrow.is_generator {
        return unsupported("async or generator arrow", arrow.span);
    }
    let [ast::Pat::Ident(param)] = arrow.params.as_slice() else {
        return unsupported("arrow without exactly one plain parameter", arrow.span);
    };
    let ast::BlockStmtOrExpr::Expr(body) = &*arrow.body else {
        return unsupported("arrow with a block body", arrow.span);
    };
    Ok(ExprKind::Lambda(ps_ast::Lambda {
        param: param.id.sym.to_string(),
        body: lower_boxed(body)?,
    }))
}

fn lower_prop(prop: &ast::PropOrSpread, object_span: Span) -> LowerResult<DictEntry> {
    let ast::PropOrSpread::Prop(prop) = prop else {
        return unsupported("object spread", object_span);
    };
    match &**prop {
        ast::Prop::KeyValue(kv) => Ok(DictEntry {
            key: lower_prop_name(&kv.key)?,
            value: lower_expr(&kv.value)?,
        }),
        ast::Prop::Shorthand(ident) => Ok(DictEntry {
            key: quoted_key(ident.span, &ident.sym),
            value: Expr::name(ident.span, ident.sym.to_string()),
        }),
        _ => unsupported("getter, setter, method or assignment property", object_span),
    }
}

fn lower_prop_name(key: &ast::PropName) -> LowerResult<Expr> {
    match key {
        ast::PropName::Ident(ident) => Ok(quoted_key(ident.span, &ident.sym)),
        ast::PropName::Str(s) => Ok(Expr::new(s.span, ExprKind::Constant(lower_str(s)?))),
        ast::PropName::Num(n) => Ok(Expr::new(n.span, ExprKind::Constant(lower_num(n)))),
        ast::PropName::Computed(computed) => lower_expr(&computed.expr),
        ast::PropName::BigInt(b) => unsupported("bigint key", b.span),
    }
}

/// Identifier keys become the string constant they denote.
fn quoted_key(span: Span, sym: &str) -> Expr {
    Expr::new(
        span,
        ExprKind::Constant(Constant::Str {
            raw: format!("\"{sym}\""),
        }),
    )
}

#[cfg(test)]
mod tests {
    use ps_ast::DUMMY_SP;

    use crate::parse::parse_expression;

    use super::*;

    fn lower(src: &str) -> Expr {
        parse_expression(src).unwrap().without_spans()
    }

    fn name(id: &str) -> Expr {
        Expr::name(DUMMY_SP, id)
    }

    #[test]
    fn right_shift_is_a_binop() {
        match lower("a >> f").kind {
            ExprKind::BinOp(bin) => {
                assert_eq!(bin.op, BinaryOperator::RShift);
                assert_eq!(*bin.left, name("a"));
                assert_eq!(*bin.right, name("f"));
            }
            other => panic!("expected a binop, got {other:?}"),
        }
    }

    #[test]
    fn chains_nest_to_the_left() {
        let ExprKind::BinOp(outer) = lower("a >> f >> g").kind else {
            panic!("expected a binop");
        };
        assert_eq!(*outer.right, name("g"));
        assert!(matches!(outer.left.kind, ExprKind::BinOp(_)));
    }

    #[test]
    fn assignment_arguments_become_keywords() {
        let ExprKind::Call(call) = lower("compute(30, z = 10)").kind else {
            panic!("expected a call");
        };
        assert_eq!(*call.callee, name("compute"));
        assert_eq!(call.args.len(), 1);
        assert_eq!(call.keywords.len(), 1);
        assert_eq!(call.keywords[0].name, "z");
        assert!(matches!(
            &call.keywords[0].value.kind,
            ExprKind::Constant(Constant::Num { raw, .. }) if raw == "10"
        ));
    }

    #[test]
    fn positional_after_keyword_is_rejected() {
        let err = parse_expression("f(k = 1, 2)").unwrap_err();
        assert!(err.to_string().contains("positional argument follows keyword argument"));
    }

    #[test]
    fn repeated_keyword_is_rejected() {
        let err = parse_expression("f(k = 1, k = 2)").unwrap_err();
        assert!(err.to_string().contains("keyword argument repeated: `k`"));
    }

    #[test]
    fn arrow_with_one_parameter_is_a_lambda() {
        let ExprKind::Lambda(lambda) = lower("x => x + 1").kind else {
            panic!("expected a lambda");
        };
        assert_eq!(lambda.param, "x");
        assert!(matches!(lambda.body.kind, ExprKind::BinOp(_)));

        assert!(parse_expression("(x, y) => x").is_err());
        assert!(parse_expression("x => { return x; }").is_err());
    }

    #[test]
    fn parentheses_are_dropped() {
        assert_eq!(lower("((a))"), name("a"));
    }

    #[test]
    fn member_access_forms() {
        assert!(matches!(lower("_.value").kind, ExprKind::Attribute(_)));
        assert!(matches!(lower("a[0]").kind, ExprKind::Subscript { .. }));
    }

    #[test]
    fn operator_families() {
        assert!(matches!(
            lower("a < b").kind,
            ExprKind::Compare {
                op: CompareOperator::Lt,
                ..
            }
        ));
        assert!(matches!(
            lower("a ?? b").kind,
            ExprKind::BoolOp {
                op: BoolOperator::Coalesce,
                ..
            }
        ));
        assert!(matches!(
            lower("~a").kind,
            ExprKind::UnaryOp {
                op: UnaryOperator::Invert,
                ..
            }
        ));
        assert!(matches!(
            lower("a ** 2").kind,
            ExprKind::BinOp(ps_ast::BinOp {
                op: BinaryOperator::Pow,
                ..
            })
        ));
        assert!(parse_expression("a >>> 1").is_err());
        assert!(parse_expression("typeof a").is_err());
    }

    #[test]
    fn containers_and_templates() {
        let ExprKind::Dict(entries) = lower("({a: 1, \"b\": 2, c, [k]: 3})").kind else {
            panic!("expected a dict");
        };
        assert_eq!(entries.len(), 4);
        assert!(matches!(
            &entries[0].key.kind,
            ExprKind::Constant(Constant::Str { raw }) if raw == "\"a\""
        ));
        assert_eq!(entries[2].value, name("c"));
        assert_eq!(entries[3].key, name("k"));

        let ExprKind::FString { quasis, values } = lower("`x=${x}!`").kind else {
            panic!("expected a template");
        };
        assert_eq!(quasis, ["x=", "!"]);
        assert_eq!(values, [name("x")]);

        assert!(matches!(lower("[1, _]").kind, ExprKind::List(items) if items.len() == 2));
        assert!(parse_expression("[...xs]").is_err());
    }

    #[test]
    fn unsupported_forms_are_reported() {
        for src in ["this", "new Foo()", "function () {}", "a?.b", "x++", "(a, b)"] {
            assert!(parse_expression(src).is_err(), "{src} should be rejected");
        }
    }
}
