//! Raising `ps_ast` nodes into SWC nodes.
//!
//! SWC's emitter prints the tree it is given verbatim, so every place where
//! the source form needs parentheses gets an explicit `ParenExpr`.

use ps_ast::{
    BinaryOperator, BoolOperator, CompareOperator, Constant, Expr, ExprKind, Program, Span,
    StmtKind, UnaryOperator,
};
use swc_ecma_ast as ast;

use crate::error::CodegenError;

type RaiseResult<T> = Result<T, CodegenError>;

// Binding strength, loosest first.
const PREC_ARROW: u8 = 2;
const PREC_COND: u8 = 3;
const PREC_OR: u8 = 4;
const PREC_AND: u8 = 5;
const PREC_BIT_OR: u8 = 6;
const PREC_BIT_XOR: u8 = 7;
const PREC_BIT_AND: u8 = 8;
const PREC_EQUALITY: u8 = 9;
const PREC_RELATIONAL: u8 = 10;
const PREC_SHIFT: u8 = 11;
const PREC_ADDITIVE: u8 = 12;
const PREC_MULTIPLICATIVE: u8 = 13;
const PREC_EXPONENT: u8 = 14;
const PREC_UNARY: u8 = 15;
const PREC_MEMBER: u8 = 18;
const PREC_PRIMARY: u8 = 20;

fn binary_precedence(op: BinaryOperator) -> u8 {
    match op {
        BinaryOperator::BitOr => PREC_BIT_OR,
        BinaryOperator::BitXor => PREC_BIT_XOR,
        BinaryOperator::BitAnd => PREC_BIT_AND,
        BinaryOperator::LShift | BinaryOperator::RShift => PREC_SHIFT,
        BinaryOperator::Add | BinaryOperator::Sub => PREC_ADDITIVE,
        BinaryOperator::Mul
        | BinaryOperator::Div
        | BinaryOperator::Mod
        | BinaryOperator::FloorDiv
        | BinaryOperator::MatMul => PREC_MULTIPLICATIVE,
        BinaryOperator::Pow => PREC_EXPONENT,
    }
}

fn compare_precedence(op: CompareOperator) -> u8 {
    match op {
        CompareOperator::Eq
        | CompareOperator::NotEq
        | CompareOperator::StrictEq
        | CompareOperator::StrictNotEq => PREC_EQUALITY,
        _ => PREC_RELATIONAL,
    }
}

fn bool_precedence(op: BoolOperator) -> u8 {
    match op {
        BoolOperator::And => PREC_AND,
        BoolOperator::Or | BoolOperator::Coalesce => PREC_OR,
    }
}

fn precedence(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Lambda(_) => PREC_ARROW,
        ExprKind::IfExp { .. } => PREC_COND,
        ExprKind::BoolOp { op, .. } => bool_precedence(*op),
        ExprKind::Compare { op, .. } => compare_precedence(*op),
        ExprKind::BinOp(bin) => binary_precedence(bin.op),
        ExprKind::UnaryOp { .. } => PREC_UNARY,
        ExprKind::Call(_) | ExprKind::Attribute(_) | ExprKind::Subscript { .. } => PREC_MEMBER,
        ExprKind::Name(_)
        | ExprKind::Constant(_)
        | ExprKind::List(_)
        | ExprKind::Dict(_)
        | ExprKind::FString { .. } => PREC_PRIMARY,
    }
}

fn paren(span: Span, expr: ast::Expr) -> ast::Expr {
    ast::Expr::Paren(ast::ParenExpr {
        span,
        expr: Box::new(expr),
    })
}

fn raise_wrapped(expr: &Expr, wrap: bool) -> RaiseResult<Box<ast::Expr>> {
    let raised = raise_expr(expr)?;
    Ok(Box::new(if wrap { paren(expr.span, raised) } else { raised }))
}

/// Operand of a binary-like operator of precedence `outer`.
fn raise_operand(expr: &Expr, outer: u8, right_side: bool) -> RaiseResult<Box<ast::Expr>> {
    let inner = precedence(expr);
    let wrap = match (outer == PREC_EXPONENT, right_side) {
        // `**` is right associative and rejects a unary left operand.
        (true, false) => inner <= PREC_UNARY,
        (true, true) | (false, false) => inner < outer,
        (false, true) => inner <= outer,
    };
    raise_wrapped(expr, wrap)
}

/// Operand of `??`, which may not be mixed with `&&` or `||` unparenthesized.
fn raise_bool_operand(
    expr: &Expr,
    op: BoolOperator,
    right_side: bool,
) -> RaiseResult<Box<ast::Expr>> {
    let mixes = match &expr.kind {
        ExprKind::BoolOp { op: inner, .. } => {
            (*inner == BoolOperator::Coalesce) != (op == BoolOperator::Coalesce)
        }
        _ => false,
    };
    if mixes {
        return raise_wrapped(expr, true);
    }
    raise_operand(expr, bool_precedence(op), right_side)
}

/// Callee or member target.
fn raise_target(expr: &Expr) -> RaiseResult<Box<ast::Expr>> {
    let numeric = matches!(expr.kind, ExprKind::Constant(Constant::Num { .. }));
    raise_wrapped(expr, numeric || precedence(expr) < PREC_MEMBER)
}

fn ident(name: &str, span: Span) -> ast::Ident {
    ast::Ident::new_no_ctxt(name.into(), span)
}

fn binding(name: &str, span: Span) -> ast::Pat {
    ast::Pat::Ident(ast::BindingIdent {
        id: ident(name, span),
        type_ann: None,
    })
}

fn arg(expr: Box<ast::Expr>) -> ast::ExprOrSpread {
    ast::ExprOrSpread { spread: None, expr }
}

fn raise_str(raw: &str, span: Span) -> ast::Str {
    let unquoted = raw
        .get(1..raw.len().saturating_sub(1))
        .unwrap_or_default();
    ast::Str {
        span,
        value: unquoted.into(),
        raw: Some(raw.into()),
    }
}

fn raise_constant(constant: &Constant, span: Span) -> ast::Lit {
    match constant {
        Constant::Str { raw } => ast::Lit::Str(raise_str(raw, span)),
        Constant::Num { value, raw } => ast::Lit::Num(ast::Number {
            span,
            value: *value,
            raw: Some(raw.as_str().into()),
        }),
        Constant::Bool(value) => ast::Lit::Bool(ast::Bool {
            span,
            value: *value,
        }),
        Constant::None => ast::Lit::Null(ast::Null { span }),
    }
}

fn raise_binary_op(op: BinaryOperator, span: Span) -> RaiseResult<ast::BinaryOp> {
    Ok(match op {
        BinaryOperator::Add => ast::BinaryOp::Add,
        BinaryOperator::Sub => ast::BinaryOp::Sub,
        BinaryOperator::Mul => ast::BinaryOp::Mul,
        BinaryOperator::Div => ast::BinaryOp::Div,
        BinaryOperator::Mod => ast::BinaryOp::Mod,
        BinaryOperator::Pow => ast::BinaryOp::Exp,
        BinaryOperator::LShift => ast::BinaryOp::LShift,
        BinaryOperator::RShift => ast::BinaryOp::RShift,
        BinaryOperator::BitOr => ast::BinaryOp::BitOr,
        BinaryOperator::BitXor => ast::BinaryOp::BitXor,
        BinaryOperator::BitAnd => ast::BinaryOp::BitAnd,
        BinaryOperator::FloorDiv | BinaryOperator::MatMul => {
            return Err(CodegenError::UnsupportedOperator { op, span })
        }
    })
}

fn raise_compare_op(op: CompareOperator) -> ast::BinaryOp {
    match op {
        CompareOperator::Eq => ast::BinaryOp::EqEq,
        CompareOperator::NotEq => ast::BinaryOp::NotEq,
        CompareOperator::StrictEq => ast::BinaryOp::EqEqEq,
        CompareOperator::StrictNotEq => ast::BinaryOp::NotEqEq,
        CompareOperator::Lt => ast::BinaryOp::Lt,
        CompareOperator::LtE => ast::BinaryOp::LtEq,
        CompareOperator::Gt => ast::BinaryOp::Gt,
        CompareOperator::GtE => ast::BinaryOp::GtEq,
        CompareOperator::In => ast::BinaryOp::In,
        CompareOperator::InstanceOf => ast::BinaryOp::InstanceOf,
    }
}

fn raise_bool_op(op: BoolOperator) -> ast::BinaryOp {
    match op {
        BoolOperator::And => ast::BinaryOp::LogicalAnd,
        BoolOperator::Or => ast::BinaryOp::LogicalOr,
        BoolOperator::Coalesce => ast::BinaryOp::NullishCoalescing,
    }
}

fn raise_unary_op(op: UnaryOperator) -> ast::UnaryOp {
    match op {
        UnaryOperator::Neg => ast::UnaryOp::Minus,
        UnaryOperator::Pos => ast::UnaryOp::Plus,
        UnaryOperator::Not => ast::UnaryOp::Bang,
        UnaryOperator::Invert => ast::UnaryOp::Tilde,
    }
}

fn bin_expr(
    span: Span,
    op: ast::BinaryOp,
    left: Box<ast::Expr>,
    right: Box<ast::Expr>,
) -> ast::Expr {
    ast::Expr::Bin(ast::BinExpr {
        span,
        op,
        left,
        right,
    })
}

pub fn raise_expr(expr: &Expr) -> RaiseResult<ast::Expr> {
    let span = expr.span;
    Ok(match &expr.kind {
        ExprKind::Name(id) => ast::Expr::Ident(ident(id, span)),
        ExprKind::Constant(constant) => ast::Expr::Lit(raise_constant(constant, span)),
        ExprKind::BinOp(bin) => {
            let outer = binary_precedence(bin.op);
            bin_expr(
                span,
                raise_binary_op(bin.op, span)?,
                raise_operand(&bin.left, outer, false)?,
                raise_operand(&bin.right, outer, true)?,
            )
        }
        ExprKind::Compare { left, op, right } => {
            let outer = compare_precedence(*op);
            bin_expr(
                span,
                raise_compare_op(*op),
                raise_operand(left, outer, false)?,
                raise_operand(right, outer, true)?,
            )
        }
        ExprKind::BoolOp { op, left, right } => bin_expr(
            span,
            raise_bool_op(*op),
            raise_bool_operand(left, *op, false)?,
            raise_bool_operand(right, *op, true)?,
        ),
        ExprKind::UnaryOp { op, operand } => {
            // `- -x` must not print as `--x`.
            let doubled = matches!(
                &operand.kind,
                ExprKind::UnaryOp { op: inner, .. } if inner == op
            );
            ast::Expr::Unary(ast::UnaryExpr {
                span,
                op: raise_unary_op(*op),
                arg: raise_wrapped(operand, doubled || precedence(operand) < PREC_UNARY)?,
            })
        }
        ExprKind::Call(call) => {
            let mut args = Vec::with_capacity(call.args.len() + call.keywords.len());
            for a in &call.args {
                args.push(arg(Box::new(raise_expr(a)?)));
            }
            for kw in &call.keywords {
                args.push(arg(Box::new(ast::Expr::Assign(ast::AssignExpr {
                    span: kw.span,
                    op: ast::AssignOp::Assign,
                    left: ast::AssignTarget::Simple(ast::SimpleAssignTarget::Ident(
                        ast::BindingIdent {
                            id: ident(&kw.name, kw.span),
                            type_ann: None,
                        },
                    )),
                    right: Box::new(raise_expr(&kw.value)?),
                }))));
            }
            ast::Expr::Call(ast::CallExpr {
                span,
                callee: ast::Callee::Expr(raise_target(&call.callee)?),
                args,
                type_args: None,
                ..Default::default()
            })
        }
        ExprKind::Attribute(attr) => ast::Expr::Member(ast::MemberExpr {
            span,
            obj: raise_target(&attr.target)?,
            prop: ast::MemberProp::Ident(ast::IdentName::new(attr.name.as_str().into(), span)),
        }),
        ExprKind::Subscript { target, index } => ast::Expr::Member(ast::MemberExpr {
            span,
            obj: raise_target(target)?,
            prop: ast::MemberProp::Computed(ast::ComputedPropName {
                span: index.span,
                expr: Box::new(raise_expr(index)?),
            }),
        }),
        ExprKind::Lambda(lambda) => {
            // `=> {` would open a block body.
            let body_is_object = starts_with_object(&lambda.body);
            ast::Expr::Arrow(ast::ArrowExpr {
                span,
                ctxt: Default::default(),
                params: vec![binding(&lambda.param, span)],
                body: Box::new(ast::BlockStmtOrExpr::Expr(raise_wrapped(
                    &lambda.body,
                    body_is_object,
                )?)),
                is_async: false,
                is_generator: false,
                type_params: None,
                return_type: None,
            })
        }
        ExprKind::List(items) => {
            let mut elems = Vec::with_capacity(items.len());
            for item in items {
                elems.push(Some(arg(Box::new(raise_expr(item)?))));
            }
            ast::Expr::Array(ast::ArrayLit { span, elems })
        }
        ExprKind::Dict(entries) => {
            let mut props = Vec::with_capacity(entries.len());
            for entry in entries {
                let key = match &entry.key.kind {
                    ExprKind::Constant(Constant::Str { raw }) => {
                        ast::PropName::Str(raise_str(raw, entry.key.span))
                    }
                    ExprKind::Constant(Constant::Num { value, raw }) => {
                        ast::PropName::Num(ast::Number {
                            span: entry.key.span,
                            value: *value,
                            raw: Some(raw.as_str().into()),
                        })
                    }
                    _ => ast::PropName::Computed(ast::ComputedPropName {
                        span: entry.key.span,
                        expr: Box::new(raise_expr(&entry.key)?),
                    }),
                };
                props.push(ast::PropOrSpread::Prop(Box::new(ast::Prop::KeyValue(
                    ast::KeyValueProp {
                        key,
                        value: Box::new(raise_expr(&entry.value)?),
                    },
                ))));
            }
            ast::Expr::Object(ast::ObjectLit { span, props })
        }
        ExprKind::IfExp { test, body, orelse } => ast::Expr::Cond(ast::CondExpr {
            span,
            test: raise_wrapped(test, precedence(test) <= PREC_COND)?,
            cons: Box::new(raise_expr(body)?),
            alt: Box::new(raise_expr(orelse)?),
        }),
        ExprKind::FString { quasis, values } => {
            let last = quasis.len().saturating_sub(1);
            ast::Expr::Tpl(ast::Tpl {
                span,
                exprs: values
                    .iter()
                    .map(|v| raise_expr(v).map(Box::new))
                    .collect::<RaiseResult<_>>()?,
                quasis: quasis
                    .iter()
                    .enumerate()
                    .map(|(i, raw)| ast::TplElement {
                        span,
                        tail: i == last,
                        cooked: None,
                        raw: raw.as_str().into(),
                    })
                    .collect(),
            })
        }
    })
}

/// An object literal cannot start a statement.
fn starts_with_object(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Dict(_) => true,
        ExprKind::BinOp(ps_ast::BinOp { left, .. })
        | ExprKind::Compare { left, .. }
        | ExprKind::BoolOp { left, .. } => starts_with_object(left),
        ExprKind::Call(call) => starts_with_object(&call.callee),
        ExprKind::Attribute(attr) => starts_with_object(&attr.target),
        ExprKind::Subscript { target, .. } => starts_with_object(target),
        ExprKind::IfExp { test, .. } => starts_with_object(test),
        _ => false,
    }
}

pub fn raise_program(program: &Program) -> RaiseResult<ast::Module> {
    let mut body = Vec::with_capacity(program.body.len());
    for stmt in &program.body {
        let stmt = match &stmt.kind {
            StmtKind::Expr(expr) => {
                ast::Stmt::Expr(ast::ExprStmt {
                    span: stmt.span,
                    expr: raise_wrapped(expr, starts_with_object(expr))?,
                })
            }
            StmtKind::Let { name, value } => {
                ast::Stmt::Decl(ast::Decl::Var(Box::new(ast::VarDecl {
                    span: stmt.span,
                    ctxt: Default::default(),
                    kind: ast::VarDeclKind::Let,
                    declare: false,
                    decls: vec![ast::VarDeclarator {
                        span: stmt.span,
                        name: binding(name, stmt.span),
                        init: Some(Box::new(raise_expr(value)?)),
                        definite: false,
                    }],
                })))
            }
        };
        body.push(ast::ModuleItem::Stmt(stmt));
    }
    Ok(ast::Module {
        span: program.span,
        body,
        shebang: None,
    })
}
