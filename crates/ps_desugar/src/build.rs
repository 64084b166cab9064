//! Terse tree builders for unit tests. Every node gets `DUMMY_SP`.

use ps_ast::{BinaryOperator, Constant, Expr, ExprKind, Keyword, DUMMY_SP};

pub fn name(id: &str) -> Expr {
    Expr::name(DUMMY_SP, id)
}

pub fn num(n: i64) -> Expr {
    Expr::new(
        DUMMY_SP,
        ExprKind::Constant(Constant::Num {
            value: n as f64,
            raw: n.to_string(),
        }),
    )
}

pub fn string(s: &str) -> Expr {
    Expr::new(
        DUMMY_SP,
        ExprKind::Constant(Constant::Str {
            raw: format!("\"{s}\""),
        }),
    )
}

pub fn bin(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::binop(DUMMY_SP, left, op, right)
}

pub fn pipe(left: Expr, right: Expr) -> Expr {
    bin(left, BinaryOperator::RShift, right)
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::call(DUMMY_SP, callee, args, Vec::new())
}

pub fn call_kw(callee: Expr, args: Vec<Expr>, keywords: Vec<(&str, Expr)>) -> Expr {
    let keywords = keywords
        .into_iter()
        .map(|(name, value)| Keyword {
            span: DUMMY_SP,
            name: name.to_string(),
            value,
        })
        .collect();
    Expr::call(DUMMY_SP, callee, args, keywords)
}

pub fn attr(target: Expr, name: &str) -> Expr {
    Expr::attribute(DUMMY_SP, target, name)
}

pub fn lambda(param: &str, body: Expr) -> Expr {
    Expr::lambda(DUMMY_SP, param, body)
}
