//! Expression and statement nodes.

use serde::Serialize;
use swc_common::{Span, DUMMY_SP};

use crate::fold::{Fold, Visit};
use crate::operator::{BinaryOperator, BoolOperator, CompareOperator, UnaryOperator};

/// An expression with the source span it was parsed from (or inherited).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    Name(String),
    Constant(Constant),
    BinOp(BinOp),
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    BoolOp {
        op: BoolOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Compare {
        left: Box<Expr>,
        op: CompareOperator,
        right: Box<Expr>,
    },
    Call(Call),
    Attribute(Attribute),
    Subscript {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Lambda(Lambda),
    List(Vec<Expr>),
    Dict(Vec<DictEntry>),
    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },
    /// Template string. `quasis` always holds one more element than `values`.
    FString {
        quasis: Vec<String>,
        values: Vec<Expr>,
    },
}

/// Literal value. Raw source text is kept so re-emission is byte-faithful.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Constant {
    /// `raw` includes the quotes.
    Str { raw: String },
    Num { value: f64, raw: String },
    Bool(bool),
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinOp {
    pub left: Box<Expr>,
    pub op: BinaryOperator,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
    pub keywords: Vec<Keyword>,
}

/// `name = value` in a call's argument list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    pub span: Span,
    pub name: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub target: Box<Expr>,
    pub name: String,
}

/// Single-parameter anonymous function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lambda {
    pub param: String,
    pub body: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DictEntry {
    pub key: Expr,
    pub value: Expr,
}

impl Expr {
    pub fn new(span: Span, kind: ExprKind) -> Self {
        Self { span, kind }
    }

    pub fn name(span: Span, id: impl Into<String>) -> Self {
        Self::new(span, ExprKind::Name(id.into()))
    }

    pub fn binop(span: Span, left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Self::new(
            span,
            ExprKind::BinOp(BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            }),
        )
    }

    pub fn call(span: Span, callee: Expr, args: Vec<Expr>, keywords: Vec<Keyword>) -> Self {
        Self::new(
            span,
            ExprKind::Call(Call {
                callee: Box::new(callee),
                args,
                keywords,
            }),
        )
    }

    pub fn attribute(span: Span, target: Expr, name: impl Into<String>) -> Self {
        Self::new(
            span,
            ExprKind::Attribute(Attribute {
                target: Box::new(target),
                name: name.into(),
            }),
        )
    }

    pub fn lambda(span: Span, param: impl Into<String>, body: Expr) -> Self {
        Self::new(
            span,
            ExprKind::Lambda(Lambda {
                param: param.into(),
                body: Box::new(body),
            }),
        )
    }

    /// True when this node is exactly `Name(id)`.
    pub fn is_name(&self, id: &str) -> bool {
        matches!(&self.kind, ExprKind::Name(name) if name == id)
    }

    /// Copy of the tree with every span reset, for structural comparison.
    pub fn without_spans(self) -> Expr {
        SpanEraser.fold_expr(self)
    }

    /// Rebuild this node with `folder` applied to each direct child.
    pub fn fold_children_with<F: Fold + ?Sized>(self, folder: &mut F) -> Expr {
        let Expr { span, kind } = self;
        let mut fold = |e: Box<Expr>| Box::new(folder.fold_expr(*e));
        let kind = match kind {
            ExprKind::Name(_) | ExprKind::Constant(_) => kind,
            ExprKind::BinOp(BinOp { left, op, right }) => ExprKind::BinOp(BinOp {
                left: fold(left),
                op,
                right: fold(right),
            }),
            ExprKind::UnaryOp { op, operand } => ExprKind::UnaryOp {
                op,
                operand: fold(operand),
            },
            ExprKind::BoolOp { op, left, right } => ExprKind::BoolOp {
                op,
                left: fold(left),
                right: fold(right),
            },
            ExprKind::Compare { left, op, right } => ExprKind::Compare {
                left: fold(left),
                op,
                right: fold(right),
            },
            ExprKind::Call(Call {
                callee,
                args,
                keywords,
            }) => {
                let callee = fold(callee);
                ExprKind::Call(Call {
                    callee,
                    args: args.into_iter().map(|a| folder.fold_expr(a)).collect(),
                    keywords: keywords
                        .into_iter()
                        .map(|kw| Keyword {
                            value: folder.fold_expr(kw.value),
                            ..kw
                        })
                        .collect(),
                })
            }
            ExprKind::Attribute(Attribute { target, name }) => ExprKind::Attribute(Attribute {
                target: fold(target),
                name,
            }),
            ExprKind::Subscript { target, index } => ExprKind::Subscript {
                target: fold(target),
                index: fold(index),
            },
            ExprKind::Lambda(Lambda { param, body }) => ExprKind::Lambda(Lambda {
                param,
                body: fold(body),
            }),
            ExprKind::List(items) => {
                ExprKind::List(items.into_iter().map(|e| folder.fold_expr(e)).collect())
            }
            ExprKind::Dict(entries) => ExprKind::Dict(
                entries
                    .into_iter()
                    .map(|DictEntry { key, value }| DictEntry {
                        key: folder.fold_expr(key),
                        value: folder.fold_expr(value),
                    })
                    .collect(),
            ),
            ExprKind::IfExp { test, body, orelse } => ExprKind::IfExp {
                test: fold(test),
                body: fold(body),
                orelse: fold(orelse),
            },
            ExprKind::FString { quasis, values } => ExprKind::FString {
                quasis,
                values: values.into_iter().map(|e| folder.fold_expr(e)).collect(),
            },
        };
        Expr { span, kind }
    }

    /// Call `visitor` on each direct child, left to right.
    pub fn visit_children_with<V: Visit + ?Sized>(&self, visitor: &mut V) {
        match &self.kind {
            ExprKind::Name(_) | ExprKind::Constant(_) => {}
            ExprKind::BinOp(BinOp { left, right, .. })
            | ExprKind::BoolOp { left, right, .. }
            | ExprKind::Compare { left, right, .. } => {
                visitor.visit_expr(left);
                visitor.visit_expr(right);
            }
            ExprKind::UnaryOp { operand, .. } => visitor.visit_expr(operand),
            ExprKind::Call(Call {
                callee,
                args,
                keywords,
            }) => {
                visitor.visit_expr(callee);
                args.iter().for_each(|a| visitor.visit_expr(a));
                keywords.iter().for_each(|kw| visitor.visit_expr(&kw.value));
            }
            ExprKind::Attribute(Attribute { target, .. }) => visitor.visit_expr(target),
            ExprKind::Subscript { target, index } => {
                visitor.visit_expr(target);
                visitor.visit_expr(index);
            }
            ExprKind::Lambda(Lambda { body, .. }) => visitor.visit_expr(body),
            ExprKind::List(items) => items.iter().for_each(|e| visitor.visit_expr(e)),
            ExprKind::Dict(entries) => entries.iter().for_each(|entry| {
                visitor.visit_expr(&entry.key);
                visitor.visit_expr(&entry.value);
            }),
            ExprKind::IfExp { test, body, orelse } => {
                visitor.visit_expr(test);
                visitor.visit_expr(body);
                visitor.visit_expr(orelse);
            }
            ExprKind::FString { values, .. } => values.iter().for_each(|e| visitor.visit_expr(e)),
        }
    }
}

/// A parsed routine body: a sequence of statements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub span: Span,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    pub span: Span,
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmtKind {
    Expr(Expr),
    /// `let name = value`
    Let { name: String, value: Expr },
}

impl Stmt {
    pub fn expr(&self) -> &Expr {
        match &self.kind {
            StmtKind::Expr(expr) | StmtKind::Let { value: expr, .. } => expr,
        }
    }
}

impl Program {
    pub fn without_spans(self) -> Program {
        SpanEraser.fold_program(self)
    }
}

struct SpanEraser;

impl Fold for SpanEraser {
    fn fold_expr(&mut self, expr: Expr) -> Expr {
        let mut expr = expr.fold_children_with(self);
        expr.span = DUMMY_SP;
        if let ExprKind::Call(call) = &mut expr.kind {
            for kw in &mut call.keywords {
                kw.span = DUMMY_SP;
            }
        }
        expr
    }

    fn fold_stmt(&mut self, stmt: Stmt) -> Stmt {
        let Stmt { kind, .. } = stmt;
        let kind = match kind {
            StmtKind::Expr(e) => StmtKind::Expr(self.fold_expr(e)),
            StmtKind::Let { name, value } => StmtKind::Let {
                name,
                value: self.fold_expr(value),
            },
        };
        Stmt {
            span: DUMMY_SP,
            kind,
        }
    }

    fn fold_program(&mut self, program: Program) -> Program {
        Program {
            span: DUMMY_SP,
            body: program
                .body
                .into_iter()
                .map(|s| self.fold_stmt(s))
                .collect(),
        }
    }
}
