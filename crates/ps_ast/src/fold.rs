//! Owned-tree folding and borrowed-tree visiting.
//!
//! Folds consume a node and return its replacement, so no subtree is ever
//! mutated in place behind a caller's back.

use crate::expr::{Expr, Program, Stmt, StmtKind};

pub trait Fold {
    fn fold_expr(&mut self, expr: Expr) -> Expr {
        expr.fold_children_with(self)
    }

    fn fold_stmt(&mut self, stmt: Stmt) -> Stmt {
        let Stmt { span, kind } = stmt;
        let kind = match kind {
            StmtKind::Expr(expr) => StmtKind::Expr(self.fold_expr(expr)),
            StmtKind::Let { name, value } => StmtKind::Let {
                name,
                value: self.fold_expr(value),
            },
        };
        Stmt { span, kind }
    }

    fn fold_program(&mut self, program: Program) -> Program {
        Program {
            span: program.span,
            body: program
                .body
                .into_iter()
                .map(|stmt| self.fold_stmt(stmt))
                .collect(),
        }
    }
}

pub trait Visit {
    fn visit_expr(&mut self, expr: &Expr) {
        expr.visit_children_with(self)
    }
}
