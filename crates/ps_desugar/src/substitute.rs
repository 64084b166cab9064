//! Identifier substitution used when building a lambda body.
//!
//! In: `1000 + _ + f(_)` with `_` → `x`
//! Out: `1000 + x + f(x)`
//!
//! Renaming is purely lexical. It does not understand scopes, so a nested
//! lambda that rebinds the target name is renamed as well.

use ps_ast::{Expr, Fold};

/// The reserved names of a pass collide.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("`{name}` cannot be substituted with itself; placeholder and bound variable must differ")]
pub struct ConfigurationError {
    pub name: String,
}

/// Renames every `Name(target)` in a tree to `Name(replacement)`.
#[derive(Debug, Clone)]
pub struct Substituter {
    target: String,
    replacement: String,
}

impl Substituter {
    pub fn new(
        target: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let target = target.into();
        let replacement = replacement.into();
        if target == replacement {
            return Err(ConfigurationError { name: target });
        }
        Ok(Self {
            target,
            replacement,
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn substitute(&self, expr: Expr) -> Expr {
        Renamer {
            target: &self.target,
            replacement: &self.replacement,
        }
        .fold_expr(expr)
    }
}

struct Renamer<'a> {
    target: &'a str,
    replacement: &'a str,
}

impl Fold for Renamer<'_> {
    fn fold_expr(&mut self, expr: Expr) -> Expr {
        if expr.is_name(self.target) {
            return Expr::name(expr.span, self.replacement);
        }
        expr.fold_children_with(self)
    }
}

#[cfg(test)]
mod tests {
    use ps_ast::{BinaryOperator, BytePos, Span};

    use super::*;
    use crate::build::*;

    #[test]
    fn identical_names_are_rejected() {
        let err = Substituter::new("_", "_").unwrap_err();
        assert_eq!(err.name, "_");
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn renames_every_occurrence() {
        let s = Substituter::new("_", "x").unwrap();
        let expr = bin(
            bin(num(1000), BinaryOperator::Add, name("_")),
            BinaryOperator::Add,
            call(name("f"), vec![name("_")]),
        );
        let expected = bin(
            bin(num(1000), BinaryOperator::Add, name("x")),
            BinaryOperator::Add,
            call(name("f"), vec![name("x")]),
        );
        assert_eq!(s.substitute(expr), expected);
    }

    #[test]
    fn keeps_the_span_of_each_renamed_name() {
        let s = Substituter::new("_", "x").unwrap();
        let span = Span::new(BytePos(4), BytePos(5));
        let out = s.substitute(Expr::name(span, "_"));
        assert_eq!(out, Expr::name(span, "x"));
    }

    #[test]
    fn leaves_other_names_and_attribute_names_alone() {
        let s = Substituter::new("_", "x").unwrap();
        let expr = attr(name("_a"), "_");
        assert_eq!(s.substitute(expr.clone()), expr);
    }

    #[test]
    fn crosses_lambda_boundaries() {
        let s = Substituter::new("_", "x").unwrap();
        let expr = call_kw(
            name("map"),
            vec![lambda("y", bin(name("y"), BinaryOperator::Mul, name("_")))],
            vec![("start", name("_"))],
        );
        let expected = call_kw(
            name("map"),
            vec![lambda("y", bin(name("y"), BinaryOperator::Mul, name("x")))],
            vec![("start", name("x"))],
        );
        assert_eq!(s.substitute(expr), expected);
    }
}
