//! Rewriting of pipe operations by the shape of their right-hand side.
//!
//! Chains arrive left-nested from the parser (`(a >> f) >> g`), and each
//! replacement is folded again, so the innermost pipe resolves first and
//! the whole chain ends up as nested calls.

use log::debug;
use ps_ast::{Expr, ExprKind, Fold, PipeSyntax, Program, Span};

use crate::lambda::LambdaSynthesizer;
use crate::shape::{self, PipeShape};
use crate::substitute::ConfigurationError;

/// Rewrites every pipe operation in a tree. Holds configuration only.
#[derive(Debug, Clone)]
pub struct PipeRewriter {
    syntax: PipeSyntax,
    lambdas: LambdaSynthesizer,
}

impl PipeRewriter {
    pub fn new(syntax: PipeSyntax) -> Result<Self, ConfigurationError> {
        let lambdas = LambdaSynthesizer::new(&syntax)?;
        Ok(Self { syntax, lambdas })
    }

    pub fn syntax(&self) -> &PipeSyntax {
        &self.syntax
    }

    /// Rewrite `expr`; the result contains no pipe operation.
    pub fn rewrite(&self, expr: Expr) -> Expr {
        Pass { rewriter: self }.fold_expr(expr)
    }

    pub fn rewrite_program(&self, program: Program) -> Program {
        Pass { rewriter: self }.fold_program(program)
    }

    /// Run the lambda synthesizer on `expr`, with this rewriter handling
    /// whatever it does not turn into a lambda.
    pub fn lambdafy(&self, expr: Expr) -> Expr {
        self.lambdas.maybe_lambdafy(expr, &mut Pass { rewriter: self })
    }
}

struct Pass<'a> {
    rewriter: &'a PipeRewriter,
}

impl Pass<'_> {
    fn rewrite_pipe(&mut self, span: Span, left: Expr, right: Expr) -> Expr {
        let rewriter = self.rewriter;
        let shape = shape::classify(right, &rewriter.syntax);
        debug!("pipe {span:?}: {}", shape.rule());

        let replacement = match shape {
            // a >> _.name  =>  a.name
            PipeShape::AttributeWildcard { name } => Expr::attribute(span, left, name),
            // a >> _.name(...)  =>  a.name(...)
            PipeShape::MethodWildcard {
                name,
                args,
                keywords,
            } => Expr::call(span, Expr::attribute(span, left, name), args, keywords),
            // A lambda is never an attribute or a call, so this lands on the
            // bare callable rule.
            PipeShape::PlaceholderOperation(operation) => {
                let lambda = rewriter.lambdas.maybe_lambdafy(operation, self);
                return self.rewrite_pipe(span, left, lambda);
            }
            // a >> f  =>  f(a)
            PipeShape::BareCallable(callee) => Expr::call(span, callee, vec![left], Vec::new()),
            // a >> f(x, k = v)  =>  f(a, x, k = v)
            PipeShape::DirectCall(call) => {
                let mut args = Vec::with_capacity(call.args.len() + 1);
                args.push(left);
                args.extend(call.args);
                Expr::call(span, *call.callee, args, call.keywords)
            }
        };

        self.fold_expr(replacement)
    }
}

impl Fold for Pass<'_> {
    fn fold_expr(&mut self, expr: Expr) -> Expr {
        match expr.kind {
            ExprKind::BinOp(bin) if self.rewriter.syntax.is_pipe(bin.op) => {
                self.rewrite_pipe(expr.span, *bin.left, *bin.right)
            }
            kind => Expr::new(expr.span, kind).fold_children_with(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use ps_ast::{BinaryOperator, BytePos, Visit};

    use super::*;
    use crate::build::*;

    fn rewrite(expr: Expr) -> Expr {
        PipeRewriter::new(PipeSyntax::default())
            .unwrap()
            .rewrite(expr)
    }

    fn sp(lo: u32, hi: u32) -> Span {
        Span::new(BytePos(lo), BytePos(hi))
    }

    #[derive(Default)]
    struct PipeCounter(usize);

    impl Visit for PipeCounter {
        fn visit_expr(&mut self, expr: &Expr) {
            if let ExprKind::BinOp(bin) = &expr.kind {
                if bin.op == BinaryOperator::RShift {
                    self.0 += 1;
                }
            }
            expr.visit_children_with(self);
        }
    }

    fn pipes_in(expr: &Expr) -> usize {
        let mut counter = PipeCounter::default();
        counter.visit_expr(expr);
        counter.0
    }

    #[test]
    fn rejects_colliding_reserved_names() {
        let syntax = PipeSyntax {
            placeholder: "x".into(),
            bound_variable: "x".into(),
            ..PipeSyntax::default()
        };
        let err = PipeRewriter::new(syntax).unwrap_err();
        assert_eq!(err.name, "x");
    }

    #[test]
    fn bare_reference_becomes_call() {
        assert_eq!(
            rewrite(pipe(num(3), name("double"))),
            call(name("double"), vec![num(3)])
        );
    }

    #[test]
    fn left_is_inserted_as_first_argument() {
        let right = call_kw(
            name("f"),
            vec![name("x1"), name("x2")],
            vec![("k", num(1)), ("j", num(2))],
        );
        let expected = call_kw(
            name("f"),
            vec![name("left"), name("x1"), name("x2")],
            vec![("k", num(1)), ("j", num(2))],
        );
        assert_eq!(rewrite(pipe(name("left"), right)), expected);
    }

    #[test]
    fn attribute_wildcard() {
        assert_eq!(
            rewrite(pipe(name("a"), attr(name("_"), "field"))),
            attr(name("a"), "field")
        );
    }

    #[test]
    fn method_wildcard() {
        let right = call_kw(attr(name("_"), "method"), vec![name("x")], vec![("y", num(1))]);
        assert_eq!(
            rewrite(pipe(name("a"), right)),
            call_kw(attr(name("a"), "method"), vec![name("x")], vec![("y", num(1))])
        );
    }

    #[test]
    fn placeholder_operation_becomes_applied_lambda() {
        let out = rewrite(pipe(name("n"), bin(name("_"), BinaryOperator::Add, num(1))));
        let expected = call(
            lambda("_pipe_x", bin(name("_pipe_x"), BinaryOperator::Add, num(1))),
            vec![name("n")],
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn placeholder_operations_chain() {
        // n >> _ + 1 >> _ * 2
        let chain = pipe(
            pipe(name("n"), bin(name("_"), BinaryOperator::Add, num(1))),
            bin(name("_"), BinaryOperator::Mul, num(2)),
        );
        let inner = call(
            lambda("_pipe_x", bin(name("_pipe_x"), BinaryOperator::Add, num(1))),
            vec![name("n")],
        );
        let expected = call(
            lambda("_pipe_x", bin(name("_pipe_x"), BinaryOperator::Mul, num(2))),
            vec![inner],
        );
        assert_eq!(rewrite(chain), expected);
    }

    #[test]
    fn placeholder_outside_the_operation_is_untouched() {
        // _ >> _ + 1: only the right operand becomes a lambda
        let out = rewrite(pipe(name("_"), bin(name("_"), BinaryOperator::Add, num(1))));
        let expected = call(
            lambda("_pipe_x", bin(name("_pipe_x"), BinaryOperator::Add, num(1))),
            vec![name("_")],
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn chains_associate_left_to_right() {
        // a >> f >> g >> h(y)
        let chain = pipe(
            pipe(pipe(name("a"), name("f")), name("g")),
            call(name("h"), vec![name("y")]),
        );
        let expected = call(
            name("h"),
            vec![
                call(name("g"), vec![call(name("f"), vec![name("a")])]),
                name("y"),
            ],
        );
        assert_eq!(rewrite(chain), expected);
    }

    #[test]
    fn concrete_scenario() {
        // "3" >> duplicate_string >> int >> compute(30, z = 10)
        let chain = pipe(
            pipe(
                pipe(string("3"), name("duplicate_string")),
                name("int"),
            ),
            call_kw(name("compute"), vec![num(30)], vec![("z", num(10))]),
        );
        let expected = call_kw(
            name("compute"),
            vec![
                call(
                    name("int"),
                    vec![call(name("duplicate_string"), vec![string("3")])],
                ),
                num(30),
            ],
            vec![("z", num(10))],
        );
        assert_eq!(rewrite(chain), expected);
    }

    #[test]
    fn mixed_chain_with_wildcards() {
        // obj >> _.items >> _.get(key) >> len
        let chain = pipe(
            pipe(
                pipe(name("obj"), attr(name("_"), "items")),
                call(attr(name("_"), "get"), vec![name("key")]),
            ),
            name("len"),
        );
        let expected = call(
            name("len"),
            vec![call(
                attr(attr(name("obj"), "items"), "get"),
                vec![name("key")],
            )],
        );
        assert_eq!(rewrite(chain), expected);
    }

    #[test]
    fn pipes_nested_in_arguments_and_lambdas_are_rewritten() {
        // f(a >> g, k = b >> h) and x => x >> g
        let expr = call_kw(
            name("f"),
            vec![pipe(name("a"), name("g"))],
            vec![("k", pipe(name("b"), name("h")))],
        );
        assert_eq!(
            rewrite(expr),
            call_kw(
                name("f"),
                vec![call(name("g"), vec![name("a")])],
                vec![("k", call(name("h"), vec![name("b")]))],
            )
        );

        let expr = lambda("x", pipe(name("x"), name("g")));
        assert_eq!(rewrite(expr), lambda("x", call(name("g"), vec![name("x")])));
    }

    #[test]
    fn pipes_under_ordinary_operators_are_rewritten() {
        // (a >> f) + 1
        let expr = bin(pipe(name("a"), name("f")), BinaryOperator::Add, num(1));
        assert_eq!(
            rewrite(expr),
            bin(call(name("f"), vec![name("a")]), BinaryOperator::Add, num(1))
        );
    }

    #[test]
    fn pipe_inside_synthesized_lambda_body() {
        // a >> _ * (_ >> f)
        let right = bin(name("_"), BinaryOperator::Mul, pipe(name("_"), name("f")));
        let expected = call(
            lambda(
                "_pipe_x",
                bin(
                    name("_pipe_x"),
                    BinaryOperator::Mul,
                    call(name("f"), vec![name("_pipe_x")]),
                ),
            ),
            vec![name("a")],
        );
        assert_eq!(rewrite(pipe(name("a"), right)), expected);
    }

    #[test]
    fn pipe_free_tree_is_returned_unchanged() {
        let expr = call_kw(
            attr(name("obj"), "m"),
            vec![bin(name("_"), BinaryOperator::Add, num(1))],
            vec![("k", lambda("y", name("y")))],
        );
        assert_eq!(rewrite(expr.clone()), expr);
    }

    #[test]
    fn rewriting_is_idempotent() {
        let chain = pipe(
            pipe(
                pipe(name("a"), bin(name("_"), BinaryOperator::Sub, name("_"))),
                attr(name("_"), "real"),
            ),
            call(name("f"), vec![pipe(name("b"), name("g"))]),
        );
        let once = rewrite(chain);
        assert_eq!(pipes_in(&once), 0);
        assert_eq!(rewrite(once.clone()), once);
    }

    #[test]
    fn new_nodes_take_the_span_of_the_pipe() {
        let whole = sp(0, 12);
        let expr = Expr::binop(
            whole,
            Expr::name(sp(0, 1), "a"),
            BinaryOperator::RShift,
            Expr::call(sp(5, 12), Expr::name(sp(5, 6), "f"), vec![], vec![]),
        );
        let out = rewrite(expr);
        assert_eq!(out.span, whole);
        match out.kind {
            ExprKind::Call(c) => {
                assert_eq!(c.callee.span, sp(5, 6));
                assert_eq!(c.args[0].span, sp(0, 1));
            }
            other => panic!("expected a call, got {other:?}"),
        }

        let expr = Expr::binop(
            whole,
            Expr::name(sp(0, 1), "a"),
            BinaryOperator::RShift,
            Expr::attribute(sp(5, 12), Expr::name(sp(5, 6), "_"), "field"),
        );
        assert_eq!(rewrite(expr).span, whole);
    }

    #[test]
    fn configured_operator_pipes_and_right_shift_does_not() {
        let syntax = PipeSyntax::default().with_operator_symbol("|").unwrap();
        let rewriter = PipeRewriter::new(syntax).unwrap();
        // a | f >> 2  with `|` as the pipe
        let expr = bin(
            name("a"),
            BinaryOperator::BitOr,
            bin(name("f"), BinaryOperator::RShift, num(2)),
        );
        assert_eq!(
            rewriter.rewrite(expr),
            call(bin(name("f"), BinaryOperator::RShift, num(2)), vec![name("a")])
        );
    }

    #[test]
    fn rewrites_every_statement_of_a_program() {
        use ps_ast::{Stmt, StmtKind, DUMMY_SP};

        let program = Program {
            span: DUMMY_SP,
            body: vec![
                Stmt {
                    span: DUMMY_SP,
                    kind: StmtKind::Let {
                        name: "y".into(),
                        value: pipe(name("x"), name("f")),
                    },
                },
                Stmt {
                    span: DUMMY_SP,
                    kind: StmtKind::Expr(pipe(name("y"), name("print"))),
                },
            ],
        };
        let out = PipeRewriter::new(PipeSyntax::default())
            .unwrap()
            .rewrite_program(program);
        assert_eq!(out.body[0].expr(), &call(name("f"), vec![name("x")]));
        assert_eq!(out.body[1].expr(), &call(name("print"), vec![name("y")]));
    }

    #[test]
    fn rewriter_can_be_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PipeRewriter>();
    }
}
