//! Slot-compiled numeric evaluator.
//!
//! Compilation resolves every named variable to a slot index once, so
//! evaluation is a pure walk over the tree against a flat `&[Real]` with no
//! lookups and no allocation. Solver iteration loops call `eval` thousands
//! of times per compiled derivative; this is the hot path.

use ef_core::Real;

use crate::ast::{BinOp, Expr, Func};
use crate::error::{ExprError, ExprResult};

#[derive(Debug, Clone)]
enum Node {
    Const(Real),
    Slot(usize),
    Neg(Box<Node>),
    Bin(BinOp, Box<Node>, Box<Node>),
    Call(Func, Box<Node>),
}

/// A compiled expression, evaluable against a slot vector.
#[derive(Debug, Clone)]
pub struct Program {
    root: Node,
}

impl Program {
    /// A program that ignores its input and returns `v`.
    pub fn constant(v: Real) -> Self {
        Self {
            root: Node::Const(v),
        }
    }

    /// True if this program is a compiled constant (no slot references).
    pub fn is_constant(&self) -> bool {
        fn walk(n: &Node) -> bool {
            match n {
                Node::Const(_) => true,
                Node::Slot(_) => false,
                Node::Neg(inner) | Node::Call(_, inner) => walk(inner),
                Node::Bin(_, lhs, rhs) => walk(lhs) && walk(rhs),
            }
        }
        walk(&self.root)
    }

    /// Evaluate against `slots`. Slots beyond the end of the slice read as
    /// NaN, which surfaces a mis-sized input instead of hiding it.
    pub fn eval(&self, slots: &[Real]) -> Real {
        fn walk(n: &Node, slots: &[Real]) -> Real {
            match n {
                Node::Const(v) => *v,
                Node::Slot(i) => slots.get(*i).copied().unwrap_or(Real::NAN),
                Node::Neg(inner) => -walk(inner, slots),
                Node::Bin(op, lhs, rhs) => op.apply(walk(lhs, slots), walk(rhs, slots)),
                Node::Call(func, arg) => func.apply(walk(arg, slots)),
            }
        }
        walk(&self.root, slots)
    }
}

/// Compile `e`, mapping each variable name to a slot via `resolve`.
///
/// A variable the resolver does not know is a compile error; this is how a
/// stray name escapes silently producing garbage.
pub fn compile<R>(e: &Expr, resolve: R) -> ExprResult<Program>
where
    R: Fn(&str) -> Option<usize> + Copy,
{
    Ok(Program {
        root: lower(e, resolve)?,
    })
}

fn lower<R>(e: &Expr, resolve: R) -> ExprResult<Node>
where
    R: Fn(&str) -> Option<usize> + Copy,
{
    match e {
        Expr::Num(v) => Ok(Node::Const(*v)),
        Expr::Var(name) => match resolve(name) {
            Some(slot) => Ok(Node::Slot(slot)),
            None => Err(ExprError::UnknownVariable { name: name.clone() }),
        },
        Expr::Neg(inner) => Ok(Node::Neg(Box::new(lower(inner, resolve)?))),
        Expr::Bin(op, lhs, rhs) => Ok(Node::Bin(
            *op,
            Box::new(lower(lhs, resolve)?),
            Box::new(lower(rhs, resolve)?),
        )),
        Expr::Call(func, arg) => Ok(Node::Call(*func, Box::new(lower(arg, resolve)?))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn xy_resolver(name: &str) -> Option<usize> {
        match name {
            "x" => Some(0),
            "y" => Some(1),
            _ => None,
        }
    }

    #[test]
    fn evaluates_polynomial() {
        let e = parse("x^2 + 11*x").unwrap();
        let p = compile(&e, xy_resolver).unwrap();
        assert_eq!(p.eval(&[2.0, 0.0]), 26.0);
        assert_eq!(p.eval(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn evaluates_two_variables() {
        let e = parse("x * y - y / 2").unwrap();
        let p = compile(&e, xy_resolver).unwrap();
        assert_eq!(p.eval(&[3.0, 4.0]), 10.0);
    }

    #[test]
    fn unknown_variable_is_a_compile_error() {
        let e = parse("x + z").unwrap();
        let err = compile(&e, xy_resolver).unwrap_err();
        assert_eq!(
            err,
            ExprError::UnknownVariable {
                name: "z".to_string()
            }
        );
    }

    #[test]
    fn constant_program() {
        let p = Program::constant(0.0);
        assert!(p.is_constant());
        assert_eq!(p.eval(&[]), 0.0);
        assert_eq!(p.eval(&[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn compiled_functions_match_std() {
        let e = parse("sin(x) + exp(y)").unwrap();
        let p = compile(&e, xy_resolver).unwrap();
        let (x, y) = (0.5_f64, 1.5_f64);
        assert!((p.eval(&[x, y]) - (x.sin() + y.exp())).abs() < 1e-15);
    }

    #[test]
    fn short_slot_vector_reads_nan() {
        let e = parse("y").unwrap();
        let p = compile(&e, xy_resolver).unwrap();
        assert!(p.eval(&[1.0]).is_nan());
    }
}
