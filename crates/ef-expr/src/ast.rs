//! Expression tree definitions.

use core::fmt;
use ef_core::Real;

/// Binary operators, in increasing binding strength: add/sub, mul/div, pow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    pub fn apply(self, a: Real, b: Real) -> Real {
        match self {
            BinOp::Add => a + b,
            BinOp::Sub => a - b,
            BinOp::Mul => a * b,
            BinOp::Div => a / b,
            BinOp::Pow => a.powf(b),
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "^",
        }
    }
}

/// Elementary functions recognized by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    Log,
    Sqrt,
    Abs,
}

impl Func {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Func::Sin),
            "cos" => Some(Func::Cos),
            "tan" => Some(Func::Tan),
            "exp" => Some(Func::Exp),
            "ln" => Some(Func::Ln),
            "log" => Some(Func::Log),
            "sqrt" => Some(Func::Sqrt),
            "abs" => Some(Func::Abs),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Exp => "exp",
            Func::Ln => "ln",
            Func::Log => "log",
            Func::Sqrt => "sqrt",
            Func::Abs => "abs",
        }
    }

    pub fn apply(self, v: Real) -> Real {
        match self {
            Func::Sin => v.sin(),
            Func::Cos => v.cos(),
            Func::Tan => v.tan(),
            Func::Exp => v.exp(),
            Func::Ln => v.ln(),
            Func::Log => v.log10(),
            Func::Sqrt => v.sqrt(),
            Func::Abs => v.abs(),
        }
    }
}

/// An expression tree over numeric literals and named variables.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(Real),
    Var(String),
    Neg(Box<Expr>),
    Bin(BinOp, Box<Expr>, Box<Expr>),
    Call(Func, Box<Expr>),
}

impl Expr {
    pub fn num(v: Real) -> Self {
        Expr::Num(v)
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn bin(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Bin(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn neg(inner: Expr) -> Self {
        Expr::Neg(Box::new(inner))
    }

    pub fn call(func: Func, arg: Expr) -> Self {
        Expr::Call(func, Box::new(arg))
    }

    /// True if this node is the literal zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Num(v) if *v == 0.0)
    }

    /// True if this node is the literal one.
    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Num(v) if *v == 1.0)
    }

    /// Replace every occurrence of `var` with `replacement`.
    pub fn substitute(&self, var: &str, replacement: &Expr) -> Expr {
        match self {
            Expr::Num(v) => Expr::Num(*v),
            Expr::Var(name) => {
                if name == var {
                    replacement.clone()
                } else {
                    Expr::Var(name.clone())
                }
            }
            Expr::Neg(inner) => Expr::neg(inner.substitute(var, replacement)),
            Expr::Bin(op, lhs, rhs) => Expr::bin(
                *op,
                lhs.substitute(var, replacement),
                rhs.substitute(var, replacement),
            ),
            Expr::Call(func, arg) => Expr::call(*func, arg.substitute(var, replacement)),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Binding strength of a node as seen by its parent.
        fn prec(e: &Expr) -> u8 {
            match e {
                Expr::Bin(BinOp::Add | BinOp::Sub, ..) => 1,
                Expr::Neg(_) => 2,
                Expr::Bin(BinOp::Mul | BinOp::Div, ..) => 3,
                Expr::Bin(BinOp::Pow, ..) => 4,
                Expr::Num(_) | Expr::Var(_) | Expr::Call(..) => 5,
            }
        }

        fn write_child(
            f: &mut fmt::Formatter<'_>,
            child: &Expr,
            min_prec: u8,
        ) -> fmt::Result {
            if prec(child) < min_prec {
                write!(f, "({child})")
            } else {
                write!(f, "{child}")
            }
        }

        match self {
            Expr::Num(v) => write!(f, "{v}"),
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Neg(inner) => {
                write!(f, "-")?;
                write_child(f, inner, 3)
            }
            Expr::Bin(op, lhs, rhs) => {
                let p = prec(self);
                write_child(f, lhs, p)?;
                write!(f, " {} ", op.symbol())?;
                // Right operand needs one more level so `a - (b - c)` and
                // `a ^ b ^ c` print back unambiguously.
                write_child(f, rhs, p + 1)
            }
            Expr::Call(func, arg) => write!(f, "{}({})", func.name(), arg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitute_replaces_all_occurrences() {
        // f + f*2 with f := x0 + x1
        let e = Expr::bin(
            BinOp::Add,
            Expr::var("f"),
            Expr::bin(BinOp::Mul, Expr::var("f"), Expr::num(2.0)),
        );
        let repl = Expr::bin(BinOp::Add, Expr::var("x0"), Expr::var("x1"));
        let out = e.substitute("f", &repl);
        assert_eq!(
            out,
            Expr::bin(
                BinOp::Add,
                repl.clone(),
                Expr::bin(BinOp::Mul, repl, Expr::num(2.0)),
            )
        );
    }

    #[test]
    fn substitute_leaves_other_vars_alone() {
        let e = Expr::var("g");
        assert_eq!(e.substitute("f", &Expr::num(1.0)), Expr::var("g"));
    }

    #[test]
    fn display_parenthesizes_by_precedence() {
        // (a + b) * c
        let e = Expr::bin(
            BinOp::Mul,
            Expr::bin(BinOp::Add, Expr::var("a"), Expr::var("b")),
            Expr::var("c"),
        );
        assert_eq!(e.to_string(), "(a + b) * c");

        // a - (b - c)
        let e = Expr::bin(
            BinOp::Sub,
            Expr::var("a"),
            Expr::bin(BinOp::Sub, Expr::var("b"), Expr::var("c")),
        );
        assert_eq!(e.to_string(), "a - (b - c)");
    }

    #[test]
    fn func_name_round_trip() {
        for func in [
            Func::Sin,
            Func::Cos,
            Func::Tan,
            Func::Exp,
            Func::Ln,
            Func::Log,
            Func::Sqrt,
            Func::Abs,
        ] {
            assert_eq!(Func::from_name(func.name()), Some(func));
        }
        assert_eq!(Func::from_name("sinh"), None);
    }
}
