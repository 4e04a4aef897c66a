//! Bottom-up constant folding and identity elimination.

use crate::ast::{BinOp, Expr};

/// Simplify an expression.
///
/// Folds constant subtrees (only when the folded value is finite, so a
/// literal division by zero is left in place rather than baked into an
/// infinity) and applies the usual neutral/absorbing-element identities.
/// The result always evaluates to the same value as the input, and
/// simplifying twice gives the same tree as simplifying once.
pub fn simplify(e: &Expr) -> Expr {
    match e {
        Expr::Num(v) => Expr::num(*v),
        Expr::Var(name) => Expr::var(name.clone()),
        Expr::Neg(inner) => match simplify(inner) {
            Expr::Num(v) => Expr::num(-v),
            Expr::Neg(nested) => *nested,
            s => Expr::neg(s),
        },
        Expr::Bin(op, lhs, rhs) => simplify_bin(*op, simplify(lhs), simplify(rhs)),
        Expr::Call(func, arg) => match simplify(arg) {
            Expr::Num(v) => {
                let folded = func.apply(v);
                if folded.is_finite() {
                    Expr::num(folded)
                } else {
                    Expr::call(*func, Expr::num(v))
                }
            }
            s => Expr::call(*func, s),
        },
    }
}

fn simplify_bin(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    if let (Expr::Num(a), Expr::Num(b)) = (&lhs, &rhs) {
        let folded = op.apply(*a, *b);
        if folded.is_finite() {
            return Expr::num(folded);
        }
    }

    match op {
        BinOp::Add => {
            if lhs.is_zero() {
                return rhs;
            }
            if rhs.is_zero() {
                return lhs;
            }
        }
        BinOp::Sub => {
            if rhs.is_zero() {
                return lhs;
            }
            if lhs.is_zero() {
                return Expr::neg(rhs);
            }
        }
        BinOp::Mul => {
            if lhs.is_zero() || rhs.is_zero() {
                return Expr::num(0.0);
            }
            if lhs.is_one() {
                return rhs;
            }
            if rhs.is_one() {
                return lhs;
            }
        }
        BinOp::Div => {
            // 0/x collapses only when the divisor is not itself literal zero.
            if lhs.is_zero() && !rhs.is_zero() {
                return Expr::num(0.0);
            }
            if rhs.is_one() {
                return lhs;
            }
        }
        BinOp::Pow => {
            if rhs.is_zero() {
                return Expr::num(1.0);
            }
            if rhs.is_one() {
                return lhs;
            }
            if lhs.is_one() {
                return Expr::num(1.0);
            }
        }
    }

    Expr::bin(op, lhs, rhs)
}
