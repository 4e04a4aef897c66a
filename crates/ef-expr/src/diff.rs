//! Structural differentiation.

use ef_core::Real;

use crate::ast::{BinOp, Expr, Func};

/// Differentiate `e` with respect to `var`.
///
/// The result is not simplified; run it through [`crate::simplify`] before
/// compiling. Every expression the parser can produce is differentiable, so
/// this stage cannot fail.
pub fn diff(e: &Expr, var: &str) -> Expr {
    match e {
        Expr::Num(_) => Expr::num(0.0),
        Expr::Var(name) => {
            if name == var {
                Expr::num(1.0)
            } else {
                Expr::num(0.0)
            }
        }
        Expr::Neg(inner) => Expr::neg(diff(inner, var)),
        Expr::Bin(op, lhs, rhs) => diff_bin(*op, lhs, rhs, var),
        Expr::Call(func, arg) => diff_call(*func, arg, var),
    }
}

fn diff_bin(op: BinOp, u: &Expr, v: &Expr, var: &str) -> Expr {
    let du = || diff(u, var);
    let dv = || diff(v, var);
    match op {
        BinOp::Add => Expr::bin(BinOp::Add, du(), dv()),
        BinOp::Sub => Expr::bin(BinOp::Sub, du(), dv()),
        // (uv)' = u'v + uv'
        BinOp::Mul => Expr::bin(
            BinOp::Add,
            Expr::bin(BinOp::Mul, du(), v.clone()),
            Expr::bin(BinOp::Mul, u.clone(), dv()),
        ),
        // (u/v)' = (u'v - uv') / v^2
        BinOp::Div => Expr::bin(
            BinOp::Div,
            Expr::bin(
                BinOp::Sub,
                Expr::bin(BinOp::Mul, du(), v.clone()),
                Expr::bin(BinOp::Mul, u.clone(), dv()),
            ),
            Expr::bin(BinOp::Pow, v.clone(), Expr::num(2.0)),
        ),
        BinOp::Pow => diff_pow(u, v, var),
    }
}

fn diff_pow(u: &Expr, v: &Expr, var: &str) -> Expr {
    // Constant exponent: (u^c)' = c * u^(c-1) * u'
    if let Expr::Num(c) = v {
        let c = *c;
        return Expr::bin(
            BinOp::Mul,
            Expr::bin(
                BinOp::Mul,
                Expr::num(c),
                Expr::bin(BinOp::Pow, u.clone(), Expr::num(c - 1.0)),
            ),
            diff(u, var),
        );
    }
    // General case: (u^v)' = u^v * (v' * ln(u) + v * u' / u)
    Expr::bin(
        BinOp::Mul,
        Expr::bin(BinOp::Pow, u.clone(), v.clone()),
        Expr::bin(
            BinOp::Add,
            Expr::bin(
                BinOp::Mul,
                diff(v, var),
                Expr::call(Func::Ln, u.clone()),
            ),
            Expr::bin(
                BinOp::Div,
                Expr::bin(BinOp::Mul, v.clone(), diff(u, var)),
                u.clone(),
            ),
        ),
    )
}

fn diff_call(func: Func, u: &Expr, var: &str) -> Expr {
    let du = diff(u, var);
    let outer = match func {
        Func::Sin => Expr::call(Func::Cos, u.clone()),
        Func::Cos => Expr::neg(Expr::call(Func::Sin, u.clone())),
        // tan' = 1 / cos^2
        Func::Tan => Expr::bin(
            BinOp::Div,
            Expr::num(1.0),
            Expr::bin(
                BinOp::Pow,
                Expr::call(Func::Cos, u.clone()),
                Expr::num(2.0),
            ),
        ),
        Func::Exp => Expr::call(Func::Exp, u.clone()),
        Func::Ln => Expr::bin(BinOp::Div, Expr::num(1.0), u.clone()),
        Func::Log => Expr::bin(
            BinOp::Div,
            Expr::num(1.0),
            Expr::bin(
                BinOp::Mul,
                u.clone(),
                Expr::num(core::f64::consts::LN_10),
            ),
        ),
        Func::Sqrt => Expr::bin(
            BinOp::Div,
            Expr::num(1.0),
            Expr::bin(
                BinOp::Mul,
                Expr::num(2.0),
                Expr::call(Func::Sqrt, u.clone()),
            ),
        ),
        // abs' = u / abs(u), undefined at 0 like the sign function
        Func::Abs => Expr::bin(
            BinOp::Div,
            u.clone(),
            Expr::call(Func::Abs, u.clone()),
        ),
    };
    Expr::bin(BinOp::Mul, outer, du)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use crate::simplify::simplify;

    fn d(src: &str) -> Expr {
        simplify(&diff(&parse(src).unwrap(), "f"))
    }

    fn eval1(e: &Expr, f: Real) -> Real {
        let program = crate::compile::compile(e, |name| (name == "f").then_some(0)).unwrap();
        program.eval(&[f])
    }

    #[test]
    fn constant_and_variable() {
        assert_eq!(d("3"), Expr::num(0.0));
        assert_eq!(d("f"), Expr::num(1.0));
        assert_eq!(d("g"), Expr::num(0.0));
    }

    #[test]
    fn quadratic_cost_derivative() {
        // d/df (f^2 + 11f) = 2f + 11
        let e = d("f^2+11*f");
        assert_eq!(eval1(&e, 0.0), 11.0);
        assert_eq!(eval1(&e, 1.0), 13.0);
        assert_eq!(eval1(&e, 2.5), 16.0);
    }

    #[test]
    fn product_rule() {
        // d/df (f * sin(f)) = sin(f) + f*cos(f)
        let e = d("f * sin(f)");
        let at = 0.7_f64;
        let expected = at.sin() + at * at.cos();
        assert!((eval1(&e, at) - expected).abs() < 1e-12);
    }

    #[test]
    fn quotient_rule() {
        // d/df (f / (f + 1)) = 1 / (f+1)^2
        let e = d("f / (f + 1)");
        let at = 2.0_f64;
        assert!((eval1(&e, at) - 1.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn chain_rule_through_functions() {
        // d/df exp(2f) = 2 exp(2f)
        let e = d("exp(2*f)");
        let at = 0.3_f64;
        assert!((eval1(&e, at) - 2.0 * (2.0 * at).exp()).abs() < 1e-12);
    }

    #[test]
    fn general_power_rule() {
        // d/df f^f = f^f (ln f + 1)
        let e = d("f^f");
        let at = 1.5_f64;
        let expected = at.powf(at) * (at.ln() + 1.0);
        assert!((eval1(&e, at) - expected).abs() < 1e-12);
    }

    #[test]
    fn sqrt_and_ln() {
        let e = d("sqrt(f)");
        assert!((eval1(&e, 4.0) - 0.25).abs() < 1e-12);
        let e = d("ln(f)");
        assert!((eval1(&e, 4.0) - 0.25).abs() < 1e-12);
    }
}
