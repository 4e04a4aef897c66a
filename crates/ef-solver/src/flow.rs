//! Symbolic flow through an edge as a function of the path-flow variables.

use ef_core::EdgeId;
use ef_expr::{BinOp, Expr};
use ef_graph::{Network, PathTable};

/// The single variable edge functions are written in.
pub const FLOW_VAR: &str = "f";

/// Name of the flow variable for path `index`.
pub fn path_var(index: usize) -> String {
    format!("x{index}")
}

/// Resolve a path-variable name back to its component index, bounded by the
/// dimension `n`. Anything else (including the bare flow variable, which
/// must have been substituted away by this point) resolves to nothing.
pub fn resolve_path_var(name: &str, n: usize) -> Option<usize> {
    let digits = name.strip_prefix('x')?;
    let index: usize = digits.parse().ok()?;
    (index < n).then_some(index)
}

/// Total retention-adjusted flow through `edge`: Σ_p share(e, p) · x_p,
/// summed in path order.
///
/// Paths that miss the edge contribute a zero coefficient and are dropped;
/// every path that does cross it has a strictly positive share, so dropping
/// zeros never changes which variables carry weight.
pub fn edge_flow_expr(network: &Network, paths: &PathTable, edge: EdgeId) -> Expr {
    let mut sum: Option<Expr> = None;
    for path in paths.iter() {
        let share = network.retained_share(path, edge);
        if share == 0.0 {
            continue;
        }
        let term = Expr::bin(
            BinOp::Mul,
            Expr::num(share),
            Expr::var(path_var(path.id.index() as usize)),
        );
        sum = Some(match sum {
            Some(acc) => Expr::bin(BinOp::Add, acc, term),
            None => term,
        });
    }
    sum.unwrap_or_else(|| Expr::num(0.0))
}
