//! Per-edge marginal cost/loss/risk assembly.
//!
//! For each edge the cost, loss and risk bodies are parsed, differentiated
//! with respect to the flow variable, the flow variable is substituted by the
//! edge's symbolic flow expression, and the result is simplified and
//! compiled against the path-variable slots.

use ef_expr::{Expr, ExprResult, Program, compile, diff, parse, simplify};
use ef_graph::{Network, PathTable};
use tracing::debug;

use crate::flow::{FLOW_VAR, edge_flow_expr, resolve_path_var};

/// Compiled marginal terms for one edge, each a function of the full
/// path-flow vector.
#[derive(Debug, Clone)]
pub struct EdgeTerms {
    pub marginal_cost: Program,
    pub marginal_loss: Program,
    pub marginal_risk: Program,
}

/// Assemble marginal terms for every edge, in edge-arena order.
///
/// A body that fails to parse, differentiate or compile degrades to the
/// constant 0 for that one term; assembly itself never fails. This keeps a
/// single malformed entry from taking down construction while leaving every
/// other edge untouched.
pub fn assemble(network: &Network, paths: &PathTable) -> Vec<EdgeTerms> {
    let n = paths.len();
    network
        .edges()
        .iter()
        .map(|edge| {
            let flow = edge_flow_expr(network, paths, edge.id);
            let marginal = |what: &'static str, body: &str| -> Program {
                match build_marginal(body, &flow, n) {
                    Ok(program) => program,
                    Err(err) => {
                        debug!(
                            source = %edge.source,
                            target = %edge.target,
                            what,
                            %err,
                            "marginal term degraded to 0"
                        );
                        Program::constant(0.0)
                    }
                }
            };
            EdgeTerms {
                marginal_cost: marginal("cost", &edge.functions.cost),
                marginal_loss: marginal("loss", &edge.functions.loss),
                marginal_risk: marginal("risk", &edge.functions.risk),
            }
        })
        .collect()
}

fn build_marginal(body: &str, flow: &Expr, n: usize) -> ExprResult<Program> {
    let parsed = parse(body)?;
    let derivative = diff(&parsed, FLOW_VAR);
    let substituted = derivative.substitute(FLOW_VAR, flow);
    let simplified = simplify(&substituted);
    compile(&simplified, |name| resolve_path_var(name, n))
}
