//! Incidence and retention arithmetic.
//!
//! Flow decays multiplicatively along a path: each edge passes fraction α of
//! what enters it. The solver needs, per (edge, path) pair, the share of a
//! unit of path flow that actually reaches the edge — zero when the edge is
//! not on the path — and per path the end-to-end surviving fraction.

use ef_core::{EdgeId, Real};

use crate::edge::Network;
use crate::paths::Path;

impl Network {
    /// Share of one unit of flow injected on `path` that arrives at `edge`:
    /// the product of α over the edges strictly preceding it on the path,
    /// or 0 if the edge is not on the path.
    pub fn retained_share(&self, path: &Path, edge: EdgeId) -> Real {
        let mut share = 1.0;
        for &step in &path.edges {
            if step == edge {
                return share;
            }
            match self.edge(step) {
                Some(e) => share *= e.functions.alpha,
                None => return 0.0,
            }
        }
        0.0
    }

    /// End-to-end surviving fraction of `path`: the product of α over every
    /// edge. In (0, 1] for any validated network.
    pub fn survival(&self, path: &Path) -> Real {
        path.edges
            .iter()
            .filter_map(|&step| self.edge(step))
            .map(|e| e.functions.alpha)
            .product()
    }
}
