//! Tier-default edge functions.
//!
//! Every tier boundary ships a default cost/loss/risk triple so a scenario
//! only has to list the edges it wants to differ. Risk is concentrated on
//! the origin fan-out; everything downstream defaults to congestion-style
//! quadratic costs.

use ef_graph::{EdgeFunctions, Tier};

/// Default functions for an edge leaving `source` tier.
pub fn tier_default(source: Tier) -> EdgeFunctions {
    match source {
        Tier::Origin => EdgeFunctions::new("f^2+6*f", "0", "2*f^2", 1.0),
        Tier::C => EdgeFunctions::new("2*f^2+7*f", "0", "0", 1.0),
        Tier::B => EdgeFunctions::new("f^2+11*f", "0", "0", 1.0),
        Tier::P => EdgeFunctions::new("3*f^2+11*f", "0", "0", 1.0),
        Tier::S => EdgeFunctions::new("f^2+2*f", "0", "0", 1.0),
        Tier::D | Tier::R => EdgeFunctions::new("f^2+f", "0", "0", 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_origin_edges_carry_default_risk() {
        for tier in [Tier::C, Tier::B, Tier::P, Tier::S, Tier::D] {
            assert_eq!(tier_default(tier).risk, "0");
        }
        assert_eq!(tier_default(Tier::Origin).risk, "2*f^2");
    }

    #[test]
    fn defaults_keep_full_retention() {
        for tier in [Tier::Origin, Tier::C, Tier::B, Tier::P, Tier::S, Tier::D] {
            assert_eq!(tier_default(tier).alpha, 1.0);
        }
    }
}
