//! Tier layout and the fixed adjacency pattern.

use core::fmt;

use crate::error::{GraphError, GraphResult};

/// The seven tiers, in flow order.
///
/// B, P and S are paired by index (B_i feeds P_i feeds S_i); the other tier
/// boundaries are fully connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Origin,
    C,
    B,
    P,
    S,
    D,
    R,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::Origin => "1",
            Tier::C => "C",
            Tier::B => "B",
            Tier::P => "P",
            Tier::S => "S",
            Tier::D => "D",
            Tier::R => "R",
        }
    }
}

/// A node, addressed by tier and 0-based position within the tier.
///
/// Displayed 1-based with the tier letter ("C1", "R3"), matching the names
/// scenario files use; the origin is just "1".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub tier: Tier,
    pub index: u32,
}

impl NodeRef {
    pub fn new(tier: Tier, index: u32) -> Self {
        Self { tier, index }
    }

    pub fn origin() -> Self {
        Self::new(Tier::Origin, 0)
    }

    /// Parse a display name ("1", "C2", "R10") back into a node reference.
    pub fn parse(name: &str) -> GraphResult<Self> {
        let unknown = || GraphError::UnknownNode {
            name: name.to_string(),
        };
        if name == "1" {
            return Ok(Self::origin());
        }
        let mut chars = name.chars();
        let tier = match chars.next() {
            Some('C') => Tier::C,
            Some('B') => Tier::B,
            Some('P') => Tier::P,
            Some('S') => Tier::S,
            Some('D') => Tier::D,
            Some('R') => Tier::R,
            _ => return Err(unknown()),
        };
        let number: u32 = chars.as_str().parse().map_err(|_| unknown())?;
        if number == 0 {
            return Err(unknown());
        }
        Ok(Self::new(tier, number - 1))
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tier {
            Tier::Origin => write!(f, "1"),
            tier => write!(f, "{}{}", tier.label(), self.index + 1),
        }
    }
}

/// Tier widths. nP and nS always equal nB, so only four counts are free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    pub n_c: u32,
    pub n_b: u32,
    pub n_d: u32,
    pub n_r: u32,
}

impl Topology {
    pub fn new(n_c: u32, n_b: u32, n_d: u32, n_r: u32) -> GraphResult<Self> {
        if n_c == 0 || n_b == 0 || n_d == 0 || n_r == 0 {
            return Err(GraphError::EmptyTier { n_c, n_b, n_d, n_r });
        }
        Ok(Self { n_c, n_b, n_d, n_r })
    }

    pub fn n_p(&self) -> u32 {
        self.n_b
    }

    pub fn n_s(&self) -> u32 {
        self.n_b
    }

    pub fn tier_width(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Origin => 1,
            Tier::C => self.n_c,
            Tier::B | Tier::P | Tier::S => self.n_b,
            Tier::D => self.n_d,
            Tier::R => self.n_r,
        }
    }

    pub fn contains(&self, node: NodeRef) -> bool {
        node.index < self.tier_width(node.tier)
    }

    /// Number of source-to-demand paths: one per (C, B, D, R) choice.
    pub fn n_paths(&self) -> usize {
        self.n_c as usize * self.n_b as usize * self.n_d as usize * self.n_r as usize
    }

    pub fn n_edges(&self) -> usize {
        let (c, b, d, r) = (
            self.n_c as usize,
            self.n_b as usize,
            self.n_d as usize,
            self.n_r as usize,
        );
        c + c * b + 2 * b + b * d + d * r
    }

    /// Every edge the pattern admits, in canonical order: origin fan-out,
    /// then each tier boundary in flow order.
    pub fn edge_endpoints(&self) -> Vec<(NodeRef, NodeRef)> {
        let mut out = Vec::with_capacity(self.n_edges());
        for i in 0..self.n_c {
            out.push((NodeRef::origin(), NodeRef::new(Tier::C, i)));
        }
        for i in 0..self.n_c {
            for j in 0..self.n_b {
                out.push((NodeRef::new(Tier::C, i), NodeRef::new(Tier::B, j)));
            }
        }
        for j in 0..self.n_b {
            out.push((NodeRef::new(Tier::B, j), NodeRef::new(Tier::P, j)));
        }
        for j in 0..self.n_b {
            out.push((NodeRef::new(Tier::P, j), NodeRef::new(Tier::S, j)));
        }
        for j in 0..self.n_b {
            for k in 0..self.n_d {
                out.push((NodeRef::new(Tier::S, j), NodeRef::new(Tier::D, k)));
            }
        }
        for k in 0..self.n_d {
            for l in 0..self.n_r {
                out.push((NodeRef::new(Tier::D, k), NodeRef::new(Tier::R, l)));
            }
        }
        out
    }

    /// Whether the pattern admits an edge between two nodes.
    pub fn admits_edge(&self, source: NodeRef, target: NodeRef) -> bool {
        if !self.contains(source) || !self.contains(target) {
            return false;
        }
        match (source.tier, target.tier) {
            (Tier::Origin, Tier::C) => true,
            (Tier::C, Tier::B) => true,
            (Tier::B, Tier::P) | (Tier::P, Tier::S) => source.index == target.index,
            (Tier::S, Tier::D) => true,
            (Tier::D, Tier::R) => true,
            _ => false,
        }
    }
}
