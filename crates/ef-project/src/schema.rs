//! Scenario schema definitions.
//!
//! Wire keys follow the solver's historical input format: tier counts as
//! `nC`/`nB`/`nD`/`nR`, demand penalties as `lambda+`/`lambda-`, target band
//! as `P_min`/`P_max`.

use serde::{Deserialize, Serialize};

/// Current schema version.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    pub topology: TopologyDef,
    pub theta: f64,
    /// Per-edge overrides; edges not listed take their tier defaults.
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
    /// One entry per demand node, in R1..Rn order.
    pub demand_nodes: Vec<DemandNodeDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopologyDef {
    #[serde(rename = "nC")]
    pub n_c: u32,
    #[serde(rename = "nB")]
    pub n_b: u32,
    #[serde(rename = "nD")]
    pub n_d: u32,
    #[serde(rename = "nR")]
    pub n_r: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeDef {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DemandNodeDef {
    #[serde(rename = "lambda+")]
    pub lambda_plus: f64,
    #[serde(rename = "lambda-")]
    pub lambda_minus: f64,
    #[serde(rename = "P_min")]
    pub p_min: f64,
    #[serde(rename = "P_max")]
    pub p_max: f64,
}
