//! ef-project: canonical scenario file format and validation.

pub mod convert;
pub mod defaults;
pub mod schema;
pub mod validate;

pub use convert::scenario_inputs;
pub use defaults::tier_default;
pub use schema::*;
pub use validate::{ValidationError, validate_scenario};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Network error: {0}")]
    Graph(#[from] ef_graph::GraphError),

    #[error("Unsupported file extension: {path}")]
    UnsupportedExtension { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load a scenario, dispatching on the file extension (.yaml/.yml/.json).
pub fn load_scenario(path: &std::path::Path) -> ProjectResult<Scenario> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => Err(ProjectError::UnsupportedExtension {
            path: path.display().to_string(),
        }),
    }
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_yaml::from_str(&content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn save_yaml(path: &std::path::Path, scenario: &Scenario) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    let content = serde_yaml::to_string(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario: Scenario = serde_json::from_str(&content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn save_json(path: &std::path::Path, scenario: &Scenario) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    let content = serde_json::to_string_pretty(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}
