use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use ef_project::{load_scenario, scenario_inputs, validate_scenario};
use ef_solver::{
    EquilibriumProblem, Method, SolveOutput, SolveReport, SolveRequest, solve,
};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "ef-cli")]
#[command(about = "Equiflow CLI - supply network equilibrium solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and structure
    Validate {
        /// Path to the scenario YAML/JSON file
        scenario_path: PathBuf,
    },
    /// Show topology, edge and path statistics for a scenario
    Inspect {
        /// Path to the scenario YAML/JSON file
        scenario_path: PathBuf,
    },
    /// Solve for the equilibrium flow distribution
    Solve {
        /// Path to the scenario YAML/JSON file
        scenario_path: PathBuf,
        /// Method: korpelevich, popov, reflection, or all
        #[arg(long, default_value = "korpelevich")]
        method: String,
        /// Lower box bound C_min
        #[arg(long, default_value_t = 0.0)]
        c_min: f64,
        /// Upper box bound C_max
        #[arg(long, default_value_t = 10.0)]
        c_max: f64,
        /// Scalar seed for the starting vector
        #[arg(long, default_value_t = 0.0)]
        initial_x: f64,
        /// Fixed step size
        #[arg(long, default_value_t = 0.001)]
        step: f64,
        /// Convergence tolerance
        #[arg(long, default_value_t = 1e-6)]
        epsilon: f64,
        /// Iteration cap (defaults per method)
        #[arg(long)]
        max_iter: Option<usize>,
        /// Emit the results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Inspect { scenario_path } => cmd_inspect(&scenario_path),
        Commands::Solve {
            scenario_path,
            method,
            c_min,
            c_max,
            initial_x,
            step,
            epsilon,
            max_iter,
            json,
        } => {
            let request = SolveRequest {
                method: method.parse::<Method>()?,
                c_min,
                c_max,
                initial_x,
                step,
                epsilon,
                max_iter,
            };
            cmd_solve(&scenario_path, &request, json)
        }
    }
}

fn cmd_validate(scenario_path: &Path) -> Result<(), Box<dyn Error>> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = load_scenario(scenario_path)?;
    validate_scenario(&scenario)?;
    println!("✓ Scenario is valid");
    Ok(())
}

fn cmd_inspect(scenario_path: &Path) -> Result<(), Box<dyn Error>> {
    let scenario = load_scenario(scenario_path)?;
    let (network, demand, theta) = scenario_inputs(&scenario)?;
    let problem = EquilibriumProblem::new(network, demand, theta)?;

    let topo = problem.network().topology();
    println!("Scenario: {}", scenario.name);
    println!(
        "  Tiers: nC={} nB={} (nP=nS={}) nD={} nR={}",
        topo.n_c,
        topo.n_b,
        topo.n_b,
        topo.n_d,
        topo.n_r
    );
    println!("  Edges: {}", problem.network().edges().len());
    println!("  Paths: {}", problem.n_paths());
    println!("  Risk weight theta: {}", problem.theta());
    for path in problem.paths().iter() {
        let survival = problem.network().survival(path);
        let route: Vec<String> = path
            .edges
            .iter()
            .filter_map(|&e| problem.network().edge(e))
            .map(|e| e.target.to_string())
            .collect();
        println!(
            "  p{}: 1 -> {} (survival {:.4})",
            path.id.index(),
            route.join(" -> "),
            survival
        );
    }
    Ok(())
}

fn cmd_solve(
    scenario_path: &Path,
    request: &SolveRequest,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let scenario = load_scenario(scenario_path)?;
    let (network, demand, theta) = scenario_inputs(&scenario)?;
    let problem = EquilibriumProblem::new(network, demand, theta)?;
    info!(
        scenario = %scenario.name,
        method = %request.method,
        n_paths = problem.n_paths(),
        "solving"
    );

    let output = solve(&problem, request, None)?;
    match output {
        SolveOutput::Single(report) => {
            if json {
                let payload = ReportJson::from(&report);
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                print_report(request.method.as_str(), &report);
            }
        }
        SolveOutput::All(results) => {
            if json {
                let payload: BTreeMap<&str, ReportJson> = results
                    .iter()
                    .map(|(name, report)| (name.as_str(), ReportJson::from(report)))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                for method in Method::SINGLE {
                    if let Some(report) = results.get(method.as_str()) {
                        print_report(method.as_str(), report);
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_report(name: &str, report: &SolveReport) {
    let mark = if report.converged { "✓" } else { "…" };
    println!(
        "{} {}: {} iterations, {:.3} ms",
        mark,
        name,
        report.iterations,
        report.elapsed.as_secs_f64() * 1e3
    );
    let flows: Vec<String> = report.x.iter().map(|v| format!("{v:.6}")).collect();
    println!("  flows: [{}]", flows.join(", "));
    if !report.converged {
        println!("  (stopped at the iteration cap without meeting the tolerance)");
    }
}

/// JSON shape consumed by downstream presentation.
#[derive(Serialize)]
struct ReportJson {
    solution: Vec<f64>,
    iterations: usize,
    time_taken_ms: f64,
    converged: bool,
}

impl From<&SolveReport> for ReportJson {
    fn from(report: &SolveReport) -> Self {
        Self {
            solution: report.x.iter().copied().collect(),
            iterations: report.iterations,
            time_taken_ms: report.elapsed.as_secs_f64() * 1e3,
            converged: report.converged,
        }
    }
}
