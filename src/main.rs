use clap::{Parser, Subcommand};
use perishable_routes::algorithms::optimizer::INFEASIBLE_REASON;
use perishable_routes::models::{OptimizationRequest, StopIndex, ValidatedRequest};
use perishable_routes::utils::travel_time::{PrecomputedMatrix, TravelTimeProvider};
use perishable_routes::{OptimizerConfig, RouteOptimizer};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Plan a delivery route under product spoilage deadlines
#[derive(Debug, Parser)]
#[command(name = "perishable-routes", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Optimize the delivery order of a request and print the result as JSON
    Optimize {
        /// Request file (JSON)
        #[arg(long)]
        request: PathBuf,

        /// Optimizer configuration file (JSON); defaults apply for missing fields
        #[arg(long)]
        config: Option<PathBuf>,

        /// Precomputed travel time matrix (JSON); straight-line estimates otherwise
        #[arg(long)]
        matrix: Option<PathBuf>,
    },
    /// Check whether every delivery can meet its deadline, without optimizing
    Check {
        /// Request file (JSON)
        #[arg(long)]
        request: PathBuf,

        /// Precomputed travel time matrix (JSON)
        #[arg(long)]
        matrix: Option<PathBuf>,
    },
    /// Check an existing route for spoiled products and print the report as JSON
    Validate {
        /// Request file (JSON)
        #[arg(long)]
        request: PathBuf,

        /// Stop indices starting and ending at the depot, e.g. 0,2,1,0
        #[arg(long, value_delimiter = ',', required = true)]
        route: Vec<StopIndex>,

        /// Precomputed travel time matrix (JSON)
        #[arg(long)]
        matrix: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Optimize {
            request,
            config,
            matrix,
        } => {
            let request = load_request(&request)?;
            let config = match config {
                Some(path) => OptimizerConfig::from_json_file(path)?,
                None => OptimizerConfig::default(),
            };

            let result = match matrix {
                Some(path) => {
                    let provider = PrecomputedMatrix::from_json_file(path)?;
                    RouteOptimizer::new(provider, config).optimize(&request)?
                }
                None => RouteOptimizer::without_provider(config).optimize(&request)?,
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Check { request, matrix } => {
            let started = Instant::now();
            let request = load_request(&request)?;
            let config = OptimizerConfig::default();
            let report = match matrix {
                Some(path) => {
                    let provider = PrecomputedMatrix::from_json_file(path)?;
                    RouteOptimizer::new(provider, config).check_feasibility(&request)?
                }
                None => RouteOptimizer::without_provider(config).check_feasibility(&request)?,
            };

            let message = if report.feasible {
                "All deliveries can be made within their time limits"
            } else {
                INFEASIBLE_REASON
            };
            let output = serde_json::json!({
                "feasible": report.feasible,
                "infeasibleDeliveries": report.infeasible_deliveries,
                "message": message,
                "executionTimeMs": started.elapsed().as_millis() as u64,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Validate {
            request,
            route,
            matrix,
        } => {
            let request = load_request(&request)?;
            let report = match matrix {
                Some(path) => {
                    let provider = PrecomputedMatrix::from_json_file(path)?;
                    validate(RouteOptimizer::new(provider, OptimizerConfig::default()), &request, &route)?
                }
                None => validate(
                    RouteOptimizer::without_provider(OptimizerConfig::default()),
                    &request,
                    &route,
                )?,
            };
            println!("{}", report);
        }
    }

    Ok(())
}

fn load_request(path: &Path) -> Result<ValidatedRequest, Box<dyn Error>> {
    let json_str = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let request: OptimizationRequest = serde_json::from_str(&json_str)?;
    Ok(request.validate()?)
}

fn validate<P: TravelTimeProvider>(
    optimizer: RouteOptimizer<P>,
    request: &ValidatedRequest,
    route: &[StopIndex],
) -> Result<String, Box<dyn Error>> {
    let report = optimizer.validate_route(request, route)?;
    Ok(serde_json::to_string_pretty(&report)?)
}
