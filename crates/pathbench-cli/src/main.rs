use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pathbench_core::{RunSpec, SweepConfig};
use pathbench_runner::{SweepKind, SweepReport};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pathbench", version, about = "Pathfinding benchmark sweep runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ConfigArgs {
    /// Sweep config (YAML). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    scenario_root: Option<PathBuf>,
    #[arg(long)]
    workers: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PlanKind {
    #[value(name = "graphs")]
    Graphs,
    #[value(name = "algorithms")]
    Algorithms,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate inputs and count runs without executing anything.
    Plan {
        #[arg(value_enum, default_value = "algorithms")]
        kind: PlanKind,
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(long)]
        json: bool,
    },
    /// Build the search graphs of every map.
    CreateGraphs {
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(long)]
        json: bool,
    },
    /// Run every scenario with the baseline and every k.
    Run {
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(long)]
        json: bool,
    },
    /// Aggregate results files into ratio tables.
    Aggregate {
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(long)]
        experiment_root: Option<PathBuf>,
        /// Write the full aggregated table here.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write per-bucket means here.
        #[arg(long)]
        summary: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = command_json_mode(&cli.command);
    let result = run_command(cli.command);
    match result {
        Ok(Some(payload)) => {
            emit_json(&payload);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(err) => {
            if json_mode {
                emit_json(&json_error("command_failed", format!("{:#}", err), json!({})));
                std::process::exit(1);
            }
            Err(err)
        }
    }
}

fn run_command(command: Commands) -> Result<Option<Value>> {
    match command {
        Commands::Plan { kind, config, json } => {
            let config = load_config(&config)?;
            let specs = match kind {
                PlanKind::Graphs => pathbench_runner::plan_graphs(&config)?,
                PlanKind::Algorithms => pathbench_runner::plan_algorithms(&config)?,
            };
            let counts = count_by_family(&specs);
            if json {
                return Ok(Some(json!({
                    "ok": true,
                    "command": "plan",
                    "runs": specs.len(),
                    "by_family": counts,
                    "workers": config.worker_count(),
                    "config": config,
                })));
            }
            println!("runs: {}", specs.len());
            for (family, n) in &counts {
                println!("  {}: {}", family, n);
            }
            println!("workers: {}", config.worker_count());
        }
        Commands::CreateGraphs { config, json } => {
            let config = load_config(&config)?;
            let report = pathbench_runner::create_graphs(&config)?;
            if json {
                return Ok(Some(sweep_to_json(&report)));
            }
            print_sweep(&report);
        }
        Commands::Run { config, json } => {
            let config = load_config(&config)?;
            let report = pathbench_runner::run_algorithms(&config)?;
            if json {
                return Ok(Some(sweep_to_json(&report)));
            }
            print_sweep(&report);
        }
        Commands::Aggregate {
            config,
            experiment_root,
            out,
            summary,
            json,
        } => {
            let config = load_config(&config)?;
            let root = experiment_root.unwrap_or(config.experiment_root);
            let records = pathbench_analysis::analyze(&root)?;
            let points = pathbench_analysis::summarize_by_bucket(&records);
            if let Some(path) = &out {
                pathbench_analysis::write_aggregated_csv(path, &records)?;
            }
            if let Some(path) = &summary {
                pathbench_analysis::write_summary_csv(path, &points)?;
            }
            if json {
                return Ok(Some(json!({
                    "ok": true,
                    "command": "aggregate",
                    "experiment_root": root.display().to_string(),
                    "records": records.len(),
                    "points": points,
                })));
            }
            println!("records: {}", records.len());
            for point in &points {
                println!(
                    "{:<10} bucket {:>3}  n={:<5} cost_ratio={:.3} speedup={:.3} first_move_speedup={:.3} expanded_speedup={:.3}",
                    point.algorithm,
                    point.bucket,
                    point.samples,
                    point.cost_ratio,
                    point.duration_ratio,
                    point.first_move_duration_ratio,
                    point.expanded_ratio
                );
            }
        }
    }
    Ok(None)
}

fn load_config(args: &ConfigArgs) -> Result<SweepConfig> {
    let mut config = match &args.config {
        Some(path) => SweepConfig::load(path)?,
        None => {
            let cwd = std::env::current_dir().context("resolving current directory")?;
            SweepConfig::default().resolve_paths(&cwd)
        }
    };
    if let Some(root) = &args.scenario_root {
        let cwd = std::env::current_dir().context("resolving current directory")?;
        config.scenario_root = cwd.join(root);
    }
    if args.workers.is_some() {
        config.workers = args.workers;
    }
    config.validate()?;
    tracing::debug!(config = ?config, "resolved sweep config");
    Ok(config)
}

fn count_by_family(specs: &[RunSpec]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for spec in specs {
        let key = spec
            .algorithm()
            .map(|a| a.family().as_str().to_string())
            .unwrap_or_else(|| "create_graphs".to_string());
        *counts.entry(key).or_default() += 1;
    }
    counts
}

fn print_sweep(report: &SweepReport) {
    println!("sweep: {}", report.kind.as_str());
    println!("workers: {}", report.workers);
    println!(
        "runs: {} ({} succeeded, {} failed)",
        report.summary.total, report.summary.succeeded, report.summary.failed
    );
    for label in &report.summary.failures {
        println!("  failed: {}", label);
    }
}

fn sweep_to_json(report: &SweepReport) -> Value {
    json!({
        "ok": true,
        "command": match report.kind {
            SweepKind::CreateGraphs => "create-graphs",
            SweepKind::RunAlgorithms => "run",
        },
        "sweep": report,
    })
}

fn emit_json(value: &Value) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{}", s),
        Err(_) => println!(
            "{{\"ok\":false,\"error\":{{\"code\":\"serialization_error\",\"message\":\"failed to serialize JSON payload\",\"details\":{{}}}}}}"
        ),
    }
}

fn json_error(code: &str, message: String, details: Value) -> Value {
    json!({
        "ok": false,
        "error": {
            "code": code,
            "message": message,
            "details": details
        }
    })
}

fn command_json_mode(command: &Commands) -> bool {
    match command {
        Commands::Plan { json, .. }
        | Commands::CreateGraphs { json, .. }
        | Commands::Run { json, .. }
        | Commands::Aggregate { json, .. } => *json,
    }
}
