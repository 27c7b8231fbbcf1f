extern crate motion_benchmarks;

use std::path::PathBuf;
use clap::Parser;
use motion_benchmarks::benchmarks::executor::{BenchmarkExecutor, ExecutionOptions};
use motion_benchmarks::scenes::SharedScene;
use motion_benchmarks::utils::utils_console::{bench_print, bench_print_labeled_value, PrintColor, PrintMode};
use motion_benchmarks::utils::utils_errors::BenchmarkError;
use motion_benchmarks::utils::utils_logging::initialize_logging;

/// Executes one benchmark query with one planner.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Query file (YAML).
    #[arg(short, long)]
    query: PathBuf,
    /// Planner metadata file (YAML).
    #[arg(short, long)]
    planner: PathBuf,
    /// Where to write the result.
    #[arg(short, long)]
    outfile: Option<PathBuf>,
    /// Scene description the query is loaded into.  An empty scene when omitted.
    #[arg(long)]
    scene: Option<PathBuf>,
    /// Record every collision check as JSON instead of timing the planner.
    #[arg(long)]
    log_collision_checks: bool,
    #[arg(short, long)]
    verbose: bool
}

fn run(args: &Args) -> Result<(), BenchmarkError> {
    let scene = match &args.scene {
        None => { SharedScene::new_default() }
        Some(path) => { SharedScene::new_from_description_file(path)? }
    };
    let executor = BenchmarkExecutor::new(scene);
    let options = ExecutionOptions { outfile: args.outfile.clone(), ..Default::default() };

    if args.log_collision_checks {
        let log = executor.log_collision_checks(&args.query, &args.planner, &options)?;
        bench_print_labeled_value("collision checks logged", &log.collision_log.len().to_string(), PrintColor::Cyan);
        return Ok(());
    }

    let result = executor.execute_benchmark(&args.query, &args.planner, &options)?;
    let color = if result.succeeded() { PrintColor::Green } else { PrintColor::Yellow };
    bench_print_labeled_value("success", &result.succeeded().to_string(), color);
    bench_print_labeled_value("time (s)", &format!("{:.6}", result.elapsed_time()), PrintColor::Cyan);
    Ok(())
}

fn main() {
    let args = Args::parse();
    initialize_logging(args.verbose);
    if let Err(e) = run(&args) {
        bench_print(&e.to_string(), PrintMode::Println, PrintColor::Red, true);
        std::process::exit(1);
    }
}
