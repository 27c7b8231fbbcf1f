extern crate motion_benchmarks;

use std::path::PathBuf;
use clap::Parser;
use motion_benchmarks::benchmarks::batch_runner::BatchRunner;
use motion_benchmarks::benchmarks::executor::BenchmarkExecutor;
use motion_benchmarks::scenes::SharedScene;
use motion_benchmarks::utils::utils_console::{bench_print, bench_print_labeled_value, PrintColor, PrintMode};
use motion_benchmarks::utils::utils_errors::BenchmarkError;
use motion_benchmarks::utils::utils_logging::initialize_logging;

/// Executes every query with every planner.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Suite files listing queries and planners.
    #[arg(short = 'b', long = "benchmark")]
    suites: Vec<PathBuf>,
    #[arg(short, long = "query")]
    queries: Vec<PathBuf>,
    #[arg(short, long = "planner")]
    planners: Vec<PathBuf>,
    /// Directory the `.result` files are written to.
    #[arg(short, long)]
    outdir: Option<PathBuf>,
    #[arg(long)]
    scene: Option<PathBuf>,
    #[arg(short, long)]
    verbose: bool
}

fn run(args: &Args) -> Result<(), BenchmarkError> {
    let scene = match &args.scene {
        None => { SharedScene::new_default() }
        Some(path) => { SharedScene::new_from_description_file(path)? }
    };
    let mut runner = BatchRunner::new(BenchmarkExecutor::new(scene));
    for s in &args.suites { runner.add_suite_file(s)?; }
    for q in &args.queries { runner.add_query_file(q); }
    for p in &args.planners { runner.add_planner_file(p); }
    if runner.num_runs() == 0 {
        return Err(BenchmarkError::new_invalid_parameter_error("query/planner", "At least one query and one planner are needed.", file!(), line!()));
    }

    let results = runner.run(args.outdir.as_deref(), true)?;
    let num_succeeded = results.iter().filter(|r| r.succeeded()).count();
    bench_print_labeled_value("runs", &results.len().to_string(), PrintColor::Cyan);
    bench_print_labeled_value("succeeded", &num_succeeded.to_string(), PrintColor::Green);
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
