extern crate motion_benchmarks;

use std::path::PathBuf;
use clap::Parser;
use serde_yaml::{Mapping, Value};
use motion_benchmarks::benchmarks::collision_replay::CollisionReplay;
use motion_benchmarks::benchmarks::result::CollisionBenchmarkResult;
use motion_benchmarks::registry::BenchmarkRegistry;
use motion_benchmarks::scenes::SharedScene;
use motion_benchmarks::utils::utils_console::{bench_print, bench_print_labeled_value, PrintColor, PrintMode};
use motion_benchmarks::utils::utils_errors::BenchmarkError;
use motion_benchmarks::utils::utils_files::FileUtils;
use motion_benchmarks::utils::utils_logging::initialize_logging;

/// Replays a recorded collision log against a collision engine.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Collision log written by `run_benchmark --log-collision-checks`.
    #[arg(long)]
    env: PathBuf,
    #[arg(long)]
    engine: String,
    #[arg(long, default_value_t = 0.0)]
    margin: f64,
    #[arg(long)]
    outfile: Option<PathBuf>,
    #[arg(short, long)]
    verbose: bool
}

fn run(args: &Args) -> Result<(), BenchmarkError> {
    let log = CollisionBenchmarkResult::load_from_json_file(&args.env)?;
    let mut parameters = Mapping::new();
    parameters.insert(Value::String("margin".to_string()), Value::from(args.margin));
    let mut checker = BenchmarkRegistry::get_collision_checker(&args.engine, &parameters)?;

    let scene = SharedScene::new_default();
    let result = CollisionReplay::run(&scene, checker.as_mut(), &log, true)?;

    let outfile = match &args.outfile {
        Some(outfile) => { outfile.clone() }
        None => { PathBuf::from(format!("{}_{}.yaml", args.engine, FileUtils::basename_without_extension(&args.env))) }
    };
    result.save_to_file(&outfile)?;

    bench_print_labeled_value("checks", &result.checks.to_string(), PrintColor::Cyan);
    bench_print_labeled_value("total (ms)", &format!("{:.3}", result.elapsed_ms), PrintColor::Cyan);
    bench_print_labeled_value("written to", &outfile.display().to_string(), PrintColor::Green);
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
