extern crate motion_benchmarks;

use std::path::PathBuf;
use clap::Parser;
use serde_yaml::{Mapping, Value};
use motion_benchmarks::benchmarks::collision_benchmark::{CollisionBenchmark, CollisionBenchmarkOptions};
use motion_benchmarks::registry::BenchmarkRegistry;
use motion_benchmarks::scenes::SharedScene;
use motion_benchmarks::utils::utils_console::{bench_print, bench_print_labeled_value, PrintColor, PrintMode};
use motion_benchmarks::utils::utils_errors::BenchmarkError;
use motion_benchmarks::utils::utils_logging::initialize_logging;

/// Times random environment or self collision checks of the scene's robot.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Scene description file.
    #[arg(long)]
    env: PathBuf,
    /// Collision engine (exact, sphere, aabb).
    #[arg(long)]
    engine: String,
    /// Inflates every shape by this distance.
    #[arg(long, default_value_t = 0.0)]
    margin: f64,
    /// Self collision checks over random DOF values.
    #[arg(long = "self")]
    self_collision: bool,
    /// Number of random samples.
    #[arg(long, default_value_t = 50000)]
    random: usize,
    /// Edge length of the cube robot placements are drawn from.
    #[arg(long, default_value_t = 2.0)]
    extent: f64,
    /// Re-runs the samples stored in a previous result file.
    #[arg(long)]
    test: Option<PathBuf>,
    #[arg(long)]
    outfile: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(short, long)]
    verbose: bool
}

fn run(args: &Args) -> Result<(), BenchmarkError> {
    let scene = SharedScene::new_from_description_file(&args.env)?;
    let mut parameters = Mapping::new();
    parameters.insert(Value::String("margin".to_string()), Value::from(args.margin));
    let mut checker = BenchmarkRegistry::get_collision_checker(&args.engine, &parameters)?;

    let options = CollisionBenchmarkOptions {
        self_collision: args.self_collision,
        num_samples: args.random,
        extent: args.extent,
        test_file: args.test.clone(),
        seed: args.seed,
        show_progress: true
    };
    let result = CollisionBenchmark::run(&scene, checker.as_mut(), &options)?;

    let outfile = match &args.outfile {
        Some(outfile) => { outfile.clone() }
        None => {
            let kind = if result.self_collision { "self" } else { "env" };
            PathBuf::from(format!("{}_{}_{}.yaml", args.engine, kind, result.checks))
        }
    };
    result.save_to_file(&outfile)?;

    bench_print_labeled_value("checks", &result.checks.to_string(), PrintColor::Cyan);
    bench_print_labeled_value("collisions", &result.collisions.to_string(), PrintColor::Cyan);
    bench_print_labeled_value("mean (ms)", &format!("{:.6}", result.mean_ms), PrintColor::Cyan);
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
