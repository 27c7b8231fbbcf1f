extern crate motion_benchmarks;

use std::path::PathBuf;
use clap::Parser;
use serde_yaml::Mapping;
use motion_benchmarks::benchmarks::query_generation::{QueryGenerationOptions, QueryGenerator};
use motion_benchmarks::registry::BenchmarkRegistry;
use motion_benchmarks::scenes::SharedScene;
use motion_benchmarks::utils::utils_console::{bench_print, bench_print_labeled_value, PrintColor, PrintMode};
use motion_benchmarks::utils::utils_errors::BenchmarkError;
use motion_benchmarks::utils::utils_logging::initialize_logging;

/// Writes plan-to-configuration queries between random valid configurations of a scene.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long)]
    env: PathBuf,
    #[arg(long)]
    outdir: PathBuf,
    #[arg(long, default_value_t = 10)]
    count: usize,
    /// Stored as the `timelimit` keyword argument of every query.
    #[arg(long)]
    timelimit: Option<f64>,
    /// Collision engine that decides which configurations are valid.
    #[arg(long = "cc", default_value = "exact")]
    collision_checker: String,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(short, long)]
    verbose: bool
}

fn run(args: &Args) -> Result<(), BenchmarkError> {
    let scene = SharedScene::new_from_description_file(&args.env)?;
    let mut checker = BenchmarkRegistry::get_collision_checker(&args.collision_checker, &Mapping::new())?;
    let options = QueryGenerationOptions {
        count: args.count,
        timelimit: args.timelimit,
        seed: args.seed,
        ..Default::default()
    };
    let files = QueryGenerator::generate_queries(&scene, checker.as_mut(), &args.outdir, &options)?;
    bench_print_labeled_value("queries written", &files.len().to_string(), PrintColor::Green);
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
