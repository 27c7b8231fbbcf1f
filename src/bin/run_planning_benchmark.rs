extern crate motion_benchmarks;

use std::path::PathBuf;
use clap::Parser;
use serde_yaml::Mapping;
use motion_benchmarks::benchmarks::planning_benchmark::{PlanningBenchmark, PlanningBenchmarkOptions};
use motion_benchmarks::planners::PlanningOptions;
use motion_benchmarks::registry::BenchmarkRegistry;
use motion_benchmarks::scenes::SharedScene;
use motion_benchmarks::utils::utils_console::{bench_print, bench_print_labeled_value, PrintColor, PrintMode};
use motion_benchmarks::utils::utils_errors::BenchmarkError;
use motion_benchmarks::utils::utils_logging::initialize_logging;

/// Plans between random valid configuration pairs and records time and success per pair.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Scene description file.
    #[arg(long)]
    env: PathBuf,
    /// Planner (snap, rrt_connect).
    #[arg(long)]
    planner: String,
    /// Collision engine used while planning.
    #[arg(long = "cc", default_value = "exact")]
    collision_checker: String,
    #[arg(long, default_value_t = 100)]
    random: usize,
    /// Re-plans the configuration pairs of a previous run.
    #[arg(long)]
    test: Option<PathBuf>,
    /// Per-query time limit in seconds.
    #[arg(long)]
    timelimit: Option<f64>,
    #[arg(long)]
    outfile: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(short, long)]
    verbose: bool
}

fn run(args: &Args) -> Result<(), BenchmarkError> {
    let scene = SharedScene::new_from_description_file(&args.env)?;
    let mut planner = BenchmarkRegistry::get_planner_by_short_name(&args.planner, &Mapping::new())?;
    let mut checker = BenchmarkRegistry::get_collision_checker(&args.collision_checker, &Mapping::new())?;

    let options = PlanningBenchmarkOptions {
        num_samples: args.random,
        test_file: args.test.clone(),
        seed: args.seed,
        planning_options: PlanningOptions { timelimit: args.timelimit, seed: args.seed },
        show_progress: true,
        ..Default::default()
    };
    let data = PlanningBenchmark::run(&scene, planner.as_mut(), checker.as_mut(), &options)?;

    let outfile = match &args.outfile {
        Some(outfile) => { outfile.clone() }
        None => { PathBuf::from(format!("{}_{}_{}.yaml", args.planner, args.collision_checker, data.configurations.len())) }
    };
    data.save_to_file(&outfile)?;

    bench_print_labeled_value("solved", &format!("{} of {}", data.num_solved(), data.configurations.len()), PrintColor::Cyan);
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
