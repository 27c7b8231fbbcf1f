extern crate motion_benchmarks;

use std::path::PathBuf;
use clap::Parser;
use motion_benchmarks::analysis::{AnalysisKind, AnalysisOptions, Analyzer};
use motion_benchmarks::utils::utils_console::{bench_print, PrintColor, PrintMode};
use motion_benchmarks::utils::utils_enums::EnumUtils;
use motion_benchmarks::utils::utils_errors::BenchmarkError;
use motion_benchmarks::utils::utils_logging::initialize_logging;

/// Prints aggregate statistics of benchmark output files and plots them as SVG.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, num_args = 1.., required = true)]
    datafiles: Vec<PathBuf>,
    #[arg(long, default_value = "Benchmark")]
    title: String,
    /// Plot base path; plots are written as `<outdir>.<plot>.svg`.
    #[arg(long)]
    outdir: Option<PathBuf>,
    /// collision, env_first, planning or results.
    #[arg(long, default_value = "collision")]
    kind: String,
    /// Also plot per-series histograms.
    #[arg(long)]
    hists: bool,
    #[arg(short, long)]
    verbose: bool
}

fn run(args: &Args) -> Result<(), BenchmarkError> {
    let kind: AnalysisKind = EnumUtils::parse_name("analysis kind", &args.kind)?;
    let options = AnalysisOptions {
        title: args.title.clone(),
        out_base: args.outdir.clone(),
        histograms: args.hists
    };
    Analyzer::analyze(kind, &args.datafiles, &options)
}

fn main() {
    let args = Args::parse();
    initialize_logging(args.verbose);
    if let Err(e) = run(&args) {
        bench_print(&e.to_string(), PrintMode::Println, PrintColor::Red, true);
        std::process::exit(1);
    }
}
