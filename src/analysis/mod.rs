//! Aggregate statistics and plots over benchmark output files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use strum_macros::{Display, EnumIter, EnumString};
use tracing::info;
use crate::analysis::plotting::{BarChart, Histogram};
use crate::benchmarks::collision_replay::{CollisionReplayResult, ReplayedCheck};
use crate::benchmarks::planning_benchmark::PlanningBenchmarkData;
use crate::benchmarks::result::BenchmarkResult;
use crate::collision_checkers::logging_checker::CheckMethod;
use crate::utils::utils_console::{bench_print, bench_print_labeled_value, PrintColor, PrintMode};
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_files::FileUtils;
use crate::utils::utils_statistics::StatisticsUtils;
use crate::utils::utils_traits::ExternalFormat;

pub mod plotting;

const HISTOGRAM_BINS: usize = 40;

/// Which kind of data files an analysis run reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum AnalysisKind {
    /// Collision benchmark or replay results (`elapsed_ms`, `checks`).
    Collision,
    /// Collision replays split into environment-first timings.
    EnvFirst,
    /// Planning benchmark data files.
    Planning,
    /// Executor result files, grouped by planner.
    Results
}

pub struct AnalysisUtils;
impl AnalysisUtils {
    pub fn checks_per_second(elapsed_seconds: f64, checks: usize) -> Option<f64> {
        if elapsed_seconds <= 0.0 { return None; }
        Some(checks as f64 / elapsed_seconds)
    }
    pub fn ms_per_check(elapsed_seconds: f64, checks: usize) -> Option<f64> {
        if checks == 0 { return None; }
        Some(elapsed_seconds * 1000.0 / checks as f64)
    }
    /// File name up to its first `_` (the whole stem when there is none).
    pub fn series_label(path: &Path) -> String {
        let stem = FileUtils::basename_without_extension(path);
        return match stem.split_once('_') {
            None => { stem }
            Some((label, _)) => { label.to_string() }
        }
    }
    /// Splits replayed checks as an environment-first checker would have issued them.  Every
    /// environment check counts towards `env_only`.  A self check counts towards `self_only`
    /// unless the environment check right before it found a collision.
    pub fn split_env_first(checks: &[ReplayedCheck]) -> EnvFirstSplit {
        let mut out = EnvFirstSplit::default();
        let mut previous_env_collided = false;
        for check in checks {
            match check.method_name {
                CheckMethod::CheckCollision => {
                    out.env_only.push(check.elapsed_ms);
                    previous_env_collided = check.in_collision;
                }
                CheckMethod::CheckSelfCollision => {
                    if !previous_env_collided { out.self_only.push(check.elapsed_ms); }
                    previous_env_collided = false;
                }
            }
        }
        out
    }
}

/// Per-check times in ms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvFirstSplit {
    pub env_only: Vec<f64>,
    pub self_only: Vec<f64>
}

/// Fields shared by collision benchmark and replay result files.
#[derive(Clone, Debug, Deserialize)]
struct CollisionTimingFile {
    elapsed_ms: f64,
    checks: usize,
    #[serde(default)]
    data: Vec<TimedEntry>
}

#[derive(Clone, Debug, Deserialize)]
struct TimedEntry {
    #[serde(default)]
    elapsed_ms: f64
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CollisionAnalysisRow {
    pub label: String,
    pub checks: usize,
    pub checks_per_second: f64,
    pub ms_per_check: f64
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlanningAnalysisRow {
    pub label: String,
    pub num_queries: usize,
    /// ms for planning benchmark data, seconds for executor results.
    pub mean_time: f64,
    pub success_rate: f64
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnvFirstAnalysisRow {
    pub label: String,
    pub env_checks: usize,
    pub env_ms_per_check: f64,
    pub self_checks: usize,
    pub self_ms_per_check: f64
}

#[derive(Clone, Debug)]
pub struct AnalysisOptions {
    pub title: String,
    /// Plot files are written as `<out_base>.<suffix>.svg`.  No plots when `None`.
    pub out_base: Option<PathBuf>,
    pub histograms: bool
}

pub struct Analyzer;
impl Analyzer {
    pub fn analyze_collision_files(files: &[PathBuf], options: &AnalysisOptions) -> Result<Vec<CollisionAnalysisRow>, BenchmarkError> {
        let mut rows = vec![];
        let mut histograms = vec![];
        for f in files {
            let loaded: CollisionTimingFile = FileUtils::load_object_from_file(f)?;
            let label = AnalysisUtils::series_label(f);
            let elapsed_seconds = loaded.elapsed_ms / 1000.0;
            rows.push(CollisionAnalysisRow {
                label: label.clone(),
                checks: loaded.checks,
                checks_per_second: AnalysisUtils::checks_per_second(elapsed_seconds, loaded.checks).unwrap_or(0.0),
                ms_per_check: AnalysisUtils::ms_per_check(elapsed_seconds, loaded.checks).unwrap_or(0.0)
            });
            histograms.push((label, loaded.data.iter().map(|d| d.elapsed_ms).collect::<Vec<f64>>()));
        }

        for r in &rows {
            bench_print(&r.label, PrintMode::Println, PrintColor::Cyan, true);
            bench_print_labeled_value("    checks", &r.checks.to_string(), PrintColor::None);
            bench_print_labeled_value("    checks per second", &format!("{:.3}", r.checks_per_second), PrintColor::None);
            bench_print_labeled_value("    ms per check", &format!("{:.6}", r.ms_per_check), PrintColor::None);
        }

        if let Some(out_base) = &options.out_base {
            let mut cps = BarChart::new(&format!("{}: checks per second", options.title), "checks / s");
            let mut mspc = BarChart::new(&format!("{}: time per check", options.title), "ms / check");
            for r in &rows {
                cps.add_bar(&r.label, r.checks_per_second);
                mspc.add_bar(&r.label, r.ms_per_check);
            }
            Self::save_chart(&cps, out_base, "cps")?;
            Self::save_chart(&mspc, out_base, "mspc")?;
            if options.histograms {
                for (label, values) in histograms {
                    let h = Histogram::new(&format!("{}: {}", options.title, label), "ms per check", values, HISTOGRAM_BINS);
                    h.save(&Self::plot_path(out_base, &format!("{}.hist", label)))?;
                }
            }
        }

        Ok(rows)
    }
    pub fn analyze_env_first_files(files: &[PathBuf], options: &AnalysisOptions) -> Result<Vec<EnvFirstAnalysisRow>, BenchmarkError> {
        let mut rows = vec![];
        let mut splits = vec![];
        for f in files {
            let replay = CollisionReplayResult::load_from_file(f)?;
            let split = AnalysisUtils::split_env_first(&replay.data);
            let label = AnalysisUtils::series_label(f);
            rows.push(EnvFirstAnalysisRow {
                label: label.clone(),
                env_checks: split.env_only.len(),
                env_ms_per_check: StatisticsUtils::mean(&split.env_only).unwrap_or(0.0),
                self_checks: split.self_only.len(),
                self_ms_per_check: StatisticsUtils::mean(&split.self_only).unwrap_or(0.0)
            });
            splits.push((label, split));
        }

        for r in &rows {
            bench_print(&r.label, PrintMode::Println, PrintColor::Cyan, true);
            bench_print_labeled_value("    environment checks", &format!("{} ({:.6} ms each)", r.env_checks, r.env_ms_per_check), PrintColor::None);
            bench_print_labeled_value("    self checks", &format!("{} ({:.6} ms each)", r.self_checks, r.self_ms_per_check), PrintColor::None);
        }

        if let Some(out_base) = &options.out_base {
            let mut env = BarChart::new(&format!("{}: environment checks", options.title), "ms / check");
            let mut slf = BarChart::new(&format!("{}: self checks", options.title), "ms / check");
            for r in &rows {
                env.add_bar(&r.label, r.env_ms_per_check);
                slf.add_bar(&r.label, r.self_ms_per_check);
            }
            Self::save_chart(&env, out_base, "env.mspc")?;
            Self::save_chart(&slf, out_base, "self.mspc")?;
            if options.histograms {
                for (label, split) in splits {
                    Histogram::new(&format!("{}: {} environment", options.title, label), "ms per check", split.env_only, HISTOGRAM_BINS)
                        .save(&Self::plot_path(out_base, &format!("{}.env.hist", label)))?;
                    Histogram::new(&format!("{}: {} self", options.title, label), "ms per check", split.self_only, HISTOGRAM_BINS)
                        .save(&Self::plot_path(out_base, &format!("{}.self.hist", label)))?;
                }
            }
        }

        Ok(rows)
    }
    pub fn analyze_planning_files(files: &[PathBuf], options: &AnalysisOptions) -> Result<Vec<PlanningAnalysisRow>, BenchmarkError> {
        let mut rows = vec![];
        let mut histograms = vec![];
        for f in files {
            let data = PlanningBenchmarkData::load_from_file(f)?;
            let times: Vec<f64> = data.configurations.iter().filter_map(|c| c.elapsed_ms).collect();
            let successes: Vec<bool> = data.configurations.iter().filter_map(|c| c.found_solution).collect();
            let label = AnalysisUtils::series_label(f);
            rows.push(PlanningAnalysisRow {
                label: label.clone(),
                num_queries: data.configurations.len(),
                mean_time: StatisticsUtils::mean(&times).unwrap_or(0.0),
                success_rate: StatisticsUtils::success_rate(&successes).unwrap_or(0.0)
            });
            histograms.push((label, times));
        }
        Self::print_planning_rows(&rows, "ms");

        if let Some(out_base) = &options.out_base {
            Self::save_planning_charts(&rows, options, out_base, "ms")?;
            if options.histograms {
                for (label, values) in histograms {
                    Histogram::new(&format!("{}: {}", options.title, label), "plan time (ms)", values, HISTOGRAM_BINS)
                        .save(&Self::plot_path(out_base, &format!("{}.hist", label)))?;
                }
            }
        }

        Ok(rows)
    }
    /// Groups executor results by planner file.
    pub fn analyze_result_files(files: &[PathBuf], options: &AnalysisOptions) -> Result<Vec<PlanningAnalysisRow>, BenchmarkError> {
        let mut groups: BTreeMap<String, Vec<BenchmarkResult>> = BTreeMap::new();
        for f in files {
            let r = BenchmarkResult::load_from_yaml_file(f)?;
            let key = if r.source_planner_id().is_empty() { AnalysisUtils::series_label(f) } else { FileUtils::basename_without_extension(Path::new(r.source_planner_id())) };
            groups.entry(key).or_default().push(r);
        }

        let mut rows = vec![];
        for (label, results) in &groups {
            let times: Vec<f64> = results.iter().map(|r| r.elapsed_time()).collect();
            let successes: Vec<bool> = results.iter().map(|r| r.succeeded()).collect();
            rows.push(PlanningAnalysisRow {
                label: label.clone(),
                num_queries: results.len(),
                mean_time: StatisticsUtils::mean(&times).unwrap_or(0.0),
                success_rate: StatisticsUtils::success_rate(&successes).unwrap_or(0.0)
            });
        }
        Self::print_planning_rows(&rows, "s");

        if let Some(out_base) = &options.out_base {
            Self::save_planning_charts(&rows, options, out_base, "s")?;
            if options.histograms {
                for (label, results) in &groups {
                    let times = results.iter().map(|r| r.elapsed_time()).collect();
                    Histogram::new(&format!("{}: {}", options.title, label), "plan time (s)", times, HISTOGRAM_BINS)
                        .save(&Self::plot_path(out_base, &format!("{}.hist", label)))?;
                }
            }
        }

        Ok(rows)
    }
    /// Runs the analysis of the given kind and logs where plots went.
    pub fn analyze(kind: AnalysisKind, files: &[PathBuf], options: &AnalysisOptions) -> Result<(), BenchmarkError> {
        if files.is_empty() {
            return Err(BenchmarkError::new_invalid_parameter_error("datafiles", "No data files were given.", file!(), line!()));
        }
        info!("analyzing {} {} files", files.len(), kind);
        match kind {
            AnalysisKind::Collision => { Self::analyze_collision_files(files, options)?; }
            AnalysisKind::EnvFirst => { Self::analyze_env_first_files(files, options)?; }
            AnalysisKind::Planning => { Self::analyze_planning_files(files, options)?; }
            AnalysisKind::Results => { Self::analyze_result_files(files, options)?; }
        }
        if let Some(out_base) = &options.out_base {
            info!("plots written next to {}", out_base.display());
        }
        Ok(())
    }
    fn print_planning_rows(rows: &[PlanningAnalysisRow], time_unit: &str) {
        for r in rows {
            bench_print(&r.label, PrintMode::Println, PrintColor::Cyan, true);
            bench_print_labeled_value("    queries", &r.num_queries.to_string(), PrintColor::None);
            bench_print_labeled_value("    mean plan time", &format!("{:.6} {}", r.mean_time, time_unit), PrintColor::None);
            let color = if r.success_rate >= 1.0 { PrintColor::Green } else { PrintColor::Yellow };
            bench_print_labeled_value("    success rate", &format!("{:.1}%", r.success_rate * 100.0), color);
        }
    }
    fn save_planning_charts(rows: &[PlanningAnalysisRow], options: &AnalysisOptions, out_base: &Path, time_unit: &str) -> Result<(), BenchmarkError> {
        let mut time = BarChart::new(&format!("{}: mean plan time", options.title), &format!("time ({})", time_unit));
        let mut success = BarChart::new(&format!("{}: success rate", options.title), "fraction solved");
        for r in rows {
            time.add_bar(&r.label, r.mean_time);
            success.add_bar(&r.label, r.success_rate);
        }
        Self::save_chart(&time, out_base, "plantime")?;
        Self::save_chart(&success, out_base, "success")
    }
    fn save_chart(chart: &BarChart, out_base: &Path, suffix: &str) -> Result<(), BenchmarkError> {
        chart.save(&Self::plot_path(out_base, suffix))
    }
    /// `<out_base>.<suffix>.svg`, keeping any dots already in the base name.
    pub fn plot_path(out_base: &Path, suffix: &str) -> PathBuf {
        let mut s = out_base.as_os_str().to_os_string();
        s.push(format!(".{}.svg", suffix));
        PathBuf::from(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn check(method_name: CheckMethod, in_collision: bool, elapsed_ms: f64) -> ReplayedCheck {
        ReplayedCheck { method_name, body_name: "arm".to_string(), in_collision, elapsed_ms }
    }

    #[test]
    fn checks_per_second_and_ms_per_check() {
        assert_relative_eq!(AnalysisUtils::checks_per_second(2.0, 100).unwrap(), 50.0);
        assert_relative_eq!(AnalysisUtils::ms_per_check(2.0, 100).unwrap(), 20.0);
        assert_eq!(AnalysisUtils::checks_per_second(0.0, 100), None);
        assert_eq!(AnalysisUtils::ms_per_check(2.0, 0), None);
    }

    #[test]
    fn env_first_split() {
        let checks = vec![
            check(CheckMethod::CheckCollision, false, 1.0),
            check(CheckMethod::CheckSelfCollision, false, 2.0),
            check(CheckMethod::CheckCollision, true, 3.0),
            check(CheckMethod::CheckSelfCollision, false, 4.0),
            check(CheckMethod::CheckCollision, false, 5.0),
            check(CheckMethod::CheckSelfCollision, true, 6.0)
        ];
        let split = AnalysisUtils::split_env_first(&checks);
        assert_eq!(split.env_only, vec![1.0, 3.0, 5.0]);
        assert_eq!(split.self_only, vec![2.0, 6.0]);
    }

    #[test]
    fn series_labels_stop_at_first_underscore() {
        assert_eq!(AnalysisUtils::series_label(Path::new("/tmp/fcl_env_50000.yaml")), "fcl");
        assert_eq!(AnalysisUtils::series_label(Path::new("exact.yaml")), "exact");
    }

    #[test]
    fn plot_paths_append_suffix() {
        assert_eq!(Analyzer::plot_path(Path::new("out/bench"), "cps"), PathBuf::from("out/bench.cps.svg"));
        assert_eq!(Analyzer::plot_path(Path::new("out/bench.v2"), "mspc"), PathBuf::from("out/bench.v2.mspc.svg"));
    }

    #[test]
    fn analyze_rejects_empty_input() {
        let options = AnalysisOptions { title: "t".to_string(), out_base: None, histograms: false };
        assert!(matches!(Analyzer::analyze(AnalysisKind::Collision, &[], &options), Err(BenchmarkError::InvalidParameter(_))));
    }
}
