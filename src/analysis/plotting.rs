use std::path::Path;
use svg::Document;
use svg::node::element::{Group, Line, Rectangle, Text};
use crate::utils::utils_errors::BenchmarkError;
use crate::utils::utils_files::FileUtils;

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 440.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 70.0;

const BAR_COLORS: [&str; 6] = ["#4c72b0", "#dd8452", "#55a868", "#c44e52", "#8172b3", "#937860"];

/// Labelled bar chart, one bar per series.
#[derive(Clone, Debug)]
pub struct BarChart {
    title: String,
    y_label: String,
    bars: Vec<(String, f64)>
}
impl BarChart {
    pub fn new(title: &str, y_label: &str) -> Self {
        Self { title: title.to_string(), y_label: y_label.to_string(), bars: vec![] }
    }
    pub fn add_bar(&mut self, label: &str, value: f64) {
        self.bars.push((label.to_string(), value));
    }
    pub fn bars(&self) -> &Vec<(String, f64)> {
        &self.bars
    }
    pub fn to_document(&self) -> Document {
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let max_value = self.bars.iter().map(|b| b.1).fold(0.0, f64::max);
        let scale = if max_value > 0.0 { plot_height / max_value } else { 0.0 };

        let mut doc = PlotUtils::new_document(&self.title, &self.y_label);
        let slot = plot_width / self.bars.len().max(1) as f64;
        let mut group = Group::new().set("id", "bars");
        for (i, (label, value)) in self.bars.iter().enumerate() {
            let bar_height = (value.max(0.0) * scale).max(0.0);
            let x = MARGIN_LEFT + slot * i as f64 + slot * 0.15;
            let y = MARGIN_TOP + plot_height - bar_height;
            group = group.add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", y)
                    .set("width", slot * 0.7)
                    .set("height", bar_height)
                    .set("fill", BAR_COLORS[i % BAR_COLORS.len()])
            );
            group = group.add(PlotUtils::text(&PlotUtils::format_value(*value), x + slot * 0.35, y - 6.0, 11, "middle"));
            group = group.add(PlotUtils::text(label, x + slot * 0.35, MARGIN_TOP + plot_height + 18.0, 12, "middle"));
        }
        doc = doc.add(group);
        doc
    }
    pub fn save(&self, path: &Path) -> Result<(), BenchmarkError> {
        PlotUtils::save_document(&self.to_document(), path)
    }
}

/// Histogram of a set of values over equal-width bins.
#[derive(Clone, Debug)]
pub struct Histogram {
    title: String,
    x_label: String,
    values: Vec<f64>,
    num_bins: usize
}
impl Histogram {
    pub fn new(title: &str, x_label: &str, values: Vec<f64>, num_bins: usize) -> Self {
        Self { title: title.to_string(), x_label: x_label.to_string(), values, num_bins: num_bins.max(1) }
    }
    /// `(lower, upper, count)` per bin.  The last bin includes its upper edge.
    pub fn bins(&self) -> Vec<(f64, f64, usize)> {
        if self.values.is_empty() { return vec![]; }
        let min = self.values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let width = if max > min { (max - min) / self.num_bins as f64 } else { 1.0 };

        let mut counts = vec![0; self.num_bins];
        for v in &self.values {
            let idx = (((v - min) / width).floor() as usize).min(self.num_bins - 1);
            counts[idx] += 1;
        }
        counts.iter().enumerate().map(|(i, c)| (min + width * i as f64, min + width * (i + 1) as f64, *c)).collect()
    }
    pub fn to_document(&self) -> Document {
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let bins = self.bins();
        let max_count = bins.iter().map(|b| b.2).max().unwrap_or(0);
        let scale = if max_count > 0 { plot_height / max_count as f64 } else { 0.0 };

        let mut doc = PlotUtils::new_document(&self.title, "count");
        let bin_width = plot_width / bins.len().max(1) as f64;
        let mut group = Group::new().set("id", "bins");
        for (i, (_, _, count)) in bins.iter().enumerate() {
            let h = *count as f64 * scale;
            group = group.add(
                Rectangle::new()
                    .set("x", MARGIN_LEFT + bin_width * i as f64)
                    .set("y", MARGIN_TOP + plot_height - h)
                    .set("width", bin_width)
                    .set("height", h)
                    .set("fill", BAR_COLORS[0])
                    .set("stroke", "white")
                    .set("stroke-width", 0.5)
            );
        }
        if let (Some(first), Some(last)) = (bins.first(), bins.last()) {
            let y = MARGIN_TOP + plot_height + 18.0;
            group = group.add(PlotUtils::text(&PlotUtils::format_value(first.0), MARGIN_LEFT, y, 11, "start"));
            group = group.add(PlotUtils::text(&PlotUtils::format_value(last.1), MARGIN_LEFT + plot_width, y, 11, "end"));
        }
        group = group.add(PlotUtils::text(&self.x_label, MARGIN_LEFT + plot_width / 2.0, HEIGHT - 20.0, 12, "middle"));
        doc = doc.add(group);
        doc
    }
    pub fn save(&self, path: &Path) -> Result<(), BenchmarkError> {
        PlotUtils::save_document(&self.to_document(), path)
    }
}

struct PlotUtils;
impl PlotUtils {
    /// White canvas with title, axes and a rotated y axis label.
    fn new_document(title: &str, y_label: &str) -> Document {
        let plot_bottom = HEIGHT - MARGIN_BOTTOM;
        Document::new()
            .set("width", WIDTH)
            .set("height", HEIGHT)
            .set("viewBox", (0, 0, WIDTH, HEIGHT))
            .add(Rectangle::new().set("x", 0).set("y", 0).set("width", WIDTH).set("height", HEIGHT).set("fill", "white"))
            .add(Self::text(title, WIDTH / 2.0, MARGIN_TOP / 2.0 + 6.0, 16, "middle").set("font-weight", "bold"))
            .add(Self::axis_line(MARGIN_LEFT, MARGIN_TOP, MARGIN_LEFT, plot_bottom))
            .add(Self::axis_line(MARGIN_LEFT, plot_bottom, WIDTH - MARGIN_RIGHT, plot_bottom))
            .add(Self::text(y_label, 18.0, MARGIN_TOP + (plot_bottom - MARGIN_TOP) / 2.0, 12, "middle")
                .set("transform", format!("rotate(-90 18 {})", MARGIN_TOP + (plot_bottom - MARGIN_TOP) / 2.0)))
    }
    fn axis_line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
        Line::new()
            .set("x1", x1)
            .set("y1", y1)
            .set("x2", x2)
            .set("y2", y2)
            .set("stroke", "black")
            .set("stroke-width", 1)
    }
    fn text(content: &str, x: f64, y: f64, font_size: usize, anchor: &str) -> Text {
        Text::new(content)
            .set("x", x)
            .set("y", y)
            .set("font-size", font_size)
            .set("font-family", "sans-serif")
            .set("text-anchor", anchor)
            .set("fill", "black")
    }
    fn format_value(v: f64) -> String {
        if v != 0.0 && (v.abs() >= 1e5 || v.abs() < 1e-3) { format!("{:.3e}", v) } else { format!("{:.3}", v) }
    }
    fn save_document(doc: &Document, path: &Path) -> Result<(), BenchmarkError> {
        FileUtils::create_parent_directories(path)?;
        return match svg::save(path, doc) {
            Ok(_) => { Ok(()) }
            Err(e) => { Err(BenchmarkError::new_io_error(&path.to_string_lossy(), &e.to_string(), file!(), line!())) }
        }
    }
}
