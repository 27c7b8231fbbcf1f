use colored::Colorize;
use pbr::ProgressBar;
use std::io::Stdout;

/// Prints the given string with the given color.
///
/// ## Example
/// ```
/// use motion_benchmarks::utils::utils_console::{bench_print, PrintMode, PrintColor};
/// bench_print("test", PrintMode::Print, PrintColor::Cyan, false);
/// ```
pub fn bench_print(s: &str, mode: PrintMode, color: PrintColor, bolded: bool) {
    let mut string = match color {
        PrintColor::None => { s.normal() }
        _ => {
            let c = color.get_color_triple();
            s.truecolor(c.0, c.1, c.2)
        }
    };
    if bolded { string = string.bold(); }
    match mode {
        PrintMode::Println => { println!("{}", string); }
        PrintMode::Print => { print!("{}", string); }
    }
}

/// Prints a `label: value` line where only the label is colored.
pub fn bench_print_labeled_value(label: &str, value: &str, color: PrintColor) {
    bench_print(&format!("{}: ", label), PrintMode::Print, color, true);
    bench_print(value, PrintMode::Println, PrintColor::None, false);
}

/// Enum that is used in bench_print function.
/// Println will cause a new line after each line, while Print will not.
#[derive(Clone, Debug)]
pub enum PrintMode {
    Println,
    Print
}

/// Defines color for a bench print command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrintColor {
    None,
    Green,
    Red,
    Yellow,
    Cyan
}
impl PrintColor {
    pub fn get_color_triple(&self) -> (u8, u8, u8) {
        match self {
            PrintColor::None => { (0,0,0) }
            PrintColor::Green => { return (0, 255, 0) }
            PrintColor::Red => { return (255, 0, 0) }
            PrintColor::Yellow => { return (255, 255, 0) }
            PrintColor::Cyan => { return (0, 255, 255) }
        }
    }
}

/// Thin wrapper around a terminal progress bar so that long benchmark loops can be
/// silenced in tests.
pub struct BenchProgress {
    bar: Option<ProgressBar<Stdout>>
}
impl BenchProgress {
    pub fn new(total: u64, message: &str, show: bool) -> Self {
        if !show || total == 0 { return Self { bar: None }; }
        let mut bar = ProgressBar::new(total);
        bar.message(message);
        Self { bar: Some(bar) }
    }
    pub fn inc(&mut self) {
        if let Some(bar) = &mut self.bar { bar.inc(); }
    }
    pub fn finish(&mut self) {
        if let Some(bar) = &mut self.bar { bar.finish_println(""); }
    }
}
