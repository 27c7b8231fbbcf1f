use serde::{Serialize, Deserialize};

/// Online mean and sample variance (Welford's update).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningStatistics {
    count: usize,
    mean: f64,
    mean_sq_dist: f64
}
impl RunningStatistics {
    pub fn new() -> Self {
        Self::default()
    }
    /// Adds a data point and returns the updated sample variance.
    pub fn update(&mut self, data_pt: f64) -> f64 {
        self.count += 1;
        let delta = data_pt - self.mean;
        self.mean += delta / self.count as f64;
        self.mean_sq_dist += delta * (data_pt - self.mean);
        self.variance()
    }
    pub fn count(&self) -> usize {
        self.count
    }
    pub fn mean(&self) -> f64 {
        self.mean
    }
    /// Sample variance; zero until at least two points were added.
    pub fn variance(&self) -> f64 {
        if self.count < 2 { return 0.0; }
        self.mean_sq_dist / (self.count as f64 - 1.0)
    }
}

pub struct StatisticsUtils;
impl StatisticsUtils {
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() { return None; }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
    pub fn sample_variance(values: &[f64]) -> Option<f64> {
        if values.len() < 2 { return None; }
        let mean = Self::mean(values)?;
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        Some(sum_sq / (values.len() as f64 - 1.0))
    }
    /// Fraction of `true` values, or `None` for an empty slice.
    pub fn success_rate(values: &[bool]) -> Option<f64> {
        if values.is_empty() { return None; }
        let successes = values.iter().filter(|v| **v).count();
        Some(successes as f64 / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn running_variance_matches_two_pass() {
        let data = vec![0.12, 0.5, 0.33, 1.7, 0.01, 0.92, 0.44];
        let mut stats = RunningStatistics::new();
        for d in &data { stats.update(*d); }
        assert_eq!(stats.count(), data.len());
        assert_relative_eq!(stats.mean(), StatisticsUtils::mean(&data).unwrap(), epsilon = 1e-12);
        assert_relative_eq!(stats.variance(), StatisticsUtils::sample_variance(&data).unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn degenerate_inputs() {
        let mut stats = RunningStatistics::new();
        assert_eq!(stats.variance(), 0.0);
        assert_eq!(stats.update(3.0), 0.0);
        assert_eq!(stats.mean(), 3.0);
        assert_eq!(StatisticsUtils::mean(&[]), None);
        assert_eq!(StatisticsUtils::success_rate(&[true, false, true, true]), Some(0.75));
    }
}
