//! Summary statistics over one metric series.

use serde::{Deserialize, Serialize};

/// Summary of the samples observed for one (structure, metric) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStat {
    /// Arithmetic mean
    pub mean: f64,
    /// Median; the mean of the two middle samples for even counts
    pub median: f64,
    /// Population standard deviation, 0 for a single sample
    pub stdev: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Raw samples in repetition order
    pub samples: Vec<f64>,
}

impl AggregateStat {
    /// Summarize a series. Returns `None` for an empty series.
    pub fn from_samples(samples: Vec<f64>) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;

        // two-pass variance around the computed mean
        let stdev = if samples.len() > 1 {
            let sq = samples.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>();
            (sq / n).sqrt()
        } else {
            0.0
        };

        let mut sorted = samples.clone();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            mean,
            median,
            stdev,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            samples,
        })
    }

    /// Number of contributing samples.
    pub fn count(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series() {
        assert!(AggregateStat::from_samples(Vec::new()).is_none());
    }

    #[test]
    fn test_single_sample_identity() {
        let stat = AggregateStat::from_samples(vec![7.25]).unwrap();
        assert_eq!(stat.mean, 7.25);
        assert_eq!(stat.median, 7.25);
        assert_eq!(stat.min, 7.25);
        assert_eq!(stat.max, 7.25);
        assert_eq!(stat.stdev, 0.0);
        assert_eq!(stat.samples, vec![7.25]);
    }

    #[test]
    fn test_odd_and_even_median() {
        let odd = AggregateStat::from_samples(vec![20.0, 22.0, 21.0]).unwrap();
        assert_eq!(odd.median, 21.0);
        assert_eq!(odd.min, 20.0);
        assert_eq!(odd.max, 22.0);

        let even = AggregateStat::from_samples(vec![4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(even.median, 2.5);
    }

    #[test]
    fn test_population_stdev() {
        // population variance of 2,4,4,4,5,5,7,9 is 4
        let stat =
            AggregateStat::from_samples(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stat.mean, 5.0);
        assert!((stat.stdev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_samples_keep_repetition_order() {
        let stat = AggregateStat::from_samples(vec![3.0, 1.0, 2.0]).unwrap();
        assert_eq!(stat.samples, vec![3.0, 1.0, 2.0]);
        assert_eq!(stat.count(), 3);
    }

    #[test]
    fn test_large_offset_is_stable() {
        let base = 1.0e9;
        let stat = AggregateStat::from_samples(vec![base + 4.0, base + 7.0, base + 13.0, base + 16.0])
            .unwrap();
        // population variance of 4,7,13,16 is 22.5
        assert!((stat.stdev - 22.5f64.sqrt()).abs() < 1e-6);
    }
}
