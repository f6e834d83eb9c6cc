//! Long-run trajectory classification.
//!
//! Works on one sampled component of a settled (post-transient) window: a
//! series with more than one interior maximum is oscillating around a limit
//! cycle; anything else has settled onto a fixed point.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Long-run regime of a sampled series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Stable,
    Oscillatory,
}

/// What a settled window reduces to for the bifurcation diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WindowSummary {
    /// Settled onto a fixed point; the final sample stands for it.
    Stable { final_value: f64 },
    /// Limit cycle; distinct rounded extrema bracket its amplitude.
    Oscillatory { maxima: Vec<f64>, minima: Vec<f64> },
}

/// Indices of interior local maxima (strictly above both neighbors).
pub fn local_maxima(series: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    for i in 1..series.len().saturating_sub(1) {
        if series[i] > series[i - 1] && series[i] > series[i + 1] {
            peaks.push(i);
        }
    }
    peaks
}

/// Indices of interior local minima.
pub fn local_minima(series: &[f64]) -> Vec<usize> {
    let mut valleys = Vec::new();
    for i in 1..series.len().saturating_sub(1) {
        if series[i] < series[i - 1] && series[i] < series[i + 1] {
            valleys.push(i);
        }
    }
    valleys
}

/// Rounds to `digits` decimal places.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (value * scale).round() / scale
}

/// Rounded, ascending, deduplicated values at the given indices. Rounding
/// before deduplication collapses near-identical extrema produced by
/// numerical noise.
fn distinct_rounded(series: &[f64], indices: &[usize], digits: u32) -> Vec<f64> {
    let mut values: Vec<f64> = indices.iter().map(|&i| round_to(series[i], digits)).collect();
    values.sort_by(|a, b| a.partial_cmp(b).expect("rounded extrema are finite"));
    values.dedup();
    values
}

/// Classifies a settled window of one state component.
///
/// More than one local maximum means the window is still swinging:
/// oscillatory, summarized by the distinct rounded maxima and minima. At
/// most one maximum means the transient has died out: stable, summarized by
/// the final sample.
pub fn classify_window(series: &[f64], round_digits: u32) -> Result<WindowSummary> {
    if series.is_empty() {
        bail!("Cannot classify an empty sample window.");
    }
    if series.iter().any(|v| !v.is_finite()) {
        bail!("Cannot classify a window containing non-finite samples.");
    }

    let maxima = local_maxima(series);
    if maxima.len() > 1 {
        let minima = local_minima(series);
        Ok(WindowSummary::Oscillatory {
            maxima: distinct_rounded(series, &maxima, round_digits),
            minima: distinct_rounded(series, &minima, round_digits),
        })
    } else {
        Ok(WindowSummary::Stable {
            final_value: *series.last().expect("series is non-empty"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_window, local_maxima, local_minima, round_to, WindowSummary};

    #[test]
    fn monotone_decay_classifies_stable_with_final_value() {
        let series = [5.0, 4.0, 3.0, 2.0, 1.5, 1.25];
        match classify_window(&series, 4).expect("classification should succeed") {
            WindowSummary::Stable { final_value } => assert_eq!(final_value, 1.25),
            other => panic!("expected stable, got {other:?}"),
        }
    }

    #[test]
    fn single_overshoot_still_classifies_stable() {
        // One peak is a decaying transient, not a limit cycle.
        let series = [0.0, 1.0, 0.5, 0.4, 0.35];
        match classify_window(&series, 4).expect("classification should succeed") {
            WindowSummary::Stable { final_value } => assert_eq!(final_value, 0.35),
            other => panic!("expected stable, got {other:?}"),
        }
    }

    #[test]
    fn repeated_peaks_classify_oscillatory() {
        let series = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        match classify_window(&series, 4).expect("classification should succeed") {
            WindowSummary::Oscillatory { maxima, minima } => {
                assert_eq!(maxima, vec![1.0]);
                assert_eq!(minima, vec![0.0]);
            }
            other => panic!("expected oscillatory, got {other:?}"),
        }
    }

    #[test]
    fn sub_precision_peaks_collapse_after_rounding() {
        // Two maxima 1e-5 apart collapse under 4-digit rounding.
        let series = [0.0, 1.00001, 0.0, 1.00002, 0.0];
        match classify_window(&series, 4).expect("classification should succeed") {
            WindowSummary::Oscillatory { maxima, .. } => assert_eq!(maxima, vec![1.0]),
            other => panic!("expected oscillatory, got {other:?}"),
        }
    }

    #[test]
    fn distinct_amplitudes_survive_rounding() {
        let series = [0.0, 1.0, 0.2, 1.5, 0.0];
        match classify_window(&series, 4).expect("classification should succeed") {
            WindowSummary::Oscillatory { maxima, minima } => {
                assert_eq!(maxima, vec![1.0, 1.5]);
                assert_eq!(minima, vec![0.2]);
            }
            other => panic!("expected oscillatory, got {other:?}"),
        }
    }

    #[test]
    fn extrema_ignore_endpoints() {
        let series = [3.0, 1.0, 2.0, 0.5, 4.0];
        assert_eq!(local_maxima(&series), vec![2]);
        assert_eq!(local_minima(&series), vec![1, 3]);
    }

    #[test]
    fn short_series_have_no_interior_extrema() {
        assert!(local_maxima(&[1.0]).is_empty());
        assert!(local_maxima(&[1.0, 2.0]).is_empty());
        assert!(local_minima(&[]).is_empty());
    }

    #[test]
    fn empty_window_is_an_error() {
        assert!(classify_window(&[], 4).is_err());
    }

    #[test]
    fn non_finite_window_is_an_error() {
        assert!(classify_window(&[1.0, f64::NAN, 2.0], 4).is_err());
    }

    #[test]
    fn rounding_matches_decimal_places() {
        assert_eq!(round_to(0.54321, 4), 0.5432);
        assert_eq!(round_to(0.54326, 4), 0.5433);
        assert_eq!(round_to(-1.00005, 4), -1.0001);
    }
}
