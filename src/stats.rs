//! Small statistical helpers shared by the quality checks.

// Statistical computation requires usize->f64 casts
#![allow(clippy::cast_precision_loss)]

use std::collections::HashMap;

/// Arithmetic mean. Returns `None` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation. Returns `None` for an empty slice.
#[must_use]
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Quantile of an ascending-sorted slice using linear interpolation
/// between closest ranks. `q` is clamped to [0, 1].
///
/// Interpolation (rather than plain rank indexing) matters for small
/// columns: with four values the indexed Q3 is the maximum itself, which
/// can never sit outside its own fence.
#[must_use]
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let fraction = position - lower as f64;
    Some(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

/// Pearson correlation coefficient between two equal-length slices.
///
/// Returns `None` when fewer than two points are available or either
/// side has zero variance (correlation undefined for constants).
#[must_use]
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Total variation distance between two categorical distributions given
/// as raw counts: half the L1 distance between their relative
/// frequencies. Result is in [0, 1].
#[must_use]
pub fn total_variation(a: &HashMap<String, usize>, b: &HashMap<String, usize>) -> f64 {
    let total_a: usize = a.values().sum();
    let total_b: usize = b.values().sum();
    if total_a == 0 || total_b == 0 {
        return 0.0;
    }

    let mut categories: Vec<&str> = a.keys().chain(b.keys()).map(String::as_str).collect();
    categories.sort_unstable();
    categories.dedup();

    let mut distance = 0.0;
    for category in categories {
        let pa = a.get(category).copied().unwrap_or(0) as f64 / total_a as f64;
        let pb = b.get(category).copied().unwrap_or(0) as f64 / total_b as f64;
        distance += (pa - pb).abs();
    }
    distance / 2.0
}
