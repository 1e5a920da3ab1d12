//! Configuration thresholds for the quality checks.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Thresholds and knobs shared by the quality checks.
///
/// All thresholds are authorial defaults, not recovered truths; every one
/// of them is overridable through the builder methods.
///
/// # Example
///
/// ```
/// use calidad::config::CheckConfig;
///
/// let config = CheckConfig::default()
///     .with_min_group_size(10)
///     .with_iqr_multiplier(3.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Finding score at or above which a finding is merely info
    /// (default: 0.95). This is the severity ladder for score-scaled
    /// findings: completeness, consistency and outlier findings all use it.
    pub score_info_cutoff: f64,
    /// Finding score at or above which a finding is a warning rather
    /// than critical (default: 0.80).
    pub score_warning_cutoff: f64,
    /// IQR fence multiplier for the outlier rule (default: 1.5).
    pub iqr_multiplier: f64,
    /// Bias dispersion above which a pair is a warning (default: 0.2).
    pub bias_warning_dispersion: f64,
    /// Bias dispersion above which a pair is critical (default: 0.4).
    pub bias_critical_dispersion: f64,
    /// Minimum rows a group needs to enter the dispersion computation
    /// (default: 5).
    pub min_group_size: usize,
    /// Absolute correlation below which a feature is flagged weak
    /// (default: 0.1).
    pub weak_correlation: f64,
    /// Absolute correlation above which a feature pair is flagged
    /// collinear (default: 0.9).
    pub collinear_correlation: f64,
    /// Abbreviation dictionary for canonicalization, lowercase key to
    /// lowercase expansion.
    pub synonyms: HashMap<String, String>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            score_info_cutoff: 0.95,
            score_warning_cutoff: 0.80,
            iqr_multiplier: 1.5,
            bias_warning_dispersion: 0.2,
            bias_critical_dispersion: 0.4,
            min_group_size: 5,
            weak_correlation: 0.1,
            collinear_correlation: 0.9,
            synonyms: default_synonyms(),
        }
    }
}

/// Built-in abbreviation expansions for common categorical codes.
fn default_synonyms() -> HashMap<String, String> {
    [
        ("m", "male"),
        ("f", "female"),
        ("y", "yes"),
        ("n", "no"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl CheckConfig {
    /// Set the info/warning score cutoffs of the severity ladder.
    #[must_use]
    pub fn with_score_cutoffs(mut self, info: f64, warning: f64) -> Self {
        self.score_info_cutoff = info;
        self.score_warning_cutoff = warning;
        self
    }

    /// Set the IQR fence multiplier.
    #[must_use]
    pub fn with_iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = multiplier;
        self
    }

    /// Set the bias dispersion warning/critical thresholds.
    #[must_use]
    pub fn with_bias_thresholds(mut self, warning: f64, critical: f64) -> Self {
        self.bias_warning_dispersion = warning;
        self.bias_critical_dispersion = critical;
        self
    }

    /// Set the minimum per-group sample count.
    #[must_use]
    pub fn with_min_group_size(mut self, size: usize) -> Self {
        self.min_group_size = size;
        self
    }

    /// Set the weak/collinear correlation cutoffs.
    #[must_use]
    pub fn with_correlation_cutoffs(mut self, weak: f64, collinear: f64) -> Self {
        self.weak_correlation = weak;
        self.collinear_correlation = collinear;
        self
    }

    /// Add an abbreviation expansion to the canonicalization dictionary.
    #[must_use]
    pub fn with_synonym(mut self, short: impl Into<String>, full: impl Into<String>) -> Self {
        self.synonyms
            .insert(short.into().to_lowercase(), full.into().to_lowercase());
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an invalid configuration error naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("score_info_cutoff", self.score_info_cutoff),
            ("score_warning_cutoff", self.score_warning_cutoff),
            ("bias_warning_dispersion", self.bias_warning_dispersion),
            ("bias_critical_dispersion", self.bias_critical_dispersion),
            ("weak_correlation", self.weak_correlation),
            ("collinear_correlation", self.collinear_correlation),
        ] {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(Error::invalid_config(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }

        if self.score_warning_cutoff > self.score_info_cutoff {
            return Err(Error::invalid_config(
                "score_warning_cutoff must not exceed score_info_cutoff",
            ));
        }
        if self.bias_warning_dispersion > self.bias_critical_dispersion {
            return Err(Error::invalid_config(
                "bias_warning_dispersion must not exceed bias_critical_dispersion",
            ));
        }
        if self.weak_correlation > self.collinear_correlation {
            return Err(Error::invalid_config(
                "weak_correlation must not exceed collinear_correlation",
            ));
        }
        if self.iqr_multiplier <= 0.0 || self.iqr_multiplier.is_nan() {
            return Err(Error::invalid_config(format!(
                "iqr_multiplier must be positive, got {}",
                self.iqr_multiplier
            )));
        }
        if self.min_group_size == 0 {
            return Err(Error::invalid_config("min_group_size must be at least 1"));
        }

        Ok(())
    }
}
