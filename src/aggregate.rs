// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Reduces the raw samples of each target into one line of points.

use crate::Measurements;

use serde_derive::*;
use strum_macros::{Display, EnumString};

use std::cmp::Ordering;

/// z-score of a two-sided 95% interval
const Z_95: f64 = 1.96;

/// Aggregation applied to samples which share a target and an index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
pub enum Estimator {
    #[serde(alias = "average")]
    #[strum(to_string = "mean", serialize = "average")]
    Mean,
    #[strum(serialize = "median")]
    Median,
    #[strum(serialize = "min")]
    Min,
    #[strum(serialize = "max")]
    Max,
    #[strum(serialize = "sum")]
    Sum,
}

impl Default for Estimator {
    fn default() -> Self {
        Estimator::Mean
    }
}

impl Estimator {
    /// Reduce `samples` to a single value. Returns `None` when empty.
    pub fn estimate(self, samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }
        let value = match self {
            Estimator::Mean => mean(samples),
            Estimator::Median => {
                let mut sorted = samples.to_vec();
                sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                } else {
                    sorted[mid]
                }
            }
            Estimator::Min => samples.iter().copied().fold(f64::INFINITY, f64::min),
            Estimator::Max => samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Estimator::Sum => samples.iter().sum(),
        };
        Some(value)
    }
}

/// Shaded band drawn around each line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Display, EnumString)]
pub enum ErrorBar {
    /// normal approximation of the 95% confidence interval of the mean
    #[serde(rename = "ci")]
    #[strum(serialize = "ci")]
    Confidence,
    /// one sample standard deviation
    #[serde(rename = "sd")]
    #[strum(serialize = "sd")]
    StdDev,
    #[serde(rename = "none")]
    #[strum(serialize = "none")]
    Disabled,
}

impl Default for ErrorBar {
    fn default() -> Self {
        ErrorBar::Confidence
    }
}

impl ErrorBar {
    /// Band around `estimate`, if `samples` carry enough information.
    pub fn band(self, estimate: f64, samples: &[f64]) -> Option<(f64, f64)> {
        if samples.len() < 2 {
            return None;
        }
        let sd = std_dev(samples);
        let half = match self {
            ErrorBar::Confidence => Z_95 * sd / (samples.len() as f64).sqrt(),
            ErrorBar::StdDev => sd,
            ErrorBar::Disabled => return None,
        };
        Some((estimate - half, estimate + half))
    }
}

fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// sample standard deviation, `n - 1` denominator
fn std_dev(samples: &[f64]) -> f64 {
    let mean = mean(samples);
    let sum: f64 = samples.iter().map(|s| (s - mean) * (s - mean)).sum();
    (sum / (samples.len() - 1) as f64).sqrt()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub band: Option<(f64, f64)>,
}

/// One line of the chart.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<Point>,
}

/// Group the table by target (first appearance order), then by index
/// (ascending), reducing each group with `estimator`.
pub fn summarize(
    measurements: &Measurements,
    estimator: Estimator,
    errorbar: ErrorBar,
) -> Vec<Series> {
    measurements
        .targets()
        .into_iter()
        .map(|target| {
            let mut samples: Vec<(f64, f64)> = measurements
                .rows()
                .iter()
                .filter(|row| row.target == target)
                .map(|row| (row.index, row.score))
                .collect();
            samples.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

            let mut points = Vec::new();
            let mut start = 0;
            while start < samples.len() {
                let x = samples[start].0;
                let end = samples[start..]
                    .iter()
                    .position(|(index, _)| *index != x)
                    .map(|offset| start + offset)
                    .unwrap_or_else(|| samples.len());
                let scores: Vec<f64> = samples[start..end].iter().map(|(_, s)| *s).collect();
                if let Some(y) = estimator.estimate(&scores) {
                    points.push(Point {
                        x,
                        y,
                        band: errorbar.band(y, &scores),
                    });
                }
                start = end;
            }

            Series {
                label: target.to_string(),
                points,
            }
        })
        .collect()
}
