// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
extern crate log;

mod aggregate;
mod chart;
mod config;
mod error;
mod feature;
mod logger;
mod measurement;
mod target;
mod ticks;

pub use crate::aggregate::{summarize, ErrorBar, Estimator, Point, Series};
pub use crate::chart::{Chart, Marker};
pub use crate::config::Config;
pub use crate::error::Error;
pub use crate::feature::{FeatureConfig, FeatureTable};
pub use crate::logger::Logger;
pub use crate::measurement::{Measurement, Measurements};
pub use crate::target::{TargetNames, UnknownTarget};
pub use crate::ticks::ticks;

use std::path::PathBuf;

/// One invocation: reads a measurement file and writes one chart.
pub struct Plot {
    config: Config,
}

impl Plot {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the pipeline and return the path of the written chart. Nothing is
    /// written unless every step before the final write succeeds.
    pub fn run(&self) -> Result<PathBuf, Error> {
        let name = required(self.config.feature(), "FEATURE")?;
        let data = required(self.config.data(), "DATA")?;
        let output = required(self.config.output(), "OUTPUT")?;

        let features = self.config.features();
        let feature = features.get(name)?;
        info!(
            "feature: {} x: {:?} y: {:?} estimator: {}",
            name,
            feature.x_label(),
            feature.y_label(),
            feature.estimator()
        );

        let mut measurements = Measurements::load(data)?;
        self.config
            .targets()
            .relabel(&mut measurements, self.config.unknown_target())?;
        info!(
            "loaded {} measurements for {} targets from {}",
            measurements.len(),
            measurements.targets().len(),
            data.display()
        );

        // the table is never empty once loaded
        let x_max = measurements.max_index().unwrap_or_else(|| feature.x_min());
        let y_max = measurements.max_score().unwrap_or_else(|| feature.y_min());
        let x_ticks = ticks(feature.x_min(), x_max, feature.x_step())?;
        let y_ticks = ticks(feature.y_min(), y_max, feature.y_step())?;
        debug!("x ticks: {:?}", x_ticks);
        debug!("y ticks: {:?}", y_ticks);

        let series = summarize(&measurements, feature.estimator(), self.config.errorbar());
        for s in &series {
            debug!("series: {} points: {}", s.label, s.points.len());
        }

        let mut chart = Chart::new();
        chart
            .x_desc(feature.x_label())
            .y_desc(feature.y_label())
            .size(self.config.size())
            .x_ticks(x_ticks)
            .y_ticks(y_ticks);
        if let Some(caption) = self.config.caption() {
            chart.caption(caption);
        }
        chart.save(&series, output)?;
        info!("wrote chart to {}", output.display());

        Ok(output.to_path_buf())
    }
}

fn required<'a, T: ?Sized>(value: Option<&'a T>, name: &str) -> Result<&'a T, Error> {
    value.ok_or_else(|| Error::Usage(format!("missing argument: {}", name)))
}
