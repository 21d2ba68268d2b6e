// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Error, Estimator};

use serde_derive::*;

use std::collections::BTreeMap;

/// Axis layout for one benchmark feature.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureConfig {
    x_label: String,
    y_label: String,
    #[serde(default)]
    x_min: f64,
    #[serde(default)]
    y_min: f64,
    x_step: f64,
    y_step: f64,
    #[serde(default)]
    estimator: Estimator,
}

impl FeatureConfig {
    /// Labels with both axes starting at zero and unit steps.
    pub fn new(x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            x_label: x_label.into(),
            y_label: y_label.into(),
            x_min: 0.0,
            y_min: 0.0,
            x_step: 1.0,
            y_step: 1.0,
            estimator: Estimator::default(),
        }
    }

    pub fn with_x_axis(mut self, min: f64, step: f64) -> Self {
        self.x_min = min;
        self.x_step = step;
        self
    }

    pub fn with_y_axis(mut self, min: f64, step: f64) -> Self {
        self.y_min = min;
        self.y_step = step;
        self
    }

    pub fn with_estimator(mut self, estimator: Estimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn x_step(&self) -> f64 {
        self.x_step
    }

    pub fn y_step(&self) -> f64 {
        self.y_step
    }

    pub fn estimator(&self) -> Estimator {
        self.estimator
    }
}

// name, x label, y label, x min, y min, x step, y step
type Builtin = (&'static str, &'static str, &'static str, f64, f64, f64, f64);

const RECORD_SIZE: &str = "Record size";
const FIELD_INDEX: &str = "Field index";
const ACCESS_TIME: &str = "Access time [ns]";
const COMPILE_ACCESS: &str = "Compilation time (field access) [s]";

const BUILTIN: &[Builtin] = &[
    ("Creation", RECORD_SIZE, "Creation time [ns]", 2.0, 0.0, 2.0, 500.0),
    ("Update", RECORD_SIZE, "Update time [ns]", 0.0, 0.0, 50.0, 500.0),
    ("Concatenation", RECORD_SIZE, "Concatenation time [ns]", 20.0, 0.0, 20.0, 2000.0),
    ("FieldAccess", FIELD_INDEX, ACCESS_TIME, 2.0, 0.0, 2.0, 5.0),
    ("FieldAccessSize", RECORD_SIZE, ACCESS_TIME, 2.0, 0.0, 2.0, 5.0),
    ("FieldAccessPoly", "Degree of polymorphism", ACCESS_TIME, 2.0, 0.0, 2.0, 5.0),
    (
        "CompileCreation",
        RECORD_SIZE,
        "Compilation time (record creation) [s]",
        0.0,
        0.0,
        50.0,
        2.0,
    ),
    (
        "CompileCreationAndAccess",
        RECORD_SIZE,
        "Compilation time [s]\n(record creation and all field access)",
        0.0,
        0.0,
        50.0,
        5.0,
    ),
    (
        "CompileCreationAndAccessRep",
        RECORD_SIZE,
        "Compilation time [s]\n(record creation and repeated field access)",
        0.0,
        0.0,
        50.0,
        2.0,
    ),
    (
        "CompileUpdate",
        RECORD_SIZE,
        "Compilation time (field update) [s]",
        0.0,
        0.0,
        50.0,
        1.0,
    ),
    (
        "CompileUpdateRep",
        "Repetitions",
        "Compilation time (repeted field updates) [s]",
        0.0,
        0.0,
        5.0,
        1.0,
    ),
    (
        "CompileConcatenation",
        RECORD_SIZE,
        "Compilation time (concatenation) [s]",
        0.0,
        0.0,
        50.0,
        2.0,
    ),
    ("CompileFieldAccess", FIELD_INDEX, COMPILE_ACCESS, 2.0, 0.0, 2.0, 0.5),
    ("CompileFieldAccessSize", RECORD_SIZE, COMPILE_ACCESS, 2.0, 0.0, 2.0, 0.5),
];

/// Chart configuration for every known feature, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct FeatureTable {
    features: BTreeMap<String, FeatureConfig>,
}

impl FeatureTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The features measured by the record benchmarks.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (name, x_label, y_label, x_min, y_min, x_step, y_step) in BUILTIN {
            table.insert(
                *name,
                FeatureConfig::new(*x_label, *y_label)
                    .with_x_axis(*x_min, *x_step)
                    .with_y_axis(*y_min, *y_step),
            );
        }
        table
    }

    /// Add a feature, replacing any existing entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, config: FeatureConfig) {
        self.features.insert(name.into(), config);
    }

    pub fn get(&self, name: &str) -> Result<&FeatureConfig, Error> {
        self.features
            .get(name)
            .ok_or_else(|| Error::UnknownFeature(name.to_string()))
    }

    /// Feature names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.features.keys().map(|k| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_features() {
        let table = FeatureTable::builtin();
        assert_eq!(table.len(), 14);

        let creation = table.get("Creation").unwrap();
        assert_eq!(creation.x_label(), "Record size");
        assert_eq!(creation.y_label(), "Creation time [ns]");
        assert_eq!((creation.x_min(), creation.x_step()), (2.0, 2.0));
        assert_eq!((creation.y_min(), creation.y_step()), (0.0, 500.0));
        assert_eq!(creation.estimator(), Estimator::Mean);

        let access = table.get("CompileFieldAccess").unwrap();
        assert_eq!(access.y_step(), 0.5);

        let poly = table.get("FieldAccessPoly").unwrap();
        assert_eq!(poly.x_label(), "Degree of polymorphism");
    }

    #[test]
    fn unknown_feature() {
        let table = FeatureTable::builtin();
        match table.get("Bogus") {
            Err(Error::UnknownFeature(name)) => assert_eq!(name, "Bogus"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn insert_overrides() {
        let mut table = FeatureTable::builtin();
        table.insert(
            "Creation",
            FeatureConfig::new("Size", "Time [us]")
                .with_x_axis(0.0, 10.0)
                .with_estimator(Estimator::Median),
        );
        let creation = table.get("Creation").unwrap();
        assert_eq!(creation.y_label(), "Time [us]");
        assert_eq!(creation.estimator(), Estimator::Median);
        assert_eq!(table.len(), 14);
    }

    #[test]
    fn names_are_sorted() {
        let table = FeatureTable::builtin();
        let names = table.names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(names.contains(&"CompileUpdateRep"));
    }

    #[test]
    fn deserialize() {
        let config: FeatureConfig = toml::from_str(
            r#"
            x_label = "Record size"
            y_label = "Allocated bytes"
            x_step = 50
            y_step = 0.5
            estimator = "median"
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            FeatureConfig::new("Record size", "Allocated bytes")
                .with_x_axis(0.0, 50.0)
                .with_y_axis(0.0, 0.5)
                .with_estimator(Estimator::Median)
        );
    }
}
