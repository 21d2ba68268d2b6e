// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Error, Measurements};

use serde_derive::*;
use strum_macros::{Display, EnumString};

use std::collections::BTreeMap;

const BUILTIN: &[(&str, &str)] = &[
    ("record4s", "record4s %"),
    ("record4s_arrayrecord", "record4s ArrayRecord"),
    ("caseclass", "Scala 3 case class"),
    ("map", "Scala 3 Map"),
    ("shapeless", "shapeless Record"),
    ("scalarecords", "scala-records Rec"),
];

/// What to do with a target identifier that has no display name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTarget {
    /// abort with a legend lookup error
    #[strum(serialize = "fail")]
    Fail,
    /// keep the raw identifier in the legend
    #[strum(serialize = "raw")]
    Raw,
}

impl Default for UnknownTarget {
    fn default() -> Self {
        UnknownTarget::Fail
    }
}

/// Maps target identifiers found in measurement files to legend labels.
#[derive(Clone, Debug, Default)]
pub struct TargetNames {
    names: BTreeMap<String, String>,
}

impl TargetNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names for the record implementations under benchmark.
    pub fn builtin() -> Self {
        let mut names = Self::new();
        for (target, name) in BUILTIN {
            names.insert(*target, *name);
        }
        names
    }

    pub fn insert(&mut self, target: impl Into<String>, name: impl Into<String>) {
        self.names.insert(target.into(), name.into());
    }

    pub fn get(&self, target: &str) -> Option<&str> {
        self.names.get(target).map(|n| n.as_str())
    }

    pub fn display_name(&self, target: &str, policy: UnknownTarget) -> Result<String, Error> {
        match (self.get(target), policy) {
            (Some(name), _) => Ok(name.to_string()),
            (None, UnknownTarget::Raw) => {
                warn!("no display name for target: {}", target);
                Ok(target.to_string())
            }
            (None, UnknownTarget::Fail) => Err(Error::UnknownTarget(target.to_string())),
        }
    }

    /// Replace every target identifier in `measurements` with its display
    /// name. Nothing is modified if any lookup fails or if two identifiers
    /// would end up with the same name.
    pub fn relabel(
        &self,
        measurements: &mut Measurements,
        policy: UnknownTarget,
    ) -> Result<(), Error> {
        measurements.relabel(|target| self.display_name(target, policy))
    }
}
