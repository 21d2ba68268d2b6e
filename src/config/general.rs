// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{ErrorBar, UnknownTarget};

use log::Level;
use serde_derive::*;

use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct General {
    // invocation only, never read from the file
    #[serde(skip)]
    feature: Option<String>,
    #[serde(skip)]
    data: Option<PathBuf>,
    #[serde(skip)]
    output: Option<PathBuf>,
    #[serde(skip)]
    list_features: bool,

    #[serde(default)]
    unknown_target: UnknownTarget,
    #[serde(default)]
    errorbar: ErrorBar,
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
    caption: Option<String>,
    #[serde(default = "default_logging_level")]
    logging: Level,
}

impl General {
    pub fn feature(&self) -> Option<&str> {
        self.feature.as_deref()
    }

    pub fn set_feature(&mut self, feature: Option<String>) {
        self.feature = feature;
    }

    pub fn data(&self) -> Option<&Path> {
        self.data.as_deref()
    }

    pub fn set_data(&mut self, data: Option<PathBuf>) {
        self.data = data;
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn set_output(&mut self, output: Option<PathBuf>) {
        self.output = output;
    }

    pub fn list_features(&self) -> bool {
        self.list_features
    }

    pub fn set_list_features(&mut self, list_features: bool) {
        self.list_features = list_features;
    }

    pub fn unknown_target(&self) -> UnknownTarget {
        self.unknown_target
    }

    pub fn set_unknown_target(&mut self, policy: UnknownTarget) {
        self.unknown_target = policy;
    }

    pub fn errorbar(&self) -> ErrorBar {
        self.errorbar
    }

    pub fn set_errorbar(&mut self, errorbar: ErrorBar) {
        self.errorbar = errorbar;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width;
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = height;
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn set_caption(&mut self, caption: Option<String>) {
        self.caption = caption;
    }

    pub fn logging(&self) -> Level {
        self.logging
    }

    pub fn set_logging(&mut self, level: Level) {
        self.logging = level;
    }
}

impl Default for General {
    fn default() -> General {
        General {
            feature: None,
            data: None,
            output: None,
            list_features: false,
            unknown_target: Default::default(),
            errorbar: Default::default(),
            width: default_width(),
            height: default_height(),
            caption: None,
            logging: default_logging_level(),
        }
    }
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    500
}

fn default_logging_level() -> Level {
    Level::Info
}
