// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod general;

use crate::config::general::General;
use crate::*;

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{App, Arg, ArgMatches, ErrorKind};
use log::Level;
use serde_derive::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    general: General,
    /// extra or replacement display names, keyed by target identifier
    #[serde(default)]
    target: BTreeMap<String, String>,
    /// extra or replacement features, keyed by feature name
    #[serde(default)]
    feature: BTreeMap<String, FeatureConfig>,
}

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new(NAME)
        .version(VERSION)
        .about("Plot benchmark measurements as an SVG line chart")
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("TOML config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("unknown-target")
                .long("unknown-target")
                .value_name("POLICY")
                .help("What to do with targets that have no display name")
                .possible_values(&["fail", "raw"])
                .takes_value(true),
        )
        .arg(
            Arg::with_name("errorbar")
                .long("errorbar")
                .value_name("KIND")
                .help("Band drawn around each line")
                .possible_values(&["ci", "sd", "none"])
                .takes_value(true),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .value_name("PIXELS")
                .help("Chart width")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .value_name("PIXELS")
                .help("Chart height")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("caption")
                .long("caption")
                .value_name("TEXT")
                .help("Chart title")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("list-features")
                .long("list-features")
                .help("Print the known features and exit"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Increase verbosity by one level. Can be used more than once")
                .multiple(true),
        )
        .arg(
            Arg::with_name("FEATURE")
                .help("Benchmark feature to plot")
                .required_unless("list-features")
                .index(1),
        )
        .arg(
            Arg::with_name("DATA")
                .help("JSON file with the measurements")
                .required_unless("list-features")
                .index(2),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .help("Path of the SVG file to write")
                .required_unless("list-features")
                .index(3),
        )
}

impl Config {
    /// parse command line options and return `Config`
    pub fn new() -> Result<Config, Error> {
        Self::from_args(std::env::args_os())
    }

    /// parse the given argument list, the first item is the program name.
    /// A help or version request is returned as `Error::Help`.
    pub fn from_args<I, T>(args: I) -> Result<Config, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = app().get_matches_from_safe(args).map_err(|e| match e.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => Error::Help(e.message),
            _ => Error::Usage(e.message),
        })?;
        Self::from_matches(&matches)
    }

    fn from_matches(matches: &ArgMatches) -> Result<Config, Error> {
        let mut config = if let Some(file) = matches.value_of("config") {
            Config::load_from_file(file)?
        } else {
            Default::default()
        };

        if let Some(policy) = parse_arg(matches, "unknown-target")? {
            config.general.set_unknown_target(policy);
        }

        if let Some(errorbar) = parse_arg(matches, "errorbar")? {
            config.general.set_errorbar(errorbar);
        }

        if let Some(width) = parse_arg(matches, "width")? {
            config.general.set_width(width);
        }

        if let Some(height) = parse_arg(matches, "height")? {
            config.general.set_height(height);
        }

        if config.general.width() == 0 || config.general.height() == 0 {
            return Err(Error::Usage(format!(
                "chart size must be positive: {}x{}",
                config.general.width(),
                config.general.height()
            )));
        }

        if let Some(caption) = matches.value_of("caption") {
            config.general.set_caption(Some(caption.to_string()));
        }

        match matches.occurrences_of("verbose") {
            0 => {}
            1 => config.general.set_logging(Level::Debug),
            _ => config.general.set_logging(Level::Trace),
        }

        config
            .general
            .set_list_features(matches.is_present("list-features"));
        config
            .general
            .set_feature(matches.value_of("FEATURE").map(|v| v.to_string()));
        config
            .general
            .set_data(matches.value_of("DATA").map(PathBuf::from));
        config
            .general
            .set_output(matches.value_of("OUTPUT").map(PathBuf::from));

        Ok(config)
    }

    fn load_from_file(file: &str) -> Result<Config, Error> {
        let path = Path::new(file);
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// name of the feature to plot
    pub fn feature(&self) -> Option<&str> {
        self.general.feature()
    }

    /// measurement file
    pub fn data(&self) -> Option<&Path> {
        self.general.data()
    }

    /// chart file
    pub fn output(&self) -> Option<&Path> {
        self.general.output()
    }

    pub fn list_features(&self) -> bool {
        self.general.list_features()
    }

    pub fn unknown_target(&self) -> UnknownTarget {
        self.general.unknown_target()
    }

    pub fn errorbar(&self) -> ErrorBar {
        self.general.errorbar()
    }

    /// chart width and height in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.general.width(), self.general.height())
    }

    pub fn caption(&self) -> Option<&str> {
        self.general.caption()
    }

    /// get logging level
    pub fn logging(&self) -> Level {
        self.general.logging()
    }

    /// the builtin features, extended by the config file
    pub fn features(&self) -> FeatureTable {
        let mut table = FeatureTable::builtin();
        for (name, feature) in &self.feature {
            table.insert(name.as_str(), feature.clone());
        }
        table
    }

    /// the builtin display names, extended by the config file
    pub fn targets(&self) -> TargetNames {
        let mut names = TargetNames::builtin();
        for (target, name) in &self.target {
            names.insert(target.as_str(), name.as_str());
        }
        names
    }

    pub fn print(&self) {
        info!("-----");
        info!(
            "Config: Feature: {} Data: {} Output: {}",
            self.feature().unwrap_or("-"),
            self.data().map(|p| p.display().to_string()).unwrap_or_default(),
            self.output().map(|p| p.display().to_string()).unwrap_or_default(),
        );
        info!(
            "Config: Unknown Targets: {} Errorbar: {}",
            self.unknown_target(),
            self.errorbar(),
        );
        let (width, height) = self.size();
        info!(
            "Config: Size: {}x{} Caption: {}",
            width,
            height,
            self.caption().unwrap_or("None"),
        );
        info!(
            "Config: Custom Features: {} Custom Targets: {}",
            self.feature.len(),
            self.target.len(),
        );
    }
}

/// a helper function to parse an optional argument by name from `ArgMatches`
fn parse_arg<T>(matches: &ArgMatches, key: &str) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: Display,
{
    matches
        .value_of(key)
        .map(|v| {
            v.parse()
                .map_err(|e| Error::Usage(format!("could not parse {}: {}", key, e)))
        })
        .transpose()
}
