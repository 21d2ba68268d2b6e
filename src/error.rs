// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::path::PathBuf;

use thiserror::Error;

/// Every way a single plotting run can fail. All of them are fatal.
#[derive(Debug, Error)]
pub enum Error {
    /// help or version text requested on the command line, not a failure
    #[error("{0}")]
    Help(String),
    #[error("{0}")]
    Usage(String),
    #[error("bad config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
    #[error("unknown feature: {0}")]
    UnknownFeature(String),
    #[error("failed to read measurements from {}: {source}", .path.display())]
    ReadData {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed measurements in {}: {reason}", .path.display())]
    MalformedData { path: PathBuf, reason: String },
    #[error("no display name for target: {0}")]
    UnknownTarget(String),
    #[error("targets {first} and {second} share the display name: {name}")]
    DuplicateLabel {
        name: String,
        first: String,
        second: String,
    },
    #[error("invalid tick step: {0}")]
    InvalidStep(f64),
    #[error("invalid axis bound: {0}")]
    InvalidBound(f64),
    #[error("failed to render chart: {0}")]
    Render(String),
    #[error("failed to write chart to {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    /// process exit code for this class of failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Help(_) => 0,
            Error::Usage(_) | Error::Config { .. } => 2,
            Error::UnknownFeature(_) => 3,
            Error::ReadData { .. } | Error::MalformedData { .. } => 4,
            Error::UnknownTarget(_) | Error::DuplicateLabel { .. } => 5,
            Error::InvalidStep(_) | Error::InvalidBound(_) => 6,
            Error::Render(_) => 7,
            Error::WriteOutput { .. } => 8,
        }
    }
}
