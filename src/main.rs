// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
extern crate log;

use benchplot::{Config, Error, Logger, Plot};

use std::process;

pub fn main() {
    let config = match Config::new() {
        Ok(config) => config,
        Err(Error::Help(text)) => {
            if !text.is_empty() {
                println!("{}", text);
            }
            process::exit(0);
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(e.exit_code());
        }
    };

    if let Err(e) = Logger::new()
        .label("benchplot")
        .level(config.logging())
        .init()
    {
        eprintln!("ERROR: failed to initialize logger: {}", e);
        process::exit(1);
    }

    if config.list_features() {
        for name in config.features().names() {
            println!("{}", name);
        }
        return;
    }

    config.print();

    if let Err(e) = Plot::new(config).run() {
        error!("{}", e);
        process::exit(e.exit_code());
    }
}
