// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Command line interface.

mod config;
mod credits;
mod export;
mod extract;
mod import;
mod rename;

use crate::field::FieldCollection;
use crate::pattern::{PatternCache, PatternKind};
use crate::util::walk_dir;
use crate::Config;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};

/// Command line Arguments.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Show debug information.
    #[arg(short, long)]
    verbose: bool,
    /// Path to configuration file.
    #[arg(short, long, required = false)]
    config_path: Option<PathBuf>,
    /// Command to run.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tags extracted from file paths.
    Extract(extract::Args),
    /// Rename files based on the tags extracted from their paths.
    Rename(rename::Args),
    /// Export the tags extracted from file paths as text.
    Export(export::Args),
    /// Import tags from a text, e.g. a track list.
    Import(import::Args),
    /// Parse credits.
    Credits(credits::Args),
    /// Print the effective configuration.
    Config(config::Args),
}

impl Args {
    /// Get the desired log level, depending on the verbose flag passed on the command line.
    fn log_level_filter(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// Get the current configuration.
    fn config(&self) -> crate::Result<Config> {
        match &self.config_path {
            Some(path) => Config::load_from_path(path).map(|config| config.with_defaults()),
            None => Config::load_user_config(),
        }
    }
}

/// Collect the files below the given paths, in sorted order.
///
/// Paths that are files are returned as they are.
fn collect_files(paths: &[PathBuf]) -> crate::Result<Vec<PathBuf>> {
    let mut files = vec![];
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        for item in walk_dir(path.clone()) {
            let (_dir, _subdirs, dir_files) = item?;
            files.extend(dir_files);
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Convert a path to a string slice, as needed for pattern matching.
fn path_to_str(path: &Path) -> crate::Result<&str> {
    path.to_str()
        .ok_or_else(|| crate::Error::NonUnicodePath(path.to_path_buf()))
}

/// Extract fields from a file path with the filename pattern from the cache.
///
/// Returns `None` (and logs a warning) if nothing could be extracted.
fn extract_from_path(cache: &PatternCache, format: &str, path: &Path) -> Option<FieldCollection> {
    let input = match path_to_str(path) {
        Ok(input) => input,
        Err(err) => {
            log::warn!("Skipping file: {err}");
            return None;
        }
    };
    let extraction = cache.get(format, PatternKind::Filename).extract(input);
    if !extraction.matched() {
        log::warn!("No tags found in {}", path.display());
        return None;
    }
    log::debug!("{}: {:?}", path.display(), extraction.source);
    Some(extraction.fields)
}

/// Print fields, one per line.
fn print_fields(fields: &FieldCollection, indent: &str) {
    for (kind, value) in fields {
        println!("{indent}{kind}: {value}");
    }
}

/// Main entry point.
///
/// # Errors
///
/// Can returns errors if the command line arguments are incorrect or the executed programs lead to
/// an error.
pub fn main() -> crate::Result<()> {
    let args = Args::parse();

    if let Err(err) = TermLogger::init(
        args.log_level_filter(),
        ConfigBuilder::new().build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logger: {err}");
    }

    let config = args.config()?;

    match args.command {
        Command::Extract(cmd_args) => extract::run(&config, cmd_args),
        Command::Rename(cmd_args) => rename::run(&config, cmd_args),
        Command::Export(cmd_args) => export::run(&config, cmd_args),
        Command::Import(cmd_args) => import::run(&config, cmd_args),
        Command::Credits(cmd_args) => credits::run(&config, cmd_args),
        Command::Config(cmd_args) => config::run(&config, cmd_args),
    }
}
