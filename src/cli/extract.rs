// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Module for the `extract` CLI subcommand.

use super::{collect_files, extract_from_path, print_fields};
use crate::import::extract_tags;
use crate::pattern::PatternCache;
use crate::Config;
use clap::Parser;
use rayon::prelude::*;
use std::path::PathBuf;

/// Command line arguments for the `extract` CLI command.
#[derive(Parser, Debug)]
pub struct Args {
    /// Format to extract tags with (defaults to the configured format).
    #[arg(short, long)]
    format: Option<String>,
    /// Name of a tag extraction to apply afterwards.
    #[arg(short = 'x', long)]
    extraction: Option<String>,
    /// Print the results as JSON.
    #[arg(long)]
    json: bool,
    /// Files or directories.
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

/// Run the `extract` command.
///
/// # Errors
///
/// Returns an error if the files cannot be listed or if the tag extraction is unknown or invalid.
pub fn run(config: &Config, args: Args) -> crate::Result<()> {
    let format = args
        .format
        .as_deref()
        .unwrap_or_else(|| config.from_filename_format());
    let extraction = args
        .extraction
        .as_deref()
        .map(|name| {
            config
                .import
                .tag_extraction(name)
                .ok_or_else(|| crate::Error::UnknownFormat(name.to_owned()))
        })
        .transpose()?;

    let files = collect_files(&args.paths)?;
    let cache = PatternCache::new();
    let mut results = files
        .par_iter()
        .filter_map(|path| {
            extract_from_path(&cache, format, path).map(|fields| (path.clone(), fields))
        })
        .collect::<Vec<_>>();

    if let Some(extraction) = extraction {
        for (_path, fields) in &mut results {
            let _matched = extract_tags(extraction, fields)?;
        }
    }

    if args.json {
        let results = results
            .iter()
            .map(|(path, fields)| (path.display().to_string(), fields))
            .collect::<std::collections::BTreeMap<_, _>>();
        match serde_json::to_string_pretty(&results) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("Failed to serialize results: {err}"),
        }
        return Ok(());
    }

    for (path, fields) in &results {
        println!("{}", path.display());
        print_fields(fields, "  ");
    }
    log::info!("Extracted tags from {} of {} files", results.len(), files.len());

    Ok(())
}
