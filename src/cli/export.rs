// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Module for the `export` CLI subcommand.

use super::{collect_files, extract_from_path, path_to_str};
use crate::export::TextExporter;
use crate::field::FieldKind;
use crate::pattern::{Formatter, PatternCache};
use crate::Config;
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments for the `export` CLI command.
#[derive(Parser, Debug)]
pub struct Args {
    /// Name of the export format.
    #[arg(short, long)]
    format: String,
    /// Format to extract tags from the paths (defaults to the configured format).
    #[arg(long)]
    from: Option<String>,
    /// Write the text to this file instead of printing it.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Files or directories.
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

/// Run the `export` command.
///
/// # Errors
///
/// Returns an error if the export format is unknown or if the files cannot be listed or the
/// output cannot be written.
pub fn run(config: &Config, args: Args) -> crate::Result<()> {
    let export_format = config
        .export
        .format(&args.format)
        .ok_or_else(|| crate::Error::UnknownFormat(args.format.clone()))?;
    let from_format = args
        .from
        .as_deref()
        .unwrap_or_else(|| config.from_filename_format());
    let cache = PatternCache::new();

    let mut tracks = vec![];
    for path in collect_files(&args.paths)? {
        let Some(mut fields) = extract_from_path(&cache, from_format, &path) else {
            continue;
        };
        fields.set(FieldKind::FilePath, path_to_str(&path)?);
        if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
            fields.set(FieldKind::File, file_name);
        }
        tracks.push(fields);
    }

    let exporter = TextExporter::new(export_format).with_formatter(Formatter::from_config(config));
    match args.output {
        Some(path) => exporter.write_to_file(&tracks, path)?,
        None => print!("{}", exporter.render(&tracks)),
    }
    Ok(())
}
