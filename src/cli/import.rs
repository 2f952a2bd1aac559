// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Module for the `import` CLI subcommand.

use super::print_fields;
use crate::import::import_text;
use crate::Config;
use clap::Parser;
use std::io;
use std::path::PathBuf;

/// Command line arguments for the `import` CLI command.
#[derive(Parser, Debug)]
pub struct Args {
    /// Name of the import format.
    #[arg(short, long)]
    format: String,
    /// Text file to import (reads from standard input if omitted).
    path: Option<PathBuf>,
}

/// Read a text file, or standard input if no path is given.
pub(super) fn read_input(path: Option<&PathBuf>) -> crate::Result<String> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => io::read_to_string(io::stdin())?,
    };
    Ok(text)
}

/// Run the `import` command.
///
/// # Errors
///
/// Returns an error if the import format is unknown or invalid, or if the text cannot be read.
pub fn run(config: &Config, args: Args) -> crate::Result<()> {
    let format = config
        .import
        .format(&args.format)
        .ok_or_else(|| crate::Error::UnknownFormat(args.format.clone()))?;
    let text = read_input(args.path.as_ref())?;
    let imported = import_text(format, &text)?;

    if !imported.album.is_empty() {
        println!("Album");
        print_fields(&imported.album, "  ");
    }
    for (index, fields) in imported.merged_tracks().iter().enumerate() {
        println!("Track {}", index + 1);
        print_fields(fields, "  ");
    }
    Ok(())
}
