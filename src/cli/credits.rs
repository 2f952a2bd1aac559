// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Module for the `credits` CLI subcommand.

use super::import::read_input;
use super::print_fields;
use crate::credits::parse_credits;
use crate::Config;
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments for the `credits` CLI command.
#[derive(Parser, Debug)]
pub struct Args {
    /// Text file with credits lines (reads from standard input if omitted).
    path: Option<PathBuf>,
}

/// Run the `credits` command.
///
/// # Errors
///
/// Returns an error if the credits cannot be read.
pub fn run(_config: &Config, args: Args) -> crate::Result<()> {
    let text = read_input(args.path.as_ref())?;
    let fields = parse_credits(&text);
    if fields.is_empty() {
        log::warn!("No credits found");
    }
    print_fields(&fields, "");
    Ok(())
}
