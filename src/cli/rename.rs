// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Module for the `rename` CLI subcommand.

use super::{collect_files, extract_from_path};
use crate::field::FieldCollection;
use crate::pattern::{Formatter, PatternCache};
use crate::util::move_file;
use crate::Config;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Command line arguments for the `rename` CLI command.
#[derive(Parser, Debug)]
pub struct Args {
    /// Format to extract tags from the current paths (defaults to the configured format).
    #[arg(long)]
    from: Option<String>,
    /// Format for the new file names (defaults to the configured format).
    #[arg(long)]
    to: Option<String>,
    /// Rename the files instead of only printing the new names.
    #[arg(long)]
    apply: bool,
    /// Files or directories.
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

/// Compute the new path for a file from the extracted fields.
///
/// The generated name is relative to the directory of the file and keeps its extension.
fn destination_path(
    formatter: &Formatter,
    format: &str,
    path: &Path,
    fields: &FieldCollection,
) -> Option<PathBuf> {
    let name = formatter.format(format, fields);
    if name.trim().is_empty() {
        return None;
    }
    let mut file_name = name;
    if let Some(extension) = path.extension().and_then(|extension| extension.to_str()) {
        file_name.push('.');
        file_name.push_str(extension);
    }
    Some(path.parent().unwrap_or(Path::new("")).join(file_name))
}

/// Run the `rename` command.
///
/// # Errors
///
/// Returns an error if the files cannot be listed.
pub fn run(config: &Config, args: Args) -> crate::Result<()> {
    let from_format = args
        .from
        .as_deref()
        .unwrap_or_else(|| config.from_filename_format());
    let to_format = args
        .to
        .as_deref()
        .unwrap_or_else(|| config.to_filename_format());
    let formatter = Formatter::from_config(config).with_path_escaping(true);
    let cache = PatternCache::new();

    let mut renamed = 0;
    for path in collect_files(&args.paths)? {
        let Some(fields) = extract_from_path(&cache, from_format, &path) else {
            continue;
        };
        let Some(destination) = destination_path(&formatter, to_format, &path, &fields) else {
            log::warn!("Empty file name generated for {}", path.display());
            continue;
        };
        if destination == path {
            continue;
        }

        println!("{} -> {}", path.display(), destination.display());
        if args.apply {
            match move_file(&path, &destination) {
                Ok(()) => renamed += 1,
                Err(err) => log::warn!("Failed to rename {}: {err}", path.display()),
            }
        }
    }

    if args.apply {
        log::info!("Renamed {renamed} files");
    } else {
        log::info!("Dry run, use --apply to rename the files");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;

    #[test]
    fn test_destination_path() {
        let mut fields = FieldCollection::new();
        fields.set(FieldKind::Track, "3");
        fields.set(FieldKind::Title, "Planet Caravan");
        let formatter = Formatter::new()
            .with_track_number_digits(2)
            .with_path_escaping(true);
        assert_eq!(
            destination_path(
                &formatter,
                "%{track} %{title}",
                Path::new("/music/Black Sabbath - Paranoid/3 planet caravan.mp3"),
                &fields
            ),
            Some(PathBuf::from(
                "/music/Black Sabbath - Paranoid/03 Planet Caravan.mp3"
            ))
        );
        assert_eq!(
            destination_path(&formatter, "%{album}", Path::new("a.mp3"), &fields),
            None
        );
    }
}
