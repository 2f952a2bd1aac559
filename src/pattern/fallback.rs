// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Built-in path layouts that are tried when a format string does not match.
//!
//! Directory names often encode artist and album even if the file name alone does not follow any
//! format. The layouts are matched against the full path, in a fixed order.

use crate::field::{FieldCollection, FieldKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// How a capture group of a layout is stored.
#[derive(Debug, Clone, Copy)]
enum LayoutField {
    /// Album, with a leading `artist - ` removed.
    AlbumWithoutArtist,
    /// Text stored verbatim.
    Text(FieldKind),
    /// Number stored without leading zeros.
    Number(FieldKind),
}

/// A built-in path layout.
#[derive(Debug)]
struct FallbackLayout {
    /// Human-readable description of the layout.
    name: &'static str,
    /// Regex matching the layout.
    regex: Regex,
    /// Field for each capture group, starting at group 1.
    fields: &'static [LayoutField],
}

impl FallbackLayout {
    /// Create a layout from a constant expression.
    fn new(name: &'static str, expression: &str, fields: &'static [LayoutField]) -> Self {
        FallbackLayout {
            name,
            regex: Regex::new(expression).expect("fallback layout regexes are valid"),
            fields,
        }
    }

    /// Match the layout against a path.
    fn extract(&self, path: &str) -> Option<FieldCollection> {
        let captures = self.regex.captures(path)?;
        let mut fields = FieldCollection::new();
        for (index, field) in self.fields.iter().enumerate() {
            let value = captures.get(index + 1).map_or("", |m| m.as_str());
            match field {
                LayoutField::AlbumWithoutArtist => {
                    fields.set(FieldKind::Album, remove_artist(value));
                }
                LayoutField::Text(kind) => fields.set(*kind, value),
                LayoutField::Number(kind) => {
                    if let Ok(number) = value.parse::<u32>() {
                        fields.set(*kind, number.to_string());
                    }
                }
            }
        }
        Some(fields)
    }
}

/// Fallback layouts, in the order they are tried.
static LAYOUTS: Lazy<[FallbackLayout; 7]> = Lazy::new(|| {
    use LayoutField::{AlbumWithoutArtist, Number, Text};
    [
        FallbackLayout::new(
            "album/track - artist - song",
            r"([^/]+)/([0-9]{1,3})[-_. ]+([^-_./ ][^/]+)[_ ]-[_ ]([^-_./ ][^/]+)\..{2,4}$",
            &[
                AlbumWithoutArtist,
                Number(FieldKind::Track),
                Text(FieldKind::Artist),
                Text(FieldKind::Title),
            ],
        ),
        FallbackLayout::new(
            "artist - album (year)/track song",
            r"([^/]+)[_ ]-[_ ]([^/]+)[_ ]\(([0-9]{4})\)/([0-9]{1,3})[-_. ]+([^-_./ ][^/]+)\..{2,4}$",
            &[
                Text(FieldKind::Artist),
                Text(FieldKind::Album),
                Number(FieldKind::Date),
                Number(FieldKind::Track),
                Text(FieldKind::Title),
            ],
        ),
        FallbackLayout::new(
            "artist - album/track song",
            r"([^/]+)[_ ]-[_ ]([^/]+)/([0-9]{1,3})[-_. ]+([^-_./ ][^/]+)\..{2,4}$",
            &[
                Text(FieldKind::Artist),
                Text(FieldKind::Album),
                Number(FieldKind::Track),
                Text(FieldKind::Title),
            ],
        ),
        FallbackLayout::new(
            "/artist - album - track - song",
            r"/([^/]+[^-_/ ])[_ ]-[_ ]([^-_/ ][^/]+[^-_/ ])[-_. ]+([0-9]{1,3})[-_. ]+([^-_./ ][^/]+)\..{2,4}$",
            &[
                Text(FieldKind::Artist),
                Text(FieldKind::Album),
                Number(FieldKind::Track),
                Text(FieldKind::Title),
            ],
        ),
        FallbackLayout::new(
            "album/artist - track - song",
            r"([^/]+)/([^/]+[^-_./ ])[-_. ]+([0-9]{1,3})[-_. ]+([^-_./ ][^/]+)\..{2,4}$",
            &[
                AlbumWithoutArtist,
                Text(FieldKind::Artist),
                Number(FieldKind::Track),
                Text(FieldKind::Title),
            ],
        ),
        FallbackLayout::new(
            "artist/album/track song",
            r"([^/]+)/([^/]+)/([0-9]{1,3})[-_. ]+([^-_./ ][^/]+)\..{2,4}$",
            &[
                Text(FieldKind::Artist),
                Text(FieldKind::Album),
                Number(FieldKind::Track),
                Text(FieldKind::Title),
            ],
        ),
        FallbackLayout::new(
            "album/artist - song",
            r"([^/]+)/([^/]+[^-_/ ])[_ ]-[_ ]([^-_/ ][^/]+)\..{2,4}$",
            &[
                AlbumWithoutArtist,
                Text(FieldKind::Artist),
                Text(FieldKind::Title),
            ],
        ),
    ]
});

/// Remove a leading `artist - ` from an album captured from a directory name.
///
/// Everything up to and including the first `" - "` is removed.
fn remove_artist(album: &str) -> &str {
    album
        .split_once(" - ")
        .map_or(album, |(_artist, album)| album)
}

/// Try all layouts in order and return the name of the first matching one and its fields.
pub(super) fn extract(path: &str) -> Option<(&'static str, FieldCollection)> {
    LAYOUTS
        .iter()
        .find_map(|layout| layout.extract(path).map(|fields| (layout.name, fields)))
}
