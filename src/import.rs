// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Importing tags from text (e.g. track lists copied from a web page).
//!
//! Import formats are regular expressions in which a field code like `%{title}` (or a legacy
//! code like `%s`) marks the following capture group as the value of that field:
//!
//! ```text
//! \s*%{track}(\d+)[\.\s]+%{title}(\S[^\r\n]*\S)\s*
//! ```

use crate::config::{ImportFormat, TagExtraction};
use crate::field::{legacy_code_name, FieldCollection, FieldKind};
use crate::pattern::{strip_leading_zeros, Formatter};
use crate::util::parse_duration;
use regex::{Captures, Regex};

/// Parses text with an import format.
#[derive(Debug, Clone)]
pub struct ImportParser {
    /// Import format as written by the user.
    format: String,
    /// Regular expression with the field codes removed.
    regex: Regex,
    /// Capture group index and field for every field code.
    groups: Vec<(usize, FieldKind)>,
}

/// Returns `true` if the group opened by `(` is a capturing group.
///
/// `rest` is the text following the opening parenthesis.
fn is_capturing_group(rest: &[char]) -> bool {
    match rest {
        ['?', 'P', '<', ..] => true,
        ['?', '<', next, ..] => *next != '=' && *next != '!',
        ['?', ..] => false,
        _ => true,
    }
}

/// Parse a field code following a `%` sign.
///
/// Returns the field and the number of characters of the code after the `%`.
fn parse_field_code(rest: &[char]) -> Option<(FieldKind, usize)> {
    match *rest.first()? {
        '{' => {
            let end = rest.iter().position(|&c| c == '}')?;
            let name = rest[1..end].iter().collect::<String>();
            (!name.trim().is_empty()).then(|| (FieldKind::from_code(&name), end + 1))
        }
        letter => legacy_code_name(letter).map(|name| (FieldKind::from_code(name), 1)),
    }
}

/// Remove the field codes from an import format.
///
/// Returns the regular expression and the capture group indices of the field codes.
fn translate_format(format: &str) -> (String, Vec<(usize, FieldKind)>) {
    let chars: Vec<char> = format.chars().collect();
    let mut expression = String::with_capacity(format.len());
    let mut groups = vec![];
    let mut pending = None;
    let mut group_count = 0;
    let mut in_class = false;

    let mut index = 0;
    while index < chars.len() {
        let c = chars[index];
        match c {
            '\\' => {
                expression.push(c);
                if let Some(&escaped) = chars.get(index + 1) {
                    expression.push(escaped);
                    index += 1;
                }
            }
            '[' if !in_class => {
                in_class = true;
                expression.push(c);
                if chars.get(index + 1) == Some(&'^') {
                    expression.push('^');
                    index += 1;
                }
                // A `]` directly after the opening bracket is a literal.
                if chars.get(index + 1) == Some(&']') {
                    expression.push(']');
                    index += 1;
                }
            }
            ']' if in_class => {
                in_class = false;
                expression.push(c);
            }
            '(' if !in_class => {
                expression.push(c);
                if is_capturing_group(&chars[index + 1..]) {
                    group_count += 1;
                    if let Some(kind) = pending.take() {
                        groups.push((group_count, kind));
                    }
                }
            }
            '%' if !in_class => match parse_field_code(&chars[index + 1..]) {
                Some((kind, length)) => {
                    pending = Some(kind);
                    index += length;
                }
                None => expression.push(c),
            },
            _ => expression.push(c),
        }
        index += 1;
    }

    (expression, groups)
}

impl ImportParser {
    /// Create a parser for the import format.
    ///
    /// # Errors
    ///
    /// Returns an error if the format is not a valid regular expression.
    pub fn new(format: &str) -> crate::Result<Self> {
        let (expression, groups) = translate_format(format);
        log::debug!("Import format {format:?} translated to regex {expression:?}");
        let regex = Regex::new(&expression)?;
        Ok(ImportParser {
            format: format.to_owned(),
            regex,
            groups,
        })
    }

    /// The import format this parser was created from.
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Fields referenced by the format, in order of their capture groups.
    pub fn field_kinds(&self) -> impl Iterator<Item = FieldKind> + '_ {
        self.groups.iter().map(|(_, kind)| *kind)
    }

    /// Collect the field values of a match.
    ///
    /// Track numbers lose leading zeros, and durations are additionally stored in seconds.
    fn fields_from_captures(&self, captures: &Captures<'_>) -> FieldCollection {
        let mut fields = FieldCollection::new();
        for (index, kind) in &self.groups {
            let Some(value) = captures.get(*index).map(|m| m.as_str()) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            match kind {
                FieldKind::Track => fields.set(*kind, strip_leading_zeros(value.trim())),
                FieldKind::Duration => {
                    fields.set(*kind, value);
                    if let Some(duration) = parse_duration(value) {
                        fields.set(FieldKind::Seconds, duration.num_seconds().to_string());
                    }
                }
                _ => fields.set(*kind, value),
            }
        }
        fields
    }

    /// Parse the first match in the text, e.g. for album-wide fields.
    #[must_use]
    pub fn parse_first(&self, text: &str) -> Option<FieldCollection> {
        self.regex
            .captures(text)
            .map(|captures| self.fields_from_captures(&captures))
    }

    /// Parse all non-overlapping matches in the text, e.g. one per track.
    ///
    /// Matches without any field value are skipped.
    #[must_use]
    pub fn parse_all(&self, text: &str) -> Vec<FieldCollection> {
        self.regex
            .captures_iter(text)
            .map(|captures| self.fields_from_captures(&captures))
            .filter(|fields| !fields.is_empty())
            .collect()
    }
}

/// Tags imported from a text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportedTags {
    /// Fields parsed by the header format.
    pub album: FieldCollection,
    /// Fields parsed by the track format, one collection per track.
    pub tracks: Vec<FieldCollection>,
}

impl ImportedTags {
    /// Track fields with the album fields filled in where the track has no own value.
    #[must_use]
    pub fn merged_tracks(&self) -> Vec<FieldCollection> {
        self.tracks
            .iter()
            .map(|track| {
                let mut fields = self.album.clone();
                fields.merge(track);
                fields
            })
            .collect()
    }
}

/// Import tags from a text using an import format.
///
/// # Errors
///
/// Returns an error if the header or track expression of the format is invalid.
pub fn import_text(format: &ImportFormat, text: &str) -> crate::Result<ImportedTags> {
    let album = if format.header.is_empty() {
        FieldCollection::new()
    } else {
        ImportParser::new(&format.header)?
            .parse_first(text)
            .unwrap_or_default()
    };
    let tracks = if format.track.is_empty() {
        vec![]
    } else {
        ImportParser::new(&format.track)?.parse_all(text)
    };
    log::debug!(
        "Imported {} album fields and {} tracks with format {:?}",
        album.len(),
        tracks.len(),
        format.name
    );
    Ok(ImportedTags { album, tracks })
}

/// Extract tags from other tags.
///
/// The `source` format of the extraction is rendered from the fields, and the `extraction`
/// import format is applied to the result. Captured values overwrite the fields. Returns `true`
/// if the extraction matched.
///
/// # Errors
///
/// Returns an error if the extraction expression is invalid.
pub fn extract_tags(extraction: &TagExtraction, fields: &mut FieldCollection) -> crate::Result<bool> {
    let parser = ImportParser::new(&extraction.extraction)?;
    let text = Formatter::new().format(&extraction.source, fields);
    match parser.parse_first(&text) {
        Some(extracted) => {
            log::debug!("Extraction {:?} matched {text:?}", extraction.name);
            fields.merge(&extracted);
            Ok(true)
        }
        None => Ok(false),
    }
}
