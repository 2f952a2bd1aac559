// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Generating text and filenames from field values.

use super::{tokenize, Modifier, Segment};
use crate::field::FieldCollection;
use crate::Config;

/// Characters that are forbidden in paths on Microsoft Windows (in addition to control characters).
#[cfg(target_os = "windows")]
const ILLEGAL_PATH_CHARS: &str = r#"\/:*?"<>|"#;

/// Characters that are forbidden in paths on Unices (in addition to control characters).
#[cfg(not(target_os = "windows"))]
const ILLEGAL_PATH_CHARS: &str = "/";

/// Strips control characters and escapes forbidden characters.
fn escape_path_chars(data: &str) -> String {
    data.chars()
        .filter(|c| !c.is_control())
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .map(|c| {
            if ILLEGAL_PATH_CHARS.contains(c) {
                '_'
            } else {
                c
            }
        })
        .collect::<String>()
}

/// Replaces placeholders in format strings with field values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Formatter {
    /// Minimum number of digits for the `%{track}` code (zero padded).
    track_number_digits: usize,
    /// Replace characters that are not allowed in filenames inside substituted values.
    escape_path: bool,
}

impl Formatter {
    /// Create a formatter that inserts all values as they are.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter with the track number width from the configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new().with_track_number_digits(config.filename.track_number_digits.unwrap_or(0))
    }

    /// Pad track numbers inserted by `%{track}` (or `%t`) with zeros to this width.
    ///
    /// `%{track number}` and `%{tracknumber}` are never padded.
    #[must_use]
    pub fn with_track_number_digits(mut self, digits: usize) -> Self {
        self.track_number_digits = digits;
        self
    }

    /// Replace characters that are illegal in file names inside the inserted values.
    ///
    /// Literal text of the format string is never changed, so that `/` can still be used to
    /// create directories.
    #[must_use]
    pub fn with_path_escaping(mut self, escape_path: bool) -> Self {
        self.escape_path = escape_path;
        self
    }

    /// Format the string using the field values. Absent fields are rendered as empty strings,
    /// and so are the prefix and suffix of a placeholder without a value.
    #[must_use]
    pub fn format(&self, format: &str, fields: &FieldCollection) -> String {
        let mut output = String::with_capacity(format.len());
        for segment in tokenize(format) {
            match segment {
                Segment::Literal(text) => output.push_str(&text),
                Segment::Placeholder {
                    name,
                    kind,
                    modifier,
                    prefix,
                    suffix,
                } => {
                    let mut value = fields.get(kind).unwrap_or_default().to_owned();
                    if value.is_empty() {
                        continue;
                    }
                    if self.track_number_digits > 0
                        && name.trim().eq_ignore_ascii_case("track")
                        && value.bytes().all(|byte| byte.is_ascii_digit())
                    {
                        value = format!("{value:0>width$}", width = self.track_number_digits);
                    }
                    if self.escape_path {
                        value = escape_path_chars(&value);
                    }
                    output.push_str(&prefix);
                    match modifier {
                        Modifier::Plain => output.push_str(&value),
                        Modifier::Html => output.push_str(&handlebars::html_escape(&value)),
                        Modifier::Url => output.push_str(&urlencoding::encode(&value)),
                    }
                    output.push_str(&suffix);
                }
            }
        }
        output
    }
}

/// Generate text from field values, inserting them unchanged (apart from `%h{}` and `%u{}`
/// escaping).
#[must_use]
pub fn format(format: &str, fields: &FieldCollection) -> String {
    Formatter::new().format(format, fields)
}

/// Generate a file name (which may contain directories) from field values.
#[must_use]
pub fn format_filename(format: &str, fields: &FieldCollection) -> String {
    Formatter::new()
        .with_path_escaping(true)
        .format(format, fields)
}
