// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Format strings with `%{name}` placeholders, used in both directions: to extract field values
//! from a filename (or any text) and to generate text from field values.
//!
//! Placeholders are written as `%{name}`, `%h{name}` (HTML-escaped when formatting) or
//! `%u{name}` (URL-escaped when formatting). The legacy codes `%s`, `%l`, `%a`, `%c`, `%y`, `%t`
//! and `%g` are accepted as well. An unterminated `%{` is treated as literal text.
//!
//! A placeholder can carry a quoted prefix and suffix, e.g. `%{"["year"] "}`. They are only
//! emitted if the field has a non-empty value, and are optional when matching.

mod fallback;
mod format;

pub use format::{format, format_filename, Formatter};

use crate::field::{legacy_code_name, FieldCollection, FieldKind};
use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

/// Regex fragment for numeric placeholders.
const NUMERIC_CAPTURE: &str = "([0-9]{1,4})";

/// Regex fragment for free-text placeholders.
///
/// Does not match across `/`, and neither starts nor ends with a separator, dash, underscore or
/// space, so that `%{artist} - %{title}` does not let the artist swallow the dash.
const FREE_TEXT_CAPTURE: &str = "([^-_./ ](?:[^/]*[^-_/ ])?)";

/// Regex suffix for the file extension that follows the pattern in filename mode.
const EXTENSION_SUFFIX: &str = r"\..{2,4}$";

/// How a placeholder value is escaped when formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// Insert the value as is (`%{name}`).
    Plain,
    /// Escape HTML special characters (`%h{name}`).
    Html,
    /// Percent-encode the value for use in URLs (`%u{name}`).
    Url,
}

/// A part of a format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text.
    Literal(String),
    /// A placeholder for a field value.
    Placeholder {
        /// Placeholder name as written (legacy codes replaced by their name).
        name: String,
        /// Field kind denoted by the name.
        kind: FieldKind,
        /// Escaping applied when formatting.
        modifier: Modifier,
        /// Text emitted before the value if the value is not empty.
        prefix: String,
        /// Text emitted after the value if the value is not empty.
        suffix: String,
    },
}

/// Braced placeholder split into its parts.
struct BracedPlaceholder<'a> {
    /// Conditional prefix.
    prefix: &'a str,
    /// Placeholder name.
    name: &'a str,
    /// Conditional suffix.
    suffix: &'a str,
    /// Format string after the closing brace.
    remainder: &'a str,
}

/// Parse `name}` or `"prefix"name"suffix"}` (the suffix is optional).
///
/// Returns `None` if the closing brace is missing, a quote is unbalanced or the name is empty.
fn parse_braced(braced: &str) -> Option<BracedPlaceholder<'_>> {
    let (prefix, rest) = match braced.strip_prefix('"') {
        Some(quoted) => quoted.split_once('"')?,
        None => ("", braced),
    };
    let (name, rest) = rest.split_at(rest.find(['"', '}'])?);
    let (suffix, rest) = match rest.strip_prefix('"') {
        Some(quoted) => quoted.split_once('"')?,
        None => ("", rest),
    };
    let remainder = rest.strip_prefix('}')?;
    if name.is_empty() {
        return None;
    }
    Some(BracedPlaceholder {
        prefix,
        name,
        suffix,
        remainder,
    })
}

/// Split a format string into literal and placeholder segments.
///
/// Adjacent literal characters are merged into a single segment.
#[must_use]
pub fn tokenize(format: &str) -> Vec<Segment> {
    let mut segments = vec![];
    let mut literal = String::new();
    let mut rest = format;

    while let Some(percent_pos) = rest.find('%') {
        literal.push_str(&rest[..percent_pos]);
        let after_percent = &rest[percent_pos + 1..];

        let (modifier, braced) = if let Some(braced) = after_percent.strip_prefix('{') {
            (Modifier::Plain, Some(braced))
        } else if let Some(braced) = after_percent.strip_prefix("h{") {
            (Modifier::Html, Some(braced))
        } else if let Some(braced) = after_percent.strip_prefix("u{") {
            (Modifier::Url, Some(braced))
        } else {
            (Modifier::Plain, None)
        };

        let placeholder = match braced {
            Some(braced) => parse_braced(braced),
            None => after_percent.chars().next().and_then(|code| {
                legacy_code_name(code).map(|name| BracedPlaceholder {
                    prefix: "",
                    name,
                    suffix: "",
                    remainder: &after_percent[1..],
                })
            }),
        };

        match placeholder {
            Some(placeholder) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder {
                    name: placeholder.name.to_owned(),
                    kind: FieldKind::from_code(placeholder.name),
                    modifier,
                    prefix: placeholder.prefix.to_owned(),
                    suffix: placeholder.suffix.to_owned(),
                });
                rest = placeholder.remainder;
            }
            None => {
                // Not a placeholder (this includes an unterminated `%{`), keep it as text.
                literal.push('%');
                rest = after_percent;
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// What kind of input a [`Pattern`] is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// A file path whose last component ends with an extension of 2 to 4 characters. Fallback
    /// layouts are tried if the pattern does not match.
    Filename,
    /// Arbitrary text that must be matched up to its end.
    Text,
}

/// Where the fields of an [`Extraction`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    /// The compiled format string matched.
    Pattern,
    /// The format string did not match, but the named built-in layout did.
    Fallback(&'static str),
    /// Nothing matched.
    NoMatch,
}

/// Result of [`Pattern::extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Extracted field values. Empty if nothing matched.
    pub fields: FieldCollection,
    /// What matched.
    pub source: MatchSource,
}

impl Extraction {
    /// Returns `true` if the pattern or one of the fallback layouts matched.
    #[must_use]
    pub fn matched(&self) -> bool {
        self.source != MatchSource::NoMatch
    }
}

/// A compiled format string.
///
/// Patterns are immutable and can be shared between threads to process many files.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// The format string this pattern was compiled from.
    source: String,
    /// Input kind.
    kind: PatternKind,
    /// Tokenized format string.
    segments: Vec<Segment>,
    /// Compiled regular expression (`None` if the regex engine rejected it).
    regex: Option<Regex>,
    /// Field kind for each capture group, starting at group 1.
    groups: Vec<FieldKind>,
}

impl Pattern {
    /// Compile a format string for matching file paths.
    #[must_use]
    pub fn compile(format: &str) -> Self {
        Self::with_kind(format, PatternKind::Filename)
    }

    /// Compile a format string for matching whole texts.
    #[must_use]
    pub fn compile_text(format: &str) -> Self {
        Self::with_kind(format, PatternKind::Text)
    }

    /// Compile a format string for the given input kind.
    #[must_use]
    pub fn with_kind(format: &str, kind: PatternKind) -> Self {
        let segments = tokenize(format);
        let mut groups = vec![];
        let mut expression = String::new();
        if kind == PatternKind::Text {
            expression.push('^');
        }
        for segment in &segments {
            match segment {
                Segment::Literal(text) => expression.push_str(&regex::escape(text)),
                Segment::Placeholder {
                    kind,
                    prefix,
                    suffix,
                    ..
                } => {
                    let capture = if kind.is_numeric() {
                        NUMERIC_CAPTURE
                    } else {
                        FREE_TEXT_CAPTURE
                    };
                    if prefix.is_empty() && suffix.is_empty() {
                        expression.push_str(capture);
                    } else {
                        expression.push_str(&format!(
                            "(?:{}{capture}{})?",
                            regex::escape(prefix),
                            regex::escape(suffix)
                        ));
                    }
                    groups.push(*kind);
                }
            }
        }
        expression.push_str(match kind {
            PatternKind::Filename => EXTENSION_SUFFIX,
            PatternKind::Text => "$",
        });

        log::debug!("Compiled format {format:?} to regex {expression:?}");
        let regex = Regex::new(&expression)
            .inspect_err(|err| log::warn!("Failed to compile format {format:?}: {err}"))
            .ok();

        Pattern {
            source: format.to_owned(),
            kind,
            segments,
            regex,
            groups,
        }
    }

    /// The format string this pattern was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The input kind this pattern matches.
    #[must_use]
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// The tokenized format string.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Field kinds referenced by the pattern, in order of appearance.
    pub fn field_kinds(&self) -> impl Iterator<Item = FieldKind> + '_ {
        self.groups.iter().copied()
    }

    /// Extract field values from the input.
    ///
    /// Only non-empty captures are stored. Numeric captures are stored without leading zeros.
    /// In filename mode, underscores in the input are read as spaces if the format contains no
    /// underscore, and the built-in fallback layouts are tried against the full path if the
    /// pattern itself does not match.
    #[must_use]
    pub fn extract(&self, input: &str) -> Extraction {
        // In file names, underscores count as spaces unless the format explicitly uses them.
        let normalized = if self.kind == PatternKind::Text || self.source.contains('_') {
            None
        } else {
            Some(input.replace('_', " "))
        };
        let haystack = normalized.as_deref().unwrap_or(input);

        if let Some(captures) = self.regex.as_ref().and_then(|re| re.captures(haystack)) {
            let mut fields = FieldCollection::new();
            for (index, kind) in self.groups.iter().enumerate() {
                let Some(value) = captures.get(index + 1).map(|m| m.as_str()) else {
                    continue;
                };
                if value.is_empty() || *kind == FieldKind::Unknown {
                    continue;
                }
                if kind.is_numeric() {
                    fields.set(*kind, strip_leading_zeros(value));
                } else {
                    fields.set(*kind, value);
                }
            }
            return Extraction {
                fields,
                source: MatchSource::Pattern,
            };
        }

        if self.kind == PatternKind::Filename {
            if let Some((name, fields)) = fallback::extract(input) {
                log::debug!("Format {:?} did not match, used layout {name}", self.source);
                return Extraction {
                    fields,
                    source: MatchSource::Fallback(name),
                };
            }
        }

        Extraction {
            fields: FieldCollection::new(),
            source: MatchSource::NoMatch,
        }
    }

    /// Generate text from field values using the format string of this pattern.
    #[must_use]
    pub fn format(&self, fields: &FieldCollection) -> String {
        format(&self.source, fields)
    }
}

/// Remove leading zeros from a string of digits, keeping at least one digit.
pub(crate) fn strip_leading_zeros(digits: &str) -> &str {
    let stripped = digits.trim_start_matches('0');
    if stripped.is_empty() && !digits.is_empty() {
        &digits[digits.len() - 1..]
    } else {
        stripped
    }
}

/// Cache of compiled patterns, keyed by format string and input kind.
///
/// The cache can be shared between worker threads that process files of a batch operation.
#[derive(Debug, Default)]
pub struct PatternCache {
    /// Compiled patterns.
    patterns: RwLock<HashMap<(PatternKind, String), Arc<Pattern>>>,
}

impl PatternCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the compiled pattern for the format string, compiling it on first use.
    pub fn get(&self, format: &str, kind: PatternKind) -> Arc<Pattern> {
        let key = (kind, format.to_owned());
        if let Some(pattern) = self.patterns.read().get(&key) {
            return Arc::clone(pattern);
        }

        let mut patterns = self.patterns.write();
        Arc::clone(
            patterns
                .entry(key)
                .or_insert_with(|| Arc::new(Pattern::with_kind(format, kind))),
        )
    }

    /// Number of cached patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.read().len()
    }

    /// Returns `true` if no pattern has been compiled yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.read().is_empty()
    }
}
