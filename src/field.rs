// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Tag fields and collections of field values.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Separator between the items of multi-valued fields (e.g. the `(involvement, involvee)` pairs
/// of [`FieldKind::Performer`] and [`FieldKind::Arranger`]).
pub const VALUE_SEPARATOR: char = '|';

/// A field kind describes the kind of information in a generic, format-independent way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Track Title.
    Title,
    /// Track Artist Name(s).
    Artist,
    /// Title of the release.
    Album,
    /// Comment.
    Comment,
    /// Release date or year.
    Date,
    /// Track number on the disc.
    Track,
    /// Total tracks on this disc.
    TrackTotal,
    /// Genre Name(s) of the track.
    Genre,
    /// Track length as `M:SS` or `H:MM:SS`.
    Duration,
    /// Track length in seconds.
    Seconds,
    /// Artist(s) primarily credited on the release.
    AlbumArtist,
    /// Composer Name(s).
    Composer,
    /// Conductor Name(s).
    Conductor,
    /// Involved people that are not performers (arranger, mixer, engineer, producer, ...).
    Arranger,
    /// Lyricist Name(s).
    Lyricist,
    /// Writer Name(s), used when it is unclear whether the writer is the composer or the lyricist.
    Author,
    /// Musicians credited with their instrument or voice.
    Performer,
    /// Release Record Label Name(s).
    Publisher,
    /// Catalog number assigned to the release by the label.
    CatalogNumber,
    /// Release Format (e.g.: CD).
    Media,
    /// Country in which the release was issued.
    ReleaseCountry,
    /// Description.
    Description,
    /// Used for information directly related to the contents title.
    Subtitle,
    /// Number of the disc in this release that contains this track.
    Disc,
    /// Beats per minute of the track.
    Bpm,
    /// Copyright message.
    Copyright,
    /// Encoded by (person or organization).
    EncodedBy,
    /// Content Group.
    Grouping,
    /// International Standard Recording Code.
    Isrc,
    /// Work lyric language.
    Language,
    /// Lyrics.
    Lyrics,
    /// Release Title of the original recording.
    OriginalAlbum,
    /// Track Artist of the original recording.
    OriginalArtist,
    /// Release date of the original recording.
    OriginalDate,
    /// Part of a set.
    Part,
    /// Remixer Name(s).
    Remixer,
    /// Official website.
    Website,
    /// File name (without directory).
    File,
    /// Absolute file path.
    FilePath,
    /// URL associated with the track.
    Url,
    /// Unknown or ignored field. Values for this kind are never stored.
    Unknown,
}

/// Canonical placeholder names, in the same order as the enum variants.
const CANONICAL_CODES: [(FieldKind, &str); 41] = [
    (FieldKind::Title, "title"),
    (FieldKind::Artist, "artist"),
    (FieldKind::Album, "album"),
    (FieldKind::Comment, "comment"),
    (FieldKind::Date, "date"),
    (FieldKind::Track, "track number"),
    (FieldKind::TrackTotal, "tracks"),
    (FieldKind::Genre, "genre"),
    (FieldKind::Duration, "duration"),
    (FieldKind::Seconds, "seconds"),
    (FieldKind::AlbumArtist, "album artist"),
    (FieldKind::Composer, "composer"),
    (FieldKind::Conductor, "conductor"),
    (FieldKind::Arranger, "arranger"),
    (FieldKind::Lyricist, "lyricist"),
    (FieldKind::Author, "author"),
    (FieldKind::Performer, "performer"),
    (FieldKind::Publisher, "publisher"),
    (FieldKind::CatalogNumber, "catalog number"),
    (FieldKind::Media, "media"),
    (FieldKind::ReleaseCountry, "release country"),
    (FieldKind::Description, "description"),
    (FieldKind::Subtitle, "subtitle"),
    (FieldKind::Disc, "disc number"),
    (FieldKind::Bpm, "bpm"),
    (FieldKind::Copyright, "copyright"),
    (FieldKind::EncodedBy, "encoded-by"),
    (FieldKind::Grouping, "grouping"),
    (FieldKind::Isrc, "isrc"),
    (FieldKind::Language, "language"),
    (FieldKind::Lyrics, "lyrics"),
    (FieldKind::OriginalAlbum, "original album"),
    (FieldKind::OriginalArtist, "original artist"),
    (FieldKind::OriginalDate, "original date"),
    (FieldKind::Part, "part"),
    (FieldKind::Remixer, "remixer"),
    (FieldKind::Website, "website"),
    (FieldKind::File, "file"),
    (FieldKind::FilePath, "filepath"),
    (FieldKind::Url, "url"),
    (FieldKind::Unknown, "ignore"),
];

/// Alternative spellings accepted for placeholder names.
const CODE_ALIASES: [(&str, FieldKind); 8] = [
    ("year", FieldKind::Date),
    ("track", FieldKind::Track),
    ("tracknumber", FieldKind::Track),
    ("discnumber", FieldKind::Disc),
    ("albumartist", FieldKind::AlbumArtist),
    ("catalognumber", FieldKind::CatalogNumber),
    ("releasecountry", FieldKind::ReleaseCountry),
    ("encodedby", FieldKind::EncodedBy),
];

/// Legacy single-letter codes and the placeholder names they stand for.
pub const LEGACY_CODES: [(char, &str); 7] = [
    ('s', "title"),
    ('l', "album"),
    ('a', "artist"),
    ('c', "comment"),
    ('y', "date"),
    ('t', "track"),
    ('g', "genre"),
];

impl FieldKind {
    /// Look up the field kind for a placeholder name (case-insensitive, aliases allowed).
    ///
    /// Names that do not denote any known field map to [`FieldKind::Unknown`].
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_lowercase();
        CANONICAL_CODES
            .iter()
            .find(|(_, name)| *name == code)
            .map(|(kind, _)| *kind)
            .or_else(|| {
                CODE_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == code)
                    .map(|(_, kind)| *kind)
            })
            .unwrap_or(FieldKind::Unknown)
    }

    /// The canonical placeholder name for this field kind.
    #[must_use]
    pub fn code(self) -> &'static str {
        CANONICAL_CODES
            .iter()
            .find(|(kind, _)| *kind == self)
            .map_or("ignore", |(_, name)| name)
    }

    /// Numeric fields are captured as 1 to 4 digits when matching a pattern.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FieldKind::Track | FieldKind::Date | FieldKind::Disc | FieldKind::Bpm
        )
    }

    /// Multi-valued fields hold a list of `(involvement, involvee)` pairs.
    #[must_use]
    pub fn is_involved_people(self) -> bool {
        matches!(self, FieldKind::Performer | FieldKind::Arranger)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Maps legacy single-letter codes (e.g. `s` in `%s`) to their placeholder name.
#[must_use]
pub fn legacy_code_name(code: char) -> Option<&'static str> {
    LEGACY_CODES
        .iter()
        .find(|(letter, _)| *letter == code)
        .map(|(_, name)| *name)
}

/// A set of field values, keyed by [`FieldKind`].
///
/// A field is either absent or has a value. An empty value is distinct from an absent one: it
/// means that the field exists but was cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCollection(BTreeMap<FieldKind, String>);

impl FieldCollection {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a field, if present.
    #[must_use]
    pub fn get(&self, kind: FieldKind) -> Option<&str> {
        self.0.get(&kind).map(String::as_str)
    }

    /// Set the value of a field, replacing any previous value.
    ///
    /// Values for [`FieldKind::Unknown`] are silently dropped.
    pub fn set(&mut self, kind: FieldKind, value: impl Into<String>) {
        if kind == FieldKind::Unknown {
            log::debug!("Dropping value for unknown field");
            return;
        }
        let _previous = self.0.insert(kind, value.into());
    }

    /// Remove a field and return its value.
    pub fn remove(&mut self, kind: FieldKind) -> Option<String> {
        self.0.remove(&kind)
    }

    /// Returns `true` if the field is present (even if its value is empty).
    #[must_use]
    pub fn contains(&self, kind: FieldKind) -> bool {
        self.0.contains_key(&kind)
    }

    /// Returns `true` if no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of present fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over all present fields in [`FieldKind`] order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldKind, &str)> {
        self.0.iter().map(|(kind, value)| (*kind, value.as_str()))
    }

    /// Copy all fields from `other` into this collection, overwriting present values.
    pub fn merge(&mut self, other: &FieldCollection) {
        for (kind, value) in other.iter() {
            self.set(kind, value);
        }
    }

    /// Append an `(involvement, involvee)` pair to a multi-valued field.
    ///
    /// The pairs are stored as `involvement|involvee|involvement|involvee...`.
    pub fn add_involved_person(&mut self, kind: FieldKind, involvement: &str, involvee: &str) {
        let mut value = self.get(kind).map(str::to_owned).unwrap_or_default();
        if !value.is_empty() {
            value.push(VALUE_SEPARATOR);
        }
        value.push_str(involvement);
        value.push(VALUE_SEPARATOR);
        value.push_str(involvee);
        self.set(kind, value);
    }

    /// Read back the `(involvement, involvee)` pairs of a multi-valued field.
    ///
    /// A trailing item without partner is returned with an empty involvee.
    #[must_use]
    pub fn involved_people(&self, kind: FieldKind) -> Vec<(&str, &str)> {
        let Some(value) = self.get(kind).filter(|value| !value.is_empty()) else {
            return vec![];
        };
        let items: Vec<&str> = value.split(VALUE_SEPARATOR).collect();
        items
            .chunks(2)
            .map(|pair| (pair[0], pair.get(1).copied().unwrap_or_default()))
            .collect()
    }
}

impl FromIterator<(FieldKind, String)> for FieldCollection {
    fn from_iter<I: IntoIterator<Item = (FieldKind, String)>>(iter: I) -> Self {
        let mut fields = FieldCollection::new();
        for (kind, value) in iter {
            fields.set(kind, value);
        }
        fields
    }
}

impl<'a> IntoIterator for &'a FieldCollection {
    type Item = (&'a FieldKind, &'a String);
    type IntoIter = btree_map::Iter<'a, FieldKind, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paste::paste;

    macro_rules! add_test_from_code {
        ($code:expr, $kind:expr, $fnsuffix:ident) => {
            paste! {
                #[test]
                fn [<test_from_code_ $fnsuffix>]() {
                    assert_eq!(FieldKind::from_code($code), $kind);
                }
            }
        };
    }

    add_test_from_code!("title", FieldKind::Title, title);
    add_test_from_code!("Title", FieldKind::Title, title_uppercase);
    add_test_from_code!("year", FieldKind::Date, year);
    add_test_from_code!("date", FieldKind::Date, date);
    add_test_from_code!("track", FieldKind::Track, track);
    add_test_from_code!("tracknumber", FieldKind::Track, tracknumber);
    add_test_from_code!("track number", FieldKind::Track, track_number);
    add_test_from_code!("discnumber", FieldKind::Disc, discnumber);
    add_test_from_code!("disc number", FieldKind::Disc, disc_number);
    add_test_from_code!("album artist", FieldKind::AlbumArtist, album_artist);
    add_test_from_code!("albumartist", FieldKind::AlbumArtist, albumartist);
    add_test_from_code!("encoded-by", FieldKind::EncodedBy, encoded_by);
    add_test_from_code!("ignore", FieldKind::Unknown, ignore);
    add_test_from_code!("frobnicate", FieldKind::Unknown, unknown);

    #[test]
    fn test_code_roundtrip() {
        for (kind, code) in CANONICAL_CODES {
            assert_eq!(kind.code(), code);
            assert_eq!(FieldKind::from_code(code), kind);
        }
    }

    #[test]
    fn test_numeric_fields() {
        assert!(FieldKind::Track.is_numeric());
        assert!(FieldKind::Date.is_numeric());
        assert!(FieldKind::Disc.is_numeric());
        assert!(FieldKind::Bpm.is_numeric());
        assert!(!FieldKind::Title.is_numeric());
        assert!(!FieldKind::TrackTotal.is_numeric());
    }

    #[test]
    fn test_legacy_code_name() {
        assert_eq!(legacy_code_name('s'), Some("title"));
        assert_eq!(legacy_code_name('t'), Some("track"));
        assert_eq!(legacy_code_name('x'), None);
    }

    #[test]
    fn test_empty_is_distinct_from_absent() {
        let mut fields = FieldCollection::new();
        assert!(!fields.contains(FieldKind::Comment));
        fields.set(FieldKind::Comment, "");
        assert!(fields.contains(FieldKind::Comment));
        assert_eq!(fields.get(FieldKind::Comment), Some(""));
    }

    #[test]
    fn test_unknown_is_never_stored() {
        let mut fields = FieldCollection::new();
        fields.set(FieldKind::Unknown, "value");
        assert!(fields.is_empty());
    }

    #[test]
    fn test_involved_people() {
        let mut fields = FieldCollection::new();
        fields.add_involved_person(FieldKind::Performer, "Guitar", "Jane Doe");
        fields.add_involved_person(FieldKind::Performer, "Drums", "John Smith");
        assert_eq!(
            fields.get(FieldKind::Performer),
            Some("Guitar|Jane Doe|Drums|John Smith")
        );
        assert_eq!(
            fields.involved_people(FieldKind::Performer),
            vec![("Guitar", "Jane Doe"), ("Drums", "John Smith")]
        );
        assert!(fields.involved_people(FieldKind::Arranger).is_empty());
    }

    #[test]
    fn test_merge_overwrites() {
        let mut fields = FieldCollection::new();
        fields.set(FieldKind::Title, "Old");
        fields.set(FieldKind::Artist, "Artist");
        let other: FieldCollection = [(FieldKind::Title, String::from("New"))]
            .into_iter()
            .collect();
        fields.merge(&other);
        assert_eq!(fields.get(FieldKind::Title), Some("New"));
        assert_eq!(fields.get(FieldKind::Artist), Some("Artist"));
    }
}
