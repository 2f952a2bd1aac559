// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Parsing of free-text credits (e.g. `Composed By - Iommi`) as found on web metadata sources.

use crate::field::{FieldCollection, FieldKind};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::borrow::Cow;

/// Roles that map directly to a field. Checked first, by substring.
const ROLE_TO_FIELD: [(&str, FieldKind); 9] = [
    ("Composed By", FieldKind::Composer),
    ("Conductor", FieldKind::Conductor),
    ("Orchestra", FieldKind::AlbumArtist),
    ("Lyrics By", FieldKind::Lyricist),
    ("Written-By", FieldKind::Author),
    ("Written By", FieldKind::Author),
    ("Remix", FieldKind::Remixer),
    ("Music By", FieldKind::Composer),
    ("Songwriter", FieldKind::Composer),
];

/// Roles stored in [`FieldKind::Arranger`], with their canonical involvement label.
const ROLE_TO_ARRANGEMENT: [(&str, &str); 9] = [
    ("Arranged By", "Arranger"),
    ("Mixed By", "Mixer"),
    ("DJ Mix", "DJMixer"),
    ("Dj Mix", "DJMixer"),
    ("Engineer", "Engineer"),
    ("Mastered By", "Engineer"),
    ("Producer", "Producer"),
    ("Co-producer", "Producer"),
    ("Executive Producer", "Producer"),
];

/// Instruments and voices; roles containing one of them are stored in [`FieldKind::Performer`].
const INSTRUMENTS: [&str; 39] = [
    "Performer",
    "Vocals",
    "Voice",
    "Featuring",
    "Choir",
    "Chorus",
    "Baritone",
    "Tenor",
    "Rap",
    "Scratches",
    "Drums",
    "Percussion",
    "Keyboards",
    "Cello",
    "Piano",
    "Organ",
    "Synthesizer",
    "Keys",
    "Wurlitzer",
    "Rhodes",
    "Harmonica",
    "Xylophone",
    "Guitar",
    "Bass",
    "Strings",
    "Violin",
    "Viola",
    "Banjo",
    "Harp",
    "Mandolin",
    "Clarinet",
    "Horn",
    "Cornet",
    "Flute",
    "Oboe",
    "Saxophone",
    "Trumpet",
    "Tuba",
    "Trombone",
];

/// Separator between the role list and the name list of a credits line.
const CREDIT_SEPARATOR: &str = " - ";

/// Regexes used by [`fix_up_artist`], compiled once.
struct ArtistCleanup {
    /// A comma directly followed by a non-space character.
    comma_without_space: Regex,
    /// Numeric disambiguator followed by a track annotation.
    number_and_tracks: Regex,
    /// Disambiguator or track annotation before a joining phrase.
    annotation_before_join: Regex,
    /// Disambiguator or track annotation at the end.
    trailing_annotation: Regex,
    /// An HTML tag.
    html_tag: Regex,
    /// A numeric HTML character reference.
    numeric_entity: Regex,
}

/// Compiled regexes for [`fix_up_artist`].
static ARTIST_CLEANUP: Lazy<ArtistCleanup> = Lazy::new(|| ArtistCleanup {
    comma_without_space: Regex::new(r",(\S)").expect("valid regex"),
    number_and_tracks: Regex::new(r"[*\s]*\(\d+\)\(tracks:[^)]+\)").expect("valid regex"),
    annotation_before_join: Regex::new(
        r"[*\s]*\((?:\d+|tracks:[^)]+)\)(\s*/\s*,|\s*&amp;|\s*And|\s*and)",
    )
    .expect("valid regex"),
    trailing_annotation: Regex::new(r"[*\s]*\((?:\d+|tracks:[^)]+)\)$").expect("valid regex"),
    html_tag: Regex::new(r"<[^>]+>").expect("valid regex"),
    numeric_entity: Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("valid regex"),
});

/// Remove HTML tags, replace HTML entities and trim the result.
fn remove_html(text: &str) -> String {
    let cleanup = &*ARTIST_CLEANUP;
    let text = cleanup.html_tag.replace_all(text, "");
    let text = cleanup
        .numeric_entity
        .replace_all(&text, |captures: &regex::Captures<'_>| {
            let reference = &captures[1];
            let code = match reference.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => reference.parse::<u32>().ok(),
            };
            code.and_then(char::from_u32)
                .map_or_else(|| captures[0].to_owned(), String::from)
        });
    text.replace("&quot;", "\"")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&times;", "\u{d7}")
        .replace("&ndash;", "\u{2013}")
        .replace("&amp;", "&")
        .trim()
        .to_owned()
}

/// Clean up an artist name from a web source.
///
/// Removes trailing stars and disambiguation numbers like `(2)`, `(tracks: ...)` annotations and
/// HTML markup, and puts a space after commas.
#[must_use]
pub fn fix_up_artist(artist: &str) -> String {
    let cleanup = &*ARTIST_CLEANUP;
    let artist = cleanup.comma_without_space.replace_all(artist, ", ${1}");
    let artist = artist.replace("* / ", " / ").replace("*,", ",");
    let artist = artist.strip_suffix('*').unwrap_or(&artist);
    let artist = cleanup.number_and_tracks.replace_all(artist, "");
    let artist = cleanup.annotation_before_join.replace_all(&artist, "${1}");
    let artist = cleanup.trailing_annotation.replace_all(&artist, "");
    remove_html(&artist)
}

/// Find the field for a credited role.
///
/// Returns the field and the involvement to store for multi-valued fields. Roles stored in
/// [`FieldKind::Arranger`] are replaced by their canonical label (e.g. `Mixed By` becomes
/// `Mixer`). Returns `None` if the role is not known.
#[must_use]
pub fn field_for_role(role: &str) -> Option<(FieldKind, Cow<'_, str>)> {
    if let Some((_, kind)) = ROLE_TO_FIELD
        .iter()
        .find(|(credit, _)| role.contains(credit))
    {
        return Some((*kind, Cow::from(role)));
    }

    if let Some((_, arrangement)) = ROLE_TO_ARRANGEMENT
        .iter()
        .find(|(credit, _)| role.contains(credit))
    {
        return Some((FieldKind::Arranger, Cow::from(*arrangement)));
    }

    INSTRUMENTS
        .iter()
        .any(|instrument| role.contains(instrument))
        .then_some((FieldKind::Performer, Cow::from(role)))
}

/// Parse credits lines like `Composed By, Lyrics By - John Smith, Jane Doe`.
///
/// Every role in the comma-separated role list is credited to all names. Performers and
/// arrangement roles accumulate in multi-valued fields, other fields are overwritten by later
/// lines. Lines without known roles contribute nothing.
#[must_use]
pub fn parse_credits(text: &str) -> FieldCollection {
    let mut fields = FieldCollection::new();
    for line in text.split('\n') {
        let Some((roles, names)) = line.split_once(CREDIT_SEPARATOR) else {
            continue;
        };
        let name = names.split(", ").map(fix_up_artist).join(", ");
        for role in roles.split(", ").map(str::trim) {
            match field_for_role(role) {
                Some((kind, involvement)) if kind.is_involved_people() => {
                    fields.add_involved_person(kind, &involvement, &name);
                }
                Some((kind, _)) => fields.set(kind, name.as_str()),
                None => log::debug!("Ignoring unknown credited role {role:?}"),
            }
        }
    }
    fields
}

/// Raw extra artist credit, as found in JSON release data.
#[derive(Debug, Deserialize)]
struct RawExtraArtist {
    /// Artist name.
    name: String,
    /// Credited role.
    #[serde(default)]
    role: String,
    /// Comma-separated track positions the credit is restricted to.
    #[serde(default)]
    tracks: String,
}

/// A person credited for a release, optionally restricted to some of its tracks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawExtraArtist")]
pub struct ExtraArtist {
    /// Cleaned up artist name.
    name: String,
    /// Credited role.
    role: String,
    /// Track positions the credit is restricted to (empty if unrestricted).
    tracks: Vec<String>,
}

impl From<RawExtraArtist> for ExtraArtist {
    fn from(raw: RawExtraArtist) -> Self {
        ExtraArtist::new(&raw.name, &raw.role, &raw.tracks)
    }
}

impl ExtraArtist {
    /// Create an extra artist from name, role and comma-separated track positions.
    #[must_use]
    pub fn new(name: &str, role: &str, tracks: &str) -> Self {
        ExtraArtist {
            name: fix_up_artist(name),
            role: role.trim().to_owned(),
            tracks: tracks
                .split(',')
                .map(str::trim)
                .filter(|track| !track.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }

    /// Cleaned up artist name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the credit only applies to some tracks.
    #[must_use]
    pub fn has_track_restriction(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Add the credit to the fields.
    ///
    /// If a non-empty track position is given, the credit is only added if that position is
    /// listed in the track restriction. Unlike [`parse_credits`], single-valued fields accumulate names
    /// separated by `", "`.
    pub fn add_to_fields(&self, fields: &mut FieldCollection, track_position: Option<&str>) {
        if let Some(position) = track_position.filter(|position| !position.is_empty()) {
            if !self.tracks.iter().any(|track| track == position) {
                return;
            }
        }

        match field_for_role(&self.role) {
            Some((kind, involvement)) if kind.is_involved_people() => {
                fields.add_involved_person(kind, &involvement, &self.name);
            }
            Some((kind, _)) => {
                let value = match fields.get(kind).filter(|value| !value.is_empty()) {
                    Some(value) => format!("{value}, {}", self.name),
                    None => self.name.clone(),
                };
                fields.set(kind, value);
            }
            None => log::debug!("Ignoring unknown credited role {:?}", self.role),
        }
    }
}

/// An artist credited as main artist, with the phrase that joins it to the next artist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArtistCredit {
    /// Artist name.
    pub name: String,
    /// Joining phrase (e.g. `&` or `feat.`).
    #[serde(default)]
    pub join: String,
}

/// Join artist credits to a single artist string, using the joining phrases.
#[must_use]
pub fn artist_string(artists: &[ArtistCredit]) -> String {
    let mut artist = String::new();
    let mut join = String::new();
    for credit in artists {
        if !artist.is_empty() {
            artist.push_str(&join);
        }
        artist.push_str(&fix_up_artist(&credit.name));
        join = if credit.join.is_empty() || credit.join == "," {
            String::from(", ")
        } else {
            format!(" {} ", credit.join)
        };
    }
    artist
}

#[cfg(test)]
mod tests {
    use super::*;
    use paste::paste;

    macro_rules! add_test_fix_up_artist {
        ($input:expr, $expected:expr, $fnsuffix:ident) => {
            paste! {
                #[test]
                fn [<test_fix_up_artist_ $fnsuffix>]() {
                    assert_eq!(fix_up_artist($input), $expected);
                }
            }
        };
    }

    add_test_fix_up_artist!("Wizard (23)", "Wizard", disambiguation_number);
    add_test_fix_up_artist!("Amon Amarth*", "Amon Amarth", trailing_star);
    add_test_fix_up_artist!("Iommi,Butler", "Iommi, Butler", comma_spacing);
    add_test_fix_up_artist!("Iommi*, Butler*", "Iommi, Butler", stars_before_comma);
    add_test_fix_up_artist!("Osbourne* / Iommi", "Osbourne / Iommi", star_before_slash);
    add_test_fix_up_artist!(
        "John Smith (tracks: A1, B2)",
        "John Smith",
        tracks_annotation
    );
    add_test_fix_up_artist!(
        "John Smith (2)(tracks: A1)",
        "John Smith",
        number_and_tracks_annotation
    );
    add_test_fix_up_artist!(
        "Smith (3) &amp; Jones",
        "Smith & Jones",
        number_before_ampersand
    );
    add_test_fix_up_artist!("<a href=\"/artist\">Bj&#246;rk</a>", "Bj\u{f6}rk", html);
    add_test_fix_up_artist!("  Plain Name  ", "Plain Name", trimmed);

    #[test]
    fn test_field_for_role() {
        assert_eq!(
            field_for_role("Composed By"),
            Some((FieldKind::Composer, Cow::from("Composed By")))
        );
        assert_eq!(
            field_for_role("Remixed By"),
            Some((FieldKind::Remixer, Cow::from("Remixed By")))
        );
        assert_eq!(
            field_for_role("Mixed By"),
            Some((FieldKind::Arranger, Cow::from("Mixer")))
        );
        assert_eq!(
            field_for_role("Executive Producer"),
            Some((FieldKind::Arranger, Cow::from("Producer")))
        );
        assert_eq!(
            field_for_role("Lead Vocals"),
            Some((FieldKind::Performer, Cow::from("Lead Vocals")))
        );
        assert_eq!(field_for_role("Photography By"), None);
    }

    #[test]
    fn test_parse_credits_classification() {
        let fields = parse_credits("Composed By, Lyrics By - John Smith\nGuitar - Jane Doe");
        assert_eq!(fields.get(FieldKind::Composer), Some("John Smith"));
        assert_eq!(fields.get(FieldKind::Lyricist), Some("John Smith"));
        assert_ne!(fields.get(FieldKind::Performer), Some("Jane Doe"));
        assert_eq!(
            fields.involved_people(FieldKind::Performer),
            vec![("Guitar", "Jane Doe")]
        );
    }

    #[test]
    fn test_parse_credits_accumulates_involved_people() {
        let fields = parse_credits(
            "Bass - Geezer Butler\nDrums - Bill Ward\nProducer - Rodger Bain\nMixed By - Tom Allom",
        );
        assert_eq!(
            fields.involved_people(FieldKind::Performer),
            vec![("Bass", "Geezer Butler"), ("Drums", "Bill Ward")]
        );
        assert_eq!(
            fields.involved_people(FieldKind::Arranger),
            vec![("Producer", "Rodger Bain"), ("Mixer", "Tom Allom")]
        );
    }

    #[test]
    fn test_parse_credits_last_write_wins() {
        let fields = parse_credits("Conductor - First\nConductor - Second");
        assert_eq!(fields.get(FieldKind::Conductor), Some("Second"));
    }

    #[test]
    fn test_parse_credits_names_are_cleaned() {
        let fields = parse_credits("Written-By - Iommi*, Butler (2), Ward*, Osbourne*");
        assert_eq!(
            fields.get(FieldKind::Author),
            Some("Iommi, Butler, Ward, Osbourne")
        );
    }

    #[test]
    fn test_parse_credits_first_separator() {
        let fields = parse_credits("Composed By - Smith - Jones");
        assert_eq!(fields.get(FieldKind::Composer), Some("Smith - Jones"));
    }

    #[test]
    fn test_parse_credits_nothing_found() {
        assert!(parse_credits("").is_empty());
        assert!(parse_credits("Tracklist\nA1 Paranoid").is_empty());
        assert!(parse_credits("Photography By - Keith McMillan").is_empty());
    }

    #[test]
    fn test_extra_artist_from_json() {
        let artist: ExtraArtist = serde_json::from_str(
            r#"{"name": "Tony Iommi*", "role": "Guitar ", "tracks": "A1, B2"}"#,
        )
        .unwrap();
        assert_eq!(artist.name(), "Tony Iommi");
        assert!(artist.has_track_restriction());

        let mut fields = FieldCollection::new();
        artist.add_to_fields(&mut fields, Some("A3"));
        assert!(fields.is_empty());
        artist.add_to_fields(&mut fields, Some("B2"));
        assert_eq!(
            fields.involved_people(FieldKind::Performer),
            vec![("Guitar", "Tony Iommi")]
        );
    }

    #[test]
    fn test_extra_artist_empty_track_position() {
        let restricted = ExtraArtist::new("Bill Ward", "Drums", "A1");
        let unrestricted = ExtraArtist::new("Rodger Bain", "Producer", "");
        let mut fields = FieldCollection::new();
        restricted.add_to_fields(&mut fields, Some(""));
        unrestricted.add_to_fields(&mut fields, Some(""));
        assert_eq!(
            fields.involved_people(FieldKind::Performer),
            vec![("Drums", "Bill Ward")]
        );
        assert_eq!(
            fields.involved_people(FieldKind::Arranger),
            vec![("Producer", "Rodger Bain")]
        );
    }

    #[test]
    fn test_extra_artist_accumulates_single_valued() {
        let mut fields = FieldCollection::new();
        ExtraArtist::new("Iommi", "Written-By", "").add_to_fields(&mut fields, None);
        ExtraArtist::new("Butler", "Written-By", "").add_to_fields(&mut fields, None);
        assert_eq!(fields.get(FieldKind::Author), Some("Iommi, Butler"));
    }

    #[test]
    fn test_artist_string() {
        let artists: Vec<ArtistCredit> = serde_json::from_str(
            r#"[{"name": "Simon (2)", "join": "&"}, {"name": "Garfunkel", "join": ","},
                {"name": "Friends*"}]"#,
        )
        .unwrap();
        assert_eq!(artist_string(&artists), "Simon & Garfunkel, Friends");
    }
}
