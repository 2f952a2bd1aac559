// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

use std::sync::Arc;
use std::thread;
use tagpattern::pattern::{Formatter, MatchSource};
use tagpattern::{
    format, format_filename, Config, FieldCollection, FieldKind, Pattern, PatternCache, PatternKind,
};

fn fields(values: &[(FieldKind, &str)]) -> FieldCollection {
    values
        .iter()
        .map(|(kind, value)| (*kind, (*value).to_owned()))
        .collect()
}

#[test]
fn extract_with_configured_format() {
    let config = Config::default();
    let pattern = Pattern::compile(config.from_filename_format());
    let extraction = pattern.extract("/srv/music/Black Sabbath - Paranoid/04 Iron Man.flac");
    assert_eq!(extraction.source, MatchSource::Pattern);
    assert_eq!(
        extraction.fields,
        fields(&[
            (FieldKind::Artist, "Black Sabbath"),
            (FieldKind::Album, "Paranoid"),
            (FieldKind::Track, "4"),
            (FieldKind::Title, "Iron Man"),
        ])
    );
}

#[test]
fn extract_falls_back_to_layouts() {
    let pattern = Pattern::compile("%{track}. %{title}");
    let extraction = pattern
        .extract("Amon Amarth/Amon Amarth - The Avenger/01-amon_amarth-bleed_for_ancient_gods.mp3");
    assert_eq!(
        extraction.source,
        MatchSource::Fallback("artist - album/track song")
    );
    assert_eq!(extraction.fields.get(FieldKind::Artist), Some("Amon Amarth"));
    assert_eq!(extraction.fields.get(FieldKind::Album), Some("The Avenger"));
    assert_eq!(extraction.fields.get(FieldKind::Track), Some("1"));
}

#[test]
fn text_patterns_never_fall_back() {
    let pattern = Pattern::compile_text("%{track}. %{title}");
    let extraction = pattern.extract("Black Sabbath - Paranoid/02 Paranoid.mp3");
    assert_eq!(extraction.source, MatchSource::NoMatch);
}

#[test]
fn rename_roundtrip_with_padding() {
    let config = Config::default();
    let from = Pattern::compile(config.from_filename_format());
    let extracted = from
        .extract("/music/Black Sabbath - Paranoid/8 Fairies Wear Boots.mp3")
        .fields;
    let formatter = Formatter::from_config(&config).with_path_escaping(true);
    assert_eq!(
        formatter.format(config.to_filename_format(), &extracted),
        "08 Fairies Wear Boots"
    );
}

#[test]
fn format_helpers() {
    let values = fields(&[
        (FieldKind::Artist, "Simon & Garfunkel"),
        (FieldKind::Title, "Mrs. Robinson / Reprise"),
    ]);
    assert_eq!(
        format("%{artist} - %{title}", &values),
        "Simon & Garfunkel - Mrs. Robinson / Reprise"
    );
    assert_eq!(format("%h{artist}", &values), "Simon &amp; Garfunkel");
    assert_eq!(
        format_filename("%{artist}/%{title}", &values),
        "Simon & Garfunkel/Mrs. Robinson _ Reprise"
    );
}

#[test]
fn cache_is_shared_between_threads() {
    let cache = Arc::new(PatternCache::new());
    let handles = (0..4)
        .map(|number| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let pattern = cache.get("%{track} %{title}", PatternKind::Filename);
                pattern
                    .extract(&format!("/music/{number} Song.mp3"))
                    .fields
                    .get(FieldKind::Track)
                    .map(str::to_owned)
            })
        })
        .collect::<Vec<_>>();
    let tracks = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(
        tracks,
        vec![
            Some(String::from("0")),
            Some(String::from("1")),
            Some(String::from("2")),
            Some(String::from("3")),
        ]
    );
    assert_eq!(cache.len(), 1);
}
