// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

use tagpattern::credits::{artist_string, ArtistCredit, ExtraArtist};
use tagpattern::field::VALUE_SEPARATOR;
use tagpattern::{fix_up_artist, parse_credits, FieldCollection, FieldKind};

const CREDITS: &str = "\
Bass - Geezer Butler
Drums - Bill Ward
Guitar - Tony Iommi
Vocals - Ozzy Osbourne*
Producer - Rodger Bain
Engineer - Tom Allom
Written-By - Butler*, Iommi*, Osbourne*, Ward*
Photography By [Cover] - Keith McMillan";

#[test]
fn parse_album_credits() {
    let fields = parse_credits(CREDITS);
    assert_eq!(
        fields.involved_people(FieldKind::Performer),
        vec![
            ("Bass", "Geezer Butler"),
            ("Drums", "Bill Ward"),
            ("Guitar", "Tony Iommi"),
            ("Vocals", "Ozzy Osbourne"),
        ]
    );
    let separator = VALUE_SEPARATOR;
    let arrangement = format!("Producer{separator}Rodger Bain{separator}Engineer{separator}Tom Allom");
    assert_eq!(fields.get(FieldKind::Arranger), Some(arrangement.as_str()));
    assert_eq!(
        fields.get(FieldKind::Author),
        Some("Butler, Iommi, Osbourne, Ward")
    );
    assert_eq!(fields.len(), 3);
}

#[test]
fn extra_artists_from_release_json() {
    let extra_artists: Vec<ExtraArtist> = serde_json::from_str(
        r#"[
            {"name": "Tony Iommi", "role": "Guitar", "tracks": ""},
            {"name": "Geezer Butler (2)", "role": "Bass", "tracks": "A1, B1"},
            {"name": "Tom Allom", "role": "Mixed By"}
        ]"#,
    )
    .unwrap();

    let mut album = FieldCollection::new();
    for artist in extra_artists
        .iter()
        .filter(|artist| !artist.has_track_restriction())
    {
        artist.add_to_fields(&mut album, None);
    }
    assert_eq!(
        album.involved_people(FieldKind::Performer),
        vec![("Guitar", "Tony Iommi")]
    );
    assert_eq!(
        album.involved_people(FieldKind::Arranger),
        vec![("Mixer", "Tom Allom")]
    );

    let mut track = FieldCollection::new();
    for artist in &extra_artists {
        artist.add_to_fields(&mut track, Some("B1"));
    }
    assert_eq!(
        track.involved_people(FieldKind::Performer),
        vec![("Bass", "Geezer Butler")]
    );
}

#[test]
fn artist_credits_are_joined() {
    let artists = vec![
        ArtistCredit {
            name: String::from("Lemmy*"),
            join: String::from("feat."),
        },
        ArtistCredit {
            name: String::from("Girlschool"),
            join: String::new(),
        },
    ];
    assert_eq!(artist_string(&artists), "Lemmy feat. Girlschool");
    assert_eq!(fix_up_artist("Wizard (23)"), "Wizard");
}
