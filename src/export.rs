// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Exporting the fields of several tracks as text (playlists, CSV, HTML, ...).

use crate::config::ExportFormat;
use crate::field::{FieldCollection, FieldKind};
use crate::pattern::Formatter;
use crate::util::FormattedDuration;
use chrono::TimeDelta;
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

/// Replace the escape sequences `\n`, `\t` and `\\` in a format string.
///
/// Other backslashes are kept.
#[must_use]
pub fn unescape(format: &str) -> String {
    let mut output = String::with_capacity(format.len());
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            output.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => output.push('\n'),
            Some('t') => output.push('\t'),
            Some('\\') => output.push('\\'),
            Some(other) => {
                output.push('\\');
                output.push(other);
            }
            None => output.push('\\'),
        }
    }
    output
}

/// Renders header, track and trailer formats for a list of tracks.
#[derive(Debug, Clone)]
pub struct TextExporter {
    /// Header format, rendered from the first track.
    header: String,
    /// Track format, rendered for every track.
    track: String,
    /// Trailer format, rendered from the last track.
    trailer: String,
    /// Formatter used to render the formats.
    formatter: Formatter,
}

impl TextExporter {
    /// Create an exporter for the export format.
    #[must_use]
    pub fn new(format: &ExportFormat) -> Self {
        TextExporter {
            header: unescape(&format.header),
            track: unescape(&format.track),
            trailer: unescape(&format.trailer),
            formatter: Formatter::new(),
        }
    }

    /// Use a different formatter (e.g. one that pads track numbers).
    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Render the text for the tracks.
    ///
    /// Each rendered format is followed by a newline. Empty formats are skipped, and nothing is
    /// rendered if there are no tracks.
    #[must_use]
    pub fn render(&self, tracks: &[FieldCollection]) -> String {
        let mut text = String::new();
        let last_index = tracks.len().saturating_sub(1);
        for (index, track) in tracks.iter().enumerate() {
            let track = with_derived_fields(track, tracks.len());
            if index == 0 && !self.header.is_empty() {
                text.push_str(&self.formatter.format(&self.header, &track));
                text.push('\n');
            }
            if !self.track.is_empty() {
                text.push_str(&self.formatter.format(&self.track, &track));
                text.push('\n');
            }
            if index == last_index && !self.trailer.is_empty() {
                text.push_str(&self.formatter.format(&self.trailer, &track));
                text.push('\n');
            }
        }
        text
    }

    /// Render the text for the tracks and write it to a file.
    ///
    /// The file is replaced atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_to_file<P: AsRef<Path>>(
        &self,
        tracks: &[FieldCollection],
        path: P,
    ) -> crate::Result<()> {
        let path = path.as_ref();
        let directory = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut file = tempfile::Builder::new()
            .prefix(".tagpattern.")
            .suffix(".tmp")
            .tempfile_in(directory)?;
        file.write_all(self.render(tracks).as_bytes())?;
        file.persist(path).map_err(|err| err.error)?;
        log::info!("Exported {} tracks to {}", tracks.len(), path.display());
        Ok(())
    }
}

/// Add the fields that can be derived when they are missing: the number of tracks and the
/// formatted duration.
fn with_derived_fields(track: &FieldCollection, track_count: usize) -> Cow<'_, FieldCollection> {
    let duration = (!track.contains(FieldKind::Duration))
        .then(|| track.get(FieldKind::Seconds))
        .flatten()
        .and_then(|seconds| seconds.trim().parse::<i64>().ok())
        .and_then(TimeDelta::try_seconds)
        .map(|duration| duration.formatted_duration());
    if track.contains(FieldKind::TrackTotal) && duration.is_none() {
        return Cow::Borrowed(track);
    }

    let mut track = track.clone();
    if !track.contains(FieldKind::TrackTotal) {
        track.set(FieldKind::TrackTotal, track_count.to_string());
    }
    if let Some(duration) = duration {
        track.set(FieldKind::Duration, duration);
    }
    Cow::Owned(track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    fn track(number: &str, title: &str, seconds: &str) -> FieldCollection {
        [
            (FieldKind::Track, number),
            (FieldKind::Artist, "Black Sabbath"),
            (FieldKind::Album, "Paranoid"),
            (FieldKind::Title, title),
            (FieldKind::Seconds, seconds),
            (FieldKind::FilePath, "/music/paranoid.mp3"),
        ]
        .into_iter()
        .map(|(kind, value)| (kind, value.to_owned()))
        .collect()
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\tb\nc"), "a\tb\nc");
        assert_eq!(unescape(r"a\\n"), r"a\n");
        assert_eq!(unescape(r"\d+\"), r"\d+\");
    }

    #[test]
    fn test_render_header_track_trailer() {
        let exporter = TextExporter::new(&ExportFormat {
            name: String::from("Test"),
            header: String::from("%{album}"),
            track: String::from("%{track}. %{title} (%{duration})"),
            trailer: String::from("%{tracks} tracks, last: %{title}"),
        });
        let text = exporter.render(&[track("1", "War Pigs", "477"), track("2", "Paranoid", "168")]);
        assert_eq!(
            text,
            "Paranoid\n1. War Pigs (7:57)\n2. Paranoid (2:48)\n2 tracks, last: Paranoid\n"
        );
    }

    #[test]
    fn test_render_no_tracks() {
        let config = Config::default();
        let exporter = TextExporter::new(config.export.format("Extended M3U").unwrap());
        assert_eq!(exporter.render(&[]), "");
    }

    #[test]
    fn test_render_extended_m3u() {
        let config = Config::default();
        let exporter = TextExporter::new(config.export.format("Extended M3U").unwrap());
        assert_eq!(
            exporter.render(&[track("2", "Paranoid", "168")]),
            "#EXTM3U\n#EXTINF:168,Black Sabbath - Paranoid\n/music/paranoid.mp3\n"
        );
    }

    #[test]
    fn test_render_csv_more_columns() {
        let config = Config::default();
        let mut fields = track("2", "Paranoid", "168");
        fields.set(FieldKind::Composer, "Tony Iommi");
        fields.set(FieldKind::Bpm, "162");

        for name in ["CSV more unquoted", "CSV more quoted"] {
            let exporter = TextExporter::new(config.export.format(name).unwrap());
            let text = exporter.render(std::slice::from_ref(&fields));
            let lines: Vec<Vec<&str>> = text
                .lines()
                .map(|line| line.split('\t').map(|column| column.trim_matches('"')).collect())
                .collect();
            assert_eq!(lines.len(), 2);
            assert_eq!(lines[0].len(), 32);
            assert_eq!(lines[1].len(), 32);
            assert_eq!(lines[0][11], "BPM");
            assert_eq!(lines[1][0], "2");
            assert_eq!(lines[1][7], "2:48.00");
            assert_eq!(lines[1][11], "162");
            assert_eq!(lines[1][12], "Tony Iommi");
            assert_eq!(lines[1][31], "");
        }
    }

    #[test]
    fn test_render_with_padding() {
        let exporter = TextExporter::new(&ExportFormat {
            name: String::from("Padded"),
            track: String::from("%{track}\\t%{title}"),
            ..ExportFormat::default()
        })
        .with_formatter(Formatter::new().with_track_number_digits(2));
        assert_eq!(
            exporter.render(&[track("3", "Planet Caravan", "275")]),
            "03\tPlanet Caravan\n"
        );
    }

    #[test]
    fn test_write_to_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("playlist.m3u");
        let config = Config::default();
        let exporter = TextExporter::new(config.export.format("Extended M3U").unwrap());
        exporter
            .write_to_file(&[track("1", "War Pigs", "477")], &path)
            .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("#EXTM3U\n#EXTINF:477,"));
    }
}
