// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Configuration utils.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Encountered when the configuration cannot be loaded.
#[derive(Error, Debug)]
#[error("Configuration Error: {0}")]
pub struct ConfigError(#[from] toml::de::Error);

/// Default configuration TOML string.
const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Name of the directory below the XDG config home that contains the configuration file.
const XDG_PREFIX: &str = "tagpattern";

/// File name of the user configuration file.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Represents a piece of configuration that can be merged with another one.
trait MergeableConfig {
    /// Merge this configuration object with another one, taking values not set in this object from
    /// the other one (if present).
    fn merge(&self, other: &Self) -> Self;
}

/// Merge two optional lists, preferring the first one.
fn merge_list<T: Clone>(this: Option<&Vec<T>>, other: Option<&Vec<T>>) -> Option<Vec<T>> {
    this.or(other).cloned()
}

/// Formats used to convert between file names and tags.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FilenameConfig {
    /// Format used to extract tags from file paths.
    pub from_filename_format: Option<String>,
    /// Format used to generate file names from tags.
    pub to_filename_format: Option<String>,
    /// Preset formats for extracting tags from file paths.
    pub from_filename_formats: Option<Vec<String>>,
    /// Preset formats for generating file names.
    pub to_filename_formats: Option<Vec<String>>,
    /// Minimum number of digits of track numbers in generated file names.
    ///
    /// Use `0` to disable padding.
    pub track_number_digits: Option<usize>,
}

impl MergeableConfig for FilenameConfig {
    fn merge(&self, other: &Self) -> Self {
        FilenameConfig {
            from_filename_format: self
                .from_filename_format
                .clone()
                .or_else(|| other.from_filename_format.clone()),
            to_filename_format: self
                .to_filename_format
                .clone()
                .or_else(|| other.to_filename_format.clone()),
            from_filename_formats: merge_list(
                self.from_filename_formats.as_ref(),
                other.from_filename_formats.as_ref(),
            ),
            to_filename_formats: merge_list(
                self.to_filename_formats.as_ref(),
                other.to_filename_formats.as_ref(),
            ),
            track_number_digits: self.track_number_digits.or(other.track_number_digits),
        }
    }
}

/// A named text export format.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExportFormat {
    /// Display name.
    pub name: String,
    /// Format of the header, rendered from the first track.
    #[serde(default)]
    pub header: String,
    /// Format of each track.
    #[serde(default)]
    pub track: String,
    /// Format of the trailer, rendered from the last track.
    #[serde(default)]
    pub trailer: String,
}

/// Export configuration.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Available export formats.
    pub formats: Option<Vec<ExportFormat>>,
}

impl MergeableConfig for ExportConfig {
    fn merge(&self, other: &Self) -> Self {
        ExportConfig {
            formats: merge_list(self.formats.as_ref(), other.formats.as_ref()),
        }
    }
}

impl ExportConfig {
    /// Find an export format by name (case-insensitive).
    #[must_use]
    pub fn format(&self, name: &str) -> Option<&ExportFormat> {
        self.formats
            .iter()
            .flatten()
            .find(|format| format.name.eq_ignore_ascii_case(name))
    }
}

/// A named import format, consisting of regular expressions with `%{name}` field codes.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImportFormat {
    /// Display name.
    pub name: String,
    /// Expression matched once against the whole text for album-wide fields.
    #[serde(default)]
    pub header: String,
    /// Expression matched repeatedly against the text, once per track.
    #[serde(default)]
    pub track: String,
}

/// A named extraction of tags from other tags.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TagExtraction {
    /// Display name.
    pub name: String,
    /// Format generating the text to extract from.
    pub source: String,
    /// Import expression applied to the generated text.
    pub extraction: String,
}

/// Import configuration.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ImportConfig {
    /// Available import formats.
    pub formats: Option<Vec<ImportFormat>>,
    /// Available tag extractions.
    pub tag_extractions: Option<Vec<TagExtraction>>,
}

impl MergeableConfig for ImportConfig {
    fn merge(&self, other: &Self) -> Self {
        ImportConfig {
            formats: merge_list(self.formats.as_ref(), other.formats.as_ref()),
            tag_extractions: merge_list(
                self.tag_extractions.as_ref(),
                other.tag_extractions.as_ref(),
            ),
        }
    }
}

impl ImportConfig {
    /// Find an import format by name (case-insensitive).
    #[must_use]
    pub fn format(&self, name: &str) -> Option<&ImportFormat> {
        self.formats
            .iter()
            .flatten()
            .find(|format| format.name.eq_ignore_ascii_case(name))
    }

    /// Find a tag extraction by name (case-insensitive).
    #[must_use]
    pub fn tag_extraction(&self, name: &str) -> Option<&TagExtraction> {
        self.tag_extractions
            .iter()
            .flatten()
            .find(|extraction| extraction.name.eq_ignore_ascii_case(name))
    }
}

/// The main configuration struct.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Conversion between file names and tags.
    #[serde(default)]
    pub filename: FilenameConfig,
    /// Text export.
    #[serde(default)]
    pub export: ExportConfig,
    /// Text import and tag extraction.
    #[serde(default)]
    pub import: ImportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::load_default().expect("Failed to load default config")
    }
}

impl MergeableConfig for Config {
    /// Merge this configuration object with another one, taking values not set in this object from
    /// the other one (if present).
    fn merge(&self, other: &Self) -> Self {
        Config {
            filename: self.filename.merge(&other.filename),
            export: self.export.merge(&other.export),
            import: self.import.merge(&other.import),
        }
    }
}

impl Config {
    /// Load the configuration from a string slice.
    fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str(text)?;
        Ok(config)
    }

    /// Load the default configuration.
    fn load_default() -> Result<Self, ConfigError> {
        Self::load_from_str(DEFAULT_CONFIG)
    }

    /// Load the configuration from a file located at the given path.
    ///
    /// # Errors
    ///
    /// This method can fail if the file cannot be accessed or if it contains malformed
    /// configuration markup.
    pub fn load_from_path<T: AsRef<Path>>(path: T) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::load_from_str(&text)?;
        Ok(config)
    }

    /// Path of the user configuration file in the XDG config directories, if it exists.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix(XDG_PREFIX).find_config_file(CONFIG_FILE_NAME)
    }

    /// Load the user configuration file (if any) and merge it with the default values.
    ///
    /// # Errors
    ///
    /// This method can fail if the user configuration file exists but cannot be read or parsed.
    pub fn load_user_config() -> crate::Result<Self> {
        match Self::user_config_path() {
            Some(path) => {
                log::debug!("Loading configuration from {}", path.display());
                Self::load_from_path(path).map(|config| config.with_defaults())
            }
            None => Ok(Self::default()),
        }
    }

    /// Merge this configuration struct with the default values.
    #[must_use]
    pub fn with_defaults(&self) -> Self {
        let default = Self::default();
        self.merge(&default)
    }

    /// Format used to extract tags from file paths.
    #[must_use]
    pub fn from_filename_format(&self) -> &str {
        self.filename
            .from_filename_format
            .as_deref()
            .unwrap_or_default()
    }

    /// Format used to generate file names.
    #[must_use]
    pub fn to_filename_format(&self) -> &str {
        self.filename.to_filename_format.as_deref().unwrap_or_default()
    }
}
