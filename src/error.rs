// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Error and result types.

use std::io;
use thiserror::Error;

/// Main error type.
#[derive(Error, Debug)]
pub enum ErrorType {
    /// Configuration error.
    #[error("Configuration Error ({0})")]
    Config(#[from] crate::config::ConfigError),
    /// I/O Error.
    #[error("Input/Output error ({:?})", .0)]
    Io(#[from] io::Error),
    /// A user-supplied regular expression is invalid.
    #[error("Invalid regular expression: {0}")]
    Regex(#[from] regex::Error),
    /// No import or export format with this name is configured.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),
    /// A file path is not valid UTF-8.
    #[error("Path is not valid UTF-8: {0:?}")]
    NonUnicodePath(std::path::PathBuf),
}

/// Convenience type.
pub type Result<T> = std::result::Result<T, ErrorType>;
