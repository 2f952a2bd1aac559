// Copyright (c) 2022 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Conversion between file names (or other texts) and tags using format strings like
//! `%{artist} - %{album}/%{track} %{title}`, plus parsing of free-text credits.

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::missing_docs_in_private_items)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]
#![deny(absolute_paths_not_starting_with_crate)]
#![deny(elided_lifetimes_in_paths)]
#![deny(explicit_outlives_requirements)]
#![deny(keyword_idents)]
#![deny(macro_use_extern_crate)]
#![deny(meta_variable_misuse)]
#![deny(missing_abi)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]
#![deny(non_ascii_idents)]
#![deny(noop_method_call)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_extern_crates)]
#![deny(unused_import_braces)]
#![deny(unused_lifetimes)]
#![deny(unused_macro_rules)]

pub mod cli;
mod config;
pub mod credits;
mod error;
pub mod export;
pub mod field;
pub mod import;
pub mod pattern;
mod util;

pub use config::{
    Config, ConfigError, ExportConfig, ExportFormat, FilenameConfig, ImportConfig, ImportFormat,
    TagExtraction,
};
pub use credits::{fix_up_artist, parse_credits};
pub use error::{ErrorType, ErrorType as Error, Result};
pub use field::{FieldCollection, FieldKind};
pub use pattern::{format, format_filename, Pattern, PatternCache, PatternKind};
