// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Filesystem-related utility functions.

use std::collections::BinaryHeap;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// An iterator that recursively walks through a directory structure and yields a tuple `(path,
/// dirs, files)` for each directory it visits.
///
/// This struct is created by [`walk_dir`]. See its documentation for more.
#[derive(Debug)]
pub struct DirWalk {
    /// Queued paths that will be visited next.
    queue: BinaryHeap<PathBuf>,
}

impl Iterator for DirWalk {
    type Item = io::Result<(PathBuf, Vec<PathBuf>, Vec<PathBuf>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let queued_path = self.queue.pop();
        queued_path.map(move |path| {
            log::debug!("Queued path: {}", path.display());
            fs::read_dir(&path).and_then(move |entries| {
                let mut files = vec![];
                let mut dirs = vec![];
                for entry in entries {
                    let entry_path = entry?.path();

                    if entry_path.is_dir() {
                        dirs.push(entry_path);
                    } else {
                        files.push(entry_path);
                    }
                }

                files.sort_unstable();
                dirs.sort_unstable();
                self.queue.extend(dirs.iter().cloned());

                Ok((path, dirs, files))
            })
        })
    }
}

/// Creates an iterator that walks through a directory structure recursively and yields a tuple
/// consisting of the path of current directory and the files and directories in that directory.
pub fn walk_dir(path: PathBuf) -> DirWalk {
    let mut queue = BinaryHeap::new();
    queue.push(path);
    DirWalk { queue }
}

/// Copy the file via a temporary file in the destination directory.
///
/// Missing parent directories of the destination are created.
fn copy_file<S: AsRef<Path>, D: AsRef<Path>>(source: S, destination: D) -> io::Result<()> {
    let dest_filename = destination
        .as_ref()
        .file_name()
        .and_then(OsStr::to_str)
        .ok_or(io::Error::other("cannot determine destination file name"))?;
    let dest_dir = destination
        .as_ref()
        .parent()
        .ok_or(io::Error::other("cannot determine destination directory"))?;
    fs::create_dir_all(dest_dir)?;
    let mut temp_destination_file = tempfile::Builder::new()
        .prefix(format!(".tagpattern.{dest_filename}").as_str())
        .suffix(".tmp")
        .tempfile_in(dest_dir)?;
    let mut source_file = fs::File::open(&source)?;
    let _bytes = io::copy(&mut source_file, &mut temp_destination_file)?;

    let temp_destination = temp_destination_file.into_temp_path();
    temp_destination.persist(&destination)?;
    log::debug!(
        "Copied file {} to {}",
        source.as_ref().display(),
        destination.as_ref().display()
    );

    Ok(())
}

/// Move the file, creating missing parent directories of the destination.
///
/// Renames the file if possible and falls back to copying and removing the source (e.g. across
/// filesystems). Existing files at the destination are never replaced.
///
/// # Errors
///
/// Returns an error if the destination already exists or if the file cannot be moved.
pub fn move_file<S: AsRef<Path>, D: AsRef<Path>>(source: S, destination: D) -> crate::Result<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();
    if destination.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", destination.display()),
        )
        .into());
    }
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }

    if let Ok(()) = fs::rename(source, destination) {
        log::info!(
            "Renamed file {} to {}",
            source.display(),
            destination.display()
        );
        return Ok(());
    }

    copy_file(source, destination)?;
    fs::remove_file(source)?;
    log::info!(
        "Moved file {} to {}",
        source.display(),
        destination.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_dir() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("b/c")).unwrap();
        fs::create_dir_all(root.path().join("a")).unwrap();
        fs::write(root.path().join("a/02.mp3"), b"").unwrap();
        fs::write(root.path().join("a/01.mp3"), b"").unwrap();
        fs::write(root.path().join("b/c/03.mp3"), b"").unwrap();

        let mut files = walk_dir(root.path().to_path_buf())
            .flat_map(|item| item.unwrap().2)
            .collect::<Vec<_>>();
        files.sort();
        assert_eq!(
            files,
            vec![
                root.path().join("a/01.mp3"),
                root.path().join("a/02.mp3"),
                root.path().join("b/c/03.mp3"),
            ]
        );
    }

    #[test]
    fn test_move_file_creates_directories() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("01 track.mp3");
        fs::write(&source, b"data").unwrap();
        let destination = root.path().join("Artist/Album/01 Title.mp3");

        move_file(&source, &destination).unwrap();
        assert!(!source.exists());
        assert_eq!(fs::read(&destination).unwrap(), b"data");
    }

    #[test]
    fn test_move_file_keeps_existing_destination() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("a.mp3");
        let destination = root.path().join("b.mp3");
        fs::write(&source, b"a").unwrap();
        fs::write(&destination, b"b").unwrap();

        assert!(move_file(&source, &destination).is_err());
        assert_eq!(fs::read(&source).unwrap(), b"a");
        assert_eq!(fs::read(&destination).unwrap(), b"b");
    }

    #[test]
    fn test_copy_file() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("a.mp3");
        fs::write(&source, b"a").unwrap();
        copy_file(&source, root.path().join("sub/b.mp3")).unwrap();
        assert_eq!(fs::read(root.path().join("sub/b.mp3")).unwrap(), b"a");
        assert!(source.exists());
    }
}
