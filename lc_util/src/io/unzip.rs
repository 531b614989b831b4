/*
This file is part of the Building Aggregration Tool
Copyright (C) 2022 Novel-T

The Building Aggregration Tool is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::info;
use zip::ZipArchive;

use crate::error::{PipelineError, Result};
use crate::util::is_hidden;

/// Extracts every non hidden file of `folder` as a zip archive into `folder`.
///
/// Returns the archives that were extracted.
pub fn unzip(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(PipelineError::missing_file(folder, "Folder to unzip not found"));
    }

    let mut archives = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        if is_hidden(&entry.file_name().to_string_lossy()) || !path.is_file() {
            continue;
        }
        archives.push(path);
    }
    archives.sort();

    for (i, path) in archives.iter().enumerate() {
        info!("Extracting {} of {}: {:?}", i + 1, archives.len(), path);

        let mut archive = ZipArchive::new(BufReader::new(File::open(path)?))?;
        archive.extract(folder)?;
    }

    Ok(archives)
}
