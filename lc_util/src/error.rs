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
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Every error here is fatal for the stage that raised it, nothing is retried.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Missing prerequisite file {path:?}: {msg}")]
    MissingFile {
        path: PathBuf,
        msg: String,
    },
    #[error("Precondition failed: {0}")]
    Precondition(String),
    #[error(
        "External tool '{program}' failed (exit status {}): {stderr}",
        .status.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string())
    )]
    ExternalTool {
        program: String,
        status: Option<i32>,
        stderr: String,
    },
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("Invalid class dictionary {path:?}: {msg}")]
    ClassDictionary {
        path: PathBuf,
        msg: String,
    },
    #[error("Unsupported raster layout in {path:?}: {msg}")]
    UnsupportedRaster {
        path: PathBuf,
        msg: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),
    #[error("Array shape error: {0}")]
    Ndarray(#[from] ndarray::ShapeError),
    #[error("NPY write error: {0}")]
    NpyWrite(#[from] ndarray_npy::WriteNpyError),
    #[error("NPY read error: {0}")]
    NpyRead(#[from] ndarray_npy::ReadNpyError),
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl PipelineError {
    pub fn missing_file<P: Into<PathBuf>, S: Into<String>>(path: P, msg: S) -> Self {
        PipelineError::MissingFile {
            path: path.into(),
            msg: msg.into(),
        }
    }
}

/// Fails with [`PipelineError::MissingFile`] unless `path` exists
pub fn require_file<P: AsRef<std::path::Path>>(path: P, msg: &str) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PipelineError::missing_file(path, msg));
    }
    Ok(())
}
