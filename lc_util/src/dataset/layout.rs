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

use ndarray::{Array4, ArrayBase, Data, Ix4};
use ndarray_npy::{read_npy, write_npy};
use log::debug;

use crate::error::{PipelineError, Result, require_file};

pub const FEATURES_FILE: &str = "X.npy";
pub const LABELS_FILE: &str = "y.npy";
pub const CROPPED_FEATURES_FILE: &str = "X_cropped.npy";
pub const CROPPED_LABELS_FILE: &str = "y_cropped.npy";
pub const TRAIN_FEATURES_FILE: &str = "X_train.npy";
pub const TRAIN_LABELS_FILE: &str = "y_train.npy";
pub const VAL_FEATURES_FILE: &str = "X_val.npy";
pub const VAL_LABELS_FILE: &str = "y_val.npy";

/// (tiles or patches, rows, cols, bands)
pub type FeatureBatch = Array4<u16>;
/// (tiles or patches, rows, cols, classes)
pub type LabelBatch = Array4<bool>;

/// File names of each stage inside a dataset directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    root: PathBuf,
}

/// A pair of index aligned feature / label .npy files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFiles {
    pub features: PathBuf,
    pub labels: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitFiles {
    pub train: DatasetFiles,
    pub val: DatasetFiles,
}

impl DatasetLayout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        DatasetLayout { root: root.into() }
    }

    fn files(&self, features: &str, labels: &str) -> DatasetFiles {
        DatasetFiles {
            features: self.root.join(features),
            labels: self.root.join(labels),
        }
    }

    /// One entry per tile
    pub fn full(&self) -> DatasetFiles {
        self.files(FEATURES_FILE, LABELS_FILE)
    }

    pub fn cropped(&self) -> DatasetFiles {
        self.files(CROPPED_FEATURES_FILE, CROPPED_LABELS_FILE)
    }

    pub fn split(&self) -> SplitFiles {
        SplitFiles {
            train: self.files(TRAIN_FEATURES_FILE, TRAIN_LABELS_FILE),
            val: self.files(VAL_FEATURES_FILE, VAL_LABELS_FILE),
        }
    }
}

impl DatasetFiles {
    pub fn require(&self, msg: &str) -> Result<()> {
        require_file(&self.features, msg)?;
        require_file(&self.labels, msg)
    }

    /// Reads both arrays and checks they have the same number of entries
    pub fn read(&self) -> Result<(FeatureBatch, LabelBatch)> {
        debug!("Reading {:?} and {:?}", self.features, self.labels);

        let x: FeatureBatch = read_npy(&self.features)?;
        let y: LabelBatch = read_npy(&self.labels)?;

        check_aligned(&x, &y)?;

        Ok((x, y))
    }

    pub fn write<S1, S2>(&self, x: &ArrayBase<S1, Ix4>, y: &ArrayBase<S2, Ix4>) -> Result<()>
        where S1: Data<Elem = u16>,
              S2: Data<Elem = bool>
    {
        check_aligned(x, y)?;

        debug!("Writing {:?} {:?} and {:?} {:?}", self.features, x.dim(), self.labels, y.dim());

        write_npy(&self.features, x)?;
        write_npy(&self.labels, y)?;
        Ok(())
    }
}

/// Features and labels must agree on the number of entries and their rows / cols
pub fn check_aligned<A, B, S1, S2>(x: &ArrayBase<S1, Ix4>, y: &ArrayBase<S2, Ix4>) -> Result<()>
    where S1: Data<Elem = A>,
          S2: Data<Elem = B>
{
    let (x_n, x_rows, x_cols, _) = x.dim();
    let (y_n, y_rows, y_cols, _) = y.dim();

    if x_n != y_n {
        return Err(PipelineError::ShapeMismatch(format!(
            "{} feature entries but {} label entries", x_n, y_n)));
    }

    if (x_rows, x_cols) != (y_rows, y_cols) {
        return Err(PipelineError::ShapeMismatch(format!(
            "features are {}x{} but labels are {}x{}", x_rows, x_cols, y_rows, y_cols)));
    }

    Ok(())
}
