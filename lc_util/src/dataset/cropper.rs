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
use std::path::Path;

use log::info;
use ndarray::Axis;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::dataset::{DatasetFiles, DatasetLayout, SplitFiles, check_aligned, crop_batch, select_patches, split_indices};
use crate::error::Result;

/// Crops an assembled dataset into patches and splits the patches into training and validation sets.
///
/// Outputs are written next to the inputs using the names of [`DatasetLayout`].
pub struct Cropper {
    layout: DatasetLayout,
}

impl Cropper {
    pub fn new(dataset_dir: &Path) -> Self {
        Cropper {
            layout: DatasetLayout::new(dataset_dir),
        }
    }

    pub fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    /// `input` is typically [`DatasetLayout::full`], one entry per tile
    pub fn crop(&self, input: &DatasetFiles, size: usize) -> Result<DatasetFiles> {
        input.require("Create the dataset before cropping it")?;

        let (x, y) = input.read()?;

        info!("Cropping {} tiles of {:?} into {}x{} patches", x.len_of(Axis(0)), x.dim(), size, size);

        let x_cropped = crop_batch(&x, size)?;
        drop(x);
        let y_cropped = crop_batch(&y, size)?;
        drop(y);

        check_aligned(&x_cropped, &y_cropped)?;

        info!("Created {} patches", x_cropped.len_of(Axis(0)));

        let output = self.layout.cropped();
        output.write(&x_cropped, &y_cropped)?;

        Ok(output)
    }

    /// `ratio` of the patches go to training.  Without a seed every run gives a different split.
    pub fn split(&self, input: &DatasetFiles, ratio: f64, seed: Option<u64>) -> Result<SplitFiles> {
        input.require("Crop the dataset before splitting it")?;

        let (x, y) = input.read()?;
        let num_patches = x.len_of(Axis(0));

        let mut rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };

        let split = split_indices(num_patches, ratio, &mut rng)?;

        info!("Splitting {} patches into {} train and {} validation", num_patches, split.train.len(), split.val.len());

        let output = self.layout.split();
        output.train.write(&select_patches(&x, &split.train)?, &select_patches(&y, &split.train)?)?;
        output.val.write(&select_patches(&x, &split.val)?, &select_patches(&y, &split.val)?)?;

        Ok(output)
    }
}
