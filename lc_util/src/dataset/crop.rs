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
use ndarray::{Array4, ArrayBase, Axis, Data, Ix4};

use crate::error::{PipelineError, Result};
use crate::patch::get_tile_images;

/// Cuts every entry of a (tiles, rows, cols, channels) batch into `size` x `size` patches and
/// concatenates them, tile by tile, into one (patches, size, size, channels) batch
pub fn crop_batch<A, S>(batch: &ArrayBase<S, Ix4>, size: usize) -> Result<Array4<A>>
    where A: Clone,
          S: Data<Elem = A>
{
    let (_, num_rows, num_cols, num_channels) = batch.dim();

    let mut flat = Vec::new();
    let mut num_patches = 0;

    for (tile_idx, tile) in batch.axis_iter(Axis(0)).enumerate() {
        let grid = get_tile_images(&tile, size).ok_or_else(|| PipelineError::Precondition(format!(
            "Tile {} is {}x{} which is not divisible by the crop size {}", tile_idx, num_rows, num_cols, size)))?;

        num_patches += grid.len();
        grid.extend_flat(&mut flat);
    }

    Ok(Array4::from_shape_vec((num_patches, size, size, num_channels), flat)?)
}

#[cfg(test)]
mod crop_tests {
    use ndarray::{Array4, s};

    use super::*;

    #[test]
    fn test_crop_batch_concatenates_tiles() {
        let batch = Array4::from_shape_fn((2, 4, 6, 2), |(t, r, c, b)| (t * 1000 + r * 100 + c * 10 + b) as u16);

        let cropped = crop_batch(&batch, 2).unwrap();

        assert_eq!((12, 2, 2, 2), cropped.dim());
        //first tile's patches come first
        assert_eq!(batch.slice(s![0, 0..2, 0..2, ..]), cropped.slice(s![0, .., .., ..]));
        assert_eq!(batch.slice(s![0, 2..4, 4..6, ..]), cropped.slice(s![5, .., .., ..]));
        assert_eq!(batch.slice(s![1, 0..2, 0..2, ..]), cropped.slice(s![6, .., .., ..]));
        assert_eq!(batch.slice(s![1, 0..2, 2..4, ..]), cropped.slice(s![7, .., .., ..]));
    }

    #[test]
    fn test_crop_batch_not_divisible() {
        let batch = Array4::<bool>::from_elem((1, 6, 6, 3), false);
        assert!(matches!(crop_batch(&batch, 4), Err(PipelineError::Precondition(_))));
    }

    #[test]
    fn test_crop_empty_batch() {
        let batch = Array4::<u16>::zeros((0, 4, 4, 3));
        assert_eq!((0, 2, 2, 3), crop_batch(&batch, 2).unwrap().dim());
    }
}
