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
use ndarray::{Array3, ArrayBase, Axis, Data, Ix4, s};

use crate::error::{PipelineError, Result};
use crate::patch::PatchWindowIterator;

/// Inverse of [`crate::patch::get_tile_images`], puts a row major batch of patches back on a
/// `grid_rows` x `grid_cols` grid.  Used to mosaic per patch predictions.
pub fn stitch_patches<A, S>(patches: &ArrayBase<S, Ix4>, grid_rows: usize, grid_cols: usize) -> Result<Array3<A>>
    where A: Clone + Default,
          S: Data<Elem = A>
{
    let (num_patches, patch_rows, patch_cols, num_channels) = patches.dim();

    if num_patches != grid_rows * grid_cols {
        return Err(PipelineError::ShapeMismatch(format!(
            "{} patches cannot fill a {} x {} grid", num_patches, grid_rows, grid_cols)));
    }

    if patch_rows != patch_cols {
        return Err(PipelineError::ShapeMismatch(format!(
            "Patches must be square, found {} x {}", patch_rows, patch_cols)));
    }

    let mut stitched = Array3::<A>::default((grid_rows * patch_rows, grid_cols * patch_cols, num_channels));

    let windows = PatchWindowIterator::new(stitched.dim().0, stitched.dim().1, patch_rows)
        .ok_or_else(|| PipelineError::ShapeMismatch(format!("Invalid patch size {}", patch_rows)))?;

    for (window, patch) in windows.zip(patches.axis_iter(Axis(0))) {
        stitched.slice_mut(s![
            window.row_range.0..window.row_range.1,
            window.col_range.0..window.col_range.1,
            ..
        ]).assign(&patch);
    }

    Ok(stitched)
}
