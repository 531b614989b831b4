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
use ndarray::{Array4, ArrayBase, ArrayView3, Data, Ix3, s};

use crate::error::Result;
use crate::patch::{PatchWindow, PatchWindowIterator};

/// Read only view of an (rows, cols, channels) array as a row major grid of square patches.
///
/// Nothing is copied until [`PatchGrid::materialize`] or [`PatchGrid::extend_flat`].
#[derive(Debug, Clone)]
pub struct PatchGrid<'a, A> {
    source: ArrayView3<'a, A>,
    windows: PatchWindowIterator,
}

/// Splits `image` into `size` x `size` patches.
///
/// Returns None when the rows or columns are not a multiple of `size`, no partial
/// grids are produced.
pub fn get_tile_images<A, S>(image: &ArrayBase<S, Ix3>, size: usize) -> Option<PatchGrid<'_, A>>
    where S: Data<Elem = A>
{
    let (num_rows, num_cols, _) = image.dim();

    let windows = PatchWindowIterator::new(num_rows, num_cols, size)?;

    Some(PatchGrid {
        source: image.view(),
        windows,
    })
}

impl<'a, A> PatchGrid<'a, A> {
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn patch_size(&self) -> usize {
        self.windows.patch_size()
    }

    pub fn channels(&self) -> usize {
        self.source.dim().2
    }

    /// (grid rows, grid cols)
    pub fn grid_dim(&self) -> (usize, usize) {
        (self.windows.grid_rows(), self.windows.grid_cols())
    }

    /// Shape the patches would have as one batch
    pub fn batch_dim(&self) -> (usize, usize, usize, usize) {
        (self.len(), self.patch_size(), self.patch_size(), self.channels())
    }

    pub fn patch(&self, window: &PatchWindow) -> ArrayView3<'a, A> {
        self.source.clone().slice_move(s![
            window.row_range.0..window.row_range.1,
            window.col_range.0..window.col_range.1,
            ..
        ])
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = ArrayView3<'a, A>> + '_ {
        self.windows.clone().map(move |w| self.patch(&w))
    }

    /// Appends every patch, in order, to `flat` in standard (row major) layout
    pub fn extend_flat(&self, flat: &mut Vec<A>)
        where A: Clone
    {
        flat.reserve(self.len() * self.patch_size() * self.patch_size() * self.channels());
        for patch in self.iter() {
            flat.extend(patch.iter().cloned());
        }
    }

    /// Copies the patches into a new (num_patches, size, size, channels) array
    pub fn materialize(&self) -> Result<Array4<A>>
        where A: Clone
    {
        let mut flat = Vec::new();
        self.extend_flat(&mut flat);

        Ok(Array4::from_shape_vec(self.batch_dim(), flat)?)
    }
}
