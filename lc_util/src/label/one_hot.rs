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
use ndarray::{Array3, ArrayBase, Axis, Data, Ix3, Zip, s};

use crate::error::{PipelineError, Result};
use crate::label::ClassDictionary;

/// Encodes an RGB label raster (height, width, channels) as (height, width, classes).
///
/// Only the first 3 channels are compared, so an alpha channel is ignored.
/// A pixel whose colour is not in the dictionary gets an all false vector, see [`count_unmatched`].
pub fn one_hot_encode<T, S>(label: &ArrayBase<S, Ix3>, dictionary: &ClassDictionary) -> Result<Array3<bool>>
    where T: Copy + PartialEq + From<u8>,
          S: Data<Elem = T>
{
    let (num_rows, num_cols, num_channels) = label.dim();

    if num_channels < 3 {
        return Err(PipelineError::Precondition(format!(
            "Label raster needs at least 3 (RGB) channels, found {}", num_channels)));
    }

    let rgb = label.slice(s![.., .., 0..3]);

    let mut one_hot = Array3::from_elem((num_rows, num_cols, dictionary.len()), false);

    for (class_idx, class) in dictionary.classes().iter().enumerate() {
        let colour = [T::from(class.rgb[0]), T::from(class.rgb[1]), T::from(class.rgb[2])];

        Zip::from(one_hot.index_axis_mut(Axis(2), class_idx))
            .and(rgb.lanes(Axis(2)))
            .for_each(|is_class, pixel| {
                *is_class = pixel[0] == colour[0] && pixel[1] == colour[1] && pixel[2] == colour[2];
            });
    }

    Ok(one_hot)
}

/// Number of pixels that matched no class
pub fn count_unmatched<S>(one_hot: &ArrayBase<S, Ix3>) -> usize
    where S: Data<Elem = bool>
{
    one_hot.lanes(Axis(2))
        .into_iter()
        .filter(|lane| !lane.iter().any(|v| *v))
        .count()
}
