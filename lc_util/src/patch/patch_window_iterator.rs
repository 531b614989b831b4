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
/// Walks a (num_rows, num_cols) raster in square windows of `patch_size`, row major.
///
/// Unlike a chunk iterator there is no short last window, construction fails
/// unless both dimensions are a multiple of the patch size.
#[derive(Debug, Clone)]
pub struct PatchWindowIterator {
    patch_size: usize,
    num_grid_cols: usize,
    num_steps: usize,
    cur_step: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchWindow {
    //Row, column order, same as the array index
    pub window_offset: (usize, usize),

    pub row_range: (usize, usize),
    pub col_range: (usize, usize),

    pub current_step: usize,
    pub num_steps: usize
}

impl PatchWindowIterator {
    pub fn new(num_rows: usize, num_cols: usize, patch_size: usize) -> Option<Self> {
        if patch_size == 0 || num_rows % patch_size != 0 || num_cols % patch_size != 0 {
            return None;
        }

        let num_grid_rows = num_rows / patch_size;
        let num_grid_cols = num_cols / patch_size;

        Some(Self {
            patch_size,
            num_grid_cols,
            num_steps: num_grid_rows * num_grid_cols,
            cur_step: 0,
        })
    }

    /// Number of patches in one row of the patch grid
    pub fn grid_cols(&self) -> usize {
        self.num_grid_cols
    }

    pub fn grid_rows(&self) -> usize {
        if self.num_grid_cols == 0 {
            0
        } else {
            self.num_steps / self.num_grid_cols
        }
    }

    pub fn patch_size(&self) -> usize {
        self.patch_size
    }
}

impl Iterator for PatchWindowIterator {
    type Item = PatchWindow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur_step >= self.num_steps {
            return None;
        }

        let grid_row = self.cur_step / self.num_grid_cols;
        let grid_col = self.cur_step % self.num_grid_cols;

        let row_start = grid_row * self.patch_size;
        let col_start = grid_col * self.patch_size;

        let r = PatchWindow {
            window_offset: (row_start, col_start),
            //exclusive ends
            row_range: (row_start, row_start + self.patch_size),
            col_range: (col_start, col_start + self.patch_size),
            current_step: self.cur_step,
            num_steps: self.num_steps,
        };

        self.cur_step += 1;

        Some(r)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let l = self.num_steps - self.cur_step;
        (l, Some(l))
    }
}

impl ExactSizeIterator for PatchWindowIterator {}

#[cfg(test)]
mod patch_window_iterator_tests {
    use super::*;

    #[test]
    fn test_window_iter_4patches() {
        let mut it = PatchWindowIterator::new(4, 4, 2).unwrap();
        assert_eq!(4, it.len());

        let item = it.next().unwrap();
        assert_eq!((0, 0), item.window_offset);
        assert_eq!((0, 2), item.row_range);
        assert_eq!((0, 2), item.col_range);

        let item = it.next().unwrap();
        assert_eq!((0, 2), item.window_offset);

        let item = it.next().unwrap();
        assert_eq!((2, 0), item.window_offset);

        let item = it.next().unwrap();
        assert_eq!((2, 2), item.window_offset);
        assert_eq!(3, item.current_step);
        assert_eq!(4, item.num_steps);

        assert!(it.next().is_none());
    }

    #[test]
    fn test_window_iter_rectangle() {
        let mut it = PatchWindowIterator::new(2, 6, 2).unwrap();
        assert_eq!(3, it.len());
        assert_eq!(1, it.grid_rows());
        assert_eq!(3, it.grid_cols());

        let offsets: Vec<_> = it.by_ref().map(|w| w.window_offset).collect();
        assert_eq!(vec![(0, 0), (0, 2), (0, 4)], offsets);
        assert_eq!(0, it.len());
    }

    #[test]
    fn test_window_iter_single_patch() {
        let mut it = PatchWindowIterator::new(52, 52, 52).unwrap();
        assert_eq!(1, it.len());
        assert_eq!((0, 52), it.next().unwrap().col_range);
        assert!(it.next().is_none());
    }

    #[test]
    fn test_window_iter_not_divisible() {
        assert!(PatchWindowIterator::new(5, 4, 2).is_none());
        assert!(PatchWindowIterator::new(4, 5, 2).is_none());
        assert!(PatchWindowIterator::new(4, 4, 0).is_none());
        assert!(PatchWindowIterator::new(4, 4, 8).is_none());
    }
}
