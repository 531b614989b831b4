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
use rand::Rng;
use rand::seq::index::sample;

use crate::error::{PipelineError, Result};

/// Disjoint train / validation indices into a patch batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSplit {
    /// In the order they were drawn
    pub train: Vec<usize>,
    /// Ascending
    pub val: Vec<usize>,
}

/// floor(num_patches * ratio)
pub fn train_count(num_patches: usize, ratio: f64) -> Result<usize> {
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(PipelineError::Precondition(format!("Split ratio must be in (0, 1), not {}", ratio)));
    }

    Ok((num_patches as f64 * ratio).floor() as usize)
}

/// Draws floor(num_patches * ratio) indices without replacement for training, the rest is validation
pub fn split_indices<R: Rng + ?Sized>(num_patches: usize, ratio: f64, rng: &mut R) -> Result<DatasetSplit> {
    let num_train = train_count(num_patches, ratio)?;

    let train = sample(rng, num_patches, num_train).into_vec();

    let mut in_train = vec![false; num_patches];
    for i in train.iter() {
        in_train[*i] = true;
    }

    let val = (0..num_patches).filter(|i| !in_train[*i]).collect();

    Ok(DatasetSplit { train, val })
}

/// The entries of `batch` at `indices`, in that order
pub fn select_patches<A, S>(batch: &ArrayBase<S, Ix4>, indices: &[usize]) -> Result<Array4<A>>
    where A: Clone,
          S: Data<Elem = A>
{
    if indices.is_empty() {
        let (_, num_rows, num_cols, num_channels) = batch.dim();
        return Ok(Array4::from_shape_vec((0, num_rows, num_cols, num_channels), Vec::new())?);
    }

    if let Some(i) = indices.iter().find(|i| **i >= batch.len_of(Axis(0))) {
        return Err(PipelineError::ShapeMismatch(format!(
            "Index {} out of range for {} patches", i, batch.len_of(Axis(0)))));
    }

    Ok(batch.select(Axis(0), indices))
}

#[cfg(test)]
mod split_tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn test_split_partitions_indices() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for num_patches in [0, 1, 2, 8, 10, 37, 100] {
            for ratio in [0.1, 0.29, 0.5, 0.8, 0.99] {
                let split = split_indices(num_patches, ratio, &mut rng).unwrap();

                assert_eq!((num_patches as f64 * ratio).floor() as usize, split.train.len());
                assert_eq!(num_patches - split.train.len(), split.val.len());

                let train: HashSet<usize> = split.train.iter().cloned().collect();
                let val: HashSet<usize> = split.val.iter().cloned().collect();
                assert_eq!(split.train.len(), train.len(), "train drawn without replacement");
                assert!(train.is_disjoint(&val));

                let all: HashSet<usize> = train.union(&val).cloned().collect();
                assert_eq!((0..num_patches).collect::<HashSet<_>>(), all);

                assert!(split.val.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn test_eight_patches() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let split = split_indices(8, 0.8, &mut rng).unwrap();

        assert_eq!(6, split.train.len());
        assert_eq!(2, split.val.len());
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = split_indices(50, 0.8, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        let b = split_indices(50, 0.8, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_bad_ratio() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        for ratio in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(split_indices(8, ratio, &mut rng), Err(PipelineError::Precondition(_))));
        }
    }

    #[test]
    fn test_select_patches_keeps_alignment() {
        let x = Array4::from_shape_fn((4, 1, 1, 2), |(n, _, _, b)| (n * 10 + b) as u16);
        let y = Array4::from_shape_fn((4, 1, 1, 3), |(n, _, _, k)| n % 3 == k);

        let idx = [3, 0];
        let xs = select_patches(&x, &idx).unwrap();
        let ys = select_patches(&y, &idx).unwrap();

        assert_eq!(vec![30, 31, 0, 1], xs.iter().cloned().collect::<Vec<_>>());
        assert_eq!(vec![true, false, false, true, false, false], ys.iter().cloned().collect::<Vec<_>>());

        assert_eq!((0, 1, 1, 2), select_patches(&x, &[]).unwrap().dim());
        assert!(matches!(select_patches(&x, &[4]), Err(PipelineError::ShapeMismatch(_))));
    }
}
