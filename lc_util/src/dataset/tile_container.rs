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
use std::fs::{create_dir_all, remove_dir_all};
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{info, warn};
use ndarray::{Array3, Axis, stack};

use crate::dataset::{DatasetFiles, DatasetLayout, Tile};
use crate::error::{PipelineError, Result};
use crate::gdal_tools::GdalTools;
use crate::io::list_tile_dirs;
use crate::label::{ClassDictionary, count_unmatched, one_hot_encode};
use crate::util::log_remaining_time;

/// All tiles of a products directory, assembled together into one dataset
#[derive(Debug, Clone)]
pub struct TileContainer {
    tiles: Vec<Tile>,
}

impl TileContainer {
    pub fn new(tiles: Vec<Tile>) -> Self {
        TileContainer { tiles }
    }

    /// One tile per non hidden entry of `products_dir`
    pub fn from_products_dir(products_dir: &Path, bands: &[String], resolution: &str) -> Result<Self> {
        let tiles = list_tile_dirs(products_dir)?
            .into_iter()
            .map(|p| Tile::new(p, bands, resolution))
            .collect();

        Ok(TileContainer { tiles })
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile_paths(&self) -> Vec<PathBuf> {
        self.tiles.iter().map(|t| t.path().to_path_buf()).collect()
    }

    pub fn print_tile_paths(&self) {
        for t in self.tiles.iter() {
            info!("{:?}", t.path());
        }
    }

    /// Builds X.npy (tiles, rows, cols, bands) and y.npy (tiles, rows, cols, classes) in `destination`.
    ///
    /// `destination` is cleared first.  Pixels whose label colour is not in `class_dict` are all false and logged.
    pub fn create_dataset(&self, gdal: &GdalTools, destination: &Path, class_dict: &ClassDictionary,
                          labels_path: &Path, tile_size: usize) -> Result<DatasetFiles> {
        if self.tiles.is_empty() {
            return Err(PipelineError::Precondition("No tiles to create a dataset from".to_string()));
        }

        let now = Instant::now();
        let mut features: Vec<Array3<u16>> = Vec::with_capacity(self.tiles.len());
        let mut labels: Vec<Array3<bool>> = Vec::with_capacity(self.tiles.len());

        for (i, tile) in self.tiles.iter().enumerate() {
            let x = tile.create_rasters(gdal, tile_size)?;
            let label_raster = tile.create_labels(gdal, labels_path, tile_size)?;
            let y = one_hot_encode(&label_raster, class_dict)?;

            let unmatched = count_unmatched(&y);
            if unmatched > 0 {
                warn!("{} pixels of {:?} have a colour not in the class dictionary", unmatched, tile.path());
            }

            let (x_rows, x_cols, _) = x.dim();
            let (y_rows, y_cols, _) = y.dim();
            if (x_rows, x_cols) != (y_rows, y_cols) {
                return Err(PipelineError::ShapeMismatch(format!(
                    "Tile {:?} has {}x{} band pixels but {}x{} label pixels",
                    tile.path(), x_rows, x_cols, y_rows, y_cols)));
            }

            if let Some(first) = features.first() {
                if x.dim() != first.dim() {
                    return Err(PipelineError::ShapeMismatch(format!(
                        "Tile {:?} is {:?}, the first tile is {:?}", tile.path(), x.dim(), first.dim())));
                }
            }

            features.push(x);
            labels.push(y);

            log_remaining_time(&now, i as u32 + 1, self.tiles.len() as u32, "Create dataset");
        }

        let x_views: Vec<_> = features.iter().map(|a| a.view()).collect();
        let x = stack(Axis(0), &x_views)?;
        drop(x_views);
        drop(features);

        let y_views: Vec<_> = labels.iter().map(|a| a.view()).collect();
        let y = stack(Axis(0), &y_views)?;

        if destination.exists() {
            remove_dir_all(destination)?;
        }
        create_dir_all(destination)?;

        info!("Writing dataset of {:?} features and {:?} labels to {:?}", x.dim(), y.dim(), destination);

        let output = DatasetLayout::new(destination).full();
        output.write(&x, &y)?;

        Ok(output)
    }
}

#[cfg(test)]
mod tile_container_tests {
    use std::fs::{create_dir_all, write};

    use ndarray::{Array2, Array3, s};

    use crate::label::LandCoverClass;
    use crate::raster::{get_temp_filename, write_test_band_u16, write_test_rgb_u8};
    use crate::dataset::LABELS_TILE_FILE;

    use super::*;

    fn class_dict() -> ClassDictionary {
        ClassDictionary::new(vec![
            LandCoverClass { name: "urban".to_string(), rgb: [230, 0, 77] },
            LandCoverClass { name: "forest".to_string(), rgb: [0, 166, 0] },
            LandCoverClass { name: "water".to_string(), rgb: [0, 204, 242] },
        ]).unwrap()
    }

    /// A tile whose bands and labels.tif are already on disk, so no external tool is needed
    fn write_tile(products: &Path, name: &str, size: usize, bands: &[String]) -> Tile {
        let tile = Tile::new(products.join(name), bands, "R20m");

        for (i, band) in bands.iter().enumerate() {
            let data = Array2::from_shape_fn((size, size), |(r, c)| (i * 100 + r * size + c) as u16);
            write_test_band_u16(&tile.band_file(band, "tif"), &data).unwrap();
        }

        //left half urban, right half forest, the last pixel an unknown colour
        let labels = Array3::from_shape_fn((size, size, 3), |(r, c, ch)| {
            let rgb = if r == size - 1 && c == size - 1 {
                [1, 2, 3]
            } else if c < size / 2 {
                [230, 0, 77]
            } else {
                [0, 166, 0]
            };
            rgb[ch]
        });
        write_test_rgb_u8(&tile.tile_dir().join(LABELS_TILE_FILE), &labels).unwrap();

        tile
    }

    fn bands() -> Vec<String> {
        vec!["B02".to_string(), "B03".to_string()]
    }

    #[test]
    fn test_from_products_dir() {
        let products = get_temp_filename("products");
        create_dir_all(products.join("33UXT_20190801")).unwrap();
        create_dir_all(products.join("34UDC_20190801")).unwrap();
        write(products.join(".DS_Store"), "").unwrap();

        let container = TileContainer::from_products_dir(&products, &bands(), "R20m").unwrap();

        assert_eq!(
            vec![products.join("33UXT_20190801"), products.join("34UDC_20190801")],
            container.tile_paths());
        assert_eq!(Path::new("R20m"), container.tiles()[0].tile_dir().strip_prefix(container.tiles()[0].path()).unwrap());
    }

    #[test]
    fn test_create_dataset() {
        let products = get_temp_filename("products");
        let t1 = write_tile(&products, "33UXT_20190801", 4, &bands());
        let t2 = write_tile(&products, "34UDC_20190801", 4, &bands());

        let destination = products.with_file_name("dataset");
        create_dir_all(&destination).unwrap();
        let stale = destination.join("X_cropped.npy");
        write(&stale, "").unwrap();

        let container = TileContainer::new(vec![t1, t2]);
        let files = container.create_dataset(
            &GdalTools::default(), &destination, &class_dict(), Path::new("/nowhere/rendered.tif"), 4).unwrap();

        assert!(!stale.exists());

        let (x, y) = files.read().unwrap();
        assert_eq!((2, 4, 4, 2), x.dim());
        assert_eq!((2, 4, 4, 3), y.dim());

        assert_eq!(vec![6, 106], x.slice(s![1, 1, 2, ..]).to_vec());
        assert_eq!(vec![true, false, false], y.slice(s![0, 0, 0, ..]).to_vec());
        assert_eq!(vec![false, true, false], y.slice(s![0, 0, 3, ..]).to_vec());
        assert_eq!(vec![false, false, false], y.slice(s![1, 3, 3, ..]).to_vec());
    }

    #[test]
    fn test_create_dataset_tile_sizes_differ() {
        let products = get_temp_filename("products");
        let t1 = write_tile(&products, "33UXT_20190801", 4, &bands());
        let t2 = write_tile(&products, "34UDC_20190801", 2, &bands());

        let container = TileContainer::new(vec![t1, t2]);
        let r = container.create_dataset(
            &GdalTools::default(), &products.with_file_name("dataset"), &class_dict(), Path::new("rendered.tif"), 4);

        assert!(matches!(r, Err(PipelineError::ShapeMismatch(_))));
    }

    #[test]
    fn test_create_dataset_no_tiles() {
        let container = TileContainer::new(vec![]);
        let r = container.create_dataset(
            &GdalTools::default(), &get_temp_filename("dataset"), &class_dict(), Path::new("rendered.tif"), 4);

        assert!(matches!(r, Err(PipelineError::Precondition(_))));
    }
}
