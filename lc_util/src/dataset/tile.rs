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
use std::fs::remove_file;
use std::path::{Path, PathBuf};

use log::{debug, info};
use ndarray::{Array2, Array3, Axis, stack};

use crate::error::{PipelineError, Result, require_file};
use crate::gdal_tools::{GdalTools, run_to_output};
use crate::raster::{read_band_u16, read_multiband_u8};
use crate::refine::remove_shapefile;

pub const CLIPPER_FILE: &str = "clipper.shp";
pub const LABELS_TILE_FILE: &str = "labels.tif";
const LABELS_WARPED_FILE: &str = "labels_warped.tif";

/// A Sentinel 2 tile on disk, each band in its own file under `<path>/<resolution>/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    path: PathBuf,
    bands: Vec<String>,
    resolution: String,
}

impl Tile {
    /// `resolution` is the band sub directory, e.g. R10m, R20m, R60m
    pub fn new<P: Into<PathBuf>>(path: P, bands: &[String], resolution: &str) -> Self {
        Tile {
            path: path.into(),
            bands: bands.to_vec(),
            resolution: resolution.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bands(&self) -> &[String] {
        &self.bands
    }

    pub fn tile_dir(&self) -> PathBuf {
        self.path.join(&self.resolution)
    }

    pub fn band_file(&self, band: &str, ext: &str) -> PathBuf {
        self.tile_dir().join(format!("{}.{}", band, ext))
    }

    /// The UTM zone is the first two characters of the tile directory name, e.g. 33 for 33UXT_20190801
    pub fn utm_zone(&self) -> Result<u8> {
        let name = self.path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let zone: Option<u8> = name.get(0..2).and_then(|z| z.parse().ok());

        match zone {
            Some(z) if (1..=60).contains(&z) => Ok(z),
            _ => Err(PipelineError::Precondition(format!(
                "Tile directory {:?} must start with its two digit UTM zone", name))),
        }
    }

    /// EPSG code of the northern hemisphere WGS 84 / UTM zone of this tile
    pub fn target_srs(&self) -> Result<String> {
        Ok(format!("EPSG:326{:02}", self.utm_zone()?))
    }

    /// Reads every band as (rows, cols, bands).  Bands without a .tif are first translated from
    /// their .jp2 to a `tile_size` x `tile_size` UInt16 GeoTIFF, existing .tif files are reused.
    /// A failed translation leaves no .tif behind.
    pub fn create_rasters(&self, gdal: &GdalTools, tile_size: usize) -> Result<Array3<u16>> {
        if self.bands.is_empty() {
            return Err(PipelineError::Precondition("Bands may not be empty".to_string()));
        }

        info!("Create rasters for: {:?}", self.path);

        let mut band_data: Vec<Array2<u16>> = Vec::with_capacity(self.bands.len());

        for band in self.bands.iter() {
            let tif = self.band_file(band, "tif");

            if !tif.exists() {
                let jp2 = self.band_file(band, "jp2");
                require_file(&jp2, "Band has neither a .tif nor a .jp2")?;

                debug!("Converting band {}", band);
                run_to_output(&tif, |partial| gdal.translate_band(&jp2, partial, tile_size))?;
            }

            let data = read_band_u16(&tif)?;

            if let Some(first) = band_data.first() {
                if first.dim() != data.dim() {
                    return Err(PipelineError::ShapeMismatch(format!(
                        "Band {} of {:?} is {:?}, band {} is {:?}",
                        band, self.path, data.dim(), self.bands[0], first.dim())));
                }
            }

            band_data.push(data);
        }

        let views: Vec<_> = band_data.iter().map(|b| b.view()).collect();
        Ok(stack(Axis(2), &views)?)
    }

    /// Cuts the label raster at `labels_path` to the footprint of this tile and reads it as (rows, cols, bands).
    ///
    /// The first band must already be a .tif, see [`Tile::create_rasters`].  The cut labels are
    /// kept as labels.tif in the tile directory and reused on the next run.
    pub fn create_labels(&self, gdal: &GdalTools, labels_path: &Path, tile_size: usize) -> Result<Array3<u8>> {
        let first_band = self.bands.first()
            .ok_or_else(|| PipelineError::Precondition("Bands may not be empty".to_string()))?;

        let tile_dir = self.tile_dir();
        let band_file = self.band_file(first_band, "tif");
        require_file(&band_file, "You have to rasterize the tile first")?;

        let labels_output = tile_dir.join(LABELS_TILE_FILE);

        if !labels_output.exists() {
            require_file(labels_path, "Labels raster not found")?;

            let clipper = tile_dir.join(CLIPPER_FILE);
            let warped = tile_dir.join(LABELS_WARPED_FILE);
            let target_srs = self.target_srs()?;

            info!("Cutting labels for {:?} in {}", self.path, target_srs);

            //gdaltindex appends to an existing index
            remove_shapefile(&clipper)?;
            gdal.tile_index(&clipper, &band_file).run()?;
            gdal.warp_to_cutline(labels_path, &warped, &target_srs, &clipper).run()?;
            run_to_output(&labels_output, |partial| gdal.translate_resize(&warped, partial, tile_size))?;

            remove_file(&warped)?;
        }

        read_multiband_u8(&labels_output)
    }
}

#[cfg(test)]
mod tile_tests {
    use std::fs::{create_dir_all, write};

    use ndarray::{Array2, Array3, s};

    use crate::gdal_tools::partial_path;
    use crate::raster::{get_temp_filename, write_test_band_u16, write_test_rgb_u8};
    #[cfg(unix)]
    use crate::raster::write_fake_tool;

    use super::*;

    fn bands(names: &[&str]) -> Vec<String> {
        names.iter().map(|b| b.to_string()).collect()
    }

    #[test]
    fn test_paths() {
        let tile = Tile::new("/data/products/33UXT_20190801", &bands(&["B02", "B03"]), "R20m");

        assert_eq!(Path::new("/data/products/33UXT_20190801/R20m"), tile.tile_dir());
        assert_eq!(Path::new("/data/products/33UXT_20190801/R20m/B03.jp2"), tile.band_file("B03", "jp2"));
        assert_eq!(33, tile.utm_zone().unwrap());
        assert_eq!("EPSG:32633", tile.target_srs().unwrap());
    }

    #[test]
    fn test_utm_zone_single_digit_and_invalid() {
        let tile = Tile::new("/data/04QFJ", &bands(&["B02"]), "R20m");
        assert_eq!("EPSG:32604", tile.target_srs().unwrap());

        let tile = Tile::new("/data/S2A_MSIL2A_T33UXT", &bands(&["B02"]), "R20m");
        assert!(matches!(tile.utm_zone(), Err(PipelineError::Precondition(_))));

        let tile = Tile::new("/data/99XXX", &bands(&["B02"]), "R20m");
        assert!(tile.utm_zone().is_err());
    }

    #[test]
    fn test_create_rasters_stacks_bands() {
        let root = get_temp_filename("34UDC_20190801");
        let tile = Tile::new(&root, &bands(&["B02", "B03", "B04"]), "R20m");

        for (i, band) in tile.bands().iter().enumerate() {
            let data = Array2::from_shape_fn((4, 6), |(r, c)| (i * 1000 + r * 10 + c) as u16);
            write_test_band_u16(&tile.band_file(band, "tif"), &data).unwrap();
        }

        let features = tile.create_rasters(&GdalTools::default(), 4).unwrap();

        assert_eq!((4, 6, 3), features.dim());
        assert_eq!(vec![23, 1023, 2023], features.slice(s![2, 3, ..]).to_vec());
    }

    #[test]
    fn test_create_rasters_band_shapes_differ() {
        let root = get_temp_filename("34UDC_20190801");
        let tile = Tile::new(&root, &bands(&["B02", "B03"]), "R20m");

        write_test_band_u16(&tile.band_file("B02", "tif"), &Array2::zeros((4, 4))).unwrap();
        write_test_band_u16(&tile.band_file("B03", "tif"), &Array2::zeros((4, 2))).unwrap();

        assert!(matches!(tile.create_rasters(&GdalTools::default(), 4), Err(PipelineError::ShapeMismatch(_))));
    }

    #[test]
    fn test_create_rasters_missing_band() {
        let root = get_temp_filename("34UDC_20190801");
        let tile = Tile::new(&root, &bands(&["B02"]), "R20m");

        match tile.create_rasters(&GdalTools::default(), 4) {
            Err(PipelineError::MissingFile { path, .. }) => assert_eq!(tile.band_file("B02", "jp2"), path),
            other => panic!("Expected a missing file error, got {:?}", other),
        }

        let no_bands = Tile::new(&root, &[], "R20m");
        assert!(matches!(no_bands.create_rasters(&GdalTools::default(), 4), Err(PipelineError::Precondition(_))));
    }

    #[test]
    fn test_create_labels_requires_rasters() {
        let root = get_temp_filename("34UDC_20190801");
        let tile = Tile::new(&root, &bands(&["B02"]), "R20m");

        let r = tile.create_labels(&GdalTools::default(), Path::new("rendered.tif"), 4);
        match r {
            Err(PipelineError::MissingFile { path, msg }) => {
                assert_eq!(tile.band_file("B02", "tif"), path);
                assert!(msg.contains("rasterize"));
            }
            other => panic!("Expected a missing file error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_labels_reuses_existing() {
        let root = get_temp_filename("34UDC_20190801");
        let tile = Tile::new(&root, &bands(&["B02"]), "R20m");

        write_test_band_u16(&tile.band_file("B02", "tif"), &Array2::zeros((2, 2))).unwrap();
        let labels = Array3::from_shape_fn((2, 2, 4), |(r, c, ch)| if ch == 3 { 255 } else { (r * 2 + c) as u8 });
        write_test_rgb_u8(&tile.tile_dir().join(LABELS_TILE_FILE), &labels).unwrap();

        //the labels raster is not needed once labels.tif exists
        let read = tile.create_labels(&GdalTools::default(), Path::new("/nowhere/rendered.tif"), 2).unwrap();

        assert_eq!(labels, read);
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_translate_is_not_reused() {
        let root = get_temp_filename("34UDC_20190801");
        let tile = Tile::new(&root, &bands(&["B02"]), "R20m");
        let tif = tile.band_file("B02", "tif");

        create_dir_all(tile.tile_dir()).unwrap();
        write(tile.band_file("B02", "jp2"), "").unwrap();

        //writes the start of a tiff to its output, then fails
        let bin_dir = root.with_file_name("bin");
        write_fake_tool(&bin_dir, "gdal_translate", "for last; do :; done\nprintf 'II*' > \"$last\"\nexit 1").unwrap();
        let gdal = GdalTools::new(Some(bin_dir.clone()));

        let r = tile.create_rasters(&gdal, 4);
        assert!(matches!(r, Err(PipelineError::ExternalTool { status: Some(1), .. })));
        assert!(!tif.exists());
        assert!(!partial_path(&tif).exists());

        //a working translate on the next run
        let translated = root.with_file_name("translated.tif");
        let data = Array2::from_shape_fn((4, 4), |(r, c)| (r * 4 + c) as u16);
        write_test_band_u16(&translated, &data).unwrap();
        write_fake_tool(&bin_dir, "gdal_translate", &format!("for last; do :; done\ncp '{}' \"$last\"", translated.display())).unwrap();

        let features = tile.create_rasters(&gdal, 4).unwrap();
        assert_eq!((4, 4, 1), features.dim());
        assert_eq!(15, features[[3, 3, 0]]);
        assert!(tif.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_label_resize_is_not_reused() {
        let root = get_temp_filename("34UDC_20190801");
        let tile = Tile::new(&root, &bands(&["B02"]), "R20m");
        let labels_tif = tile.tile_dir().join(LABELS_TILE_FILE);

        write_test_band_u16(&tile.band_file("B02", "tif"), &Array2::zeros((2, 2))).unwrap();
        let rendered = root.with_file_name("rendered.tif");
        write(&rendered, "").unwrap();

        let bin_dir = root.with_file_name("bin");
        write_fake_tool(&bin_dir, "gdaltindex", "exit 0").unwrap();
        write_fake_tool(&bin_dir, "gdalwarp", "for last; do :; done\n: > \"$last\"").unwrap();
        write_fake_tool(&bin_dir, "gdal_translate", "for last; do :; done\nprintf 'II*' > \"$last\"\nexit 1").unwrap();
        let gdal = GdalTools::new(Some(bin_dir.clone()));

        let r = tile.create_labels(&gdal, &rendered, 2);
        assert!(matches!(r, Err(PipelineError::ExternalTool { status: Some(1), .. })));
        assert!(!labels_tif.exists());
        assert!(!partial_path(&labels_tif).exists());

        let resized = root.with_file_name("resized.tif");
        let labels = Array3::from_shape_fn((2, 2, 3), |(r, c, ch)| (r * 20 + c * 10 + ch) as u8);
        write_test_rgb_u8(&resized, &labels).unwrap();
        write_fake_tool(&bin_dir, "gdal_translate", &format!("for last; do :; done\ncp '{}' \"$last\"", resized.display())).unwrap();

        let read = tile.create_labels(&gdal, &rendered, 2).unwrap();
        assert_eq!(labels, read);
        assert!(labels_tif.exists());
        assert!(!tile.tile_dir().join(LABELS_WARPED_FILE).exists());
    }
}
