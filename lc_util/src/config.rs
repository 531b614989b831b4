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
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PipelineError, Result};

/// Urban Atlas classes left out of the refinement, they become nodata so CORINE shows through
pub const DEFAULT_EXCLUDED_CODES: [i64; 13] = [
    31000, 12300, 12400, 13400, 14100, 14200, 32000, 33000, 21000, 22000, 23000, 24000, 25000,
];

pub const DEFAULT_BANDS: [&str; 11] = [
    "B02", "B03", "B04", "B05", "B06", "B07", "B08", "B8A", "B11", "B12", "SCL",
];

/// The whole pipeline file, each binary reads the section it needs
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub gdal: GdalConfig,
    pub fusion: Option<FusionConfig>,
    pub generator: Option<GeneratorConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GdalConfig {
    /// Directory holding gdal_translate, gdalwarp etc.  When unset they are taken from the PATH
    pub bin_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FusionConfig {
    pub urban_atlas_dir: PathBuf,
    pub clc_raster: PathBuf,
    /// Intermediate merge.shp, merge.tif, merge_filtered.tif go here
    pub work_dir: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub unzip: bool,
    #[serde(default = "default_field_name")]
    pub field_name: String,
    #[serde(default = "default_resolution")]
    pub resolution: f64,
    #[serde(default = "default_srs")]
    pub srs: String,
    #[serde(default = "default_excluded_codes")]
    pub excluded_codes: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    pub products_dir: PathBuf,
    pub output_dir: PathBuf,
    pub class_dict: PathBuf,
    pub labels_raster: PathBuf,
    #[serde(default = "default_bands")]
    pub bands: Vec<String>,
    #[serde(default = "default_resolution_dir")]
    pub resolution: String,
    #[serde(default = "default_tile_size_px")]
    pub tile_size_px: usize,
    #[serde(default = "default_crop_size")]
    pub crop_size: usize,
    #[serde(default = "default_split_ratio")]
    pub split_ratio: f64,
    /// Unset means every run draws a different split
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_field_name() -> String {
    "CODE2012".to_string()
}

fn default_resolution() -> f64 {
    30.0
}

fn default_srs() -> String {
    "EPSG:3035".to_string()
}

fn default_excluded_codes() -> Vec<i64> {
    DEFAULT_EXCLUDED_CODES.to_vec()
}

fn default_bands() -> Vec<String> {
    DEFAULT_BANDS.iter().map(|b| b.to_string()).collect()
}

fn default_resolution_dir() -> String {
    "R20m".to_string()
}

fn default_tile_size_px() -> usize {
    5376
}

fn default_crop_size() -> usize {
    256
}

fn default_split_ratio() -> f64 {
    0.8
}

impl PipelineConfig {
    pub fn read(path: &Path) -> Result<Self> {
        let text = read_to_string(path)
            .map_err(|e| PipelineError::missing_file(path, e.to_string()))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn fusion(&self) -> Result<&FusionConfig> {
        self.fusion.as_ref()
            .ok_or_else(|| PipelineError::Precondition("Config has no [fusion] section".to_string()))
    }

    pub fn generator(&self) -> Result<&GeneratorConfig> {
        self.generator.as_ref()
            .ok_or_else(|| PipelineError::Precondition("Config has no [generator] section".to_string()))
    }
}
