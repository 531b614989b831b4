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
//! Refinement of the CORINE land cover raster with Urban Atlas polygons.
//!
//! Every stage gets its inputs and output path explicitly and hands back the file it wrote.

use std::fs::{create_dir_all, remove_file};
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info};

use crate::error::{PipelineError, Result, require_file};
use crate::gdal_tools::{GdalTools, layer_name, run_to_output};
use crate::util::log_remaining_time;

/// Field holding the class code in the merged vector layer
pub const CODE_FIELD: &str = "code";
pub const REFINE_NO_DATA: f64 = 0.0;

const SHAPEFILE_SIDECARS: [&str; 6] = ["shp", "shx", "dbf", "prj", "cpg", "qix"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorFile {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterFile {
    pub path: PathBuf,
}

impl RasterFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        RasterFile { path: path.into() }
    }
}

fn prepare_output(output: &Path) -> Result<()> {
    if let Some(a) = output.parent() {
        if !a.as_os_str().is_empty() && !a.exists() {
            create_dir_all(a)?;
        }
    }
    Ok(())
}

/// Deletes a shapefile together with its .dbf, .shx etc.
pub fn remove_shapefile(path: &Path) -> Result<()> {
    for ext in SHAPEFILE_SIDECARS.iter() {
        let p = path.with_extension(ext);
        if p.exists() {
            debug!("Removing {:?}", p);
            remove_file(p)?;
        }
    }
    Ok(())
}

/// Merges the polygons of `shapefiles` into one layer at `output` with an integer `code` field
/// read from `field_name`.  An existing `output` is replaced.
pub fn merge_vectors(gdal: &GdalTools, shapefiles: &[PathBuf], field_name: &str, output: &Path) -> Result<VectorFile> {
    if shapefiles.is_empty() {
        return Err(PipelineError::Precondition("No shapefiles to merge".to_string()));
    }
    for s in shapefiles.iter() {
        require_file(s, "Input shapefile not found")?;
    }

    prepare_output(output)?;
    remove_shapefile(output)?;

    let output_layer = layer_name(output);
    let now = Instant::now();

    for (i, s) in shapefiles.iter().enumerate() {
        info!("Merging file {} of {}: {:?}", i + 1, shapefiles.len(), s);

        gdal.ogr_copy_code_field(s, output, &output_layer, field_name, i > 0).run()?;

        log_remaining_time(&now, i as u32 + 1, shapefiles.len() as u32, "Vector merge");
    }

    Ok(VectorFile { path: output.to_path_buf() })
}

/// Burns the `code` field of `vector` into a Float32 raster with `resolution` sized pixels, nodata 0
pub fn rasterize(gdal: &GdalTools, vector: &VectorFile, resolution: f64, srs: &str, output: &Path) -> Result<RasterFile> {
    require_file(&vector.path, "You need to merge the vector files first")?;

    if !(resolution > 0.0) {
        return Err(PipelineError::Precondition(format!("Resolution must be positive, not {}", resolution)));
    }

    prepare_output(output)?;
    if output.exists() {
        remove_file(output)?;
    }

    info!("Rasterizing {:?} at {} to {:?}", vector.path, resolution, output);

    run_to_output(output, |partial| gdal.rasterize(&vector.path, partial, CODE_FIELD, resolution, REFINE_NO_DATA, srs))?;

    Ok(RasterFile::new(output))
}

/// Classes in `codes` are replaced with nodata
pub fn convert_to_nodata(gdal: &GdalTools, raster: &RasterFile, codes: &[i64], output: &Path) -> Result<RasterFile> {
    require_file(&raster.path, "Raster to filter not found")?;

    if codes.is_empty() {
        return Err(PipelineError::Precondition("No class codes given to convert to nodata".to_string()));
    }

    prepare_output(output)?;

    info!("Setting {} classes of {:?} to nodata", codes.len(), raster.path);

    run_to_output(output, |partial| gdal.calc_codes_to_nodata(&raster.path, partial, codes, REFINE_NO_DATA))?;

    Ok(RasterFile::new(output))
}

/// Mosaics `rasters` in order into `output`, later rasters overwrite earlier ones except where they are nodata
pub fn merge_rasters(gdal: &GdalTools, rasters: &[RasterFile], output: &Path) -> Result<RasterFile> {
    if rasters.is_empty() {
        return Err(PipelineError::Precondition("No rasters to merge".to_string()));
    }
    for r in rasters.iter() {
        require_file(&r.path, "Input raster not found")?;
    }

    prepare_output(output)?;
    if output.exists() {
        remove_file(output)?;
    }

    let paths: Vec<PathBuf> = rasters.iter().map(|r| r.path.clone()).collect();

    info!("Merging {} rasters into {:?}", paths.len(), output);

    run_to_output(output, |partial| gdal.merge(&paths, partial, REFINE_NO_DATA))?;

    Ok(RasterFile::new(output))
}
