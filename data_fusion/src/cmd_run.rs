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
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, info};
use structopt::StructOpt;

use lc_util::config::{FusionConfig, PipelineConfig};
use lc_util::gdal_tools::GdalTools;
use lc_util::io::{find_urban_atlas_shapefiles, unzip};
use lc_util::refine::{RasterFile, convert_to_nodata, merge_rasters, merge_vectors, rasterize};
use lc_util::util::format_duration;

pub const MERGED_VECTOR_FILE: &str = "merge.shp";
pub const MERGED_RASTER_FILE: &str = "merge.tif";
pub const FILTERED_RASTER_FILE: &str = "merge_filtered.tif";

/*
cargo run --release --bin data_fusion -- --log-level Info run --config config/pipeline.toml
 */

#[derive(StructOpt)]
pub struct RunArgs {
    #[structopt(long, parse(from_os_str), help="Pipeline TOML file with a [fusion] section")]
    config: PathBuf,
}

pub fn run_pipeline(args: &RunArgs) -> Result<()> {
    let config = PipelineConfig::read(&args.config)
        .with_context(|| format!("Reading {:?}", args.config))?;
    let fusion = config.fusion()?;

    let gdal = GdalTools::new(config.gdal.bin_dir.clone());
    debug!("GDAL version: {}", gdal.version()?);

    let output = refine_land_cover(&gdal, fusion)?;

    info!("Refined land cover raster written to {:?}", output.path);

    Ok(())
}

/// Urban Atlas polygons are merged, rasterized and filtered, then laid over the CORINE raster
pub fn refine_land_cover(gdal: &GdalTools, fusion: &FusionConfig) -> Result<RasterFile> {
    let now = Instant::now();

    if fusion.unzip {
        unzip(&fusion.urban_atlas_dir)?;
    }

    let shapefiles = find_urban_atlas_shapefiles(&fusion.urban_atlas_dir)?;
    info!("Found {} Urban Atlas shapefiles", shapefiles.len());

    let work_dir = &fusion.work_dir;

    let merged = merge_vectors(gdal, &shapefiles, &fusion.field_name, &work_dir.join(MERGED_VECTOR_FILE))
        .context("Merging Urban Atlas vectors")?;

    let raster = rasterize(gdal, &merged, fusion.resolution, &fusion.srs, &work_dir.join(MERGED_RASTER_FILE))
        .context("Rasterizing Urban Atlas")?;

    let filtered = convert_to_nodata(gdal, &raster, &fusion.excluded_codes, &work_dir.join(FILTERED_RASTER_FILE))
        .context("Removing excluded classes")?;

    let output = merge_rasters(gdal, &[RasterFile::new(&fusion.clc_raster), filtered], &fusion.output)
        .context("Merging with the CORINE raster")?;

    info!("Refinement took {}", format_duration(now.elapsed()));

    Ok(output)
}
