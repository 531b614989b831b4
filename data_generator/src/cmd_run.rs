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

use lc_util::config::PipelineConfig;
use lc_util::dataset::{Cropper, TileContainer};
use lc_util::gdal_tools::GdalTools;
use lc_util::label::ClassDictionary;
use lc_util::util::format_duration;

/*
cargo run --release --bin data_generator -- --log-level Info run --config config/pipeline.toml
 */

#[derive(StructOpt)]
pub struct RunArgs {
    #[structopt(long, parse(from_os_str), help="Pipeline TOML file with a [generator] section")]
    config: PathBuf,
}

/// Creates the dataset, crops it and splits it
pub fn run_pipeline(args: &RunArgs) -> Result<()> {
    let now = Instant::now();

    let config = PipelineConfig::read(&args.config)
        .with_context(|| format!("Reading {:?}", args.config))?;
    let generator = config.generator()?;

    let gdal = GdalTools::new(config.gdal.bin_dir.clone());
    debug!("GDAL version: {}", gdal.version()?);

    let class_dict = ClassDictionary::read(&generator.class_dict)?;

    let container = TileContainer::from_products_dir(&generator.products_dir, &generator.bands, &generator.resolution)?;
    container.print_tile_paths();

    let full = container.create_dataset(
        &gdal, &generator.output_dir, &class_dict, &generator.labels_raster, generator.tile_size_px)
        .context("Creating dataset")?;

    let cropper = Cropper::new(&generator.output_dir);
    let cropped = cropper.crop(&full, generator.crop_size).context("Cropping dataset")?;
    let split = cropper.split(&cropped, generator.split_ratio, generator.seed).context("Splitting dataset")?;

    info!("Training data in {:?}, validation data in {:?}, took {}",
          split.train.features, split.val.features, format_duration(now.elapsed()));

    Ok(())
}
