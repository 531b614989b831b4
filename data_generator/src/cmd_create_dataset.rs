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

use anyhow::{Context, Result};
use log::{info, warn};
use structopt::StructOpt;

use lc_util::dataset::{DatasetLayout, TileContainer};
use lc_util::label::ClassDictionary;

use crate::gdal_args::GdalArgs;
use crate::tile_args::TileArgs;

/*
cargo run --release --bin data_generator -- --log-level Info create-dataset \
--products-dir /data/products/base_poland \
--output-dir /data/datasets/base_poland \
--class-dict /data/class_dict.csv \
--labels-raster /data/corine/rendered_poland.tif
 */

#[derive(StructOpt)]
pub struct CreateDatasetArgs {
    #[structopt(flatten)]
    gdal: GdalArgs,

    #[structopt(flatten)]
    tiles: TileArgs,

    #[structopt(long, parse(from_os_str), help="Cleared and recreated")]
    output_dir: PathBuf,

    #[structopt(long, parse(from_os_str), help="CSV of class name, r, g, b")]
    class_dict: PathBuf,

    #[structopt(long, parse(from_os_str), help="Rendered RGB land cover raster")]
    labels_raster: PathBuf,

    #[structopt(long, default_value = "5376", help="Every band and the labels are resampled to this many pixels square")]
    tile_size_px: usize,

    #[structopt(long)]
    clean: bool,
}

pub fn create_dataset(args: &CreateDatasetArgs) -> Result<()> {
    let output = DatasetLayout::new(&args.output_dir).full();

    if !args.clean && output.features.exists() {
        warn!("{:?} already exists and --clean not passed, doing nothing", &output.features);
        return Ok(());
    }

    let class_dict = ClassDictionary::read(&args.class_dict)?;
    info!("Classes: {:?}", class_dict.class_names());

    let container = TileContainer::from_products_dir(
        &args.tiles.products_dir, &args.tiles.bands(), &args.tiles.resolution)?;
    container.print_tile_paths();

    container.create_dataset(&args.gdal.tools(), &args.output_dir, &class_dict, &args.labels_raster, args.tile_size_px)
        .with_context(|| format!("Creating dataset in {:?}", args.output_dir))?;

    Ok(())
}

#[cfg(test)]
mod cmd_create_dataset_tests {
    use std::fs::{create_dir_all, read_to_string, write};

    use lc_util::raster::get_temp_filename;

    use super::*;

    fn args(output_dir: PathBuf, clean: bool) -> CreateDatasetArgs {
        CreateDatasetArgs {
            gdal: GdalArgs { gdal_bin_dir: None },
            tiles: TileArgs {
                products_dir: output_dir.with_file_name("no_products"),
                band: vec![],
                resolution: "R20m".to_string(),
            },
            class_dict: output_dir.with_file_name("no_class_dict.csv"),
            labels_raster: output_dir.with_file_name("no_rendered.tif"),
            output_dir,
            tile_size_px: 4,
            clean,
        }
    }

    #[test]
    fn test_existing_dataset_kept_without_clean() {
        let output_dir = get_temp_filename("dataset");
        create_dir_all(&output_dir).unwrap();
        let features = DatasetLayout::new(&output_dir).full().features;
        write(&features, "keep").unwrap();

        //nothing else is read, so the missing inputs don't matter
        create_dataset(&args(output_dir, false)).unwrap();

        assert_eq!("keep", read_to_string(&features).unwrap());
    }

    #[test]
    fn test_clean_rebuilds() {
        let output_dir = get_temp_filename("dataset");
        create_dir_all(&output_dir).unwrap();
        write(DatasetLayout::new(&output_dir).full().features, "old").unwrap();

        assert!(create_dataset(&args(output_dir, true)).is_err());
    }
}
