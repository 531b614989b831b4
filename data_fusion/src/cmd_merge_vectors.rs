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
use log::warn;
use structopt::StructOpt;

use lc_util::io::find_urban_atlas_shapefiles;
use lc_util::refine::{merge_vectors, remove_shapefile};

use crate::gdal_args::GdalArgs;

/*
cargo run --release --bin data_fusion -- merge-vectors \
--urban-atlas-dir /data/urban_atlas/poland \
--output /data/work/merge.shp
 */

#[derive(StructOpt)]
pub struct MergeVectorsArgs {
    #[structopt(flatten)]
    gdal: GdalArgs,

    #[structopt(long, parse(from_os_str), help="Searched recursively for the land use shapefiles")]
    urban_atlas_dir: PathBuf,

    #[structopt(long, default_value = "CODE2012", help="Class code field of the Urban Atlas layers")]
    field_name: String,

    #[structopt(long, parse(from_os_str))]
    output: PathBuf,

    #[structopt(long)]
    clean: bool,
}

pub fn run_merge_vectors(args: &MergeVectorsArgs) -> Result<()> {
    if args.clean {
        remove_shapefile(&args.output)?;
    }

    if args.output.exists() {
        warn!("{:?} already exists and --clean not passed, doing nothing", &args.output);
        return Ok(());
    }

    let shapefiles = find_urban_atlas_shapefiles(&args.urban_atlas_dir)?;

    merge_vectors(&args.gdal.tools(), &shapefiles, &args.field_name, &args.output)
        .with_context(|| format!("Merging {} shapefiles into {:?}", shapefiles.len(), args.output))?;

    Ok(())
}

#[cfg(test)]
mod cmd_merge_vectors_tests {
    use std::fs::{create_dir_all, write};

    use lc_util::error::PipelineError;
    use lc_util::raster::get_temp_filename;

    use super::*;

    #[test]
    fn test_clean_removes_every_sidecar() {
        let output = get_temp_filename("merge.shp");
        create_dir_all(output.parent().unwrap()).unwrap();
        for ext in ["shp", "shx", "dbf"] {
            write(output.with_extension(ext), "").unwrap();
        }

        let args = MergeVectorsArgs {
            gdal: GdalArgs { gdal_bin_dir: None },
            urban_atlas_dir: output.with_file_name("no_urban_atlas"),
            field_name: "CODE2012".to_string(),
            output: output.clone(),
            clean: true,
        };

        let e = run_merge_vectors(&args).unwrap_err();

        assert!(!output.exists());
        assert!(!output.with_extension("dbf").exists());
        assert!(matches!(e.downcast_ref::<PipelineError>(), Some(PipelineError::MissingFile { .. })));
    }
}
