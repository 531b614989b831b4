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
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::warn;
use structopt::StructOpt;

use lc_util::refine::{VectorFile, rasterize};

use crate::gdal_args::GdalArgs;

#[derive(StructOpt)]
pub struct RasterizeArgs {
    #[structopt(flatten)]
    gdal: GdalArgs,

    #[structopt(long, parse(from_os_str), help="Merged vector layer with a code field")]
    input: PathBuf,

    #[structopt(long, parse(from_os_str))]
    output: PathBuf,

    #[structopt(long, default_value = "30", help="Pixel size in map units")]
    resolution: f64,

    #[structopt(long, default_value = "EPSG:3035")]
    srs: String,

    #[structopt(long)]
    clean: bool,
}

pub fn run_rasterize(args: &RasterizeArgs) -> Result<()> {
    if args.clean && args.output.exists() {
        remove_file(&args.output)?;
    }

    if args.output.exists() {
        warn!("{:?} already exists and --clean not passed, doing nothing", &args.output);
        return Ok(());
    }

    let vector = VectorFile { path: args.input.clone() };

    rasterize(&args.gdal.tools(), &vector, args.resolution, &args.srs, &args.output)
        .with_context(|| format!("Rasterizing {:?}", args.input))?;

    Ok(())
}
