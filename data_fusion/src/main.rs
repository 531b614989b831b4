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
use anyhow::Result;
use log::{LevelFilter, error};
use simple_logger::SimpleLogger;
use structopt::StructOpt;

use crate::cmd_merge_rasters::{MergeRastersArgs, run_merge_rasters};
use crate::cmd_merge_vectors::{MergeVectorsArgs, run_merge_vectors};
use crate::cmd_rasterize::{RasterizeArgs, run_rasterize};
use crate::cmd_run::{RunArgs, run_pipeline};
use crate::cmd_set_nodata::{SetNoDataArgs, run_set_nodata};
use crate::cmd_unzip::{UnzipArgs, run_unzip};

mod gdal_args;
mod cmd_unzip;
mod cmd_merge_vectors;
mod cmd_rasterize;
mod cmd_set_nodata;
mod cmd_merge_rasters;
mod cmd_run;

#[derive(StructOpt)]
struct Cli {

    #[structopt(long, default_value = "Warn")]
    log_level: LevelFilter,

    #[structopt(subcommand)]
    cmd: Command
}

#[derive(StructOpt)]
enum Command {
    #[structopt(help="Extracts the downloaded Urban Atlas archives")]
    Unzip(UnzipArgs),

    #[structopt(help="Merges the Urban Atlas land use layers into one layer with an integer code field")]
    MergeVectors(MergeVectorsArgs),

    #[structopt(help="Burns the code field of the merged layer into a raster")]
    Rasterize(RasterizeArgs),

    #[structopt(help="Sets the given class codes to nodata")]
    SetNoData(SetNoDataArgs),

    #[structopt(help="Merges rasters, later ones overwrite earlier ones where they have data")]
    MergeRasters(MergeRastersArgs),

    #[structopt(help="Runs every step using a pipeline TOML file")]
    Run(RunArgs),
}

fn run() -> Result<()> {
    let args = Cli::from_args();

    SimpleLogger::new().with_level(args.log_level).init()?;

    match &args.cmd {
        Command::Unzip(r) => {
            run_unzip(r)?;
        }
        Command::MergeVectors(r) => {
            run_merge_vectors(r)?;
        }
        Command::Rasterize(r) => {
            run_rasterize(r)?;
        }
        Command::SetNoData(r) => {
            run_set_nodata(r)?;
        }
        Command::MergeRasters(r) => {
            run_merge_rasters(r)?;
        }
        Command::Run(r) => {
            run_pipeline(r)?;
        }
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        //the logger may be off or not initialised
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
