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

use crate::cmd_create_dataset::{CreateDatasetArgs, create_dataset};
use crate::cmd_crop::{CropArgs, crop};
use crate::cmd_list_tiles::{ListTilesArgs, list_tiles};
use crate::cmd_run::{RunArgs, run_pipeline};
use crate::cmd_split::{SplitArgs, split};

mod gdal_args;
mod tile_args;
mod cmd_list_tiles;
mod cmd_create_dataset;
mod cmd_crop;
mod cmd_split;
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
    #[structopt(help="Prints the tile directories of a products directory")]
    ListTiles(ListTilesArgs),

    #[structopt(help="Stacks the bands and one hot labels of every tile into X.npy and y.npy")]
    CreateDataset(CreateDatasetArgs),

    #[structopt(help="Cuts X.npy and y.npy into square patches")]
    Crop(CropArgs),

    #[structopt(help="Randomly splits the patches into training and validation sets")]
    Split(SplitArgs),

    #[structopt(help="Runs every step using a pipeline TOML file")]
    Run(RunArgs),
}

fn run() -> Result<()> {
    let args = Cli::from_args();

    SimpleLogger::new().with_level(args.log_level).init()?;

    match &args.cmd {
        Command::ListTiles(r) => {
            list_tiles(r)?;
        }
        Command::CreateDataset(r) => {
            create_dataset(r)?;
        }
        Command::Crop(r) => {
            crop(r)?;
        }
        Command::Split(r) => {
            split(r)?;
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
