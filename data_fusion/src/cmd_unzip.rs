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
use log::info;
use structopt::StructOpt;

use lc_util::io::unzip;

#[derive(StructOpt)]
pub struct UnzipArgs {
    #[structopt(long, parse(from_os_str), help="Folder of downloaded Urban Atlas archives, extracted in place")]
    pub(crate) folder: PathBuf,
}

pub fn run_unzip(args: &UnzipArgs) -> Result<()> {
    let extracted = unzip(&args.folder)
        .with_context(|| format!("Unzipping archives in {:?}", args.folder))?;

    info!("Extracted {} archives", extracted.len());

    Ok(())
}
