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
use structopt::StructOpt;

use lc_util::dataset::Cropper;

#[derive(StructOpt)]
pub struct SplitArgs {
    #[structopt(long, parse(from_os_str), help="Directory holding X_cropped.npy and y_cropped.npy")]
    dataset_dir: PathBuf,

    #[structopt(long, default_value = "0.8", help="Share of patches used for training")]
    split_ratio: f64,

    #[structopt(long, help="Makes the split reproducible")]
    seed: Option<u64>,
}

pub fn split(args: &SplitArgs) -> Result<()> {
    let cropper = Cropper::new(&args.dataset_dir);

    cropper.split(&cropper.layout().cropped(), args.split_ratio, args.seed)
        .with_context(|| format!("Splitting {:?}", args.dataset_dir))?;

    Ok(())
}
