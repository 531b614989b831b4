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
pub struct CropArgs {
    #[structopt(long, parse(from_os_str), help="Directory holding X.npy and y.npy")]
    dataset_dir: PathBuf,

    #[structopt(long, default_value = "256", help="Patch size in pixels, must divide the tile size")]
    crop_size: usize,
}

pub fn crop(args: &CropArgs) -> Result<()> {
    let cropper = Cropper::new(&args.dataset_dir);

    cropper.crop(&cropper.layout().full(), args.crop_size)
        .with_context(|| format!("Cropping {:?} into {} px patches", args.dataset_dir, args.crop_size))?;

    Ok(())
}
