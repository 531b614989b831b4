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

use structopt::StructOpt;

use lc_util::config::DEFAULT_BANDS;

#[derive(StructOpt)]
pub struct TileArgs {
    #[structopt(long, parse(from_os_str), help="One sub directory per Sentinel 2 tile")]
    pub(crate) products_dir: PathBuf,

    #[structopt(long, help="Bands to stack, in order.  Default B02 B03 B04 B05 B06 B07 B08 B8A B11 B12 SCL")]
    pub(crate) band: Vec<String>,

    #[structopt(long, default_value = "R20m", help="Band sub directory of each tile")]
    pub(crate) resolution: String,
}

impl TileArgs {
    pub fn bands(&self) -> Vec<String> {
        if self.band.is_empty() {
            DEFAULT_BANDS.iter().map(|b| b.to_string()).collect()
        } else {
            self.band.clone()
        }
    }
}

#[cfg(test)]
mod tile_args_tests {
    use super::*;

    #[test]
    fn test_default_bands() {
        let args = TileArgs::from_iter_safe(["tiles", "--products-dir", "/data/products"]).unwrap();

        assert_eq!(11, args.bands().len());
        assert_eq!("B02", args.bands()[0]);
        assert_eq!("SCL", args.bands()[10]);
        assert_eq!("R20m", args.resolution);
    }

    #[test]
    fn test_explicit_bands_keep_order() {
        let args = TileArgs::from_iter_safe([
            "tiles", "--products-dir", "/data/products", "--band", "B8A", "--band", "B02", "--resolution", "R10m",
        ]).unwrap();

        assert_eq!(vec!["B8A".to_string(), "B02".to_string()], args.bands());
        assert_eq!("R10m", args.resolution);
    }
}
