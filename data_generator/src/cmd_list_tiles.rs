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
use structopt::StructOpt;

use lc_util::dataset::TileContainer;

use crate::tile_args::TileArgs;

#[derive(StructOpt)]
pub struct ListTilesArgs {
    #[structopt(flatten)]
    tiles: TileArgs,
}

pub fn list_tiles(args: &ListTilesArgs) -> Result<()> {
    let container = TileContainer::from_products_dir(
        &args.tiles.products_dir, &args.tiles.bands(), &args.tiles.resolution)?;

    for p in container.tile_paths() {
        println!("{}", p.display());
    }

    Ok(())
}
