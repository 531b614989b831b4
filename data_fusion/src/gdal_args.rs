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

use lc_util::gdal_tools::GdalTools;
use structopt::StructOpt;

#[derive(StructOpt)]
pub struct GdalArgs {
    #[structopt(long, parse(from_os_str), help="Directory of the GDAL utilities, default is to search the PATH")]
    pub(crate) gdal_bin_dir: Option<PathBuf>,
}

impl GdalArgs {
    pub fn tools(&self) -> GdalTools {
        GdalTools::new(self.gdal_bin_dir.clone())
    }
}
