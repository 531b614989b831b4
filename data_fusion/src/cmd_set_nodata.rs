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

use lc_util::config::DEFAULT_EXCLUDED_CODES;
use lc_util::refine::{RasterFile, convert_to_nodata};

use crate::gdal_args::GdalArgs;

#[derive(StructOpt)]
pub struct SetNoDataArgs {
    #[structopt(flatten)]
    gdal: GdalArgs,

    #[structopt(long, parse(from_os_str))]
    input: PathBuf,

    #[structopt(long, parse(from_os_str))]
    output: PathBuf,

    #[structopt(long, help="Class codes to turn into nodata, default is the Urban Atlas classes CORINE describes better")]
    code: Vec<i64>,

    #[structopt(long)]
    clean: bool,
}

impl SetNoDataArgs {
    pub fn codes(&self) -> Vec<i64> {
        if self.code.is_empty() {
            DEFAULT_EXCLUDED_CODES.to_vec()
        } else {
            self.code.clone()
        }
    }
}

pub fn run_set_nodata(args: &SetNoDataArgs) -> Result<()> {
    if args.clean && args.output.exists() {
        remove_file(&args.output)?;
    }

    if args.output.exists() {
        warn!("{:?} already exists and --clean not passed, doing nothing", &args.output);
        return Ok(());
    }

    convert_to_nodata(&args.gdal.tools(), &RasterFile::new(&args.input), &args.codes(), &args.output)
        .with_context(|| format!("Setting nodata in {:?}", args.input))?;

    Ok(())
}

#[cfg(test)]
mod cmd_set_nodata_tests {
    use super::*;

    fn args(code: Vec<i64>) -> SetNoDataArgs {
        SetNoDataArgs {
            gdal: GdalArgs { gdal_bin_dir: None },
            input: PathBuf::from("merge.tif"),
            output: PathBuf::from("merge_filtered.tif"),
            code,
            clean: false,
        }
    }

    #[test]
    fn test_default_codes() {
        assert_eq!(DEFAULT_EXCLUDED_CODES.to_vec(), args(vec![]).codes());
        assert_eq!(vec![12100], args(vec![12100]).codes());
    }
}
