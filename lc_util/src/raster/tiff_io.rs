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
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;
use ndarray::{Array2, Array3};
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult, Limits};

use crate::error::{PipelineError, Result};

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path)
        .map_err(|e| PipelineError::missing_file(path, e.to_string()))?;

    //Sentinel 2 bands are well above the default decoding limits
    Ok(Decoder::new(BufReader::new(file))?.with_limits(Limits::unlimited()))
}

/// Reads the first band of a single band GeoTIFF as (rows, cols), 8 bit data is widened
pub fn read_band_u16(path: &Path) -> Result<Array2<u16>> {
    let mut decoder = open_decoder(path)?;

    let (width, height) = decoder.dimensions()?;
    let colortype = decoder.colortype()?;

    debug!("Reading band {:?} {}x{} {:?}", path, width, height, colortype);

    let data: Vec<u16> = match (colortype, decoder.read_image()?) {
        (ColorType::Gray(16), DecodingResult::U16(v)) => v,
        (ColorType::Gray(8), DecodingResult::U8(v)) => v.into_iter().map(u16::from).collect(),
        (ct, _) => {
            return Err(PipelineError::UnsupportedRaster {
                path: path.to_path_buf(),
                msg: format!("expected a single 8 or 16 bit band, found {:?}", ct),
            });
        }
    };

    Ok(Array2::from_shape_vec((height as usize, width as usize), data)?)
}

/// Reads a pixel interleaved 8 bit raster as (rows, cols, bands)
pub fn read_multiband_u8(path: &Path) -> Result<Array3<u8>> {
    let mut decoder = open_decoder(path)?;

    let (width, height) = decoder.dimensions()?;
    let colortype = decoder.colortype()?;

    let num_bands = match colortype {
        ColorType::Gray(8) => 1,
        ColorType::GrayA(8) => 2,
        ColorType::RGB(8) => 3,
        ColorType::RGBA(8) => 4,
        ColorType::Multiband { bit_depth: 8, num_samples } => num_samples as usize,
        ct => {
            return Err(PipelineError::UnsupportedRaster {
                path: path.to_path_buf(),
                msg: format!("expected 8 bit samples, found {:?}", ct),
            });
        }
    };

    debug!("Reading {:?} {}x{} with {} bands", path, width, height, num_bands);

    let data = match decoder.read_image()? {
        DecodingResult::U8(v) => v,
        _ => {
            return Err(PipelineError::UnsupportedRaster {
                path: path.to_path_buf(),
                msg: "decoded samples are not 8 bit".to_string(),
            });
        }
    };

    Ok(Array3::from_shape_vec((height as usize, width as usize, num_bands), data)?)
}
