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
use std::fs::{create_dir_all, write, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Result;
use ndarray::{Array2, Array3};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::{PhotometricInterpretation, SampleFormat};
use uuid::Uuid;

/// A path in a fresh directory under the system temp dir
pub fn get_temp_filename(file_name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push("lc_util_tests");
    p.push(Uuid::new_v4().to_string());
    p.push(file_name);
    p
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(a) = path.parent() {
        if !a.exists() {
            create_dir_all(a)?;
        }
    }
    Ok(())
}

pub fn write_test_band_u16(path: &Path, band: &Array2<u16>) -> Result<()> {
    create_parent(path)?;

    let (num_rows, num_cols) = band.dim();
    let data: Vec<u16> = band.iter().cloned().collect();

    let mut encoder = TiffEncoder::new(BufWriter::new(File::create(path)?))?;
    encoder.write_image::<colortype::Gray16>(num_cols as u32, num_rows as u32, &data)?;

    Ok(())
}

pub fn write_test_rgb_u8(path: &Path, rgb: &Array3<u8>) -> Result<()> {
    create_parent(path)?;

    let (num_rows, num_cols, num_bands) = rgb.dim();
    let data: Vec<u8> = rgb.iter().cloned().collect();

    let mut encoder = TiffEncoder::new(BufWriter::new(File::create(path)?))?;
    match num_bands {
        3 => encoder.write_image::<colortype::RGB8>(num_cols as u32, num_rows as u32, &data)?,
        4 => encoder.write_image::<colortype::RGBA8>(num_cols as u32, num_rows as u32, &data)?,
        n => anyhow::bail!("Test rasters must have 3 or 4 bands, not {}", n),
    }

    Ok(())
}

/// Three 8 bit samples with a grey photometric, the layout gdal_translate gives a 3 band Byte raster
struct MultibandGray8x3;

impl colortype::ColorType for MultibandGray8x3 {
    type Inner = u8;
    const TIFF_VALUE: PhotometricInterpretation = PhotometricInterpretation::BlackIsZero;
    const BITS_PER_SAMPLE: &'static [u16] = &[8, 8, 8];
    const SAMPLE_FORMAT: &'static [SampleFormat] = &[SampleFormat::Uint, SampleFormat::Uint, SampleFormat::Uint];

    // Required by tiff 0.10; same integer predictor the crate uses for its built in u8 colortypes
    fn horizontal_predict(row: &[Self::Inner], result: &mut Vec<Self::Inner>) {
        let sample_size = Self::SAMPLE_FORMAT.len();

        if row.len() < sample_size {
            debug_assert!(false);
            return;
        }

        let (start, rest) = row.split_at(sample_size);

        result.extend_from_slice(start);
        if result.capacity() - result.len() < rest.len() {
            return;
        }

        result.extend(row.iter().zip(rest).map(|(prev, current)| current.wrapping_sub(*prev)));
    }
}

/// Writes (rows, cols, bands) as a MINISBLACK tiff, 1 or 3 bands
pub fn write_test_multiband_u8(path: &Path, bands: &Array3<u8>) -> Result<()> {
    create_parent(path)?;

    let (num_rows, num_cols, num_bands) = bands.dim();
    let data: Vec<u8> = bands.iter().cloned().collect();

    let mut encoder = TiffEncoder::new(BufWriter::new(File::create(path)?))?;
    match num_bands {
        1 => encoder.write_image::<colortype::Gray8>(num_cols as u32, num_rows as u32, &data)?,
        3 => encoder.write_image::<MultibandGray8x3>(num_cols as u32, num_rows as u32, &data)?,
        n => anyhow::bail!("Grey test rasters must have 1 or 3 bands, not {}", n),
    }

    Ok(())
}

/// An executable shell script `name` in `bin_dir` standing in for a GDAL utility
#[cfg(unix)]
pub fn write_fake_tool(bin_dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    create_dir_all(bin_dir)?;
    let path = bin_dir.join(name);

    write(&path, format!("#!/bin/sh\n{}\n", body))?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;

    Ok(path)
}
