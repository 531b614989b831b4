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
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::error::Result;
use crate::gdal_tools::ToolInvocation;

pub const GDAL_TRANSLATE: &str = "gdal_translate";
pub const GDAL_WARP: &str = "gdalwarp";
pub const GDAL_TILE_INDEX: &str = "gdaltindex";
pub const GDAL_RASTERIZE: &str = "gdal_rasterize";
pub const GDAL_CALC: &str = "gdal_calc.py";
pub const GDAL_MERGE: &str = "gdal_merge.py";
pub const GDAL_INFO: &str = "gdalinfo";
pub const OGR2OGR: &str = "ogr2ogr";

pub const SHAPEFILE_DRIVER: &str = "ESRI Shapefile";

/// Builds invocations of the GDAL command line utilities.
///
/// Nothing runs until [`ToolInvocation::run`] is called on the result.
#[derive(Debug, Clone, Default)]
pub struct GdalTools {
    bin_dir: Option<PathBuf>,
}

impl GdalTools {
    /// `bin_dir` None means the programs are looked up on the PATH
    pub fn new(bin_dir: Option<PathBuf>) -> Self {
        GdalTools { bin_dir }
    }

    fn tool(&self, program: &str) -> ToolInvocation {
        match &self.bin_dir {
            Some(d) => ToolInvocation::new(d.join(program)),
            None => ToolInvocation::new(program),
        }
    }

    /// Runs `gdalinfo --version`
    pub fn version(&self) -> Result<String> {
        let out = self.tool(GDAL_INFO).arg("--version").run()?;
        Ok(out.stdout.trim().to_string())
    }

    /// Converts a band (typically .jp2) to a UInt16 GeoTIFF of size x size pixels
    pub fn translate_band(&self, input: &Path, output: &Path, size: usize) -> ToolInvocation {
        self.tool(GDAL_TRANSLATE)
            .args(["-ot", "UInt16"])
            .arg("-outsize").arg(size.to_string()).arg(size.to_string())
            .arg(input)
            .arg(output)
    }

    /// Resamples a raster to size x size, pixel interleaved so the bands can be read together
    pub fn translate_resize(&self, input: &Path, output: &Path, size: usize) -> ToolInvocation {
        self.tool(GDAL_TRANSLATE)
            .arg("-outsize").arg(size.to_string()).arg(size.to_string())
            .args(["-co", "INTERLEAVE=PIXEL"])
            .arg(input)
            .arg(output)
    }

    /// Writes the footprint of `raster` as a polygon into `index_shp`
    pub fn tile_index(&self, index_shp: &Path, raster: &Path) -> ToolInvocation {
        self.tool(GDAL_TILE_INDEX)
            .arg(index_shp)
            .arg(raster)
    }

    /// Reprojects `input` to `target_srs`, cropped to the polygons of `cutline`
    pub fn warp_to_cutline(&self, input: &Path, output: &Path, target_srs: &str, cutline: &Path) -> ToolInvocation {
        self.tool(GDAL_WARP)
            .arg("-t_srs").arg(target_srs)
            .arg("-overwrite")
            .arg("-cutline").arg(cutline)
            .arg("-crop_to_cutline")
            .arg(input)
            .arg(output)
    }

    /// Copies the polygons of `input` into `output` with a single integer `code` field taken from `field_name`.
    ///
    /// The first input overwrites the output layer, the following ones are appended.
    pub fn ogr_copy_code_field(&self, input: &Path, output: &Path, output_layer: &str, field_name: &str, append: bool) -> ToolInvocation {
        let input_layer = layer_name(input);

        let inv = self.tool(OGR2OGR)
            .arg("-f").arg(SHAPEFILE_DRIVER);

        let inv = if append {
            inv.args(["-update", "-append"])
        } else {
            inv.arg("-overwrite")
        };

        inv.arg("-nln").arg(output_layer)
            .args(["-nlt", "PROMOTE_TO_MULTI"])
            .arg("-sql")
            .arg(format!("SELECT CAST(\"{}\" AS integer) AS code FROM \"{}\"", field_name, input_layer))
            .arg(output)
            .arg(input)
    }

    /// Burns `attribute` of `vector` into a new Float32 raster with square pixels of `resolution` map units
    pub fn rasterize(&self, vector: &Path, output: &Path, attribute: &str, resolution: f64, no_data: f64, srs: &str) -> ToolInvocation {
        self.tool(GDAL_RASTERIZE)
            .arg("-l").arg(layer_name(vector))
            .arg("-a").arg(attribute)
            .arg("-tr").arg(resolution.to_string()).arg(resolution.to_string())
            .arg("-a_nodata").arg(no_data.to_string())
            .args(["-ot", "Float32"])
            .arg("-a_srs").arg(srs)
            .arg(vector)
            .arg(output)
    }

    /// Sets every pixel whose value is in `codes` to `no_data`
    pub fn calc_codes_to_nodata(&self, input: &Path, output: &Path, codes: &[i64], no_data: f64) -> ToolInvocation {
        let code_list = codes.iter().join(",");

        let mut outfile = std::ffi::OsString::from("--outfile=");
        outfile.push(output);

        self.tool(GDAL_CALC)
            .arg("-A")
            .arg(input)
            .arg(outfile)
            .arg(format!("--NoDataValue={}", no_data))
            .arg("--type=Float32")
            .arg(format!("--calc=where(isin(A,[{}]),{},A)", code_list, no_data))
            .arg("--overwrite")
    }

    /// Mosaics `inputs` into `output`, later inputs win where they have data
    pub fn merge(&self, inputs: &[PathBuf], output: &Path, no_data: f64) -> ToolInvocation {
        self.tool(GDAL_MERGE)
            .arg("-n").arg(no_data.to_string())
            .arg("-a_nodata").arg(no_data.to_string())
            .arg("-o").arg(output)
            .args(inputs)
    }
}

/// A shapefile holds one layer named after the file
pub fn layer_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}
