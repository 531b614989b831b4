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
//! Land cover dataset tooling: refinement of the CORINE raster with Urban Atlas polygons and
//! generation of patch datasets from Sentinel 2 tiles.
pub mod config;
pub mod dataset;
pub mod error;
pub mod gdal_tools;
pub mod io;
pub mod label;
pub mod patch;
pub mod raster;
pub mod refine;
pub mod util;
