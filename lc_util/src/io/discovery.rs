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
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{PipelineError, Result};
use crate::util::is_hidden;

/// Urban Atlas archives keep their layers in a folder ending with this
pub const UA_SHAPEFILE_DIR_SUFFIX: &str = "Shapefiles";
/// The boundary layer of each city, not land cover
pub const UA_BOUNDARY_SUFFIX: &str = "y.shp";

fn file_name_str(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn collect_shapefiles(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    let is_shapefile_dir = file_name_str(dir).ends_with(UA_SHAPEFILE_DIR_SUFFIX);

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            collect_shapefiles(&path, found)?;
            continue;
        }

        if !is_shapefile_dir {
            continue;
        }

        let name = file_name_str(&path);
        if name.ends_with("shp") && !name.ends_with(UA_BOUNDARY_SUFFIX) {
            found.push(path);
        }
    }

    Ok(())
}

/// Every land cover shapefile below `urban_atlas_dir`, sorted
pub fn find_urban_atlas_shapefiles(urban_atlas_dir: &Path) -> Result<Vec<PathBuf>> {
    if !urban_atlas_dir.is_dir() {
        return Err(PipelineError::missing_file(urban_atlas_dir, "Urban Atlas directory not found"));
    }

    let mut found = Vec::new();
    collect_shapefiles(urban_atlas_dir, &mut found)?;
    found.sort();

    debug!("Found {} Urban Atlas shapefiles in {:?}", found.len(), urban_atlas_dir);

    Ok(found)
}

/// Every non hidden entry of `products_dir`, one per Sentinel 2 tile, sorted
pub fn list_tile_dirs(products_dir: &Path) -> Result<Vec<PathBuf>> {
    if !products_dir.is_dir() {
        return Err(PipelineError::missing_file(products_dir, "Products directory not found"));
    }

    let mut tiles = Vec::new();
    for entry in fs::read_dir(products_dir)? {
        let entry = entry?;
        if is_hidden(&entry.file_name().to_string_lossy()) {
            continue;
        }
        tiles.push(entry.path());
    }
    tiles.sort();

    Ok(tiles)
}

#[cfg(test)]
mod discovery_tests {
    use std::fs::{create_dir_all, write};

    use crate::raster::get_temp_filename;

    use super::*;

    #[test]
    fn test_find_urban_atlas_shapefiles() {
        let root = get_temp_filename("poland");

        let warsaw = root.join("PL001L1_WARSZAWA").join("Shapefiles");
        let lodz = root.join("PL003L1_LODZ").join("Data").join("Shapefiles");
        let other = root.join("PL003L1_LODZ").join("Metadata");
        for d in [&warsaw, &lodz, &other] {
            create_dir_all(d).unwrap();
        }

        write(warsaw.join("PL001L1_WARSZAWA_UA2012.shp"), "").unwrap();
        write(warsaw.join("PL001L1_WARSZAWA_UA2012.dbf"), "").unwrap();
        write(warsaw.join("PL001L1_WARSZAWA_UA2012_Boundary.shp"), "").unwrap();
        write(lodz.join("PL003L1_LODZ_UA2012.shp"), "").unwrap();
        write(other.join("stray.shp"), "").unwrap();

        let found = find_urban_atlas_shapefiles(&root).unwrap();

        assert_eq!(vec![
            warsaw.join("PL001L1_WARSZAWA_UA2012.shp"),
            lodz.join("PL003L1_LODZ_UA2012.shp"),
        ], found);
    }

    #[test]
    fn test_list_tile_dirs_skips_hidden() {
        let root = get_temp_filename("products");
        create_dir_all(root.join("T34UDC_20190801")).unwrap();
        create_dir_all(root.join("T33UXT_20190801")).unwrap();
        write(root.join(".DS_Store"), "").unwrap();

        let tiles = list_tile_dirs(&root).unwrap();

        assert_eq!(vec![root.join("T33UXT_20190801"), root.join("T34UDC_20190801")], tiles);
    }

    #[test]
    fn test_missing_dir() {
        let root = get_temp_filename("nowhere");
        assert!(matches!(find_urban_atlas_shapefiles(&root), Err(PipelineError::MissingFile { .. })));
        assert!(matches!(list_tile_dirs(&root), Err(PipelineError::MissingFile { .. })));
    }
}
