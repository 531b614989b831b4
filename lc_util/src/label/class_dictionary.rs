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
use std::collections::HashMap;
use std::path::Path;

use csv::Trim;
use log::{debug, warn};
use serde::Deserialize;

use crate::error::{PipelineError, Result};

/// One row of the class dictionary, columns are positional (name, R, G, B)
#[derive(Debug, Deserialize)]
struct ClassRow(String, u8, u8, u8);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandCoverClass {
    pub name: String,
    pub rgb: [u8; 3],
}

/// Ordered class name to colour mapping.  The position of a class is its channel in the one hot output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDictionary {
    classes: Vec<LandCoverClass>,
}

impl ClassDictionary {
    pub fn new(classes: Vec<LandCoverClass>) -> Result<Self> {
        if classes.is_empty() {
            return Err(PipelineError::Precondition("Class dictionary may not be empty".to_string()));
        }

        let mut seen: HashMap<[u8; 3], &str> = HashMap::new();
        for c in classes.iter() {
            if let Some(first) = seen.insert(c.rgb, &c.name) {
                warn!("Classes {} and {} share the colour {:?}, pixels of that colour are one hot in both",
                      first, c.name, c.rgb);
            }
        }

        Ok(ClassDictionary { classes })
    }

    /// Reads a csv with a header row and columns name, r, g, b
    pub fn read(path: &Path) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_path(path)?;

        let mut classes = Vec::new();

        for (line_idx, result) in rdr.deserialize::<ClassRow>().enumerate() {
            let row = result.map_err(|e| PipelineError::ClassDictionary {
                path: path.to_path_buf(),
                //+2 for the header and 1 based lines
                msg: format!("line {}: {}", line_idx + 2, e),
            })?;

            classes.push(LandCoverClass { name: row.0, rgb: [row.1, row.2, row.3] });
        }

        if classes.is_empty() {
            return Err(PipelineError::ClassDictionary {
                path: path.to_path_buf(),
                msg: "no classes found".to_string(),
            });
        }

        debug!("Read {} classes from {:?}", classes.len(), path);

        ClassDictionary::new(classes)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> &[LandCoverClass] {
        &self.classes
    }

    pub fn class_names(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn colours(&self) -> Vec<[u8; 3]> {
        self.classes.iter().map(|c| c.rgb).collect()
    }
}

#[cfg(test)]
mod class_dictionary_tests {
    use std::fs::write;

    use crate::raster::get_temp_filename;

    use super::*;

    #[test]
    fn test_read_keeps_row_order() {
        let path = get_temp_filename("class_dict.csv");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        write(&path, "name,r,g,b\nurban, 230, 0, 77\nforest,128,255,0\nwater,0,204,242\n").unwrap();

        let dict = ClassDictionary::read(&path).unwrap();

        assert_eq!(3, dict.len());
        assert_eq!(vec!["urban", "forest", "water"], dict.class_names());
        assert_eq!([230, 0, 77], dict.classes()[0].rgb);
        assert_eq!([0, 204, 242], dict.classes()[2].rgb);
    }

    #[test]
    fn test_read_rejects_bad_colour() {
        let path = get_temp_filename("bad_dict.csv");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        write(&path, "name,r,g,b\nurban,230,0,77\nforest,128,256,0\n").unwrap();

        match ClassDictionary::read(&path) {
            Err(PipelineError::ClassDictionary { msg, .. }) => assert!(msg.starts_with("line 3"), "{}", msg),
            other => panic!("Expected a class dictionary error, got {:?}", other),
        }
    }

    #[test]
    fn test_header_only_is_an_error() {
        let path = get_temp_filename("empty_dict.csv");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        write(&path, "name,r,g,b\n").unwrap();

        assert!(matches!(ClassDictionary::read(&path), Err(PipelineError::ClassDictionary { .. })));
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(ClassDictionary::new(vec![]).is_err());
    }
}
