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
use std::ffi::{OsStr, OsString};
use std::fs::{remove_file, rename};
use std::path::{Path, PathBuf};
use std::process::Command;

use itertools::Itertools;
use log::{debug, warn};

use crate::error::{PipelineError, Result};

/// A single synchronous run of a command line program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    program: PathBuf,
    args: Vec<OsString>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ToolInvocation {
    pub fn new<P: AsRef<Path>>(program: P) -> Self {
        ToolInvocation {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
        where I: IntoIterator<Item = S>,
              S: AsRef<OsStr>
    {
        for a in args {
            self.args.push(a.as_ref().to_os_string());
        }
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    /// For logging only, arguments are not shell quoted
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(|a| a.as_os_str()))
            .map(|s| s.to_string_lossy())
            .join(" ")
    }

    /// Blocks until the program exits.  A spawn failure or a non zero exit is an [`PipelineError::ExternalTool`]
    pub fn run(&self) -> Result<ToolOutput> {
        debug!("Running {}", self.command_line());

        let program_name = self.program.to_string_lossy().to_string();

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| PipelineError::ExternalTool {
                program: program_name.clone(),
                status: None,
                stderr: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(PipelineError::ExternalTool {
                program: program_name,
                //None when killed by a signal
                status: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        if !stderr.trim().is_empty() {
            debug!("{} stderr: {}", program_name, stderr.trim());
        }

        Ok(ToolOutput { stdout, stderr })
    }
}

/// `<stem>.part.<ext>` next to `output`.  The extension is kept since GDAL picks the driver from it.
pub fn partial_path(output: &Path) -> PathBuf {
    let stem = output.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let name = match output.extension() {
        Some(ext) => format!("{}.part.{}", stem, ext.to_string_lossy()),
        None => format!("{}.part", stem),
    };

    output.with_file_name(name)
}

/// Runs the invocation `build` makes for a partial file and moves the partial file to `output`
/// only once the tool exited successfully.  On failure the partial file is deleted, so `output`
/// is either complete or absent.
pub fn run_to_output<F>(output: &Path, build: F) -> Result<ToolOutput>
    where F: FnOnce(&Path) -> ToolInvocation
{
    let partial = partial_path(output);
    if partial.exists() {
        remove_file(&partial)?;
    }

    match build(&partial).run() {
        Ok(out) => {
            rename(&partial, output)?;
            Ok(out)
        }
        Err(e) => {
            if partial.exists() {
                if let Err(re) = remove_file(&partial) {
                    warn!("Could not remove {:?}: {}", partial, re);
                }
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tool_tests {
    use std::fs::{create_dir_all, read_to_string, write};

    use crate::raster::get_temp_filename;

    use super::*;

    #[test]
    fn test_command_line() {
        let inv = ToolInvocation::new("gdal_translate")
            .arg("-ot")
            .arg("UInt16")
            .args(["in.jp2", "out.tif"]);

        assert_eq!("gdal_translate -ot UInt16 in.jp2 out.tif", inv.command_line());
        assert_eq!(4, inv.arguments().len());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_success() {
        let out = ToolInvocation::new("sh").args(["-c", "echo hello"]).run().unwrap();
        assert_eq!("hello", out.stdout.trim());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_non_zero_exit() {
        let r = ToolInvocation::new("sh").args(["-c", "echo broken >&2; exit 3"]).run();

        match r {
            Err(PipelineError::ExternalTool { program, status, stderr }) => {
                assert_eq!("sh", program);
                assert_eq!(Some(3), status);
                assert_eq!("broken", stderr);
            }
            other => panic!("Expected an external tool error, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(Path::new("t/R20m/B02.part.tif"), partial_path(Path::new("t/R20m/B02.tif")));
        assert_eq!(Path::new("work/merge.part"), partial_path(Path::new("work/merge")));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_to_output_moves_on_success() {
        let output = get_temp_filename("B02.tif");
        create_dir_all(output.parent().unwrap()).unwrap();

        run_to_output(&output, |p| ToolInvocation::new("sh").args(["-c", "printf abc > \"$0\""]).arg(p)).unwrap();

        assert_eq!("abc", read_to_string(&output).unwrap());
        assert!(!partial_path(&output).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_to_output_leaves_nothing_on_failure() {
        let output = get_temp_filename("labels.tif");
        create_dir_all(output.parent().unwrap()).unwrap();
        //left over from an earlier crash
        write(partial_path(&output), "stale").unwrap();

        let r = run_to_output(&output, |p| ToolInvocation::new("sh").args(["-c", "printf II > \"$0\"; exit 2"]).arg(p));

        assert!(matches!(r, Err(PipelineError::ExternalTool { status: Some(2), .. })));
        assert!(!output.exists());
        assert!(!partial_path(&output).exists());
    }

    #[test]
    fn test_run_missing_program() {
        let r = ToolInvocation::new("definitely_not_a_gdal_program_1234").run();

        assert!(matches!(r, Err(PipelineError::ExternalTool { status: None, .. })));
    }
}
