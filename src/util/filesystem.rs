//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use crate::util::anyerror::{AnyError, Fault};
use std::path::{Path, PathBuf};

/// File extensions accepted as verilog source code.
pub const VERILOG_EXTENSIONS: [&str; 2] = ["v", "sv"];

/// File extensions accepted as vhdl source code.
pub const VHDL_EXTENSIONS: [&str; 2] = ["vhd", "vhdl"];

/// Checks if the file's extension matches one in `exts` (case-insensitive).
pub fn has_extension(path: &Path, exts: &[&str]) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => exts.iter().any(|e| ext.eq_ignore_ascii_case(e)),
        None => false,
    }
}

/// Expands each entry in `sources` into a list of existing hdl files.
///
/// A directory entry is searched recursively for any file carrying a
/// supported hdl extension. The resulting list preserves the order sources
/// were given in and sorts the files found within a directory.
pub fn gather_hdl_files(sources: &[String]) -> Result<Vec<PathBuf>, Fault> {
    let mut result = Vec::new();
    for src in sources {
        let path = PathBuf::from(src);
        if path.is_dir() == true {
            let pattern = path.join("**").join("*");
            let mut found: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
                .filter_map(|f| f.ok())
                .filter(|f| {
                    has_extension(f, &VERILOG_EXTENSIONS) || has_extension(f, &VHDL_EXTENSIONS)
                })
                .collect();
            found.sort();
            result.extend(found);
        } else if path.is_file() == true {
            result.push(path);
        } else {
            return Err(AnyError(format!("path {:?} does not exist", src)))?;
        }
    }
    Ok(result)
}

/// Collects the yaml files found directly under `dir` (non-recursive).
pub fn gather_yaml_files(dir: &Path) -> Result<Vec<PathBuf>, Fault> {
    let pattern = dir.join("*.yaml");
    let mut found: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
        .filter_map(|f| f.ok())
        .collect();
    let pattern = dir.join("*.yml");
    found.extend(glob::glob(&pattern.to_string_lossy())?.filter_map(|f| f.ok()));
    found.sort();
    Ok(found)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn ut_extension_check() {
        assert_eq!(has_extension(Path::new("core.v"), &VERILOG_EXTENSIONS), true);
        assert_eq!(
            has_extension(Path::new("core.SV"), &VERILOG_EXTENSIONS),
            true
        );
        assert_eq!(
            has_extension(Path::new("core.vhd"), &VERILOG_EXTENSIONS),
            false
        );
        assert_eq!(has_extension(Path::new("core.vhdl"), &VHDL_EXTENSIONS), true);
        assert_eq!(has_extension(Path::new("core"), &VERILOG_EXTENSIONS), false);
    }

    #[test]
    fn ut_gather_from_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.v"), "module b; endmodule").unwrap();
        fs::write(dir.path().join("a.vhd"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip me").unwrap();
        let files = gather_hdl_files(&[dir.path().to_string_lossy().to_string()]).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].file_name().unwrap(), "a.vhd");
        assert_eq!(files[1].file_name().unwrap(), "b.v");
    }

    #[test]
    fn ut_gather_missing_path() {
        assert_eq!(
            gather_hdl_files(&[String::from("no/such/file.v")]).is_err(),
            true
        );
    }
}
