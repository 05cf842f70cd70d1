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

use crate::core::toplevel::VerilogFormat;
use crate::error::{Error, LastError};
use serde_derive::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CoreTable {
    /// Extra directories searched for interface definition files.
    #[serde(rename = "interface-paths", default)]
    interface_paths: Vec<PathBuf>,
}

/// Settings read from `$TOPWRAP_HOME/config.toml`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    core: CoreTable,
    #[serde(default)]
    verilog: VerilogFormat,
}

impl Config {
    /// Reads the file at `path`. A file that does not exist yields the
    /// defaults; a file that exists but fails to parse is an error.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        if path.exists() == false {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigInvalid(LastError(e.to_string())))?;
        toml::from_str(&text).map_err(|e| Error::ConfigInvalid(LastError(e.to_string())))
    }

    pub fn get_interface_paths(&self) -> &[PathBuf] {
        &self.core.interface_paths
    }

    pub fn get_verilog_format(&self) -> &VerilogFormat {
        &self.verilog
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ut_parse_full() {
        let cfg: Config = toml::from_str(
            r#"
[core]
interface-paths = ["/opt/ifaces", "extra"]

[verilog]
indent = 4
instance-prefix = "u_"
"#,
        )
        .unwrap();
        assert_eq!(cfg.get_interface_paths().len(), 2);
        assert_eq!(cfg.get_interface_paths()[0], PathBuf::from("/opt/ifaces"));
        assert_eq!(
            cfg.get_verilog_format() == &VerilogFormat::default(),
            false
        );
    }

    #[test]
    fn ut_empty_is_default() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn ut_missing_file_is_default() {
        let cfg = Config::from_file(Path::new("no/such/config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn ut_unknown_key_rejected() {
        let result: Result<Config, _> = toml::from_str("[core]\nbogus = 1\n");
        assert_eq!(result.is_err(), true);
    }
}
