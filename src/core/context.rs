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

use crate::core::config::{Config, CONFIG_FILE};
use crate::core::interface::InterfaceRegistry;
use crate::error::Error;
use std::env;
use std::path::PathBuf;

pub const TOPWRAP_HOME_VAR: &str = "TOPWRAP_HOME";
pub const HOME_DIR: &str = ".topwrap";
pub const INTERFACES_DIR: &str = "interfaces";

/// Program-wide state shared by every subcommand: where the home directory
/// is and what the configuration says.
#[derive(Debug)]
pub struct Context {
    home: Option<PathBuf>,
    config: Config,
}

impl Context {
    /// Determines the home directory (`TOPWRAP_HOME` wins over
    /// `~/.topwrap`) and loads its configuration file. A home that does not
    /// exist is not an error; everything falls back to defaults.
    pub fn retrieve() -> Result<Self, Error> {
        let home = match env::var_os(TOPWRAP_HOME_VAR) {
            Some(v) => Some(PathBuf::from(v)),
            None => home::home_dir().map(|h| h.join(HOME_DIR)),
        };
        let config = match &home {
            Some(h) => Config::from_file(&h.join(CONFIG_FILE))?,
            None => Config::default(),
        };
        Ok(Self {
            home: home,
            config: config,
        })
    }

    pub fn with(home: Option<PathBuf>, config: Config) -> Self {
        Self {
            home: home,
            config: config,
        }
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Assembles the interface registry: built-ins, then the home's
    /// `interfaces/` directory, then every configured search path.
    pub fn build_registry(&self) -> Result<InterfaceRegistry, Error> {
        let mut registry = InterfaceRegistry::with_builtins()?;
        if let Some(home) = &self.home {
            registry.load_dir(&home.join(INTERFACES_DIR))?;
        }
        for path in self.config.get_interface_paths() {
            registry.load_dir(path)?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn ut_registry_includes_home_definitions() {
        let dir = tempfile::tempdir().unwrap();
        let ifaces = dir.path().join(INTERFACES_DIR);
        std::fs::create_dir(&ifaces).unwrap();
        let mut f = std::fs::File::create(ifaces.join("spi.yaml")).unwrap();
        write!(
            f,
            "name: SPI\nsignals:\n  - {{ name: SCK, regexp: sck, direction: out, required: true }}\n"
        )
        .unwrap();
        let ctx = Context::with(Some(dir.path().to_path_buf()), Config::default());
        let registry = ctx.build_registry().unwrap();
        assert_eq!(registry.get("SPI").is_some(), true);
        assert_eq!(registry.get("AXI4Stream").is_some(), true);
    }

    #[test]
    fn ut_no_home_still_builds() {
        let ctx = Context::with(None, Config::default());
        let registry = ctx.build_registry().unwrap();
        assert_eq!(registry.names().len(), 4);
    }
}
