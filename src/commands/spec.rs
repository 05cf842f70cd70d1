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

use crate::commands::helps::spec;
use crate::core::context::Context;
use crate::core::design::DesignDescription;
use crate::core::ipcore::IpCoreDescription;
use crate::core::kpm::spec::{Specification, DEFAULT_SPEC_FILE};
use crate::util::anyerror::{AnyError, Fault};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Spec {
    design: Option<PathBuf>,
    dest: Option<PathBuf>,
    yamls: Vec<String>,
}

impl Subcommand<Context> for Spec {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(spec::HELP))?;
        Ok(Self {
            design: cli.get(Arg::option("design").value("file"))?,
            dest: cli.get(Arg::option("dest").value("file"))?,
            yamls: cli.remainder()?,
        })
    }

    fn execute(self, _: &Context) -> proc::Result {
        let cores = Self::collect_cores(self.design.as_deref(), &self.yamls)?;
        let specification = Specification::from_cores(cores.values());
        let out = self.dest.unwrap_or(PathBuf::from(DEFAULT_SPEC_FILE));
        specification.to_file(&out)?;
        println!("info: wrote specification {:?}", out);
        Ok(())
    }
}

impl Spec {
    /// Gathers one description per core name from the design's resolved
    /// cores and any explicitly listed yaml files.
    fn collect_cores(
        design: Option<&Path>,
        yamls: &[String],
    ) -> Result<BTreeMap<String, IpCoreDescription>, Fault> {
        let mut cores: BTreeMap<String, IpCoreDescription> = BTreeMap::new();
        if let Some(path) = design {
            let design = DesignDescription::from_file(path)?;
            for (_, core) in design.resolve(path)? {
                cores.insert(core.get_name().to_string(), core);
            }
        }
        for file in yamls {
            let core = IpCoreDescription::from_file(Path::new(file))?;
            cores.insert(core.get_name().to_string(), core);
        }
        if cores.is_empty() == true {
            return Err(AnyError(String::from(
                "expected a design file or at least one ip-core yaml",
            )))?;
        }
        Ok(cores)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const CORE: &str = r#"
name: dma_core
signals:
  in:
    - clk
"#;

    #[test]
    fn ut_design_seeds_cores() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dma_core.yaml"), CORE).unwrap();
        let design_path = dir.path().join("design.yaml");
        std::fs::write(&design_path, "ips:\n  dma:\n    file: dma_core.yaml\n").unwrap();

        let cores = Spec::collect_cores(Some(&design_path), &[]).unwrap();
        assert_eq!(cores.len(), 1);
        assert_eq!(cores.contains_key("dma_core"), true);
    }

    #[test]
    fn ut_design_and_yamls_merge() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dma_core.yaml"), CORE).unwrap();
        let vga = dir.path().join("vga_core.yaml");
        std::fs::write(&vga, CORE.replace("dma_core", "vga_core")).unwrap();
        let design_path = dir.path().join("design.yaml");
        std::fs::write(&design_path, "ips:\n  dma:\n    file: dma_core.yaml\n").unwrap();

        let cores = Spec::collect_cores(
            Some(&design_path),
            &[vga.to_string_lossy().to_string()],
        )
        .unwrap();
        assert_eq!(cores.len(), 2);
        assert_eq!(cores.contains_key("vga_core"), true);
    }

    #[test]
    fn ut_no_inputs_rejected() {
        assert_eq!(Spec::collect_cores(None, &[]).is_err(), true);
    }
}
