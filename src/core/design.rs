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

use crate::core::ipcore::{IpCoreDescription, ParamValue};
use crate::core::lang::Direction;
use crate::error::{Error, Hint, LastError};
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_TOP_NAME: &str = "top";
pub const DEFAULT_DESIGN_FILE: &str = "design.yaml";

/// Where an ip core's description lives and, optionally, which module name
/// the design expects to find inside it.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct IpRecord {
    file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    module: Option<String>,
}

impl IpRecord {
    pub fn new(file: PathBuf, module: Option<String>) -> Self {
        Self {
            file: file,
            module: module,
        }
    }

    pub fn get_file(&self) -> &Path {
        &self.file
    }

    pub fn get_module(&self) -> Option<&String> {
        self.module.as_ref()
    }
}

/// A single port connection entry: a constant tie-off, an external top-level
/// port, or a `[instance, port]` sibling pair.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortConnection {
    Constant(i64),
    External(String),
    Sibling(String, String),
}

/// An interface connection entry: an external interface name or a
/// `[instance, interface]` sibling pair.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IfaceConnection {
    External(String),
    Sibling(String, String),
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct DesignSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    parameters: BTreeMap<String, BTreeMap<String, ParamValue>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    ports: BTreeMap<String, BTreeMap<String, PortConnection>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    interfaces: BTreeMap<String, BTreeMap<String, IfaceConnection>>,
}

/// Names listed by direction.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct DirLists {
    #[serde(rename = "in", default, skip_serializing_if = "Vec::is_empty")]
    pub input: Vec<String>,
    #[serde(rename = "out", default, skip_serializing_if = "Vec::is_empty")]
    pub output: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inout: Vec<String>,
}

impl DirLists {
    pub fn is_empty(&self) -> bool {
        self.input.is_empty() && self.output.is_empty() && self.inout.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, Direction)> {
        self.input
            .iter()
            .map(|n| (n, Direction::Input))
            .chain(self.output.iter().map(|n| (n, Direction::Output)))
            .chain(self.inout.iter().map(|n| (n, Direction::Inout)))
    }

    pub fn direction_of(&self, name: &str) -> Option<Direction> {
        self.iter().find(|(n, _)| n.as_str() == name).map(|(_, d)| d)
    }

    pub fn push(&mut self, name: String, dir: Direction) {
        match dir {
            Direction::Input => self.input.push(name),
            Direction::Output => self.output.push(name),
            Direction::Inout => self.inout.push(name),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct ExternalSection {
    #[serde(default, skip_serializing_if = "DirLists::is_empty")]
    pub ports: DirLists,
    #[serde(default, skip_serializing_if = "DirLists::is_empty")]
    pub interfaces: DirLists,
}

impl ExternalSection {
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty() && self.interfaces.is_empty()
    }
}

/// The yaml description of a top-level design: which cores take part, how
/// they are wired, and what the outside world sees.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct DesignDescription {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    ips: BTreeMap<String, IpRecord>,
    #[serde(default, skip_serializing_if = "is_default_section")]
    design: DesignSection,
    #[serde(default, skip_serializing_if = "ExternalSection::is_empty")]
    external: ExternalSection,
}

fn is_default_section(s: &DesignSection) -> bool {
    s == &DesignSection::default()
}

impl FromStr for DesignDescription {
    type Err = serde_yaml::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_yaml::from_str(s)
    }
}

impl DesignDescription {
    pub fn new(
        ips: BTreeMap<String, IpRecord>,
        design: DesignSection,
        external: ExternalSection,
    ) -> Self {
        Self {
            ips: ips,
            design: design,
            external: external,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        if path.exists() == false {
            return Err(Error::DesignFileNotFound(
                path.to_path_buf(),
                Hint::DesignFlag,
            ));
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::DesignFileInvalid(path.to_path_buf(), LastError(e.to_string())))?;
        Self::from_str(&text)
            .map_err(|e| Error::DesignFileInvalid(path.to_path_buf(), LastError(e.to_string())))
    }

    pub fn to_file(&self, path: &Path) -> Result<(), Error> {
        let text = serde_yaml::to_string(self)
            .map_err(|e| Error::DesignFileInvalid(path.to_path_buf(), LastError(e.to_string())))?;
        std::fs::write(path, text)
            .map_err(|e| Error::DesignFileInvalid(path.to_path_buf(), LastError(e.to_string())))
    }

    /// Loads the ip-core description behind every `ips` record. Relative
    /// `file` paths are resolved against the design file's directory.
    pub fn resolve(&self, design_path: &Path) -> Result<BTreeMap<String, IpCoreDescription>, Error> {
        let base = design_path.parent().unwrap_or(Path::new("."));
        let mut resolved = BTreeMap::new();
        for (instance, record) in &self.ips {
            let file = match record.get_file().is_absolute() {
                true => record.get_file().to_path_buf(),
                false => base.join(record.get_file()),
            };
            let core = IpCoreDescription::from_file(&file)?;
            if let Some(expected) = record.get_module() {
                if expected != core.get_name() {
                    return Err(Error::DesignFileInvalid(
                        design_path.to_path_buf(),
                        LastError(format!(
                            "instance {:?} expects module {:?} but {:?} describes {:?}",
                            instance,
                            expected,
                            file,
                            core.get_name()
                        )),
                    ));
                }
            }
            resolved.insert(instance.clone(), core);
        }
        Ok(resolved)
    }

    pub fn get_ips(&self) -> &BTreeMap<String, IpRecord> {
        &self.ips
    }

    pub fn get_external(&self) -> &ExternalSection {
        &self.external
    }

    pub fn get_top_name(&self) -> &str {
        self.design
            .name
            .as_deref()
            .unwrap_or(DEFAULT_TOP_NAME)
    }

    pub fn set_top_name(&mut self, name: String) {
        self.design.name = Some(name);
    }

    pub fn get_parameters(&self) -> &BTreeMap<String, BTreeMap<String, ParamValue>> {
        &self.design.parameters
    }

    pub fn get_ports(&self) -> &BTreeMap<String, BTreeMap<String, PortConnection>> {
        &self.design.ports
    }

    pub fn get_interfaces(&self) -> &BTreeMap<String, BTreeMap<String, IfaceConnection>> {
        &self.design.interfaces
    }

    pub fn parameters_mut(&mut self) -> &mut BTreeMap<String, BTreeMap<String, ParamValue>> {
        &mut self.design.parameters
    }

    pub fn ports_mut(&mut self) -> &mut BTreeMap<String, BTreeMap<String, PortConnection>> {
        &mut self.design.ports
    }

    pub fn interfaces_mut(&mut self) -> &mut BTreeMap<String, BTreeMap<String, IfaceConnection>> {
        &mut self.design.interfaces
    }

    pub fn ips_mut(&mut self) -> &mut BTreeMap<String, IpRecord> {
        &mut self.ips
    }

    pub fn external_mut(&mut self) -> &mut ExternalSection {
        &mut self.external
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const HDMI_YAML: &str = r#"
ips:
  dma:
    file: cores/dma_core.yaml
  vga:
    file: cores/vga_core.yaml
    module: vga_core
design:
  name: hdmi_top
  parameters:
    dma:
      WIDTH: 64
  ports:
    dma:
      clk: clk
      rst: [vga, rst_out]
      irq_mask: 0
  interfaces:
    vga:
      s_axis: [dma, m_axis]
external:
  ports:
    in:
      - clk
    out:
      - hdmi_out
"#;

    #[test]
    fn ut_from_yaml_text() {
        let d = DesignDescription::from_str(HDMI_YAML).unwrap();
        assert_eq!(d.get_top_name(), "hdmi_top");
        assert_eq!(d.get_ips().len(), 2);
        assert_eq!(
            d.get_ips()["vga"].get_module(),
            Some(&String::from("vga_core"))
        );
        let dma_ports = &d.get_ports()["dma"];
        assert_eq!(
            dma_ports["clk"],
            PortConnection::External(String::from("clk"))
        );
        assert_eq!(
            dma_ports["rst"],
            PortConnection::Sibling(String::from("vga"), String::from("rst_out"))
        );
        assert_eq!(dma_ports["irq_mask"], PortConnection::Constant(0));
        assert_eq!(
            d.get_interfaces()["vga"]["s_axis"],
            IfaceConnection::Sibling(String::from("dma"), String::from("m_axis"))
        );
        assert_eq!(
            d.get_external().ports.direction_of("clk"),
            Some(Direction::Input)
        );
        assert_eq!(d.get_external().ports.direction_of("nope"), None);
    }

    #[test]
    fn ut_default_top_name() {
        let d = DesignDescription::from_str("ips: {}").unwrap();
        assert_eq!(d.get_top_name(), DEFAULT_TOP_NAME);
    }

    #[test]
    fn ut_missing_design_file() {
        let result = DesignDescription::from_file(Path::new("no/such/design.yaml"));
        assert_eq!(
            matches!(result, Err(Error::DesignFileNotFound(_, _))),
            true
        );
    }
}
