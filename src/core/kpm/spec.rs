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

use super::{EXT_INOUT_NAME, EXT_INPUT_NAME, EXT_NAME_PROP, EXT_OUTPUT_NAME, METANODE_IFACE};
use crate::core::ipcore::{InterfaceMode, IpCoreDescription};
use crate::core::lang::Direction;
use crate::error::{Error, LastError};
use serde_derive::{Deserialize, Serialize};
use std::path::Path;

pub const IP_CORE_LAYER: &str = "IPcore";
pub const METANODE_LAYER: &str = "Metanode";
pub const DEFAULT_SPEC_FILE: &str = "kpm_spec.json";

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Layer {
    name: String,
    #[serde(rename = "nodeLayers")]
    node_layers: Vec<String>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "allowLoopbacks")]
    allow_loopbacks: bool,
    #[serde(rename = "connectionStyle")]
    connection_style: String,
    #[serde(rename = "movementStep")]
    movement_step: u32,
    #[serde(rename = "backgroundSize")]
    background_size: u32,
    layers: Vec<Layer>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            allow_loopbacks: false,
            connection_style: String::from("orthogonal"),
            movement_step: 15,
            background_size: 15,
            layers: vec![
                Layer {
                    name: String::from("IP Cores"),
                    node_layers: vec![String::from(IP_CORE_LAYER)],
                },
                Layer {
                    name: String::from("Externals"),
                    node_layers: vec![String::from(METANODE_LAYER)],
                },
            ],
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SpecInterface {
    name: String,
    direction: String,
    #[serde(rename = "type", default, skip_serializing_if = "Vec::is_empty")]
    iface_type: Vec<String>,
}

impl SpecInterface {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_direction(&self) -> &str {
        &self.direction
    }

    pub fn get_type(&self) -> &[String] {
        &self.iface_type
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SpecProperty {
    name: String,
    #[serde(rename = "type")]
    prop_type: String,
    default: String,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SpecNode {
    name: String,
    layer: String,
    category: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    interfaces: Vec<SpecInterface>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    properties: Vec<SpecProperty>,
}

impl SpecNode {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_interfaces(&self) -> &[SpecInterface] {
        &self.interfaces
    }

    pub fn get_properties(&self) -> &[SpecProperty] {
        &self.properties
    }
}

/// The gui-facing catalog of node types available for drawing a design.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Specification {
    metadata: Metadata,
    nodes: Vec<SpecNode>,
}

fn gui_direction(dir: Direction) -> String {
    String::from(match dir {
        Direction::Input => "input",
        Direction::Output => "output",
        Direction::Inout => "inout",
    })
}

fn metanode(name: &str, iface_direction: &str) -> SpecNode {
    SpecNode {
        name: name.to_string(),
        layer: String::from(METANODE_LAYER),
        category: String::from(METANODE_LAYER),
        interfaces: vec![SpecInterface {
            name: String::from(METANODE_IFACE),
            direction: iface_direction.to_string(),
            iface_type: Vec::new(),
        }],
        properties: vec![SpecProperty {
            name: String::from(EXT_NAME_PROP),
            prop_type: String::from("text"),
            default: String::new(),
        }],
    }
}

impl Specification {
    /// One node per ip core, with the three external metanodes appended.
    pub fn from_cores<'a>(cores: impl Iterator<Item = &'a IpCoreDescription>) -> Self {
        let mut nodes: Vec<SpecNode> = cores.map(Self::node_from_core).collect();
        nodes.push(metanode(EXT_INPUT_NAME, "output"));
        nodes.push(metanode(EXT_OUTPUT_NAME, "input"));
        nodes.push(metanode(EXT_INOUT_NAME, "inout"));
        Self {
            metadata: Metadata::default(),
            nodes: nodes,
        }
    }

    fn node_from_core(core: &IpCoreDescription) -> SpecNode {
        let mut interfaces: Vec<SpecInterface> = Vec::new();
        for (name, iface) in core.get_interfaces() {
            interfaces.push(SpecInterface {
                name: name.clone(),
                direction: String::from(match iface.get_mode() {
                    InterfaceMode::Master => "output",
                    InterfaceMode::Slave => "input",
                }),
                iface_type: vec![iface.get_type().to_string()],
            });
        }
        for (port, dir) in core.get_signals().iter() {
            interfaces.push(SpecInterface {
                name: port.get_name().to_string(),
                direction: gui_direction(dir),
                iface_type: vec![String::from("port")],
            });
        }
        let properties = core
            .get_parameters()
            .iter()
            .map(|(name, value)| SpecProperty {
                name: name.clone(),
                prop_type: String::from("text"),
                default: value.to_text(),
            })
            .collect();
        SpecNode {
            name: core.get_name().to_string(),
            layer: String::from(IP_CORE_LAYER),
            category: String::from(IP_CORE_LAYER),
            interfaces: interfaces,
            properties: properties,
        }
    }

    pub fn get_nodes(&self) -> &[SpecNode] {
        &self.nodes
    }

    /// Finds the node describing the given type name.
    pub fn find_node(&self, node_type: &str) -> Option<&SpecNode> {
        self.nodes.iter().find(|n| n.name == node_type)
    }

    /// Finds an interface of a node type by name.
    pub fn find_node_interface(
        &self,
        node_type: &str,
        iface_name: &str,
    ) -> Option<&SpecInterface> {
        self.find_node(node_type)?
            .interfaces
            .iter()
            .find(|i| i.name == iface_name)
    }

    pub fn to_file(&self, path: &Path) -> Result<(), Error> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| Error::SpecFileInvalid(path.to_path_buf(), LastError(e.to_string())))?;
        std::fs::write(path, text)
            .map_err(|e| Error::SpecFileInvalid(path.to_path_buf(), LastError(e.to_string())))?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    const CORE: &str = r#"
name: dma_core
signals:
  in:
    - clk
parameters:
  WIDTH: 32
interfaces:
  m_axis:
    type: AXI4Stream
    mode: master
    signals:
      out:
        TDATA: [m_axis_tdata, 31, 0]
"#;

    #[test]
    fn ut_metanodes_appended() {
        let cores = vec![
            IpCoreDescription::from_str(CORE).unwrap(),
            IpCoreDescription::from_str(&CORE.replace("dma_core", "vga_core")).unwrap(),
        ];
        let spec = Specification::from_cores(cores.iter());
        assert_eq!(spec.get_nodes().len(), 2 + 3);
        assert_eq!(
            spec.find_node(super::EXT_INPUT_NAME).unwrap().interfaces[0].direction,
            "output"
        );
        assert_eq!(
            spec.find_node(super::EXT_OUTPUT_NAME).unwrap().interfaces[0].direction,
            "input"
        );
        assert_eq!(spec.find_node(super::EXT_INOUT_NAME).is_some(), true);
    }

    #[test]
    fn ut_core_node_shape() {
        let core = IpCoreDescription::from_str(CORE).unwrap();
        let spec = Specification::from_cores(std::iter::once(&core));
        let node = spec.find_node("dma_core").unwrap();
        assert_eq!(node.get_properties().len(), 1);
        assert_eq!(node.get_properties()[0].default, "32");
        let axis = spec.find_node_interface("dma_core", "m_axis").unwrap();
        assert_eq!(axis.get_direction(), "output");
        assert_eq!(axis.get_type(), &[String::from("AXI4Stream")]);
        let clk = spec.find_node_interface("dma_core", "clk").unwrap();
        assert_eq!(clk.get_direction(), "input");
    }

    #[test]
    fn ut_unknown_lookup() {
        let spec = Specification::from_cores(std::iter::empty());
        assert_eq!(spec.find_node("nope").is_none(), true);
        assert_eq!(spec.find_node_interface(EXT_INPUT_NAME, "nope").is_none(), true);
    }
}
