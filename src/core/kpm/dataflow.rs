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

use super::{
    direction_for_metanode, is_metanode_type, metanode_type_for, CONST_NAME, CONST_VALUE_PROP,
    EXT_NAME_PROP, METANODE_IFACE,
};
use crate::core::design::{DesignDescription, IfaceConnection, IpRecord, PortConnection};
use crate::core::ipcore::{InterfaceMode, IpCoreDescription, ParamValue};
use crate::core::lang::Direction;
use crate::error::{Error, Hint, LastError};
use serde_derive::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DEFAULT_DATAFLOW_FILE: &str = "kpm_dataflow.json";

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DataflowInterface {
    name: String,
    id: String,
    direction: String,
}

impl DataflowInterface {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn get_direction(&self) -> &str {
        &self.direction
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DataflowProperty {
    name: String,
    id: String,
    value: String,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DataflowNode {
    #[serde(rename = "type")]
    node_type: String,
    id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    interfaces: Vec<DataflowInterface>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    properties: Vec<DataflowProperty>,
}

impl DataflowNode {
    pub fn get_type(&self) -> &str {
        &self.node_type
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_interfaces(&self) -> &[DataflowInterface] {
        &self.interfaces
    }

    pub fn is_metanode(&self) -> bool {
        is_metanode_type(&self.node_type)
    }

    pub fn get_property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Connection {
    id: String,
    from: String,
    to: String,
}

impl Connection {
    pub fn get_from(&self) -> &str {
        &self.from
    }

    pub fn get_to(&self) -> &str {
        &self.to
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<DataflowNode>,
    connections: Vec<Connection>,
}

/// One drawn design as the gui stores it.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Dataflow {
    graph: Graph,
}

/// An interface looked up by id, carrying its owning node.
#[derive(Debug, Clone, Copy)]
pub struct IfaceEntry<'a> {
    pub node: &'a DataflowNode,
    pub iface: &'a DataflowInterface,
}

impl<'a> IfaceEntry<'a> {
    pub fn node_name(&self) -> &str {
        &self.node.name
    }

    pub fn iface_name(&self) -> &str {
        &self.iface.name
    }

    pub fn iface_dir(&self) -> &str {
        &self.iface.direction
    }
}

fn gui_direction(dir: Direction) -> String {
    String::from(match dir {
        Direction::Input => "input",
        Direction::Output => "output",
        Direction::Inout => "inout",
    })
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

impl Dataflow {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::DataflowFileInvalid(path.to_path_buf(), LastError(e.to_string())))?;
        serde_json::from_str(&text)
            .map_err(|e| Error::DataflowFileInvalid(path.to_path_buf(), LastError(e.to_string())))
    }

    pub fn to_file(&self, path: &Path) -> Result<(), Error> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| Error::DataflowFileInvalid(path.to_path_buf(), LastError(e.to_string())))?;
        std::fs::write(path, text)
            .map_err(|e| Error::DataflowFileInvalid(path.to_path_buf(), LastError(e.to_string())))
    }

    /// Nodes placed from ip-core types.
    pub fn ip_nodes(&self) -> Vec<&DataflowNode> {
        self.graph
            .nodes
            .iter()
            .filter(|n| n.is_metanode() == false)
            .collect()
    }

    /// The special external/constant nodes.
    pub fn metanodes(&self) -> Vec<&DataflowNode> {
        self.graph
            .nodes
            .iter()
            .filter(|n| n.is_metanode() == true)
            .collect()
    }

    /// Indexes every interface of every node by its id.
    pub fn interface_table(&self) -> BTreeMap<&str, IfaceEntry<'_>> {
        let mut table = BTreeMap::new();
        for node in &self.graph.nodes {
            for iface in &node.interfaces {
                table.insert(
                    iface.id.as_str(),
                    IfaceEntry {
                        node: node,
                        iface: iface,
                    },
                );
            }
        }
        table
    }

    /// Connections whose both endpoints sit on ip nodes.
    pub fn ip_connections(&self) -> Vec<&Connection> {
        let table = self.interface_table();
        self.graph
            .connections
            .iter()
            .filter(|c| {
                let ends = (table.get(c.from.as_str()), table.get(c.to.as_str()));
                match ends {
                    (Some(f), Some(t)) => {
                        f.node.is_metanode() == false && t.node.is_metanode() == false
                    }
                    _ => false,
                }
            })
            .collect()
    }

    /// Connections with a metanode on either endpoint.
    pub fn external_connections(&self) -> Vec<&Connection> {
        let table = self.interface_table();
        self.graph
            .connections
            .iter()
            .filter(|c| {
                let ends = (table.get(c.from.as_str()), table.get(c.to.as_str()));
                match ends {
                    (Some(f), Some(t)) => f.node.is_metanode() || t.node.is_metanode(),
                    _ => false,
                }
            })
            .collect()
    }

    pub fn find_interface_by_id(&self, id: &str) -> Option<IfaceEntry<'_>> {
        self.interface_table().get(id).copied()
    }

    /// The node type behind an instance name, if the instance was placed.
    pub fn find_node_type_by_name(&self, name: &str) -> Option<&str> {
        self.graph
            .nodes
            .iter()
            .find(|n| n.name == name)
            .map(|n| n.node_type.as_str())
    }

    /// Renders a design as a drawn graph with freshly minted ids.
    pub fn from_design(
        design: &DesignDescription,
        cores: &BTreeMap<String, IpCoreDescription>,
    ) -> Result<Self, Error> {
        let mut nodes: Vec<DataflowNode> = Vec::new();
        let mut connections: Vec<Connection> = Vec::new();
        // (instance, interface-or-port name) -> (interface id, direction)
        let mut endpoint_ids: BTreeMap<(String, String), (String, Direction)> = BTreeMap::new();

        for (instance, core) in cores {
            let mut interfaces: Vec<DataflowInterface> = Vec::new();
            for (name, iface) in core.get_interfaces() {
                let dir = match iface.get_mode() {
                    InterfaceMode::Master => Direction::Output,
                    InterfaceMode::Slave => Direction::Input,
                };
                let id = fresh_id();
                endpoint_ids.insert((instance.clone(), name.clone()), (id.clone(), dir));
                interfaces.push(DataflowInterface {
                    name: name.clone(),
                    id: id,
                    direction: gui_direction(dir),
                });
            }
            for (port, dir) in core.get_signals().iter() {
                let id = fresh_id();
                endpoint_ids.insert(
                    (instance.clone(), port.get_name().to_string()),
                    (id.clone(), dir),
                );
                interfaces.push(DataflowInterface {
                    name: port.get_name().to_string(),
                    id: id,
                    direction: gui_direction(dir),
                });
            }
            // effective parameters: declared defaults with design overrides
            let mut params = core.get_parameters().clone();
            if let Some(overrides) = design.get_parameters().get(instance) {
                for (k, v) in overrides {
                    params.insert(k.clone(), v.clone());
                }
            }
            let properties = params
                .into_iter()
                .map(|(name, value)| DataflowProperty {
                    name: name,
                    id: fresh_id(),
                    value: value.to_text(),
                })
                .collect();
            nodes.push(DataflowNode {
                node_type: core.get_name().to_string(),
                id: fresh_id(),
                name: instance.clone(),
                interfaces: interfaces,
                properties: properties,
            });
        }

        // one metanode per declared external name
        let mut ext_ids: BTreeMap<String, (String, Direction)> = BTreeMap::new();
        let ext = design.get_external();
        for (name, dir) in ext.ports.iter().chain(ext.interfaces.iter()) {
            let id = fresh_id();
            nodes.push(DataflowNode {
                node_type: metanode_type_for(dir).to_string(),
                id: fresh_id(),
                name: name.clone(),
                interfaces: vec![DataflowInterface {
                    name: String::from(METANODE_IFACE),
                    id: id.clone(),
                    direction: gui_direction(dir.invert()),
                }],
                properties: vec![DataflowProperty {
                    name: String::from(EXT_NAME_PROP),
                    id: fresh_id(),
                    value: name.clone(),
                }],
            });
            ext_ids.insert(name.clone(), (id, dir));
        }

        let mut seen: BTreeSet<((String, String), (String, String))> = BTreeSet::new();
        let link = |from: String, to: String, connections: &mut Vec<Connection>| {
            connections.push(Connection {
                id: fresh_id(),
                from: from,
                to: to,
            });
        };

        for (instance, map) in design.get_ports() {
            for (port, conn) in map {
                let (id, dir) = endpoint_ids
                    .get(&(instance.clone(), port.clone()))
                    .ok_or(Error::UnknownPort(instance.clone(), port.clone()))?
                    .clone();
                match conn {
                    PortConnection::Constant(value) => {
                        let cid = fresh_id();
                        nodes.push(DataflowNode {
                            node_type: String::from(CONST_NAME),
                            id: fresh_id(),
                            name: String::from(CONST_NAME),
                            interfaces: vec![DataflowInterface {
                                name: String::from(METANODE_IFACE),
                                id: cid.clone(),
                                direction: String::from("output"),
                            }],
                            properties: vec![DataflowProperty {
                                name: String::from(CONST_VALUE_PROP),
                                id: fresh_id(),
                                value: value.to_string(),
                            }],
                        });
                        link(cid, id, &mut connections);
                    }
                    PortConnection::External(name) => {
                        let (ext_id, _) = ext_ids.get(name).ok_or(Error::ExternalNotDeclared(
                            name.clone(),
                            Hint::ExternalSection,
                        ))?;
                        match dir {
                            Direction::Input => link(ext_id.clone(), id, &mut connections),
                            _ => link(id, ext_id.clone(), &mut connections),
                        }
                    }
                    PortConnection::Sibling(other, other_port) => {
                        let a = (instance.clone(), port.clone());
                        let b = (other.clone(), other_port.clone());
                        let key = match a <= b {
                            true => (a, b),
                            false => (b, a),
                        };
                        if seen.insert(key) == false {
                            continue;
                        }
                        let (other_id, other_dir) = endpoint_ids
                            .get(&(other.clone(), other_port.clone()))
                            .ok_or(Error::UnknownPort(other.clone(), other_port.clone()))?
                            .clone();
                        match other_dir {
                            Direction::Output => link(other_id, id, &mut connections),
                            _ => link(id, other_id, &mut connections),
                        }
                    }
                }
            }
        }

        for (instance, map) in design.get_interfaces() {
            for (iface, conn) in map {
                let (id, dir) = endpoint_ids
                    .get(&(instance.clone(), iface.clone()))
                    .ok_or(Error::UnknownInterface(instance.clone(), iface.clone()))?
                    .clone();
                match conn {
                    IfaceConnection::External(name) => {
                        let (ext_id, _) = ext_ids.get(name).ok_or(Error::ExternalNotDeclared(
                            name.clone(),
                            Hint::ExternalSection,
                        ))?;
                        match dir {
                            Direction::Input => link(ext_id.clone(), id, &mut connections),
                            _ => link(id, ext_id.clone(), &mut connections),
                        }
                    }
                    IfaceConnection::Sibling(other, other_iface) => {
                        let a = (instance.clone(), iface.clone());
                        let b = (other.clone(), other_iface.clone());
                        let key = match a <= b {
                            true => (a, b),
                            false => (b, a),
                        };
                        if seen.insert(key) == false {
                            continue;
                        }
                        let (other_id, other_dir) = endpoint_ids
                            .get(&(other.clone(), other_iface.clone()))
                            .ok_or(Error::UnknownInterface(
                                other.clone(),
                                other_iface.clone(),
                            ))?
                            .clone();
                        // the master side is the source
                        match other_dir {
                            Direction::Output => link(other_id, id, &mut connections),
                            _ => link(id, other_id, &mut connections),
                        }
                    }
                }
            }
        }

        Ok(Self {
            graph: Graph {
                nodes: nodes,
                connections: connections,
            },
        })
    }

    /// Reconstructs a design description from a drawn graph. `yamls` maps a
    /// core name to the description file it was loaded from.
    pub fn to_design(
        &self,
        yamls: &BTreeMap<String, (PathBuf, IpCoreDescription)>,
    ) -> Result<DesignDescription, Error> {
        let mut design = DesignDescription::default();
        let mut inst_core: BTreeMap<&str, &IpCoreDescription> = BTreeMap::new();

        // metanodes only carry their one well-known property
        for meta in self.metanodes() {
            let allowed = match meta.get_type() == CONST_NAME {
                true => CONST_VALUE_PROP,
                false => EXT_NAME_PROP,
            };
            if let Some(foreign) = meta.properties.iter().find(|p| p.name != allowed) {
                return Err(Error::MetanodeForeignProperty(
                    meta.get_name().to_string(),
                    foreign.name.clone(),
                ));
            }
        }

        for node in self.ip_nodes() {
            let (file, core) = yamls.get(node.get_type()).ok_or(Error::UnknownNodeType(
                node.get_type().to_string(),
                Hint::ProvideYamls,
            ))?;
            let record = IpRecord::new(file.clone(), None);
            if design
                .ips_mut()
                .insert(node.get_name().to_string(), record)
                .is_some()
            {
                return Err(Error::DuplicateNodeName(node.get_name().to_string()));
            }
            inst_core.insert(node.get_name(), core);
            if node.properties.is_empty() == false {
                let params: BTreeMap<String, ParamValue> = node
                    .properties
                    .iter()
                    .map(|p| (p.name.clone(), ParamValue::from_text(&p.value)))
                    .collect();
                design
                    .parameters_mut()
                    .insert(node.get_name().to_string(), params);
            }
        }

        let table = self.interface_table();
        let mut declared: BTreeSet<String> = BTreeSet::new();
        for conn in &self.graph.connections {
            let from = table
                .get(conn.from.as_str())
                .ok_or(Error::UnknownEndpoint(conn.from.clone()))?;
            let to = table
                .get(conn.to.as_str())
                .ok_or(Error::UnknownEndpoint(conn.to.clone()))?;
            match (from.node.is_metanode(), to.node.is_metanode()) {
                (true, true) => return Err(Error::MetanodeToMetanode),
                (false, false) => self.import_sibling(&mut design, &inst_core, *from, *to)?,
                _ => {
                    let (meta, ip) = match from.node.is_metanode() {
                        true => (from, to),
                        false => (to, from),
                    };
                    self.import_external(&mut design, &inst_core, *meta, *ip, &mut declared)?;
                }
            }
        }
        Ok(design)
    }

    fn import_sibling(
        &self,
        design: &mut DesignDescription,
        inst_core: &BTreeMap<&str, &IpCoreDescription>,
        from: IfaceEntry,
        to: IfaceEntry,
    ) -> Result<(), Error> {
        let to_core = inst_core
            .get(to.node_name())
            .ok_or(Error::UnknownEndpoint(to.iface.id.clone()))?;
        if to_core.get_interfaces().contains_key(to.iface_name()) {
            // grouped bus: the slave (input) side records the connection
            design
                .interfaces_mut()
                .entry(to.node_name().to_string())
                .or_default()
                .insert(
                    to.iface_name().to_string(),
                    IfaceConnection::Sibling(
                        from.node_name().to_string(),
                        from.iface_name().to_string(),
                    ),
                );
        } else {
            design
                .ports_mut()
                .entry(to.node_name().to_string())
                .or_default()
                .insert(
                    to.iface_name().to_string(),
                    PortConnection::Sibling(
                        from.node_name().to_string(),
                        from.iface_name().to_string(),
                    ),
                );
        }
        Ok(())
    }

    fn import_external(
        &self,
        design: &mut DesignDescription,
        inst_core: &BTreeMap<&str, &IpCoreDescription>,
        meta: IfaceEntry,
        ip: IfaceEntry,
        declared: &mut BTreeSet<String>,
    ) -> Result<(), Error> {
        let core = inst_core
            .get(ip.node_name())
            .ok_or(Error::UnknownEndpoint(ip.iface.id.clone()))?;
        if meta.node.get_type() == CONST_NAME {
            let value = meta
                .node
                .get_property(CONST_VALUE_PROP)
                .and_then(|v| v.trim().parse::<i64>().ok())
                .unwrap_or(0);
            design
                .ports_mut()
                .entry(ip.node_name().to_string())
                .or_default()
                .insert(ip.iface_name().to_string(), PortConnection::Constant(value));
            return Ok(());
        }
        let dir = direction_for_metanode(meta.node.get_type())
            .ok_or(Error::UnknownEndpoint(meta.iface.id.clone()))?;
        let ext_name = match meta.node.get_property(EXT_NAME_PROP) {
            Some(v) if v.is_empty() == false => v.to_string(),
            _ => meta.node.get_name().to_string(),
        };
        if core.get_interfaces().contains_key(ip.iface_name()) {
            if declared.insert(ext_name.clone()) == true {
                design
                    .external_mut()
                    .interfaces
                    .push(ext_name.clone(), dir);
            }
            design
                .interfaces_mut()
                .entry(ip.node_name().to_string())
                .or_default()
                .insert(
                    ip.iface_name().to_string(),
                    IfaceConnection::External(ext_name),
                );
        } else {
            if declared.insert(ext_name.clone()) == true {
                design.external_mut().ports.push(ext_name.clone(), dir);
            }
            design
                .ports_mut()
                .entry(ip.node_name().to_string())
                .or_default()
                .insert(
                    ip.iface_name().to_string(),
                    PortConnection::External(ext_name),
                );
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    const DMA_CORE: &str = r#"
name: dma_core
signals:
  in:
    - clk
    - rst
parameters:
  WIDTH: 32
interfaces:
  m_axis:
    type: AXI4Stream
    mode: master
    signals:
      out:
        TDATA: [m_axis_tdata, 31, 0]
        TVALID: m_axis_tvalid
      in:
        TREADY: m_axis_tready
"#;

    const SINK_CORE: &str = r#"
name: sink_core
signals:
  in:
    - clk
interfaces:
  s_axis:
    type: AXI4Stream
    mode: slave
    signals:
      in:
        TDATA: [s_axis_tdata, 31, 0]
        TVALID: s_axis_tvalid
      out:
        TREADY: s_axis_tready
"#;

    const DESIGN: &str = r#"
ips:
  dma:
    file: dma_core.yaml
  sink:
    file: sink_core.yaml
design:
  parameters:
    dma:
      WIDTH: 64
  ports:
    dma:
      clk: clk
      rst: 0
    sink:
      clk: clk
  interfaces:
    dma:
      m_axis: [sink, s_axis]
external:
  ports:
    in:
      - clk
"#;

    fn fixture() -> (
        DesignDescription,
        BTreeMap<String, IpCoreDescription>,
        BTreeMap<String, (PathBuf, IpCoreDescription)>,
    ) {
        let design = DesignDescription::from_str(DESIGN).unwrap();
        let dma = IpCoreDescription::from_str(DMA_CORE).unwrap();
        let sink = IpCoreDescription::from_str(SINK_CORE).unwrap();
        let mut cores = BTreeMap::new();
        cores.insert(String::from("dma"), dma.clone());
        cores.insert(String::from("sink"), sink.clone());
        let mut yamls = BTreeMap::new();
        yamls.insert(
            String::from("dma_core"),
            (PathBuf::from("dma_core.yaml"), dma),
        );
        yamls.insert(
            String::from("sink_core"),
            (PathBuf::from("sink_core.yaml"), sink),
        );
        (design, cores, yamls)
    }

    // hand-written graph: two ip nodes, one metanode, one external connection
    const PARITY_GRAPH: &str = r#"
{
  "graph": {
    "nodes": [
      {
        "type": "dma_core", "id": "n1", "name": "dma",
        "interfaces": [ { "name": "clk", "id": "i1", "direction": "input" } ]
      },
      {
        "type": "sink_core", "id": "n2", "name": "sink",
        "interfaces": [ { "name": "clk", "id": "i2", "direction": "input" } ]
      },
      {
        "type": "External Input", "id": "n3", "name": "clk",
        "interfaces": [ { "name": "external", "id": "i3", "direction": "output" } ],
        "properties": [ { "name": "External Name", "id": "p1", "value": "clk" } ]
      }
    ],
    "connections": [ { "id": "c1", "from": "i3", "to": "i1" } ]
  }
}
"#;

    #[test]
    fn ut_node_and_connection_filters() {
        let df: Dataflow = serde_json::from_str(PARITY_GRAPH).unwrap();
        assert_eq!(df.ip_nodes().len(), 2);
        assert_eq!(df.metanodes().len(), 1);
        assert_eq!(df.ip_connections().len(), 0);
        assert_eq!(df.external_connections().len(), 1);
    }

    #[test]
    fn ut_interface_lookups() {
        let df: Dataflow = serde_json::from_str(PARITY_GRAPH).unwrap();
        let entry = df.find_interface_by_id("i1").unwrap();
        assert_eq!(entry.node_name(), "dma");
        assert_eq!(entry.iface_name(), "clk");
        assert_eq!(entry.iface_dir(), "input");
        assert_eq!(df.find_interface_by_id("i9").is_none(), true);
        assert_eq!(df.find_node_type_by_name("sink"), Some("sink_core"));
        assert_eq!(df.find_node_type_by_name("nope"), None);
    }

    #[test]
    fn ut_export_shape() {
        let (design, cores, _) = fixture();
        let df = Dataflow::from_design(&design, &cores).unwrap();
        // 2 ip nodes + 1 external metanode + 1 constant metanode
        assert_eq!(df.ip_nodes().len(), 2);
        assert_eq!(df.metanodes().len(), 2);
        // m_axis <-> s_axis is the only pure ip connection
        assert_eq!(df.ip_connections().len(), 1);
        // clk fans out to two instances, plus the constant tie
        assert_eq!(df.external_connections().len(), 3);
        let dma = df
            .ip_nodes()
            .into_iter()
            .find(|n| n.get_name() == "dma")
            .unwrap();
        assert_eq!(dma.get_property("WIDTH"), Some("64"));
    }

    #[test]
    fn ut_round_trip() {
        let (design, cores, yamls) = fixture();
        let df = Dataflow::from_design(&design, &cores).unwrap();
        let back = df.to_design(&yamls).unwrap();

        assert_eq!(back.get_ips().len(), 2);
        assert_eq!(
            back.get_ips()["dma"].get_file(),
            Path::new("dma_core.yaml")
        );
        assert_eq!(
            back.get_parameters()["dma"]["WIDTH"],
            crate::core::ipcore::ParamValue::Int(64)
        );
        // the stream link survives, recorded from the slave side
        assert_eq!(
            back.get_interfaces()["sink"]["s_axis"],
            IfaceConnection::Sibling(String::from("dma"), String::from("m_axis"))
        );
        assert_eq!(
            back.get_ports()["dma"]["clk"],
            PortConnection::External(String::from("clk"))
        );
        assert_eq!(back.get_ports()["dma"]["rst"], PortConnection::Constant(0));
        assert_eq!(
            back.get_external().ports.direction_of("clk"),
            Some(Direction::Input)
        );
    }

    #[test]
    fn ut_import_unknown_type() {
        let (design, cores, mut yamls) = fixture();
        yamls.remove("sink_core");
        let df = Dataflow::from_design(&design, &cores).unwrap();
        let result = df.to_design(&yamls);
        assert_eq!(matches!(result, Err(Error::UnknownNodeType(_, _))), true);
    }

    #[test]
    fn ut_import_metanode_pair_rejected() {
        let text = PARITY_GRAPH.replace(
            "{ \"id\": \"c1\", \"from\": \"i3\", \"to\": \"i1\" }",
            "{ \"id\": \"c1\", \"from\": \"i3\", \"to\": \"i3\" }",
        );
        let df: Dataflow = serde_json::from_str(&text).unwrap();
        let (_, _, yamls) = fixture();
        let result = df.to_design(&yamls);
        assert_eq!(matches!(result, Err(Error::MetanodeToMetanode)), true);
    }

    #[test]
    fn ut_import_foreign_metanode_property() {
        let text = PARITY_GRAPH.replace("\"name\": \"External Name\"", "\"name\": \"Bogus\"");
        let df: Dataflow = serde_json::from_str(&text).unwrap();
        let (_, _, yamls) = fixture();
        let result = df.to_design(&yamls);
        assert_eq!(
            matches!(result, Err(Error::MetanodeForeignProperty(_, _))),
            true
        );
    }

    #[test]
    fn ut_import_unknown_endpoint() {
        let text = PARITY_GRAPH.replace("\"to\": \"i1\"", "\"to\": \"zz\"");
        let df: Dataflow = serde_json::from_str(&text).unwrap();
        let (_, _, yamls) = fixture();
        let result = df.to_design(&yamls);
        assert_eq!(matches!(result, Err(Error::UnknownEndpoint(_))), true);
    }
}
