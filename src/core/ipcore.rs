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

use crate::core::lang::{Bound, Direction, HdlModule};
use crate::error::{Error, LastError};
use serde_derive::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::str::FromStr;

/// One side of a vector slice as it appears in yaml, either a resolved
/// constant or the raw expression text it came from.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SliceBound {
    Num(i64),
    Expr(String),
}

impl From<&Bound> for SliceBound {
    fn from(b: &Bound) -> Self {
        match b {
            Bound::Num(n) => Self::Num(*n),
            Bound::Expr(e) => Self::Expr(e.clone()),
        }
    }
}

/// A reference to an hdl port: either a bare 1-bit name or a
/// `[name, msb, lsb]` vector slice.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortRef {
    Name(String),
    Slice(String, SliceBound, SliceBound),
}

impl PortRef {
    pub fn get_name(&self) -> &str {
        match self {
            Self::Name(n) => n,
            Self::Slice(n, _, _) => n,
        }
    }

    /// Computes the bit width when the bounds are constants.
    pub fn get_width(&self) -> Option<u64> {
        match self {
            Self::Name(_) => Some(1),
            Self::Slice(_, SliceBound::Num(m), SliceBound::Num(l)) => {
                Some((m - l).unsigned_abs() + 1)
            }
            Self::Slice(_, _, _) => None,
        }
    }

    /// Returns the bounds pair for vectored references.
    pub fn get_bounds(&self) -> Option<(&SliceBound, &SliceBound)> {
        match self {
            Self::Name(_) => None,
            Self::Slice(_, m, l) => Some((m, l)),
        }
    }
}

impl From<&crate::core::lang::HdlPort> for PortRef {
    fn from(p: &crate::core::lang::HdlPort) -> Self {
        match &p.bounds {
            None => Self::Name(p.name.clone()),
            Some((m, l)) => Self::Slice(p.name.clone(), SliceBound::from(m), SliceBound::from(l)),
        }
    }
}

/// A parameter value: integers stay numeric, anything else (strings,
/// width-format literals such as `8'd12`) is kept as verbatim text.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Str(String),
}

impl ParamValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Str(_) => None,
        }
    }

    /// Renders the value the way it should appear in generated verilog or in
    /// a dataflow property field.
    pub fn to_text(&self) -> String {
        match self {
            Self::Int(i) => i.to_string(),
            Self::Str(s) => s.clone(),
        }
    }

    /// Reads a value back from property text, preferring the numeric form.
    pub fn from_text(s: &str) -> Self {
        match s.trim().parse::<i64>() {
            Ok(i) => Self::Int(i),
            Err(_) => Self::Str(s.to_string()),
        }
    }
}

/// Ungrouped ports sorted by direction.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct SignalGroups {
    #[serde(rename = "in", default, skip_serializing_if = "Vec::is_empty")]
    pub input: Vec<PortRef>,
    #[serde(rename = "out", default, skip_serializing_if = "Vec::is_empty")]
    pub output: Vec<PortRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inout: Vec<PortRef>,
}

impl SignalGroups {
    pub fn is_empty(&self) -> bool {
        self.input.is_empty() && self.output.is_empty() && self.inout.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PortRef, Direction)> {
        self.input
            .iter()
            .map(|p| (p, Direction::Input))
            .chain(self.output.iter().map(|p| (p, Direction::Output)))
            .chain(self.inout.iter().map(|p| (p, Direction::Inout)))
    }

    pub fn push(&mut self, port: PortRef, dir: Direction) {
        match dir {
            Direction::Input => self.input.push(port),
            Direction::Output => self.output.push(port),
            Direction::Inout => self.inout.push(port),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceMode {
    Master,
    Slave,
}

impl std::fmt::Display for InterfaceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Master => "master",
                Self::Slave => "slave",
            }
        )
    }
}

/// Logical-name to port mappings of a grouped interface, split by the
/// physical direction of each port.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct IfaceSignals {
    #[serde(rename = "in", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub input: BTreeMap<String, PortRef>,
    #[serde(rename = "out", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub output: BTreeMap<String, PortRef>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inout: BTreeMap<String, PortRef>,
}

impl IfaceSignals {
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PortRef, Direction)> {
        self.input
            .iter()
            .map(|(k, p)| (k, p, Direction::Input))
            .chain(self.output.iter().map(|(k, p)| (k, p, Direction::Output)))
            .chain(self.inout.iter().map(|(k, p)| (k, p, Direction::Inout)))
    }

    pub fn get(&self, logical: &str) -> Option<(&PortRef, Direction)> {
        if let Some(p) = self.input.get(logical) {
            return Some((p, Direction::Input));
        }
        if let Some(p) = self.output.get(logical) {
            return Some((p, Direction::Output));
        }
        self.inout.get(logical).map(|p| (p, Direction::Inout))
    }

    pub fn insert(&mut self, logical: String, port: PortRef, dir: Direction) {
        match dir {
            Direction::Input => self.input.insert(logical, port),
            Direction::Output => self.output.insert(logical, port),
            Direction::Inout => self.inout.insert(logical, port),
        };
    }
}

/// A named bus interface grouped out of a module's port list.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct IpInterface {
    #[serde(rename = "type")]
    iface_type: String,
    mode: InterfaceMode,
    signals: IfaceSignals,
}

impl IpInterface {
    pub fn new(iface_type: String, mode: InterfaceMode, signals: IfaceSignals) -> Self {
        Self {
            iface_type: iface_type,
            mode: mode,
            signals: signals,
        }
    }

    pub fn get_type(&self) -> &str {
        &self.iface_type
    }

    pub fn get_mode(&self) -> InterfaceMode {
        self.mode
    }

    pub fn get_signals(&self) -> &IfaceSignals {
        &self.signals
    }
}

/// The yaml description of a single ip core.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct IpCoreDescription {
    name: String,
    #[serde(default, skip_serializing_if = "SignalGroups::is_empty")]
    signals: SignalGroups,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    parameters: BTreeMap<String, ParamValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    interfaces: BTreeMap<String, IpInterface>,
}

impl FromStr for IpCoreDescription {
    type Err = serde_yaml::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_yaml::from_str(s)
    }
}

impl IpCoreDescription {
    pub fn new(
        name: String,
        signals: SignalGroups,
        parameters: BTreeMap<String, ParamValue>,
        interfaces: BTreeMap<String, IpInterface>,
    ) -> Self {
        Self {
            name: name,
            signals: signals,
            parameters: parameters,
            interfaces: interfaces,
        }
    }

    /// Builds an ungrouped description straight from a parsed hdl module.
    ///
    /// A parameter without a default is recorded as integer 0 so the design
    /// file has a slot to override.
    pub fn from_module(module: &HdlModule) -> Self {
        let mut signals = SignalGroups::default();
        for port in &module.ports {
            signals.push(PortRef::from(port), port.direction);
        }
        let parameters = module
            .parameters
            .iter()
            .map(|p| {
                let value = match (&p.default_value, &p.default_text) {
                    (Some(v), _) => ParamValue::Int(*v),
                    (None, Some(t)) => ParamValue::Str(t.clone()),
                    (None, None) => ParamValue::Int(0),
                };
                (p.name.clone(), value)
            })
            .collect();
        Self {
            name: module.name.clone(),
            signals: signals,
            parameters: parameters,
            interfaces: BTreeMap::new(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::IpCoreFileInvalid(path.to_path_buf(), LastError(e.to_string())))?;
        let core = Self::from_str(&text)
            .map_err(|e| Error::IpCoreFileInvalid(path.to_path_buf(), LastError(e.to_string())))?;
        core.check_unique_ports()?;
        Ok(core)
    }

    /// A physical port name may appear once, whether ungrouped or mapped
    /// inside an interface.
    pub fn check_unique_ports(&self) -> Result<(), Error> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let grouped = self
            .interfaces
            .values()
            .flat_map(|i| i.get_signals().iter())
            .map(|(_, p, _)| p);
        for port in self.signals.iter().map(|(p, _)| p).chain(grouped) {
            if seen.insert(port.get_name()) == false {
                return Err(Error::DuplicatePortName(
                    self.name.clone(),
                    port.get_name().to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn to_file(&self, path: &Path) -> Result<(), Error> {
        let text = serde_yaml::to_string(self)
            .map_err(|e| Error::IpCoreFileInvalid(path.to_path_buf(), LastError(e.to_string())))?;
        std::fs::write(path, text)
            .map_err(|e| Error::IpCoreFileInvalid(path.to_path_buf(), LastError(e.to_string())))
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_signals(&self) -> &SignalGroups {
        &self.signals
    }

    pub fn get_parameters(&self) -> &BTreeMap<String, ParamValue> {
        &self.parameters
    }

    pub fn get_interfaces(&self) -> &BTreeMap<String, IpInterface> {
        &self.interfaces
    }

    pub fn set_interfaces(&mut self, interfaces: BTreeMap<String, IpInterface>) {
        self.interfaces = interfaces;
    }

    pub fn set_signals(&mut self, signals: SignalGroups) {
        self.signals = signals;
    }

    /// Searches the ungrouped signals and every interface mapping for a
    /// physical port.
    pub fn find_port(&self, name: &str) -> Option<(&PortRef, Direction)> {
        if let Some(found) = self.signals.iter().find(|(p, _)| p.get_name() == name) {
            return Some(found);
        }
        self.interfaces
            .values()
            .flat_map(|i| i.get_signals().iter())
            .find(|(_, p, _)| p.get_name() == name)
            .map(|(_, p, d)| (p, d))
    }

    /// The core's name reduced to characters legal in a verilog identifier,
    /// used as the default instance name.
    pub fn sanitized_name(&self) -> String {
        self.name
            .chars()
            .map(|c| match c.is_ascii_alphanumeric() {
                true => c,
                false => '_',
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::lang::{HdlParameter, HdlPort, Lang};

    const DMA_YAML: &str = r#"
name: dma_core
signals:
  in:
    - clk
    - rst
    - [s_data, 31, 0]
  out:
    - irq
parameters:
  WIDTH: 32
  INIT: 8'd12
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

    #[test]
    fn ut_from_yaml_text() {
        let core = IpCoreDescription::from_str(DMA_YAML).unwrap();
        assert_eq!(core.get_name(), "dma_core");
        assert_eq!(core.get_signals().input.len(), 3);
        assert_eq!(
            core.get_signals().input[2],
            PortRef::Slice(String::from("s_data"), SliceBound::Num(31), SliceBound::Num(0))
        );
        assert_eq!(core.get_parameters()["WIDTH"], ParamValue::Int(32));
        assert_eq!(
            core.get_parameters()["INIT"],
            ParamValue::Str(String::from("8'd12"))
        );
        let iface = &core.get_interfaces()["s_axis"];
        assert_eq!(iface.get_type(), "AXI4Stream");
        assert_eq!(iface.get_mode(), InterfaceMode::Slave);
        assert_eq!(iface.get_signals().output.len(), 1);
    }

    #[test]
    fn ut_find_port_spans_interfaces() {
        let core = IpCoreDescription::from_str(DMA_YAML).unwrap();
        let (p, d) = core.find_port("s_axis_tready").unwrap();
        assert_eq!(p.get_name(), "s_axis_tready");
        assert_eq!(d, Direction::Output);
        assert_eq!(core.find_port("nope"), None);
    }

    #[test]
    fn ut_from_module() {
        let module = HdlModule {
            name: String::from("counter"),
            parameters: vec![HdlParameter {
                name: String::from("W"),
                default_text: Some(String::from("8")),
                default_value: Some(8),
            }],
            ports: vec![
                HdlPort {
                    name: String::from("clk"),
                    direction: Direction::Input,
                    bounds: None,
                },
                HdlPort {
                    name: String::from("q"),
                    direction: Direction::Output,
                    bounds: Some((
                        crate::core::lang::Bound::Num(7),
                        crate::core::lang::Bound::Num(0),
                    )),
                },
            ],
            language: Lang::Verilog,
        };
        let core = IpCoreDescription::from_module(&module);
        assert_eq!(core.get_signals().input.len(), 1);
        assert_eq!(core.get_signals().output[0].get_width(), Some(8));
        assert_eq!(core.get_parameters()["W"], ParamValue::Int(8));
    }

    #[test]
    fn ut_duplicate_port_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dma_core.yaml");
        // clk now appears under both in and out
        std::fs::write(&path, DMA_YAML.replace("- irq", "- clk")).unwrap();
        let result = IpCoreDescription::from_file(&path);
        assert_eq!(
            matches!(
                result,
                Err(crate::error::Error::DuplicatePortName(_, _))
            ),
            true
        );

        std::fs::write(&path, DMA_YAML).unwrap();
        assert_eq!(IpCoreDescription::from_file(&path).is_ok(), true);
    }

    #[test]
    fn ut_sanitized_name() {
        let mut core = IpCoreDescription::from_str(DMA_YAML).unwrap();
        core.name = String::from("dma-core v2");
        assert_eq!(core.sanitized_name(), "dma_core_v2");
    }

    #[test]
    fn ut_param_value_text() {
        assert_eq!(ParamValue::from_text("42"), ParamValue::Int(42));
        assert_eq!(
            ParamValue::from_text("8'd12"),
            ParamValue::Str(String::from("8'd12"))
        );
        assert_eq!(ParamValue::Int(-3).to_text(), "-3");
    }
}
