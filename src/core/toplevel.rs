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

//! Elaborates a design description into a synthesizable top-level module.
//!
//! Connections become wires, external bindings become top-level ports, and
//! every instance is emitted with named parameter and port associations.
//! Output ordering follows the declaration order of the design file's
//! external lists and the map ordering everywhere else, so the same design
//! always renders the same text.

use crate::core::design::{DesignDescription, IfaceConnection, PortConnection};
use crate::core::interface::InterfaceRegistry;
use crate::core::ipcore::{InterfaceMode, IpCoreDescription, PortRef, SliceBound};
use crate::core::lang::Direction;
use crate::error::{Error, Hint};
use serde_derive::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Rendering knobs for the generated verilog.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerilogFormat {
    /// Number of spaces per indentation level.
    #[serde(default = "default_indent")]
    indent: u8,
    /// Text prepended to every instantiation name.
    #[serde(rename = "instance-prefix", default)]
    instance_prefix: String,
    /// Text appended to every instantiation name.
    #[serde(rename = "instance-suffix", default)]
    instance_suffix: String,
}

fn default_indent() -> u8 {
    2
}

impl Default for VerilogFormat {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            instance_prefix: String::new(),
            instance_suffix: String::new(),
        }
    }
}

impl VerilogFormat {
    fn tab(&self) -> String {
        " ".repeat(self.indent as usize)
    }

    fn instance_name(&self, name: &str) -> String {
        format!("{}{}{}", self.instance_prefix, name, self.instance_suffix)
    }
}

#[derive(Debug, PartialEq, Clone)]
struct TopPort {
    name: String,
    direction: Direction,
    bounds: Option<(SliceBound, SliceBound)>,
}

#[derive(Debug, PartialEq, Clone)]
struct Wire {
    bounds: Option<(SliceBound, SliceBound)>,
}

#[derive(Debug, PartialEq)]
struct Instance {
    module: String,
    /// Parameter associations rendered as verilog text.
    parameters: BTreeMap<String, String>,
    /// Port associations rendered as verilog expressions.
    connections: BTreeMap<String, String>,
}

/// A fully elaborated top module, ready for rendering.
#[derive(Debug)]
pub struct TopLevel {
    name: String,
    ports: Vec<TopPort>,
    wires: BTreeMap<String, Wire>,
    instances: BTreeMap<String, Instance>,
    warnings: Vec<String>,
}

impl TopLevel {
    /// Elaborates `design` against its resolved ip cores. The first
    /// structural error aborts; recoverable findings accumulate as warnings.
    pub fn from_design(
        design: &DesignDescription,
        cores: &BTreeMap<String, IpCoreDescription>,
        registry: &InterfaceRegistry,
    ) -> Result<Self, Error> {
        let mut top = Self {
            name: design.get_top_name().to_string(),
            ports: Vec::new(),
            wires: BTreeMap::new(),
            instances: BTreeMap::new(),
            warnings: Vec::new(),
        };
        top.check_external_unique(design)?;
        top.build_instances(design, cores)?;
        top.bind_ports(design, cores)?;
        top.bind_interfaces(design, cores, registry)?;
        top.declare_unbound_externals(design);
        top.warn_unconnected_inputs(cores);
        Ok(top)
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn get_warnings(&self) -> &[String] {
        &self.warnings
    }

    fn check_external_unique(&self, design: &DesignDescription) -> Result<(), Error> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let ext = design.get_external();
        for (name, _) in ext.ports.iter().chain(ext.interfaces.iter()) {
            if seen.insert(name.as_str()) == false {
                return Err(Error::ExternalDeclaredTwice(name.clone()));
            }
        }
        Ok(())
    }

    fn build_instances(
        &mut self,
        design: &DesignDescription,
        cores: &BTreeMap<String, IpCoreDescription>,
    ) -> Result<(), Error> {
        for (instance, core) in cores {
            let mut parameters = BTreeMap::new();
            if let Some(overrides) = design.get_parameters().get(instance) {
                for (param, value) in overrides {
                    if core.get_parameters().contains_key(param) == false {
                        return Err(Error::UnknownParameter(instance.clone(), param.clone()));
                    }
                    parameters.insert(param.clone(), value.to_text());
                }
            }
            self.instances.insert(
                instance.clone(),
                Instance {
                    module: core.get_name().to_string(),
                    parameters: parameters,
                    connections: BTreeMap::new(),
                },
            );
        }
        // overrides must name a known instance
        for instance in design.get_parameters().keys() {
            if self.instances.contains_key(instance) == false {
                return Err(Error::UnknownInstance(instance.clone(), Hint::DesignFlag));
            }
        }
        Ok(())
    }

    fn lookup_port<'a>(
        cores: &'a BTreeMap<String, IpCoreDescription>,
        instance: &str,
        port: &str,
    ) -> Result<(&'a PortRef, Direction), Error> {
        let core = cores
            .get(instance)
            .ok_or(Error::UnknownInstance(instance.to_string(), Hint::DesignFlag))?;
        core.find_port(port)
            .ok_or(Error::UnknownPort(instance.to_string(), port.to_string()))
    }

    fn bind_ports(
        &mut self,
        design: &DesignDescription,
        cores: &BTreeMap<String, IpCoreDescription>,
    ) -> Result<(), Error> {
        // a sibling pair may be written from either (or both) sides
        let mut nets: BTreeSet<((String, String), (String, String))> = BTreeSet::new();
        let mut external_outs: BTreeSet<String> = BTreeSet::new();

        for (instance, connections) in design.get_ports() {
            for (port, conn) in connections {
                let (pref, dir) = Self::lookup_port(cores, instance, port)?;
                match conn {
                    PortConnection::Constant(value) => {
                        let literal = match pref.get_width() {
                            Some(w) if *value >= 0 => format!("{}'d{}", w, value),
                            Some(w) => format!("-{}'d{}", w, -value),
                            None => value.to_string(),
                        };
                        self.connect(instance, port, literal)?;
                    }
                    PortConnection::External(ext) => {
                        let declared = design
                            .get_external()
                            .ports
                            .direction_of(ext)
                            .ok_or(Error::ExternalNotDeclared(
                                ext.clone(),
                                Hint::ExternalSection,
                            ))?;
                        if declared == Direction::Output {
                            if external_outs.insert(ext.clone()) == false {
                                return Err(Error::ExternalMultipleDrivers(ext.clone()));
                            }
                        }
                        self.add_port(ext.clone(), declared, pref.get_bounds());
                        self.connect(instance, port, ext.clone())?;
                    }
                    PortConnection::Sibling(other, other_port) => {
                        let (other_ref, other_dir) =
                            Self::lookup_port(cores, other, other_port)?;
                        let a = (instance.clone(), port.clone());
                        let b = (other.clone(), other_port.clone());
                        let key = match a <= b {
                            true => (a, b),
                            false => (b, a),
                        };
                        if nets.insert(key) == false {
                            // already materialized from the other side
                            continue;
                        }
                        if dir == Direction::Output && other_dir == Direction::Output {
                            return Err(Error::MultipleDrivers(
                                instance.clone(),
                                port.clone(),
                                other.clone(),
                                other_port.clone(),
                            ));
                        }
                        let (driver, sink) = match other_dir == Direction::Output {
                            true => ((other, other_port, other_ref), (instance, port, pref)),
                            false => ((instance, port, pref), (other, other_port, other_ref)),
                        };
                        if driver.2.get_width().is_some()
                            && sink.2.get_width().is_some()
                            && driver.2.get_width() != sink.2.get_width()
                        {
                            self.warnings.push(format!(
                                "width mismatch between {}.{} ({} bits) and {}.{} ({} bits)",
                                driver.0,
                                driver.1,
                                driver.2.get_width().unwrap(),
                                sink.0,
                                sink.1,
                                sink.2.get_width().unwrap()
                            ));
                        }
                        if dir != Direction::Output && other_dir != Direction::Output {
                            self.warnings.push(format!(
                                "net between {}.{} and {}.{} has no driver",
                                instance, port, other, other_port
                            ));
                        }
                        let wire = format!("{}_{}", driver.0, driver.1);
                        self.add_wire(wire.clone(), driver.2.get_bounds());
                        self.connect(driver.0, driver.1, wire.clone())?;
                        self.connect(sink.0, sink.1, wire)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn bind_interfaces(
        &mut self,
        design: &DesignDescription,
        cores: &BTreeMap<String, IpCoreDescription>,
        registry: &InterfaceRegistry,
    ) -> Result<(), Error> {
        let mut nets: BTreeSet<((String, String), (String, String))> = BTreeSet::new();

        for (instance, connections) in design.get_interfaces() {
            let core = cores
                .get(instance)
                .ok_or(Error::UnknownInstance(instance.clone(), Hint::DesignFlag))?;
            for (iface_name, conn) in connections {
                let iface = core.get_interfaces().get(iface_name).ok_or(
                    Error::UnknownInterface(instance.clone(), iface_name.clone()),
                )?;
                if registry.get(iface.get_type()).is_none() {
                    return Err(Error::UnknownInterfaceType(
                        instance.clone(),
                        iface.get_type().to_string(),
                        Hint::InterfaceDirs,
                    ));
                }
                match conn {
                    IfaceConnection::External(ext) => {
                        if design
                            .get_external()
                            .interfaces
                            .direction_of(ext)
                            .is_none()
                        {
                            return Err(Error::ExternalNotDeclared(
                                ext.clone(),
                                Hint::ExternalSection,
                            ));
                        }
                        for (logical, pref, dir) in iface.get_signals().iter() {
                            let top_name =
                                format!("{}_{}", ext, logical.to_ascii_lowercase());
                            self.add_port(top_name.clone(), dir, pref.get_bounds());
                            self.connect(instance, pref.get_name(), top_name)?;
                        }
                    }
                    IfaceConnection::Sibling(other, other_iface_name) => {
                        let a = (instance.clone(), iface_name.clone());
                        let b = (other.clone(), other_iface_name.clone());
                        let key = match a <= b {
                            true => (a, b),
                            false => (b, a),
                        };
                        if nets.insert(key) == false {
                            continue;
                        }
                        let other_core = cores.get(other).ok_or(Error::UnknownInstance(
                            other.clone(),
                            Hint::DesignFlag,
                        ))?;
                        let other_iface =
                            other_core.get_interfaces().get(other_iface_name).ok_or(
                                Error::UnknownInterface(
                                    other.clone(),
                                    other_iface_name.clone(),
                                ),
                            )?;
                        if iface.get_type() != other_iface.get_type() {
                            return Err(Error::InterfaceTypeMismatch(
                                instance.clone(),
                                iface_name.clone(),
                                other.clone(),
                                other_iface_name.clone(),
                                iface.get_type().to_string(),
                                other_iface.get_type().to_string(),
                            ));
                        }
                        if iface.get_mode() == other_iface.get_mode() {
                            return Err(Error::InterfaceModeConflict(
                                instance.clone(),
                                iface_name.clone(),
                                other.clone(),
                                other_iface_name.clone(),
                            ));
                        }
                        let (master, master_name) = match iface.get_mode() {
                            InterfaceMode::Master => (iface, instance.as_str()),
                            InterfaceMode::Slave => (other_iface, other.as_str()),
                        };
                        let (slave, slave_name) = match iface.get_mode() {
                            InterfaceMode::Master => (other_iface, other.as_str()),
                            InterfaceMode::Slave => (iface, instance.as_str()),
                        };
                        let master_keys: BTreeSet<&String> = master
                            .get_signals()
                            .iter()
                            .map(|(k, _, _)| k)
                            .collect();
                        let slave_keys: BTreeSet<&String> =
                            slave.get_signals().iter().map(|(k, _, _)| k).collect();
                        for lone in master_keys.symmetric_difference(&slave_keys) {
                            self.warnings.push(format!(
                                "interface signal {} of {}.{} <-> {}.{} is present on one side only",
                                lone, instance, iface_name, other, other_iface_name
                            ));
                        }
                        for logical in master_keys.intersection(&slave_keys) {
                            let (m_ref, m_dir) =
                                master.get_signals().get(logical).unwrap();
                            let (s_ref, _) = slave.get_signals().get(logical).unwrap();
                            // the side driving the net lends the wire its name
                            let (d_name, d_ref) = match m_dir {
                                Direction::Input => (slave_name, s_ref),
                                _ => (master_name, m_ref),
                            };
                            let wire = format!("{}_{}", d_name, d_ref.get_name());
                            self.add_wire(wire.clone(), d_ref.get_bounds());
                            self.connect(master_name, m_ref.get_name(), wire.clone())?;
                            self.connect(slave_name, s_ref.get_name(), wire)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// External names that no connection referenced still appear in the
    /// module header as 1-bit ports.
    fn declare_unbound_externals(&mut self, design: &DesignDescription) {
        for (name, dir) in design.get_external().ports.iter() {
            if self.ports.iter().any(|p| &p.name == name) == false {
                if dir == Direction::Output {
                    self.warnings.push(format!(
                        "external output port {} is declared but never driven",
                        name
                    ));
                }
                self.add_port(name.clone(), dir, None);
            }
        }
    }

    fn warn_unconnected_inputs(&mut self, cores: &BTreeMap<String, IpCoreDescription>) {
        for (instance, core) in cores {
            let bound = match self.instances.get(instance) {
                Some(i) => &i.connections,
                None => continue,
            };
            for (pref, dir) in core.get_signals().iter() {
                if dir == Direction::Input && bound.contains_key(pref.get_name()) == false {
                    self.warnings.push(format!(
                        "input port {}.{} is unconnected",
                        instance,
                        pref.get_name()
                    ));
                }
            }
        }
    }

    fn add_port(
        &mut self,
        name: String,
        direction: Direction,
        bounds: Option<(&SliceBound, &SliceBound)>,
    ) {
        if self.ports.iter().any(|p| p.name == name) {
            return;
        }
        self.ports.push(TopPort {
            name: name,
            direction: direction,
            bounds: bounds.map(|(m, l)| (m.clone(), l.clone())),
        });
    }

    fn add_wire(&mut self, name: String, bounds: Option<(&SliceBound, &SliceBound)>) {
        self.wires.entry(name).or_insert(Wire {
            bounds: bounds.map(|(m, l)| (m.clone(), l.clone())),
        });
    }

    fn connect(&mut self, instance: &str, port: &str, expr: String) -> Result<(), Error> {
        let inst = self
            .instances
            .get_mut(instance)
            .ok_or(Error::UnknownInstance(instance.to_string(), Hint::DesignFlag))?;
        if let Some(existing) = inst.connections.get(port) {
            if existing != &expr {
                return Err(Error::MultipleDrivers(
                    instance.to_string(),
                    port.to_string(),
                    instance.to_string(),
                    port.to_string(),
                ));
            }
            return Ok(());
        }
        inst.connections.insert(port.to_string(), expr);
        Ok(())
    }

    /// Renders the elaborated module as verilog-2001 source text.
    pub fn into_verilog(self, fmt: &VerilogFormat) -> String {
        let tab = fmt.tab();
        let mut out = String::new();
        out.push_str(&format!("module {} (\n", self.name));
        let port_lines: Vec<String> = self
            .ports
            .iter()
            .map(|p| {
                format!(
                    "{}{} wire {}{}",
                    tab,
                    match p.direction {
                        Direction::Input => "input",
                        Direction::Output => "output",
                        Direction::Inout => "inout",
                    },
                    render_range(&p.bounds),
                    p.name
                )
            })
            .collect();
        out.push_str(&port_lines.join(",\n"));
        out.push_str("\n);\n");

        if self.wires.is_empty() == false {
            out.push('\n');
            for (name, wire) in &self.wires {
                out.push_str(&format!(
                    "{}wire {}{};\n",
                    tab,
                    render_range(&wire.bounds),
                    name
                ));
            }
        }

        for (name, inst) in &self.instances {
            out.push('\n');
            out.push_str(&format!("{}{}", tab, inst.module));
            if inst.parameters.is_empty() == false {
                out.push_str(" #(\n");
                let lines: Vec<String> = inst
                    .parameters
                    .iter()
                    .map(|(k, v)| format!("{}{}.{}({})", tab, tab, k, v))
                    .collect();
                out.push_str(&lines.join(",\n"));
                out.push_str(&format!("\n{})", tab));
            }
            out.push_str(&format!(" {} (\n", fmt.instance_name(name)));
            let lines: Vec<String> = inst
                .connections
                .iter()
                .map(|(k, v)| format!("{}{}.{}({})", tab, tab, k, v))
                .collect();
            out.push_str(&lines.join(",\n"));
            out.push_str(&format!("\n{});\n", tab));
        }

        out.push_str("\nendmodule\n");
        out
    }
}

fn render_range(bounds: &Option<(SliceBound, SliceBound)>) -> String {
    let text = |b: &SliceBound| match b {
        SliceBound::Num(n) => n.to_string(),
        SliceBound::Expr(e) => e.clone(),
    };
    match bounds {
        None => String::new(),
        Some((m, l)) => format!("[{}:{}] ", text(m), text(l)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::design::DesignDescription;
    use crate::core::ipcore::IpCoreDescription;
    use std::str::FromStr;

    const DMA_CORE: &str = r#"
name: dma_core
signals:
  in:
    - clk
    - rst
  out:
    - irq
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
  name: stream_top
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

    fn fixture() -> (DesignDescription, BTreeMap<String, IpCoreDescription>) {
        let design = DesignDescription::from_str(DESIGN).unwrap();
        let mut cores = BTreeMap::new();
        cores.insert(
            String::from("dma"),
            IpCoreDescription::from_str(DMA_CORE).unwrap(),
        );
        cores.insert(
            String::from("sink"),
            IpCoreDescription::from_str(SINK_CORE).unwrap(),
        );
        (design, cores)
    }

    #[test]
    fn ut_elaborate_and_render() {
        let (design, cores) = fixture();
        let registry = InterfaceRegistry::with_builtins().unwrap();
        let top = TopLevel::from_design(&design, &cores, &registry).unwrap();
        assert_eq!(top.get_name(), "stream_top");
        assert_eq!(top.get_warnings(), &[] as &[String]);

        let text = top.into_verilog(&VerilogFormat::default());
        // external binding is a port, not a wire
        assert_eq!(text.contains("input wire clk"), true);
        assert_eq!(text.contains("wire clk;"), false);
        // the 32-bit stream data wire is declared with its range
        assert_eq!(text.contains("wire [31:0] dma_m_axis_tdata;"), true);
        // the constant tie-off carries the port width
        assert_eq!(text.contains(".rst(1'd0)"), true);
        // both sides reference the same tready wire, named after its driver
        assert_eq!(text.matches("sink_s_axis_tready").count() >= 2, true);
        assert_eq!(text.trim_end().ends_with("endmodule"), true);
    }

    #[test]
    fn ut_unknown_port() {
        let (mut design, cores) = fixture();
        design
            .ports_mut()
            .get_mut("dma")
            .unwrap()
            .insert(String::from("nope"), PortConnection::Constant(0));
        let registry = InterfaceRegistry::with_builtins().unwrap();
        let result = TopLevel::from_design(&design, &cores, &registry);
        assert_eq!(matches!(result, Err(Error::UnknownPort(_, _))), true);
    }

    #[test]
    fn ut_undeclared_external() {
        let (mut design, cores) = fixture();
        design
            .ports_mut()
            .get_mut("dma")
            .unwrap()
            .insert(
                String::from("irq"),
                PortConnection::External(String::from("irq_line")),
            );
        let registry = InterfaceRegistry::with_builtins().unwrap();
        let result = TopLevel::from_design(&design, &cores, &registry);
        assert_eq!(
            matches!(result, Err(Error::ExternalNotDeclared(_, _))),
            true
        );
    }

    #[test]
    fn ut_mode_conflict() {
        let (design, mut cores) = fixture();
        // flip the sink's interface to a second master
        let text = SINK_CORE.replace("mode: slave", "mode: master");
        cores.insert(
            String::from("sink"),
            IpCoreDescription::from_str(&text).unwrap(),
        );
        let registry = InterfaceRegistry::with_builtins().unwrap();
        let result = TopLevel::from_design(&design, &cores, &registry);
        assert_eq!(
            matches!(result, Err(Error::InterfaceModeConflict(_, _, _, _))),
            true
        );
    }

    #[test]
    fn ut_external_interface_expansion() {
        let (mut design, cores) = fixture();
        design.interfaces_mut().insert(
            String::from("sink"),
            [(
                String::from("s_axis"),
                IfaceConnection::External(String::from("stream_in")),
            )]
            .into_iter()
            .collect(),
        );
        design
            .external_mut()
            .interfaces
            .push(String::from("stream_in"), Direction::Input);
        // drop the sibling connection so the slave side is free
        design.interfaces_mut().remove("dma");
        let registry = InterfaceRegistry::with_builtins().unwrap();
        let top = TopLevel::from_design(&design, &cores, &registry).unwrap();
        let text = top.into_verilog(&VerilogFormat::default());
        assert_eq!(text.contains("input wire [31:0] stream_in_tdata"), true);
        assert_eq!(text.contains("output wire stream_in_tready"), true);
    }

    #[test]
    fn ut_unconnected_input_warning() {
        let (mut design, cores) = fixture();
        design.ports_mut().get_mut("sink").unwrap().remove("clk");
        let registry = InterfaceRegistry::with_builtins().unwrap();
        let top = TopLevel::from_design(&design, &cores, &registry).unwrap();
        assert_eq!(
            top.get_warnings()
                .iter()
                .any(|w| w.contains("sink.clk is unconnected")),
            true
        );
    }

    #[test]
    fn ut_undriven_external_output_warning() {
        let (mut design, cores) = fixture();
        design
            .external_mut()
            .ports
            .push(String::from("irq_line"), Direction::Output);
        let registry = InterfaceRegistry::with_builtins().unwrap();
        let top = TopLevel::from_design(&design, &cores, &registry).unwrap();
        assert_eq!(
            top.get_warnings()
                .iter()
                .any(|w| w.contains("irq_line is declared but never driven")),
            true
        );
        // the port still shows up in the header
        let text = top.into_verilog(&VerilogFormat::default());
        assert_eq!(text.contains("output wire irq_line"), true);
    }

    #[test]
    fn ut_duplicate_external_name() {
        let (mut design, cores) = fixture();
        design
            .external_mut()
            .ports
            .push(String::from("clk"), Direction::Output);
        let registry = InterfaceRegistry::with_builtins().unwrap();
        let result = TopLevel::from_design(&design, &cores, &registry);
        assert_eq!(
            matches!(result, Err(Error::ExternalDeclaredTwice(_))),
            true
        );
    }
}
