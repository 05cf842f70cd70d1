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

//! Groups a module's ports into named bus interfaces.
//!
//! Ports sharing a name prefix are matched suffix-by-suffix against each
//! known interface definition. A candidate only qualifies when every
//! required signal of the definition is present and the port directions
//! consistently indicate one side of the bus.

use super::{CompiledInterface, InterfaceRegistry};
use crate::core::ipcore::{IfaceSignals, InterfaceMode, IpCoreDescription, IpInterface, PortRef, SignalGroups};
use crate::core::lang::Direction;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

struct Candidate<'a> {
    prefix: String,
    iface: &'a CompiledInterface,
    mode: InterfaceMode,
    /// `(logical name, index into the flattened port list)`
    matched: Vec<(String, usize)>,
    score: f64,
}

/// Rewrites `core` so that recognized port groups move from its ungrouped
/// `signals` into named `interfaces` entries.
pub fn infer_interfaces(core: &mut IpCoreDescription, registry: &InterfaceRegistry) {
    let ports: Vec<(PortRef, Direction)> = core
        .get_signals()
        .iter()
        .map(|(p, d)| (p.clone(), d))
        .collect();

    let mut candidates: Vec<Candidate> = Vec::new();
    for prefix in candidate_prefixes(&ports) {
        for iface in registry.iter() {
            if let Some(c) = evaluate(&prefix, iface, &ports) {
                candidates.push(c);
            }
        }
    }

    // best score first; break ties on longer prefix, then names
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(b.prefix.len().cmp(&a.prefix.len()))
            .then(a.iface.get_def().get_name().cmp(b.iface.get_def().get_name()))
            .then(a.prefix.cmp(&b.prefix))
    });

    let mut claimed: HashSet<usize> = HashSet::new();
    let mut interfaces = core.get_interfaces().clone();
    for c in candidates {
        if c.matched.iter().any(|(_, i)| claimed.contains(i)) == true {
            continue;
        }
        let mut signals = IfaceSignals::default();
        for (logical, i) in &c.matched {
            claimed.insert(*i);
            let (port, dir) = &ports[*i];
            signals.insert(logical.clone(), port.clone(), *dir);
        }
        interfaces.insert(
            c.prefix.clone(),
            IpInterface::new(c.iface.get_def().get_name().to_string(), c.mode, signals),
        );
    }

    let mut leftover = SignalGroups::default();
    for (i, (port, dir)) in ports.into_iter().enumerate() {
        if claimed.contains(&i) == false {
            leftover.push(port, dir);
        }
    }
    core.set_signals(leftover);
    core.set_interfaces(interfaces);
}

/// Every prefix obtainable by cutting a port name at an underscore.
fn candidate_prefixes(ports: &[(PortRef, Direction)]) -> BTreeSet<String> {
    let mut prefixes = BTreeSet::new();
    for (port, _) in ports {
        let name = port.get_name();
        for (i, c) in name.char_indices() {
            if c == '_' && i > 0 {
                prefixes.insert(name[..i].to_string());
            }
        }
    }
    prefixes
}

/// Tries to form a candidate from the ports sharing `prefix` against one
/// definition. Returns `None` when fewer than two ports match, a required
/// signal is absent, or the directions do not agree on a single mode.
fn evaluate<'a>(
    prefix: &str,
    iface: &'a CompiledInterface,
    ports: &[(PortRef, Direction)],
) -> Option<Candidate<'a>> {
    let mut matched: Vec<(String, usize)> = Vec::new();
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for (i, (port, _)) in ports.iter().enumerate() {
        let name = port.get_name();
        let suffix = match name.strip_prefix(prefix).and_then(|r| r.strip_prefix('_')) {
            Some(s) if s.is_empty() == false => s,
            _ => continue,
        };
        if let Some(sig) = iface.match_suffix(suffix) {
            // first port to claim a logical signal keeps it
            if seen.insert(sig.get_name()) == true {
                matched.push((sig.get_name().to_string(), i));
            }
        }
    }
    if matched.len() < 2 {
        return None;
    }
    for sig in iface.get_def().get_signals() {
        if sig.is_required() == true && seen.contains(sig.get_name()) == false {
            return None;
        }
    }

    // every direction vote must agree on one side of the bus
    let mut all_master = true;
    let mut all_slave = true;
    let mut votes = 0;
    for (logical, i) in &matched {
        let sig = iface
            .get_def()
            .get_signals()
            .iter()
            .find(|s| s.get_name() == logical.as_str())?;
        let actual = ports[*i].1;
        if sig.get_direction() == Direction::Inout || actual == Direction::Inout {
            continue;
        }
        votes += 1;
        if actual != sig.get_direction() {
            all_master = false;
        }
        if actual != sig.get_direction().invert() {
            all_slave = false;
        }
    }
    let mode = match (votes > 0, all_master, all_slave) {
        (true, true, _) => InterfaceMode::Master,
        (true, _, true) => InterfaceMode::Slave,
        _ => return None,
    };

    let optional_matched = matched
        .iter()
        .filter(|(logical, _)| {
            iface
                .get_def()
                .get_signals()
                .iter()
                .any(|s| s.get_name() == logical.as_str() && s.is_required() == false)
        })
        .count();
    let required_total = iface
        .get_def()
        .get_signals()
        .iter()
        .filter(|s| s.is_required())
        .count()
        .max(1);
    let required_matched = matched.len() - optional_matched;
    let known_prefix = iface
        .get_def()
        .get_prefixes()
        .iter()
        .any(|p| prefix == p || prefix.ends_with(&format!("_{}", p)));
    let score = (required_matched as f64 / required_total as f64)
        + 0.01 * optional_matched as f64
        + if known_prefix == true { 0.05 } else { 0.0 };

    Some(Candidate {
        prefix: prefix.to_string(),
        iface: iface,
        mode: mode,
        matched: matched,
        score: score,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::ipcore::ParamValue;
    use std::collections::BTreeMap;

    fn core_with_inputs(inputs: &[&str], outputs: &[&str]) -> IpCoreDescription {
        let mut signals = SignalGroups::default();
        for name in inputs {
            signals.push(PortRef::Name(name.to_string()), Direction::Input);
        }
        for name in outputs {
            signals.push(PortRef::Name(name.to_string()), Direction::Output);
        }
        IpCoreDescription::new(
            String::from("test_core"),
            signals,
            BTreeMap::<String, ParamValue>::new(),
            BTreeMap::new(),
        )
    }

    #[test]
    fn ut_axis_slave_group() {
        let mut core = core_with_inputs(
            &["clk", "s_axis_tdata", "s_axis_tvalid", "s_axis_tlast"],
            &["s_axis_tready"],
        );
        let registry = InterfaceRegistry::with_builtins().unwrap();
        infer_interfaces(&mut core, &registry);

        let iface = core.get_interfaces().get("s_axis").unwrap();
        assert_eq!(iface.get_type(), "AXI4Stream");
        assert_eq!(iface.get_mode(), InterfaceMode::Slave);
        assert_eq!(iface.get_signals().output.len(), 1);
        assert_eq!(
            iface.get_signals().output["TREADY"].get_name(),
            "s_axis_tready"
        );
        assert_eq!(iface.get_signals().input.len(), 3);
        // clk stays ungrouped
        assert_eq!(core.get_signals().input.len(), 1);
        assert_eq!(core.get_signals().input[0].get_name(), "clk");
    }

    #[test]
    fn ut_master_direction_vote() {
        let mut core = core_with_inputs(
            &["m_axis_tready"],
            &["m_axis_tdata", "m_axis_tvalid"],
        );
        let registry = InterfaceRegistry::with_builtins().unwrap();
        infer_interfaces(&mut core, &registry);
        assert_eq!(
            core.get_interfaces()["m_axis"].get_mode(),
            InterfaceMode::Master
        );
    }

    #[test]
    fn ut_incomplete_group_stays_ungrouped() {
        // missing tready, a required signal
        let mut core = core_with_inputs(&["s_axis_tdata", "s_axis_tvalid"], &[]);
        let registry = InterfaceRegistry::with_builtins().unwrap();
        infer_interfaces(&mut core, &registry);
        assert_eq!(core.get_interfaces().is_empty(), true);
        assert_eq!(core.get_signals().input.len(), 2);
    }

    #[test]
    fn ut_full_axi4_beats_axi4lite() {
        let inputs = [
            "s_axi_awready",
            "s_axi_wready",
            "s_axi_bvalid",
            "s_axi_arready",
            "s_axi_rdata",
            "s_axi_rvalid",
            "s_axi_rlast",
            "s_axi_awaddr",
            "s_axi_awlen",
            "s_axi_awsize",
            "s_axi_awburst",
            "s_axi_awvalid",
            "s_axi_wdata",
            "s_axi_wlast",
            "s_axi_wvalid",
            "s_axi_bready",
            "s_axi_araddr",
            "s_axi_arlen",
            "s_axi_arsize",
            "s_axi_arburst",
            "s_axi_arvalid",
            "s_axi_rready",
        ];
        // everything lands on the slave side of the bus
        let mut core = core_with_inputs(
            &inputs[7..],
            &inputs[..7],
        );
        let registry = InterfaceRegistry::with_builtins().unwrap();
        infer_interfaces(&mut core, &registry);
        assert_eq!(core.get_interfaces()["s_axi"].get_type(), "AXI4");
        assert_eq!(
            core.get_interfaces()["s_axi"].get_mode(),
            InterfaceMode::Slave
        );
    }

    #[test]
    fn ut_two_ports_needed() {
        let mut core = core_with_inputs(&["s_axis_tdata"], &[]);
        let registry = InterfaceRegistry::with_builtins().unwrap();
        infer_interfaces(&mut core, &registry);
        assert_eq!(core.get_interfaces().is_empty(), true);
    }
}
