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

//! Bridge documents for the pipeline-manager GUI: the specification json
//! describing what nodes exist, and the dataflow json describing one drawn
//! design.

pub mod dataflow;
pub mod spec;

use crate::core::lang::Direction;

pub const EXT_INPUT_NAME: &str = "External Input";
pub const EXT_OUTPUT_NAME: &str = "External Output";
pub const EXT_INOUT_NAME: &str = "External Inout";
pub const CONST_NAME: &str = "Constant";

/// The property carrying an external metanode's outward name.
pub const EXT_NAME_PROP: &str = "External Name";
/// The property carrying a constant metanode's tie-off value.
pub const CONST_VALUE_PROP: &str = "Constant Value";

/// The single interface every metanode exposes.
pub const METANODE_IFACE: &str = "external";

/// Whether a node type names one of the special non-ip nodes.
pub fn is_metanode_type(node_type: &str) -> bool {
    node_type == EXT_INPUT_NAME
        || node_type == EXT_OUTPUT_NAME
        || node_type == EXT_INOUT_NAME
        || node_type == CONST_NAME
}

/// The metanode type representing an external name of the given direction.
pub fn metanode_type_for(dir: Direction) -> &'static str {
    match dir {
        Direction::Input => EXT_INPUT_NAME,
        Direction::Output => EXT_OUTPUT_NAME,
        Direction::Inout => EXT_INOUT_NAME,
    }
}

/// The external direction a metanode type stands for.
pub fn direction_for_metanode(node_type: &str) -> Option<Direction> {
    match node_type {
        EXT_INPUT_NAME => Some(Direction::Input),
        EXT_OUTPUT_NAME => Some(Direction::Output),
        EXT_INOUT_NAME => Some(Direction::Inout),
        _ => None,
    }
}
