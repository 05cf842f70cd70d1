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

pub mod expr;
pub mod lexer;
pub mod verilog;
pub mod vhdl;

use crate::util::anyerror::CodeFault;
use crate::util::filesystem;
use serde_derive::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::Path;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Lang {
    Verilog,
    Vhdl,
}

#[derive(Debug, PartialEq, Clone, Copy, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "in")]
    Input,
    #[serde(rename = "out")]
    Output,
    #[serde(rename = "inout")]
    Inout,
}

impl Direction {
    /// Flips input to output and vice versa. Inout is unchanged.
    pub fn invert(&self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
            Self::Inout => Self::Inout,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Input => "in",
                Self::Output => "out",
                Self::Inout => "inout",
            }
        )
    }
}

/// One side of a vector range, either resolved to a constant or kept as the
/// original expression text.
#[derive(Debug, PartialEq, Clone, Eq, PartialOrd, Ord)]
pub enum Bound {
    Num(i64),
    Expr(String),
}

impl Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{}", n),
            Self::Expr(e) => write!(f, "{}", e),
        }
    }
}

/// A single port captured from an hdl module declaration.
#[derive(Debug, PartialEq, Clone)]
pub struct HdlPort {
    pub name: String,
    pub direction: Direction,
    /// `(msb, lsb)` for vectored ports; `None` for 1-bit scalars.
    pub bounds: Option<(Bound, Bound)>,
}

impl HdlPort {
    /// Computes the bit width, if both bounds resolved to constants.
    pub fn width(&self) -> Option<u64> {
        match &self.bounds {
            None => Some(1),
            Some((Bound::Num(m), Bound::Num(l))) => Some((m - l).unsigned_abs() + 1),
            _ => None,
        }
    }
}

/// A parameter (generic) captured from an hdl module declaration.
#[derive(Debug, PartialEq, Clone)]
pub struct HdlParameter {
    pub name: String,
    /// Verbatim default expression text, if one was written.
    pub default_text: Option<String>,
    /// The default resolved to a constant, when possible.
    pub default_value: Option<i64>,
}

/// A language-neutral view of a parsed hdl module or entity.
#[derive(Debug, PartialEq)]
pub struct HdlModule {
    pub name: String,
    pub parameters: Vec<HdlParameter>,
    pub ports: Vec<HdlPort>,
    pub language: Lang,
}

/// Parses every module found in the hdl file at `path`.
///
/// The language is selected by file extension. Failures carry the offending
/// file so a batch of sources can report per-file errors.
pub fn parse_hdl_file(path: &Path) -> Result<Vec<HdlModule>, CodeFault> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CodeFault(Some(path.display().to_string()), Box::new(e)))?;
    if filesystem::has_extension(path, &filesystem::VERILOG_EXTENSIONS) {
        verilog::parse_source(&text)
            .map_err(|e| CodeFault(Some(path.display().to_string()), Box::new(e)))
    } else if filesystem::has_extension(path, &filesystem::VHDL_EXTENSIONS) {
        vhdl::parse_source(&text)
            .map_err(|e| CodeFault(Some(path.display().to_string()), Box::new(e)))
    } else {
        Err(CodeFault(
            None,
            Box::new(crate::util::anyerror::AnyError(format!(
                "file {:?} does not have a supported hdl extension",
                path
            ))),
        ))
    }
}
