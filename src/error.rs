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

use colored::Colorize;
use std::{fmt::Display, path::PathBuf};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("design file {0:?} does not exist{1}")]
    DesignFileNotFound(PathBuf, Hint),
    #[error("failed to read ip-core description {0:?}: {1}")]
    IpCoreFileInvalid(PathBuf, LastError),
    #[error("failed to read design description {0:?}: {1}")]
    DesignFileInvalid(PathBuf, LastError),
    #[error("ip-core {0:?} declares port {1:?} more than once")]
    DuplicatePortName(String, String),
    #[error("connection references unknown instance {0:?}{1}")]
    UnknownInstance(String, Hint),
    #[error("instance {0:?} has no port named {1:?}")]
    UnknownPort(String, String),
    #[error("instance {0:?} has no interface named {1:?}")]
    UnknownInterface(String, String),
    #[error("instance {0:?} declares unknown interface type {1:?}{2}")]
    UnknownInterfaceType(String, String, Hint),
    #[error("instance {0:?} has no parameter named {1:?}")]
    UnknownParameter(String, String),
    #[error("interface connection {0}.{1} <-> {2}.{3} joins mismatched types ({4} vs. {5})")]
    InterfaceTypeMismatch(String, String, String, String, String, String),
    #[error("interface connection {0}.{1} <-> {2}.{3} must join a master to a slave")]
    InterfaceModeConflict(String, String, String, String),
    #[error("port connection {0}.{1} <-> {2}.{3} has two drivers")]
    MultipleDrivers(String, String, String, String),
    #[error("external port {0:?} is driven by more than one source")]
    ExternalMultipleDrivers(String),
    #[error("external name {0:?} is not declared{1}")]
    ExternalNotDeclared(String, Hint),
    #[error("external name {0:?} is declared more than once")]
    ExternalDeclaredTwice(String),
    #[error("interface definition {0:?} carries a bad pattern for signal {1:?}: {2}")]
    BadSignalPattern(String, String, LastError),
    #[error("failed to load interface definition {0:?}: {1}")]
    IfaceDefInvalid(PathBuf, LastError),
    #[error("failed to write specification document {0:?}: {1}")]
    SpecFileInvalid(PathBuf, LastError),
    #[error("failed to read dataflow document {0:?}: {1}")]
    DataflowFileInvalid(PathBuf, LastError),
    #[error("dataflow node {0:?} appears more than once")]
    DuplicateNodeName(String),
    #[error("dataflow connection endpoint {0:?} does not belong to any node")]
    UnknownEndpoint(String),
    #[error("dataflow connects two external metanodes")]
    MetanodeToMetanode,
    #[error("dataflow metanode {0:?} carries unexpected property {1:?}")]
    MetanodeForeignProperty(String, String),
    #[error("dataflow node type {0:?} has no matching ip-core description{1}")]
    UnknownNodeType(String, Hint),
    #[error("no modules found among the parsed hdl sources")]
    NoModulesFound,
    #[error("failed to process configuration file: {0}")]
    ConfigInvalid(LastError),
}

#[derive(Debug, PartialEq)]
pub struct LastError(pub String);

impl Display for LastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Error::lowerize(self.0.to_string()))
    }
}

impl Error {
    pub fn lowerize(s: String) -> String {
        // get the first word
        let first_word = s.split_whitespace().into_iter().next().unwrap_or("");
        // retain capitalization if the first word is all-caps and longer than 1 character
        if first_word.len() > 1
            && first_word
                .chars()
                .find(|c| c.is_ascii_lowercase() == true)
                .is_none()
        {
            s.to_string()
        } else {
            s.char_indices()
                .map(|(i, c)| if i == 0 { c.to_ascii_lowercase() } else { c })
                .collect()
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Hint {
    DesignFlag,
    ExternalSection,
    InterfaceDirs,
    ProvideYamls,
}

impl Display for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::DesignFlag => "use `topwrap build --design <file>` to select a design file",
            Self::ExternalSection => {
                "list the name under the `external` section of the design file"
            }
            Self::InterfaceDirs => {
                "user definitions are read from $TOPWRAP_HOME/interfaces and any configured interface path"
            }
            Self::ProvideYamls => {
                "pass the ip-core yaml files describing every node type after the dataflow file"
            }
        };
        write!(
            f,
            "\n\n{}: {}",
            "hint".green(),
            Error::lowerize(message.to_string())
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ut_lowerize() {
        assert_eq!(
            Error::lowerize(String::from("Failed to load")),
            "failed to load"
        );
        // all-caps first words keep their case
        assert_eq!(Error::lowerize(String::from("YAML error")), "YAML error");
        assert_eq!(Error::lowerize(String::new()), "");
    }
}
