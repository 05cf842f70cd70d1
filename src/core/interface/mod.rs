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

pub mod builtin;
pub mod infer;

use crate::core::lang::Direction;
use crate::error::{Error, LastError};
use crate::util::filesystem;
use regex::Regex;
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One logical signal of a bus interface definition.
///
/// The direction is expressed relative to the master side; a slave carries
/// the inverted direction.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct IfaceSignal {
    name: String,
    regexp: String,
    direction: Direction,
    #[serde(default)]
    required: bool,
}

impl IfaceSignal {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// The yaml schema for a bus interface definition, shared by the built-in
/// definitions and user files.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct InterfaceDefinition {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    prefixes: Vec<String>,
    signals: Vec<IfaceSignal>,
}

impl InterfaceDefinition {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn get_signals(&self) -> &[IfaceSignal] {
        &self.signals
    }
}

/// A definition with its signal patterns compiled, ready for matching.
///
/// Patterns are anchored and case-insensitive so `TDATA` in a definition
/// matches `s_axis_tdata` suffixes regardless of the source's casing.
#[derive(Debug)]
pub struct CompiledInterface {
    def: InterfaceDefinition,
    patterns: Vec<Regex>,
}

impl CompiledInterface {
    fn compile(def: InterfaceDefinition) -> Result<Self, Error> {
        let mut patterns = Vec::with_capacity(def.signals.len());
        for sig in &def.signals {
            let anchored = format!("(?i)^(?:{})$", sig.regexp);
            let re = Regex::new(&anchored).map_err(|e| {
                Error::BadSignalPattern(
                    def.name.clone(),
                    sig.name.clone(),
                    LastError(e.to_string()),
                )
            })?;
            patterns.push(re);
        }
        Ok(Self {
            def: def,
            patterns: patterns,
        })
    }

    pub fn get_def(&self) -> &InterfaceDefinition {
        &self.def
    }

    /// Finds the first signal whose pattern matches the port-name suffix.
    pub fn match_suffix(&self, suffix: &str) -> Option<&IfaceSignal> {
        self.patterns
            .iter()
            .position(|re| re.is_match(suffix))
            .map(|i| &self.def.signals[i])
    }
}

/// The set of interface definitions known for grouping and elaboration.
#[derive(Debug)]
pub struct InterfaceRegistry {
    definitions: BTreeMap<String, CompiledInterface>,
}

impl InterfaceRegistry {
    /// Creates a registry holding only the built-in definitions.
    pub fn with_builtins() -> Result<Self, Error> {
        let mut registry = Self {
            definitions: BTreeMap::new(),
        };
        for text in builtin::BUILTIN_DEFINITIONS {
            let def: InterfaceDefinition = serde_yaml::from_str(text).map_err(|e| {
                Error::IfaceDefInvalid(Path::new("<builtin>").to_path_buf(), LastError(e.to_string()))
            })?;
            registry.insert(def)?;
        }
        Ok(registry)
    }

    /// Reads every `*.yaml` definition under `dir`. A file loaded later
    /// shadows any earlier definition carrying the same name. A missing
    /// directory is skipped.
    pub fn load_dir(&mut self, dir: &Path) -> Result<(), Error> {
        if dir.is_dir() == false {
            return Ok(());
        }
        let files = filesystem::gather_yaml_files(dir)
            .map_err(|e| Error::IfaceDefInvalid(dir.to_path_buf(), LastError(e.to_string())))?;
        for file in files {
            let text = std::fs::read_to_string(&file)
                .map_err(|e| Error::IfaceDefInvalid(file.clone(), LastError(e.to_string())))?;
            let def: InterfaceDefinition = serde_yaml::from_str(&text)
                .map_err(|e| Error::IfaceDefInvalid(file.clone(), LastError(e.to_string())))?;
            self.insert(def)?;
        }
        Ok(())
    }

    fn insert(&mut self, def: InterfaceDefinition) -> Result<(), Error> {
        let compiled = CompiledInterface::compile(def)?;
        self.definitions
            .insert(compiled.def.name.clone(), compiled);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CompiledInterface> {
        self.definitions.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.definitions.keys().map(|k| k.as_str()).collect()
    }

    /// Narrows the registry to the named definitions, for restricting which
    /// candidates inference may consider.
    pub fn retain(&mut self, keep: &[String]) {
        self.definitions.retain(|name, _| keep.contains(name));
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledInterface> {
        self.definitions.values()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn ut_builtins_load() {
        let registry = InterfaceRegistry::with_builtins().unwrap();
        let names = registry.names();
        assert_eq!(names.contains(&"AXI4"), true);
        assert_eq!(names.contains(&"AXI4Lite"), true);
        assert_eq!(names.contains(&"AXI4Stream"), true);
        assert_eq!(names.contains(&"Wishbone"), true);
    }

    #[test]
    fn ut_match_is_case_insensitive_and_anchored() {
        let registry = InterfaceRegistry::with_builtins().unwrap();
        let axis = registry.get("AXI4Stream").unwrap();
        assert_eq!(axis.match_suffix("TDATA").unwrap().get_name(), "TDATA");
        assert_eq!(axis.match_suffix("tdata").unwrap().get_name(), "TDATA");
        // no partial matches
        assert_eq!(axis.match_suffix("tdata_x").is_none(), true);
    }

    #[test]
    fn ut_user_file_shadows_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join("wb.yaml")).unwrap();
        write!(
            f,
            "name: Wishbone\nsignals:\n  - {{ name: CYC, regexp: cyc, direction: out, required: true }}\n"
        )
        .unwrap();
        let mut registry = InterfaceRegistry::with_builtins().unwrap();
        registry.load_dir(dir.path()).unwrap();
        let wb = registry.get("Wishbone").unwrap();
        assert_eq!(wb.get_def().get_signals().len(), 1);
    }

    #[test]
    fn ut_bad_pattern_names_signal() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join("bad.yaml")).unwrap();
        write!(
            f,
            "name: Bad\nsignals:\n  - {{ name: X, regexp: '(', direction: out, required: true }}\n"
        )
        .unwrap();
        let mut registry = InterfaceRegistry::with_builtins().unwrap();
        let result = registry.load_dir(dir.path());
        assert_eq!(
            matches!(result, Err(Error::BadSignalPattern(_, _, _))),
            true
        );
    }

    #[test]
    fn ut_retain() {
        let mut registry = InterfaceRegistry::with_builtins().unwrap();
        registry.retain(&[String::from("AXI4Stream")]);
        assert_eq!(registry.names(), vec!["AXI4Stream"]);
    }
}
