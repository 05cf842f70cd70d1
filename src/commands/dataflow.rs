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

use crate::commands::helps::dataflow;
use crate::core::context::Context;
use crate::core::design::{DesignDescription, DEFAULT_DESIGN_FILE};
use crate::core::ipcore::IpCoreDescription;
use crate::core::kpm::dataflow as kpmflow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Dataflow {
    command: Option<DataflowAction>,
}

impl Subcommand<Context> for Dataflow {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(dataflow::HELP))?;
        Ok(Self {
            command: cli.nest(Arg::subcommand("action"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        match self.command {
            Some(action) => action.execute(c),
            None => Ok(println!("{}", dataflow::HELP)),
        }
    }
}

#[derive(Debug, PartialEq)]
enum DataflowAction {
    Export(Export),
    Import(Import),
}

impl Subcommand<Context> for DataflowAction {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        match cli.select(&["export", "import"])?.as_ref() {
            "export" => Ok(Self::Export(Export::interpret(cli)?)),
            "import" => Ok(Self::Import(Import::interpret(cli)?)),
            _ => panic!("an unimplemented action was selected"),
        }
    }

    fn execute(self, c: &Context) -> proc::Result {
        match self {
            Self::Export(sub) => sub.execute(c),
            Self::Import(sub) => sub.execute(c),
        }
    }
}

#[derive(Debug, PartialEq)]
struct Export {
    design: Option<PathBuf>,
    dest: Option<PathBuf>,
}

impl Subcommand<Context> for Export {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(dataflow::HELP))?;
        Ok(Self {
            design: cli.get(Arg::option("design").value("file"))?,
            dest: cli.get(Arg::option("dest").value("file"))?,
        })
    }

    fn execute(self, _: &Context) -> proc::Result {
        let design_path = self
            .design
            .clone()
            .unwrap_or(PathBuf::from(DEFAULT_DESIGN_FILE));
        let design = DesignDescription::from_file(&design_path)?;
        let cores = design.resolve(&design_path)?;

        let flow = kpmflow::Dataflow::from_design(&design, &cores)?;
        let out = self
            .dest
            .unwrap_or(PathBuf::from(kpmflow::DEFAULT_DATAFLOW_FILE));
        flow.to_file(&out)?;
        println!("info: wrote dataflow {:?}", out);
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
struct Import {
    dataflow: PathBuf,
    yamls: Vec<String>,
    dest: Option<PathBuf>,
}

impl Subcommand<Context> for Import {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(dataflow::HELP))?;
        Ok(Self {
            dest: cli.get(Arg::option("dest").value("file"))?,
            dataflow: cli.require(Arg::positional("dataflow"))?,
            yamls: cli.remainder()?,
        })
    }

    fn execute(self, _: &Context) -> proc::Result {
        let flow = kpmflow::Dataflow::from_file(&self.dataflow)?;

        let mut cores: BTreeMap<String, (PathBuf, IpCoreDescription)> = BTreeMap::new();
        for file in &self.yamls {
            let core = IpCoreDescription::from_file(Path::new(file))?;
            cores.insert(
                core.get_name().to_string(),
                (PathBuf::from(file), core),
            );
        }

        let design = flow.to_design(&cores)?;
        let out = self.dest.unwrap_or(PathBuf::from(DEFAULT_DESIGN_FILE));
        design.to_file(&out)?;
        println!("info: wrote design {:?}", out);
        Ok(())
    }
}
