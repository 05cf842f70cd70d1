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

use crate::commands::helps::parse;
use crate::core::context::Context;
use crate::core::interface::infer::infer_interfaces;
use crate::core::ipcore::IpCoreDescription;
use crate::core::lang;
use crate::error::Error;
use crate::util::filesystem;
use colored::Colorize;
use std::path::PathBuf;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Parse {
    file: String,
    more_files: Vec<String>,
    ifaces: Option<Vec<String>>,
    no_infer: bool,
    dest: Option<PathBuf>,
}

impl Subcommand<Context> for Parse {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(parse::HELP))?;
        Ok(Self {
            ifaces: cli.get_all(Arg::option("iface").value("name"))?,
            no_infer: cli.check(Arg::flag("no-infer"))?,
            dest: cli.get(Arg::option("dest").value("dir"))?,
            file: cli.require(Arg::positional("file"))?,
            more_files: cli.remainder()?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        let mut registry = c.build_registry()?;
        if let Some(keep) = &self.ifaces {
            registry.retain(keep);
        }

        let mut sources = vec![self.file.clone()];
        sources.extend(self.more_files.iter().cloned());
        let files = filesystem::gather_hdl_files(&sources)?;
        let dest = self.dest.clone().unwrap_or(PathBuf::from("."));

        let mut written = 0;
        for file in &files {
            // a broken source must not stop the rest of the batch
            let modules = match lang::parse_hdl_file(file) {
                Ok(modules) => modules,
                Err(e) => {
                    eprintln!("{}: {}", "error".red(), Error::lowerize(e.to_string()));
                    continue;
                }
            };
            for module in &modules {
                let mut core = IpCoreDescription::from_module(module);
                if self.no_infer == false {
                    infer_interfaces(&mut core, &registry);
                }
                let out = dest.join(format!("gen_{}.yaml", core.get_name()));
                core.to_file(&out)?;
                println!("info: wrote ip-core description {:?}", out);
                written += 1;
            }
        }
        if written == 0 {
            Err(Error::NoModulesFound)?
        }
        Ok(())
    }
}
