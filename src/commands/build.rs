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

use crate::commands::helps::build;
use crate::core::context::Context;
use crate::core::design::{DesignDescription, DEFAULT_DESIGN_FILE};
use crate::core::toplevel::TopLevel;
use colored::Colorize;
use std::path::PathBuf;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Build {
    design: Option<PathBuf>,
    dest: Option<PathBuf>,
    top: Option<String>,
}

impl Subcommand<Context> for Build {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(build::HELP))?;
        Ok(Self {
            design: cli.get(Arg::option("design").value("file"))?,
            dest: cli.get(Arg::option("dest").value("dir"))?,
            top: cli.get(Arg::option("top").value("name"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        let design_path = self
            .design
            .clone()
            .unwrap_or(PathBuf::from(DEFAULT_DESIGN_FILE));
        let design = DesignDescription::from_file(&design_path)?;
        let cores = design.resolve(&design_path)?;
        let registry = c.build_registry()?;

        let mut top = TopLevel::from_design(&design, &cores, &registry)?;
        if let Some(name) = self.top {
            top.set_name(name);
        }
        for warning in top.get_warnings() {
            println!("{}: {}", "warning".yellow(), warning);
        }

        let dest = self.dest.clone().unwrap_or(PathBuf::from("."));
        let out = dest.join(format!("{}.v", top.get_name()));
        let text = top.into_verilog(c.get_config().get_verilog_format());
        std::fs::write(&out, text)?;
        println!("info: wrote top-level module {:?}", out);
        Ok(())
    }
}
