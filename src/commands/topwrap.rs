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

use crate::commands::build::Build;
use crate::commands::dataflow::Dataflow;
use crate::commands::helps::topwrap as help;
use crate::commands::parse::Parse;
use crate::commands::spec::Spec;
use crate::core::context::Context;
use crate::util::anyerror::AnyError;
use std::str::FromStr;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Command, Help, Subcommand};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, PartialEq)]
enum ColorMode {
    Always,
    Never,
    Auto,
}

impl FromStr for ColorMode {
    type Err = AnyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            "auto" => Ok(Self::Auto),
            _ => Err(AnyError(String::from(
                "value must be 'auto', 'always', or 'never'",
            ))),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Topwrap {
    version: bool,
    command: Option<TopwrapSubcommand>,
}

impl Command for Topwrap {
    fn interpret(cli: &mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(help::HELP))?;
        // coloring must be decided before any output happens
        match cli.get(Arg::option("color").value("when"))? {
            Some(ColorMode::Always) => colored::control::set_override(true),
            Some(ColorMode::Never) => colored::control::set_override(false),
            Some(ColorMode::Auto) | None => (),
        }
        Ok(Self {
            version: cli.check(Arg::flag("version"))?,
            command: cli.nest(Arg::subcommand("command"))?,
        })
    }

    fn execute(self) -> proc::Result {
        if self.version == true {
            println!("topwrap {}", VERSION);
            return Ok(());
        }
        match self.command {
            Some(command) => {
                let context = Context::retrieve()?;
                command.execute(&context)
            }
            None => Ok(println!("{}", help::HELP)),
        }
    }
}

#[derive(Debug, PartialEq)]
enum TopwrapSubcommand {
    Parse(Parse),
    Build(Build),
    Spec(Spec),
    Dataflow(Dataflow),
}

impl Subcommand<Context> for TopwrapSubcommand {
    fn interpret(cli: &mut Cli<Memory>) -> cli::Result<Self> {
        match cli
            .select(&["parse", "build", "spec", "dataflow"])?
            .as_ref()
        {
            "parse" => Ok(Self::Parse(Parse::interpret(cli)?)),
            "build" => Ok(Self::Build(Build::interpret(cli)?)),
            "spec" => Ok(Self::Spec(Spec::interpret(cli)?)),
            "dataflow" => Ok(Self::Dataflow(Dataflow::interpret(cli)?)),
            _ => panic!("an unimplemented command was selected"),
        }
    }

    fn execute(self, c: &Context) -> proc::Result {
        match self {
            Self::Parse(sub) => sub.execute(c),
            Self::Build(sub) => sub.execute(c),
            Self::Spec(sub) => sub.execute(c),
            Self::Dataflow(sub) => sub.execute(c),
        }
    }
}
