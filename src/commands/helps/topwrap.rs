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

pub const HELP: &str = r#"Generate top-level designs from reusable ip cores.

Usage:
    topwrap [options] <command>

Commands:
    parse           convert hdl sources into ip-core descriptions
    build           assemble a top-level module from a design file
    spec            generate a gui specification from ip-core descriptions
    dataflow        exchange designs with the gui as dataflow documents

Options:
    --version       print the version information and exit
    --color <when>  coloring: auto, always, never
    --help, -h      print this help information and exit

Use 'topwrap <command> --help' to read more about a command.
"#;
