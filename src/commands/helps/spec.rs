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

pub const HELP: &str = r#"Generate the gui specification for a set of ip cores.

Usage:
    topwrap spec [options] [<yaml>...]

Args:
    <yaml>...           ip-core description files

Options:
    --design <file>     seed the node set from a design's resolved cores
    --dest <file>       output file (default: kpm_spec.json)

Use 'topwrap spec --help' to read more about the command.
"#;
