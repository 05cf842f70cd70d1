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

pub const HELP: &str = r#"Convert hdl sources into ip-core description files.

Usage:
    topwrap parse [options] <file>...

Args:
    <file>...           verilog or vhdl source, or a directory to search

Options:
    --iface <name>...   restrict interface inference to the named definitions
    --no-infer          keep every port ungrouped
    --dest <dir>        output directory (default: .)

Use 'topwrap parse --help' to read more about the command.
"#;
