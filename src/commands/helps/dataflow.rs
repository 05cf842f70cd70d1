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

pub const HELP: &str = r#"Exchange designs with the gui as dataflow documents.

Usage:
    topwrap dataflow [options] <action>

Actions:
    export          render a design file as a dataflow document
    import          reconstruct a design file from a dataflow document

Options for 'export':
    --design <file>     design description to render (default: design.yaml)
    --dest <file>       output file (default: kpm_dataflow.json)

Options for 'import':
    <dataflow>          dataflow document to read
    <yaml>...           ip-core descriptions for every node type used
    --dest <file>       output file (default: design.yaml)

Use 'topwrap dataflow --help' to read more about the command.
"#;
